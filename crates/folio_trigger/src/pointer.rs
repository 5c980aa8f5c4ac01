//! Pointer trigger
//!
//! Reports the pointer position relative to the viewport centre, scaled to
//! `[-1, 1]` on both axes. Every move is reported; consumers retarget
//! overwrite tweens on each event, which smooths the motion without any
//! debouncing here.

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::Size;
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::subscription::{Registry, Subscription, SubscriptionId};

/// Normalized pointer position
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerEvent {
    /// `-1` at the left edge, `1` at the right edge
    pub x: f32,
    /// `-1` at the top edge, `1` at the bottom edge
    pub y: f32,
    /// Raw position in viewport pixels
    pub client_x: f32,
    pub client_y: f32,
}

impl PointerEvent {
    /// Normalized position multiplied by a factor
    pub fn scaled(&self, factor: f32) -> (f32, f32) {
        (self.x * factor, self.y * factor)
    }
}

/// Map a client position to `[-1, 1]` on both axes
///
/// A zero-sized viewport has no meaningful position and reports the centre.
pub fn normalize(client_x: f32, client_y: f32, viewport: Size) -> (f32, f32) {
    if viewport.is_degenerate() {
        tracing::warn!("Pointer moved over a {:?} viewport, reporting centre", viewport);
        return (0.0, 0.0);
    }

    let axis = |value: f32, extent: f32| {
        let n = (value / extent) * 2.0 - 1.0;
        if n.is_nan() {
            0.0
        } else {
            n.clamp(-1.0, 1.0)
        }
    };
    (axis(client_x, viewport.width), axis(client_y, viewport.height))
}

type PointerCallback = Rc<RefCell<Box<dyn FnMut(PointerEvent)>>>;

struct PointerInner {
    viewport: Size,
    subscribers: SlotMap<SubscriptionId, PointerCallback>,
    last: Option<PointerEvent>,
}

impl Registry for PointerInner {
    fn release(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.remove(id).is_some()
    }

    fn contains(&self, id: SubscriptionId) -> bool {
        self.subscribers.contains_key(id)
    }
}

/// Global pointer position trigger
#[derive(Clone)]
pub struct PointerTrigger {
    inner: Rc<RefCell<PointerInner>>,
}

impl PointerTrigger {
    pub fn new(viewport: Size) -> Self {
        Self {
            inner: Rc::new(RefCell::new(PointerInner {
                viewport,
                subscribers: SlotMap::with_key(),
                last: None,
            })),
        }
    }

    /// Call `on_move` on every pointer move until the subscription drops
    pub fn subscribe<F>(&self, on_move: F) -> Subscription
    where
        F: FnMut(PointerEvent) + 'static,
    {
        let callback: PointerCallback = Rc::new(RefCell::new(Box::new(on_move)));
        let id = self.inner.borrow_mut().subscribers.insert(callback);

        let registry: Rc<RefCell<dyn Registry>> = self.inner.clone();
        Subscription::new(id, Rc::downgrade(&registry))
    }

    pub fn on_resize(&self, viewport: Size) {
        self.inner.borrow_mut().viewport = viewport;
    }

    /// Report a pointer move in viewport pixels
    ///
    /// Subscribers removed by an earlier callback during the same move are
    /// not called.
    pub fn on_pointer_move(&self, client_x: f32, client_y: f32) -> PointerEvent {
        let (event, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            let (x, y) = normalize(client_x, client_y, inner.viewport);
            let event = PointerEvent {
                x,
                y,
                client_x,
                client_y,
            };
            inner.last = Some(event);

            let callbacks: SmallVec<[(SubscriptionId, PointerCallback); 4]> = inner
                .subscribers
                .iter()
                .map(|(id, cb)| (id, cb.clone()))
                .collect();
            (event, callbacks)
        };

        for (id, callback) in callbacks {
            if !self.inner.borrow().subscribers.contains_key(id) {
                continue;
            }
            match callback.try_borrow_mut() {
                Ok(mut f) => (&mut **f)(event),
                Err(_) => tracing::warn!("Re-entrant pointer callback {:?} skipped", id),
            };
        }

        event
    }

    /// Most recent event, if the pointer has moved
    pub fn last(&self) -> Option<PointerEvent> {
        self.inner.borrow().last
    }

    pub fn viewport(&self) -> Size {
        self.inner.borrow().viewport
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_normalize() {
        let viewport = Size::new(1000.0, 500.0);

        assert_eq!(normalize(500.0, 250.0, viewport), (0.0, 0.0));
        assert_eq!(normalize(0.0, 0.0, viewport), (-1.0, -1.0));
        assert_eq!(normalize(1000.0, 500.0, viewport), (1.0, 1.0));

        let (x, y) = normalize(750.0, 125.0, viewport);
        assert!((x - 0.5).abs() < 1e-4);
        assert!((y + 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_out_of_window_is_clamped() {
        let viewport = Size::new(100.0, 100.0);
        assert_eq!(normalize(-50.0, 300.0, viewport), (-1.0, 1.0));
    }

    #[test]
    fn test_zero_viewport_reports_centre() {
        assert_eq!(normalize(10.0, 10.0, Size::new(0.0, 0.0)), (0.0, 0.0));
        assert_eq!(normalize(10.0, 10.0, Size::new(f32::NAN, 10.0)), (0.0, 0.0));
    }

    #[test]
    fn test_every_move_is_reported() {
        let trigger = PointerTrigger::new(Size::new(200.0, 200.0));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let _sub = trigger.subscribe(move |event| sink.borrow_mut().push(event.x));

        trigger.on_pointer_move(0.0, 100.0);
        trigger.on_pointer_move(0.0, 100.0);
        trigger.on_pointer_move(200.0, 100.0);

        assert_eq!(*seen.borrow(), vec![-1.0, -1.0, 1.0]);
        assert_eq!(trigger.last().map(|e| e.client_x), Some(200.0));
    }

    #[test]
    fn test_resize_changes_normalization() {
        let trigger = PointerTrigger::new(Size::new(200.0, 200.0));
        trigger.on_resize(Size::new(400.0, 200.0));

        let event = trigger.on_pointer_move(200.0, 100.0);
        assert_eq!((event.x, event.y), (0.0, 0.0));
        assert_eq!(event.scaled(10.0), (0.0, 0.0));
    }

    #[test]
    fn test_unsubscribe_stops_events() {
        let trigger = PointerTrigger::new(Size::new(100.0, 100.0));
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        let sub = trigger.subscribe(move |_| inner.set(inner.get() + 1));

        trigger.on_pointer_move(10.0, 10.0);
        assert!(sub.unsubscribe());
        trigger.on_pointer_move(20.0, 20.0);

        assert_eq!(count.get(), 1);
        assert_eq!(trigger.subscriber_count(), 0);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let trigger = PointerTrigger::new(Size::new(100.0, 100.0));
        {
            let _sub = trigger.subscribe(|_| {});
            assert_eq!(trigger.subscriber_count(), 1);
        }
        assert_eq!(trigger.subscriber_count(), 0);
    }

    #[test]
    fn test_callback_removing_later_subscriber() {
        let trigger = PointerTrigger::new(Size::new(100.0, 100.0));
        let count = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let to_drop = slot.clone();
        let _first = trigger.subscribe(move |_| {
            to_drop.borrow_mut().take();
        });
        let inner = count.clone();
        *slot.borrow_mut() = Some(trigger.subscribe(move |_| inner.set(inner.get() + 1)));

        trigger.on_pointer_move(50.0, 50.0);
        assert_eq!(count.get(), 0);
        assert_eq!(trigger.subscriber_count(), 1);
    }
}
