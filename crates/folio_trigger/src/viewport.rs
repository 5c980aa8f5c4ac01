//! Viewport intersection trigger
//!
//! Tracks whether observed elements are inside the viewport and calls back
//! when that changes. Detection and delivery are split:
//!
//! ```text
//! scroll/resize ──► update(viewport, bounds)   compute ratios, queue events
//!                   flush()                    run callbacks, no borrow held
//! ```
//!
//! The viewport is first adjusted by the root margin; the default pulls the
//! bottom edge up by 50px so content has to be slightly inside the screen
//! before it counts. An element is visible when its intersection ratio is
//! nonzero and at least the threshold.
//!
//! By default each element fires once, on its first transition into view,
//! and is then dropped from observation.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use folio_core::{BoundsSource, ElementId, Margin, Rect};
use indexmap::IndexMap;
use slotmap::SlotMap;

use crate::subscription::{Registry, Subscription, SubscriptionId};

/// Viewport trigger options
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportConfig {
    /// Minimum visible fraction of the element, `0.0..=1.0`
    pub threshold: f32,
    /// Adjustment applied to the viewport before intersecting
    pub root_margin: Margin,
    /// Fire again every time the element re-enters
    pub repeat: bool,
    /// Also report elements leaving the viewport
    pub report_exit: bool,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            root_margin: Margin::bottom(-50.0),
            repeat: false,
            report_exit: false,
        }
    }
}

impl ViewportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        let clamped = if threshold.is_nan() {
            0.0
        } else {
            threshold.clamp(0.0, 1.0)
        };
        if clamped != threshold {
            tracing::warn!("threshold = {} is out of range, using {}", threshold, clamped);
        }
        self.threshold = clamped;
        self
    }

    pub fn with_root_margin(mut self, margin: Margin) -> Self {
        self.root_margin = margin;
        self
    }

    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_report_exit(mut self, report_exit: bool) -> Self {
        self.report_exit = report_exit;
        self
    }

    /// Whether an intersection ratio counts as visible
    pub fn is_visible(&self, ratio: f32) -> bool {
        ratio > 0.0 && ratio >= self.threshold
    }
}

/// Visibility change delivered to observers
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityEvent {
    pub element: ElementId,
    pub is_visible: bool,
    pub ratio: f32,
}

type VisibilityCallback = Rc<RefCell<Box<dyn FnMut(VisibilityEvent)>>>;

#[derive(Clone, Copy, Debug, Default)]
struct ElementState {
    visible: bool,
    fired: bool,
}

struct ViewportInner {
    config: ViewportConfig,
    observers: SlotMap<SubscriptionId, VisibilityCallback>,
    elements: IndexMap<(SubscriptionId, ElementId), ElementState>,
    pending: VecDeque<(SubscriptionId, VisibilityEvent)>,
}

impl Registry for ViewportInner {
    fn release(&mut self, id: SubscriptionId) -> bool {
        let existed = self.observers.remove(id).is_some();
        self.elements.retain(|(sub, _), _| *sub != id);
        existed
    }

    fn contains(&self, id: SubscriptionId) -> bool {
        self.observers.contains_key(id)
    }
}

/// Intersection-based visibility trigger
///
/// Cloning shares the same observation state.
#[derive(Clone)]
pub struct ViewportTrigger {
    inner: Rc<RefCell<ViewportInner>>,
}

impl ViewportTrigger {
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ViewportInner {
                config,
                observers: SlotMap::with_key(),
                elements: IndexMap::new(),
                pending: VecDeque::new(),
            })),
        }
    }

    pub fn config(&self) -> ViewportConfig {
        self.inner.borrow().config
    }

    /// Start observing elements
    ///
    /// `on_change` receives enter events, and exit events when
    /// `report_exit` is set. Dropping the returned subscription stops
    /// observation for all of these elements.
    pub fn observe<F>(&self, elements: impl IntoIterator<Item = ElementId>, on_change: F) -> Subscription
    where
        F: FnMut(VisibilityEvent) + 'static,
    {
        let mut inner = self.inner.borrow_mut();
        let callback: VisibilityCallback = Rc::new(RefCell::new(Box::new(on_change)));
        let id = inner.observers.insert(callback);
        let mut count = 0;
        for element in elements {
            inner.elements.insert((id, element), ElementState::default());
            count += 1;
        }
        tracing::debug!("Observing {} element(s) for {:?}", count, id);
        drop(inner);

        let registry: Rc<RefCell<dyn Registry>> = self.inner.clone();
        Subscription::new(id, Rc::downgrade(&registry))
    }

    /// Stop observing an element for every subscription
    ///
    /// Events already queued for it are still delivered by the next
    /// [`flush`](Self::flush), but it never fires again.
    pub fn unobserve(&self, element: ElementId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.elements.len();
        inner.elements.retain(|(_, el), _| *el != element);
        before != inner.elements.len()
    }

    /// Recompute visibility against the current viewport and queue events
    ///
    /// Returns the number of events queued. Elements whose bounds are gone
    /// are unobserved.
    pub fn update(&self, viewport: Rect, bounds: &dyn BoundsSource) -> usize {
        let mut guard = self.inner.borrow_mut();
        let ViewportInner {
            config,
            elements,
            pending,
            ..
        } = &mut *guard;

        let root = viewport.expand(&config.root_margin);
        let queued_before = pending.len();

        elements.retain(|&(sub, element), state| {
            let Some(rect) = bounds.bounds(element) else {
                tracing::debug!("Element {:?} is gone, unobserving", element);
                return false;
            };

            let ratio = rect.intersection_ratio(&root);
            let visible = config.is_visible(ratio);

            if visible && !state.visible {
                state.visible = true;
                if !state.fired || config.repeat {
                    state.fired = true;
                    tracing::debug!("Element {:?} entered viewport (ratio {:.2})", element, ratio);
                    pending.push_back((
                        sub,
                        VisibilityEvent {
                            element,
                            is_visible: true,
                            ratio,
                        },
                    ));
                }
            } else if !visible && state.visible {
                state.visible = false;
                if config.report_exit {
                    pending.push_back((
                        sub,
                        VisibilityEvent {
                            element,
                            is_visible: false,
                            ratio,
                        },
                    ));
                }
            }

            // Fire-once elements are done after entering, or after leaving
            // again when exits are reported
            config.repeat || !state.fired || (config.report_exit && state.visible)
        });

        pending.len() - queued_before
    }

    /// Deliver queued events
    ///
    /// No borrow is held while a callback runs, so callbacks may observe,
    /// unobserve or drop subscriptions. Events for released subscriptions
    /// are discarded.
    pub fn flush(&self) -> usize {
        let mut delivered = 0;

        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                let Some((sub, event)) = inner.pending.pop_front() else {
                    break;
                };
                inner.observers.get(sub).cloned().map(|cb| (cb, event))
            };

            let Some((callback, event)) = next else {
                continue;
            };
            match callback.try_borrow_mut() {
                Ok(mut f) => {
                    (&mut **f)(event);
                    delivered += 1;
                }
                Err(_) => {
                    tracing::warn!("Re-entrant visibility callback for {:?} skipped", event.element);
                }
            };
        }

        delivered
    }

    /// Update then flush
    pub fn process(&self, viewport: Rect, bounds: &dyn BoundsSource) -> usize {
        self.update(viewport, bounds);
        self.flush()
    }

    /// Whether an element is currently considered visible by any observer
    pub fn is_visible(&self, element: ElementId) -> bool {
        self.inner
            .borrow()
            .elements
            .iter()
            .any(|((_, el), state)| *el == element && state.visible)
    }

    /// Number of (subscription, element) pairs still observed
    pub fn observed_count(&self) -> usize {
        self.inner.borrow().elements.len()
    }

    pub fn pending_count(&self) -> usize {
        self.inner.borrow().pending.len()
    }
}

impl Default for ViewportTrigger {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}
