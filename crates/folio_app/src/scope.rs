//! Page scope
//!
//! Everything a mounted page owns: its sequencer, its viewport trigger, the
//! trigger subscriptions it holds and the elements it created. Unmounting
//! the scope tears all of it down in one place, so a page never leaves
//! callbacks or timelines behind after navigation.

use std::cell::RefCell;
use std::rc::Rc;

use folio_animation::{AnimationStep, Sequencer, TimelineHandle, TimelineRef};
use folio_core::{ElementId, ElementStore, Rect};
use folio_trigger::{Subscription, ViewportConfig, ViewportTrigger};

use crate::config::FolioConfig;
use crate::error::Result;

/// Sequencer shared between a scope and the trigger callbacks it registers
pub type SharedSequencer = Rc<RefCell<Sequencer>>;

pub struct PageScope {
    sequencer: SharedSequencer,
    viewport: ViewportTrigger,
    subscriptions: Vec<Subscription>,
    elements: Vec<ElementId>,
}

impl PageScope {
    pub fn new(config: &FolioConfig) -> Self {
        let sequencer = match config.seed {
            Some(seed) => Sequencer::with_seed(seed),
            None => Sequencer::new(),
        };
        Self::with_parts(sequencer, config.viewport_config())
    }

    pub fn with_parts(sequencer: Sequencer, viewport: ViewportConfig) -> Self {
        Self {
            sequencer: Rc::new(RefCell::new(sequencer)),
            viewport: ViewportTrigger::new(viewport),
            subscriptions: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Handle to the sequencer for trigger callbacks
    pub fn sequencer(&self) -> SharedSequencer {
        self.sequencer.clone()
    }

    pub fn viewport(&self) -> &ViewportTrigger {
        &self.viewport
    }

    /// Create an element owned by this scope
    pub fn create_element(
        &mut self,
        store: &mut ElementStore,
        label: impl Into<String>,
        bounds: Rect,
    ) -> ElementId {
        let id = store.create(label, bounds);
        self.elements.push(id);
        id
    }

    pub fn elements(&self) -> &[ElementId] {
        &self.elements
    }

    /// Keep a subscription alive until unmount
    pub fn hold(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.iter().filter(|s| s.is_active()).count()
    }

    pub fn schedule(&self, timeline: impl Into<TimelineRef>) -> Result<TimelineHandle> {
        Ok(self.sequencer.borrow_mut().schedule(timeline)?)
    }

    pub fn schedule_step(&self, step: AnimationStep) -> Result<TimelineHandle> {
        Ok(self.sequencer.borrow_mut().schedule_step(step)?)
    }

    /// Apply zero-length steps right away, before the first frame
    pub fn settle(&self, store: &mut ElementStore) {
        self.advance(0.0, store);
    }

    /// Run one frame: deliver visibility changes, then advance animations
    ///
    /// Visibility callbacks run before the sequencer is borrowed, so they
    /// are free to schedule. Returns true while anything is still playing.
    pub fn frame(&self, dt: f32, viewport: Rect, store: &mut ElementStore) -> bool {
        self.viewport.process(viewport, &*store);
        self.advance(dt, store)
    }

    /// Tick the sequencer and consume the lifecycle events it queued
    fn advance(&self, dt: f32, store: &mut ElementStore) -> bool {
        let mut sequencer = self.sequencer.borrow_mut();
        let playing = sequencer.tick(dt, store);
        for event in sequencer.drain_events() {
            tracing::debug!("Sequencer event {:?}", event);
        }
        playing
    }

    /// Tear the scope down, removing its elements from the store
    ///
    /// Returns the number of elements removed.
    pub fn unmount(self, store: &mut ElementStore) -> usize {
        let Self {
            sequencer,
            viewport,
            subscriptions,
            elements,
        } = self;

        for subscription in subscriptions {
            subscription.unsubscribe();
        }

        let mut sequencer = sequencer.borrow_mut();
        sequencer.clear();

        let mut removed = 0;
        for id in elements {
            viewport.unobserve(id);
            sequencer.release_element(id);
            if store.remove(id).is_some() {
                removed += 1;
            }
        }

        tracing::debug!("Unmounted page scope, removed {} elements", removed);
        removed
    }
}
