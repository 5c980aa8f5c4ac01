//! Folio Triggers
//!
//! Observation sources that turn host input into normalized events.
//!
//! # Features
//!
//! - **Viewport Trigger**: Per-element visibility from intersection ratios
//!   against a margin-adjusted viewport, fire-once or repeating
//! - **Pointer Trigger**: Pointer position normalized to `[-1, 1]`
//! - **Subscriptions**: Weak handles that unregister on drop and never fire
//!   after unsubscribing
//!
//! # Example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use folio_core::{ElementStore, Rect};
//! use folio_trigger::{ViewportConfig, ViewportTrigger};
//!
//! let mut store = ElementStore::new();
//! let section = store.create("skills", Rect::new(0.0, 1200.0, 800.0, 400.0));
//!
//! let trigger = ViewportTrigger::new(ViewportConfig::default());
//! let entered = Rc::new(Cell::new(0));
//! let counter = entered.clone();
//! let _subscription = trigger.observe([section], move |_| counter.set(counter.get() + 1));
//!
//! // Scrolled to the top: the section is below the fold
//! trigger.process(Rect::new(0.0, 0.0, 800.0, 900.0), &store);
//! assert_eq!(entered.get(), 0);
//!
//! // Scrolled down far enough
//! trigger.process(Rect::new(0.0, 800.0, 800.0, 900.0), &store);
//! assert_eq!(entered.get(), 1);
//! ```

pub mod pointer;
pub mod subscription;
pub mod viewport;

pub use pointer::{normalize, PointerEvent, PointerTrigger};
pub use subscription::{Subscription, SubscriptionId};
pub use viewport::{ViewportConfig, ViewportTrigger, VisibilityEvent};
