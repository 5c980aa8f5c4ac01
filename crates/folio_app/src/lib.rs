//! Folio Application
//!
//! Wires the animation and trigger crates into the portfolio's pages:
//!
//! - **Pages**: Home scroll reveals, the About showcase and the animation
//!   practice page
//! - **Page Scopes**: Per-page sequencer, viewport trigger, subscriptions and
//!   elements, torn down together on navigation
//! - **Configuration**: Serde-backed presets loadable from TOML
//!
//! # Example
//!
//! ```rust
//! use folio_app::{FolioApp, FolioConfig, PageKind};
//! use folio_core::Size;
//!
//! let mut app = FolioApp::new(FolioConfig::testing(), Size::new(1280.0, 720.0));
//! app.navigate(PageKind::About).unwrap();
//!
//! app.on_pointer_move(960.0, 360.0);
//!
//! // Ambient loops on the about page never finish
//! assert!(app.frame(1.0 / 60.0));
//! ```

mod app;
mod config;
mod error;
mod page;
pub mod pages;
mod scope;

pub use app::FolioApp;
pub use config::{FolioConfig, ParallaxConfig, RevealConfig, SceneConfig};
pub use error::{AppError, Result};
pub use page::{MountContext, Page};
pub use pages::PageKind;
pub use scope::{PageScope, SharedSequencer};

/// Prelude module - import everything commonly needed
pub mod prelude {
    pub use crate::app::FolioApp;
    pub use crate::config::FolioConfig;
    pub use crate::error::{AppError, Result};
    pub use crate::pages::PageKind;

    pub use folio_animation::{AnimationPreset, AnimationStep, Easing, Sequencer, Timeline};
    pub use folio_core::{ElementId, ElementStore, Rect, Size};
    pub use folio_trigger::{PointerEvent, ViewportConfig};
}
