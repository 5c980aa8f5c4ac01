//! Folio Core
//!
//! Host-side primitives shared by the animation and trigger crates:
//!
//! - **Element Handles**: Slot-map keys for host-owned visual elements
//! - **Element Store**: Labels, bounds and animatable properties per element
//! - **Animatable Values**: Floats and colors with linear interpolation
//! - **Geometry**: Points, sizes, rects and viewport margins
//!
//! # Example
//!
//! ```rust
//! use folio_core::{AnimValue, ElementHost, ElementStore, Rect};
//!
//! let mut store = ElementStore::new();
//! let hero = store.create("hero", Rect::new(0.0, 96.0, 1280.0, 400.0));
//!
//! store.set(hero, "opacity", AnimValue::Float(0.0));
//! assert_eq!(store.read(hero, "opacity"), Some(AnimValue::Float(0.0)));
//!
//! store.remove(hero);
//! assert!(!store.is_alive(hero));
//! ```

pub mod element;
pub mod error;
pub mod geometry;
pub mod value;

pub use element::{BoundsSource, ElementHost, ElementId, ElementNode, ElementStore};
pub use error::{HostError, Result};
pub use geometry::{Margin, Point, Rect, Size};
pub use value::{AnimValue, Color, Interpolate};
