//! Folio Animation System
//!
//! Timeline sequencing for decorative page motion.
//!
//! # Features
//!
//! - **Steps**: Property transitions over one or more targets with duration,
//!   easing, stagger, repeat and yoyo
//! - **Value Rules**: Fixed, random-range, relative and per-index end values
//! - **Timelines**: Ordered steps and nested timelines with sequential,
//!   absolute and relative positions
//! - **Sequencer**: Explicit `tick(dt)` frame clock, pause/seek/time scale,
//!   lifecycle events and overwrite tweens for pointer-driven motion
//! - **Presets**: The reveal, particle, letter and morph sequences the
//!   portfolio pages use
//!
//! # Example
//!
//! ```rust
//! use folio_animation::{AnimationStep, Sequencer, Stagger, Timeline};
//! use folio_core::{ElementStore, Rect};
//!
//! let mut store = ElementStore::new();
//! let letters: Vec<_> = (0..5)
//!     .map(|i| store.create(format!("letter-{i}"), Rect::new(i as f32 * 40.0, 0.0, 40.0, 80.0)))
//!     .collect();
//!
//! let timeline = Timeline::labeled("heading")
//!     .add(AnimationStep::set(letters.clone()).property("opacity", 0.0))
//!     .add(
//!         AnimationStep::new(letters.clone())
//!             .property("opacity", 1.0)
//!             .duration(0.8)
//!             .stagger(Stagger::each(0.1).from_center()),
//!     );
//!
//! let mut sequencer = Sequencer::with_seed(7);
//! sequencer.schedule(timeline).unwrap();
//!
//! while sequencer.tick(1.0 / 60.0, &mut store) {}
//! let opacity = store.get_float(letters[0], "opacity").unwrap();
//! assert!((opacity - 1.0).abs() < 1e-4);
//! ```

pub mod easing;
pub mod error;
pub mod presets;
pub mod sequencer;
pub mod stagger;
pub mod step;
pub mod timeline;
pub mod values;

pub use easing::Easing;
pub use error::{ConfigurationError, Result, ValueOutOfRange};
pub use presets::{AnimationPreset, RevealDirection};
pub use sequencer::{
    PlayState, ResetDirective, Sequencer, SequencerEvent, TimelineHandle, TweenId,
};
pub use stagger::{Stagger, StaggerFrom};
pub use step::{AnimationStep, PropertyTween, Repeat, StepPhase};
pub use timeline::{Position, Timeline, TimelineEntry, TimelineRef};
pub use values::{entropy_source, seeded_source, IndexFn, ValueRule, ValueSource};
