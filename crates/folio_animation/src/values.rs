//! Property value rules
//!
//! A step does not store end values directly. Each property carries a
//! [`ValueRule`] that is resolved per target when the target starts playing,
//! so random ranges and index-based spreads produce a different value for
//! every target.
//!
//! Random draws go through a [`ValueSource`]. Any `rand` generator works as
//! one; seed it when a test needs a repeatable trajectory.

use std::fmt;
use std::sync::Arc;

use folio_core::{AnimValue, Color};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::error;

/// Source of random values for `Random` rules
pub trait ValueSource {
    /// Draw a value in `min..=max`
    fn draw(&mut self, min: f32, max: f32) -> f32;
}

impl<R: RngCore> ValueSource for R {
    fn draw(&mut self, min: f32, max: f32) -> f32 {
        if !(min.is_finite() && max.is_finite()) {
            return 0.0;
        }
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let span = hi - lo;
        if !span.is_finite() {
            return lo / 2.0 + hi / 2.0;
        }
        if span <= f32::EPSILON {
            return lo;
        }
        self.gen_range(lo..=hi)
    }
}

/// Non-deterministic source seeded from the OS
pub fn entropy_source() -> StdRng {
    StdRng::from_entropy()
}

/// Deterministic source for tests and reproducible demos
pub fn seeded_source(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Per-index value function: `(index, total) -> value`
pub type IndexFn = Arc<dyn Fn(usize, usize) -> AnimValue + Send + Sync>;

/// How a property's value is produced for each target
#[derive(Clone)]
pub enum ValueRule {
    /// Same value for every target
    Fixed(AnimValue),
    /// Independent uniform draw per target per execution
    Random { min: f32, max: f32 },
    /// Start value plus a delta (`"+=360"`)
    Offset(f32),
    /// Computed from the target's position in the step
    PerIndex(IndexFn),
}

impl ValueRule {
    pub fn fixed(value: impl Into<AnimValue>) -> Self {
        ValueRule::Fixed(value.into())
    }

    pub fn random(min: f32, max: f32) -> Self {
        ValueRule::Random {
            min: error::finite("random.min", min),
            max: error::finite("random.max", max),
        }
    }

    pub fn offset(delta: f32) -> Self {
        ValueRule::Offset(error::finite("offset", delta))
    }

    pub fn per_index<F>(f: F) -> Self
    where
        F: Fn(usize, usize) -> AnimValue + Send + Sync + 'static,
    {
        ValueRule::PerIndex(Arc::new(f))
    }

    pub fn is_random(&self) -> bool {
        matches!(self, ValueRule::Random { .. })
    }

    /// A representative value, used to pick a resting default for
    /// properties the element does not have yet
    pub(crate) fn hint(&self) -> AnimValue {
        match self {
            ValueRule::Fixed(v) => *v,
            ValueRule::PerIndex(f) => f(0, 1),
            ValueRule::Random { .. } | ValueRule::Offset(_) => AnimValue::Float(0.0),
        }
    }

    /// Resolve the value for target `index` of `total`
    ///
    /// `base` is the value the rule is relative to: the captured start for
    /// end values, the element's current value for explicit start values.
    pub fn resolve(
        &self,
        index: usize,
        total: usize,
        base: &AnimValue,
        source: &mut dyn ValueSource,
    ) -> AnimValue {
        match self {
            ValueRule::Fixed(v) => *v,
            ValueRule::Random { min, max } => AnimValue::Float(source.draw(*min, *max)),
            ValueRule::Offset(delta) => match base {
                AnimValue::Float(v) => AnimValue::Float(v + delta),
                AnimValue::Color(_) => *base,
            },
            ValueRule::PerIndex(f) => f(index, total.max(1)),
        }
    }
}

impl fmt::Debug for ValueRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueRule::Fixed(v) => f.debug_tuple("Fixed").field(v).finish(),
            ValueRule::Random { min, max } => f
                .debug_struct("Random")
                .field("min", min)
                .field("max", max)
                .finish(),
            ValueRule::Offset(d) => f.debug_tuple("Offset").field(d).finish(),
            ValueRule::PerIndex(_) => f.write_str("PerIndex(..)"),
        }
    }
}

impl From<f32> for ValueRule {
    fn from(value: f32) -> Self {
        ValueRule::Fixed(AnimValue::Float(value))
    }
}

impl From<f64> for ValueRule {
    fn from(value: f64) -> Self {
        ValueRule::Fixed(AnimValue::Float(value as f32))
    }
}

impl From<Color> for ValueRule {
    fn from(value: Color) -> Self {
        ValueRule::Fixed(AnimValue::Color(value))
    }
}

impl From<AnimValue> for ValueRule {
    fn from(value: AnimValue) -> Self {
        ValueRule::Fixed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_draw_stays_in_range() {
        let mut source = seeded_source(42);
        let rule = ValueRule::random(-200.0, 200.0);

        for i in 0..100 {
            let v = rule.resolve(i, 100, &AnimValue::Float(0.0), &mut source);
            let v = v.as_float().unwrap();
            assert!((-200.0..=200.0).contains(&v));
        }
    }

    #[test]
    fn test_random_draws_differ_per_target() {
        let mut source = seeded_source(7);
        let rule = ValueRule::random(0.0, 1000.0);
        let base = AnimValue::Float(0.0);

        let a = rule.resolve(0, 2, &base, &mut source);
        let b = rule.resolve(1, 2, &base, &mut source);
        assert_ne!(a, b);
    }

    #[test]
    fn test_seeded_sources_repeat() {
        let mut a = seeded_source(3);
        let mut b = seeded_source(3);

        for _ in 0..10 {
            assert_eq!(a.draw(3.0, 6.0), b.draw(3.0, 6.0));
        }
    }

    #[test]
    fn test_reversed_and_empty_ranges() {
        let mut source = seeded_source(1);
        let v = source.draw(5.0, 1.0);
        assert!((1.0..=5.0).contains(&v));
        assert_eq!(source.draw(2.0, 2.0), 2.0);
    }

    #[test]
    fn test_offset_is_relative_to_base() {
        let mut source = seeded_source(0);
        let rule = ValueRule::offset(360.0);

        let v = rule.resolve(0, 1, &AnimValue::Float(45.0), &mut source);
        assert_eq!(v, AnimValue::Float(405.0));
    }

    #[test]
    fn test_per_index() {
        let mut source = seeded_source(0);
        let rule = ValueRule::per_index(|i, _| AnimValue::Float(0.2 + i as f32 * 0.1));
        let base = AnimValue::Float(0.0);

        let v = rule.resolve(3, 8, &base, &mut source).as_float().unwrap();
        assert!((v - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_bounds_are_sanitized() {
        match ValueRule::random(f32::NAN, 10.0) {
            ValueRule::Random { min, max } => {
                assert_eq!(min, 0.0);
                assert_eq!(max, 10.0);
            }
            other => panic!("unexpected rule {:?}", other),
        }
    }
}
