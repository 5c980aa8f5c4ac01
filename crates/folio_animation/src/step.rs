//! Animation steps
//!
//! An [`AnimationStep`] is one property transition applied to a set of
//! targets. It is plain data: building one has no side effects, and the
//! sequencer samples it statelessly through [`AnimationStep::phase_at`].
//!
//! ```rust
//! use folio_animation::{AnimationStep, Stagger};
//! use folio_core::ElementStore;
//! # let mut store = ElementStore::new();
//! # let letters: Vec<_> = (0..5).map(|i| store.create(format!("l{i}"), Default::default())).collect();
//!
//! let reveal = AnimationStep::new(letters)
//!     .property("opacity", 1.0)
//!     .property("y", 0.0)
//!     .duration(1.2)
//!     .ease("back.out(2)")
//!     .stagger(Stagger::each(0.08).from_center());
//!
//! assert!((reveal.span() - 1.36).abs() < 1e-4);
//! ```

use folio_core::ElementId;
use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::easing::Easing;
use crate::error;
use crate::stagger::Stagger;
use crate::values::ValueRule;

/// How many extra times an animation plays after the first run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    /// Play `1 + n` times
    Count(u32),
    /// Play forever
    Infinite,
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Count(0)
    }
}

impl Repeat {
    /// Convert a signed repeat count, where any negative value means forever
    pub fn from_signed(count: i32) -> Self {
        if count < 0 {
            Repeat::Infinite
        } else {
            Repeat::Count(count as u32)
        }
    }

    /// Total number of runs, `None` when infinite
    pub fn iterations(&self) -> Option<u64> {
        match self {
            Repeat::Count(n) => Some(u64::from(*n) + 1),
            Repeat::Infinite => None,
        }
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, Repeat::Infinite)
    }
}

/// End value rule plus an optional explicit start value rule
#[derive(Clone, Debug)]
pub struct PropertyTween {
    pub to: ValueRule,
    pub from: Option<ValueRule>,
}

/// Where a target is within a step at a given local time
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepPhase {
    /// Not started yet (delay or stagger offset still pending)
    Before,
    /// Playing; `fraction` is the linear progress already mirrored for yoyo
    Active { iteration: u64, fraction: f32 },
    /// Finished; `fraction` is where it came to rest (1, or 0 after an odd yoyo)
    After { fraction: f32 },
}

/// One property transition on one or more targets
#[derive(Clone, Debug)]
pub struct AnimationStep {
    targets: SmallVec<[ElementId; 8]>,
    properties: IndexMap<String, PropertyTween>,
    duration: f32,
    easing: Easing,
    stagger: Option<Stagger>,
    repeat: Repeat,
    yoyo: bool,
    delay: f32,
}

impl AnimationStep {
    /// Create a step over the given targets
    ///
    /// Defaults to a 0.5s ease-out with no properties.
    pub fn new(targets: impl IntoIterator<Item = ElementId>) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            properties: IndexMap::new(),
            duration: 0.5,
            easing: Easing::default(),
            stagger: None,
            repeat: Repeat::default(),
            yoyo: false,
            delay: 0.0,
        }
    }

    /// Zero-duration step that writes its values immediately
    pub fn set(targets: impl IntoIterator<Item = ElementId>) -> Self {
        Self::new(targets).duration(0.0)
    }

    /// Animate `name` to a value or rule
    pub fn property(mut self, name: impl Into<String>, to: impl Into<ValueRule>) -> Self {
        self.properties.insert(
            name.into(),
            PropertyTween {
                to: to.into(),
                from: None,
            },
        );
        self
    }

    /// Animate `name` between an explicit start and end
    pub fn property_from(
        mut self,
        name: impl Into<String>,
        from: impl Into<ValueRule>,
        to: impl Into<ValueRule>,
    ) -> Self {
        self.properties.insert(
            name.into(),
            PropertyTween {
                to: to.into(),
                from: Some(from.into()),
            },
        );
        self
    }

    /// Duration of one run in seconds
    pub fn duration(mut self, seconds: f32) -> Self {
        self.duration = error::non_negative("duration", seconds);
        self
    }

    /// Easing by name; unknown names fall back to the default curve
    pub fn ease(mut self, name: &str) -> Self {
        self.easing = Easing::resolve(name);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn stagger(mut self, stagger: impl Into<Stagger>) -> Self {
        self.stagger = Some(stagger.into());
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn repeat_infinite(self) -> Self {
        self.repeat(Repeat::Infinite)
    }

    /// Reverse direction on alternate runs
    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Seconds before the first target starts
    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = error::non_negative("delay", seconds);
        self
    }

    pub fn targets(&self) -> &[ElementId] {
        &self.targets
    }

    pub fn properties(&self) -> &IndexMap<String, PropertyTween> {
        &self.properties
    }

    pub fn get_duration(&self) -> f32 {
        self.duration
    }

    pub fn get_easing(&self) -> Easing {
        self.easing
    }

    pub fn get_stagger(&self) -> Option<Stagger> {
        self.stagger
    }

    pub fn get_repeat(&self) -> Repeat {
        self.repeat
    }

    pub fn is_yoyo(&self) -> bool {
        self.yoyo
    }

    pub fn get_delay(&self) -> f32 {
        self.delay
    }

    /// A step without targets or properties does nothing
    pub fn is_noop(&self) -> bool {
        self.targets.is_empty() || self.properties.is_empty()
    }

    /// Start offset of target `index` relative to the step start
    pub fn start_offset(&self, index: usize) -> f32 {
        let stagger = self
            .stagger
            .map(|s| s.offset_for(index, self.targets.len()))
            .unwrap_or(0.0);
        self.delay + stagger
    }

    /// Time from the step start until the last target finishes
    ///
    /// Infinite when the step repeats forever.
    pub fn span(&self) -> f32 {
        let max_stagger = self
            .stagger
            .map(|s| s.max_offset(self.targets.len()))
            .unwrap_or(0.0);
        let lead = self.delay + max_stagger;

        if self.duration <= 0.0 {
            return lead;
        }
        match self.repeat.iterations() {
            Some(n) => lead + self.duration * n as f32,
            None => f32::INFINITY,
        }
    }

    /// Resting fraction after the last run
    pub fn final_fraction(&self) -> f32 {
        match self.repeat.iterations() {
            Some(n) if self.yoyo && (n - 1) % 2 == 1 => 0.0,
            _ => 1.0,
        }
    }

    /// Random rules are redrawn once per epoch: every run, or every full
    /// back-and-forth cycle when yoyo is on
    pub fn draw_epoch(&self, iteration: u64) -> u64 {
        if self.yoyo {
            iteration / 2
        } else {
            iteration
        }
    }

    /// Phase of target `index` at `local` seconds after the step start
    pub fn phase_at(&self, local: f32, index: usize) -> StepPhase {
        let t = local - self.start_offset(index);
        if t < 0.0 {
            return StepPhase::Before;
        }
        if self.duration <= 0.0 {
            return StepPhase::After {
                fraction: self.final_fraction(),
            };
        }

        let iteration = (t / self.duration).floor();
        if let Some(n) = self.repeat.iterations() {
            if iteration >= n as f32 {
                return StepPhase::After {
                    fraction: self.final_fraction(),
                };
            }
        }

        let iteration = iteration as u64;
        let mut fraction = (t - iteration as f32 * self.duration) / self.duration;
        fraction = fraction.clamp(0.0, 1.0);
        if self.yoyo && iteration % 2 == 1 {
            fraction = 1.0 - fraction;
        }
        StepPhase::Active {
            iteration,
            fraction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::{ElementStore, Rect};

    fn targets(n: usize) -> Vec<ElementId> {
        let mut store = ElementStore::new();
        (0..n)
            .map(|i| store.create(format!("t{i}"), Rect::default()))
            .collect()
    }

    fn fraction(phase: StepPhase) -> f32 {
        match phase {
            StepPhase::Active { fraction, .. } | StepPhase::After { fraction } => fraction,
            StepPhase::Before => -1.0,
        }
    }

    #[test]
    fn test_span_includes_delay_stagger_and_repeats() {
        let step = AnimationStep::new(targets(3))
            .property("x", 10.0)
            .duration(1.0)
            .delay(0.5)
            .stagger(0.25)
            .repeat(Repeat::Count(2));

        // 0.5 delay + 0.5 max stagger + 3 runs
        assert!((step.span() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_infinite_span() {
        let step = AnimationStep::new(targets(1))
            .property("x", 10.0)
            .repeat_infinite();
        assert!(step.span().is_infinite());

        let instant = AnimationStep::set(targets(1))
            .property("x", 10.0)
            .repeat_infinite();
        assert_eq!(instant.span(), 0.0);
    }

    #[test]
    fn test_phase_progression() {
        let step = AnimationStep::new(targets(1)).property("x", 1.0).duration(2.0).delay(1.0);

        assert_eq!(step.phase_at(0.5, 0), StepPhase::Before);
        assert!((fraction(step.phase_at(2.0, 0)) - 0.5).abs() < 1e-4);
        assert_eq!(step.phase_at(3.5, 0), StepPhase::After { fraction: 1.0 });
    }

    #[test]
    fn test_yoyo_mirrors() {
        let step = AnimationStep::new(targets(1))
            .property("x", 1.0)
            .duration(1.0)
            .repeat_infinite()
            .yoyo(true);

        for t in [0.1_f32, 0.35, 0.8] {
            let forward = fraction(step.phase_at(t, 0));
            let back = fraction(step.phase_at(2.0 - t, 0));
            assert!((forward - back).abs() < 1e-4);
        }
    }

    #[test]
    fn test_yoyo_final_fraction() {
        let odd = AnimationStep::new(targets(1))
            .property("x", 1.0)
            .duration(1.0)
            .repeat(Repeat::Count(1))
            .yoyo(true);
        assert_eq!(odd.final_fraction(), 0.0);
        assert_eq!(odd.phase_at(5.0, 0), StepPhase::After { fraction: 0.0 });

        let even = odd.clone().repeat(Repeat::Count(2));
        assert_eq!(even.final_fraction(), 1.0);
    }

    #[test]
    fn test_stagger_shifts_phase_only() {
        let step = AnimationStep::new(targets(3))
            .property("x", 1.0)
            .duration(1.0)
            .stagger(0.5);

        assert!((fraction(step.phase_at(1.25, 1)) - 0.75).abs() < 1e-4);
        assert_eq!(step.phase_at(1.25, 2), StepPhase::Active { iteration: 0, fraction: 0.25 });
        assert_eq!(step.phase_at(0.25, 2), StepPhase::Before);
    }

    #[test]
    fn test_draw_epoch() {
        let plain = AnimationStep::new(targets(1)).property("x", 1.0);
        assert_eq!(plain.draw_epoch(3), 3);

        let yoyo = plain.yoyo(true);
        assert_eq!(yoyo.draw_epoch(0), 0);
        assert_eq!(yoyo.draw_epoch(1), 0);
        assert_eq!(yoyo.draw_epoch(2), 1);
    }

    #[test]
    fn test_noop_and_clamping() {
        assert!(AnimationStep::new(Vec::new()).property("x", 1.0).is_noop());
        assert!(AnimationStep::new(targets(2)).is_noop());

        let step = AnimationStep::new(targets(1)).duration(-1.0).delay(f32::NAN);
        assert_eq!(step.get_duration(), 0.0);
        assert_eq!(step.get_delay(), 0.0);
    }

    #[test]
    fn test_signed_repeat() {
        assert_eq!(Repeat::from_signed(-1), Repeat::Infinite);
        assert_eq!(Repeat::from_signed(2).iterations(), Some(3));
        assert_eq!(Repeat::Infinite.iterations(), None);
    }
}
