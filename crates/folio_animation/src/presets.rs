//! Animation presets
//!
//! The steps and timelines the portfolio pages are built from. Each preset
//! only builds data; scheduling is up to the caller. Presets with random
//! durations take a [`ValueSource`] so a seeded sequencer reproduces the
//! whole scene.

use folio_core::{Color, ElementId};

use crate::easing::Easing;
use crate::stagger::Stagger;
use crate::step::AnimationStep;
use crate::timeline::{Position, Timeline};
use crate::values::{ValueRule, ValueSource};

/// Brand blue used for settled heading letters
pub const ACCENT: u32 = 0x3b82f6;
/// Amber used while the heading is hovered
pub const HIGHLIGHT: u32 = 0xf59e0b;
/// Background gradient end colors
pub const GRADIENT_START: u32 = 0x667eea;
pub const GRADIENT_END: u32 = 0x764ba2;

/// Which way a section slides in when revealed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RevealDirection {
    /// Rises from below
    #[default]
    Up,
    /// Slides in from the left
    FromLeft,
    /// Slides in from the right
    FromRight,
}

impl RevealDirection {
    /// Property and signed offset of the hidden state
    pub fn offset(&self, distance: f32) -> (&'static str, f32) {
        match self {
            RevealDirection::Up => ("y", distance),
            RevealDirection::FromLeft => ("x", -distance),
            RevealDirection::FromRight => ("x", distance),
        }
    }
}

/// Common animation presets
pub struct AnimationPreset;

impl AnimationPreset {
    /// Hidden state of a scroll reveal: transparent and pushed aside
    pub fn reveal_hidden(
        targets: impl IntoIterator<Item = ElementId>,
        direction: RevealDirection,
        distance: f32,
    ) -> AnimationStep {
        let (axis, offset) = direction.offset(distance);
        AnimationStep::set(targets)
            .property("opacity", 0.0)
            .property(axis, offset)
    }

    /// Fade in and slide back to rest
    pub fn reveal(
        targets: impl IntoIterator<Item = ElementId>,
        direction: RevealDirection,
        duration: f32,
        easing: Easing,
    ) -> AnimationStep {
        let (axis, _) = direction.offset(0.0);
        AnimationStep::new(targets)
            .property("opacity", 1.0)
            .property(axis, 0.0)
            .duration(duration)
            .easing(easing)
    }

    /// Heading letter sequence: hidden set, center-out reveal, color shift,
    /// then an endless gentle float
    pub fn letter_reveal(letters: &[ElementId]) -> Timeline {
        let letters = letters.to_vec();

        let hidden = AnimationStep::set(letters.iter().copied())
            .property("opacity", 0.0)
            .property("y", 100.0)
            .property("rotateX", 90.0)
            .property("scale", 0.3)
            .property("blur", 20.0);

        let reveal = AnimationStep::new(letters.iter().copied())
            .property("opacity", 1.0)
            .property("y", 0.0)
            .property("rotateX", 0.0)
            .property("scale", 1.0)
            .property("blur", 0.0)
            .duration(1.2)
            .ease("back.out(2)")
            .stagger(Stagger::each(0.08).from_center());

        let color = AnimationStep::new(letters.iter().copied())
            .property("color", Color::from_hex(ACCENT))
            .duration(0.5)
            .stagger(0.03);

        let float = AnimationStep::new(letters)
            .property("y", -10.0)
            .duration(2.0)
            .ease("sine.inOut")
            .repeat_infinite()
            .yoyo(true)
            .stagger(0.1);

        Timeline::labeled("letter-reveal")
            .add(hidden)
            .add(reveal)
            .add_at(color, Position::parse("-=0.5"))
            .add_at(float, Position::parse("+=0.5"))
    }

    /// Scale and recolor heading letters on hover enter/leave
    pub fn letter_hover(letters: &[ElementId], hovered: bool) -> AnimationStep {
        let (scale, color) = if hovered {
            (1.1, HIGHLIGHT)
        } else {
            (1.0, ACCENT)
        };

        AnimationStep::new(letters.iter().copied())
            .property("scale", scale)
            .property("color", Color::from_hex(color))
            .duration(0.3)
            .ease("power2.out")
            .stagger(0.02)
    }

    /// Background particles drifting to random offsets and back, forever
    ///
    /// One step per particle, since each gets its own duration and delay.
    pub fn particle_drift(
        particles: &[ElementId],
        source: &mut dyn ValueSource,
    ) -> Vec<AnimationStep> {
        particles
            .iter()
            .enumerate()
            .map(|(i, &particle)| {
                AnimationStep::new([particle])
                    .property("x", ValueRule::random(-200.0, 200.0))
                    .property("y", ValueRule::random(-200.0, 200.0))
                    .duration(source.draw(3.0, 6.0))
                    .ease("sine.inOut")
                    .repeat_infinite()
                    .yoyo(true)
                    .delay(i as f32 * 0.1)
            })
            .collect()
    }

    /// Slow drifting, spinning shapes
    pub fn floating_shapes(shapes: &[ElementId], source: &mut dyn ValueSource) -> Vec<AnimationStep> {
        shapes
            .iter()
            .map(|&shape| {
                AnimationStep::new([shape])
                    .property("x", ValueRule::random(-300.0, 300.0))
                    .property("y", ValueRule::random(-300.0, 300.0))
                    .property("rotation", ValueRule::offset(360.0))
                    .duration(source.draw(8.0, 15.0))
                    .easing(Easing::Linear)
                    .repeat_infinite()
            })
            .collect()
    }

    /// Card entrance: rises, grows and turns to face the viewer
    pub fn card_entrance(card: ElementId) -> AnimationStep {
        AnimationStep::new([card])
            .property_from("opacity", 0.0, 1.0)
            .property_from("y", 100.0, 0.0)
            .property_from("scale", 0.8, 1.0)
            .property_from("rotateY", 45.0, 0.0)
            .duration(1.5)
            .ease("power3.out")
            .delay(1.0)
    }

    /// Background gradient shifting back and forth
    pub fn gradient_cycle(container: ElementId) -> AnimationStep {
        AnimationStep::new([container])
            .property("gradientStart", Color::from_hex(GRADIENT_START))
            .property("gradientEnd", Color::from_hex(GRADIENT_END))
            .duration(3.0)
            .ease("sine.inOut")
            .repeat_infinite()
            .yoyo(true)
    }

    /// Progress bar filling and draining, 3s per full cycle
    pub fn progress_pulse(bar: ElementId) -> AnimationStep {
        AnimationStep::new([bar])
            .property_from("width", 0.0, 100.0)
            .duration(1.5)
            .easing(Easing::EaseInOut)
            .repeat_infinite()
            .yoyo(true)
    }

    /// One full turn every 8 seconds, forever
    pub fn slow_spin(target: ElementId) -> AnimationStep {
        AnimationStep::new([target])
            .property("rotation", ValueRule::offset(360.0))
            .duration(8.0)
            .easing(Easing::Linear)
            .repeat_infinite()
    }

    /// One morph cycle: grow and round off, then settle back
    pub fn morph_box(boxes: &[ElementId]) -> Timeline {
        let grow = AnimationStep::new(boxes.iter().copied())
            .property("scale", 1.4)
            .duration(0.6)
            .ease("power2.inOut")
            .stagger(0.1);
        let turn = AnimationStep::new(boxes.iter().copied())
            .property("rotation", ValueRule::offset(180.0))
            .duration(0.8)
            .ease("power2.inOut")
            .stagger(0.1);
        let round = AnimationStep::new(boxes.iter().copied())
            .property("cornerRadius", 50.0)
            .duration(0.4)
            .stagger(0.1);
        let settle = AnimationStep::new(boxes.iter().copied())
            .property("scale", 1.0)
            .property("cornerRadius", 8.0)
            .duration(0.6)
            .ease("back.out")
            .stagger(Stagger::each(0.1).from_end());

        Timeline::labeled("morph")
            .add(grow)
            .add_at(turn, Position::WithPrevious(0.0))
            .add_at(round, Position::parse("-=0.2"))
            .add(settle)
    }

    /// Two overlapping morph cycles inside an endless ping-pong master
    pub fn morph_boxes(boxes: &[ElementId]) -> Timeline {
        let morph = Self::morph_box(boxes).into_shared();

        Timeline::labeled("morph-master")
            .nest(&morph)
            .nest_at(&morph, Position::parse("-=0.3"))
            .repeat_infinite()
            .yoyo(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::Sequencer;
    use crate::values::seeded_source;
    use folio_core::{ElementStore, Interpolate, Rect};

    fn store_with(n: usize) -> (ElementStore, Vec<ElementId>) {
        let mut store = ElementStore::new();
        let ids = (0..n)
            .map(|i| store.create(format!("el{i}"), Rect::new(0.0, 0.0, 20.0, 40.0)))
            .collect();
        (store, ids)
    }

    #[test]
    fn test_letter_reveal_layout() {
        let (_, letters) = store_with(5);
        let timeline = AnimationPreset::letter_reveal(&letters);

        assert_eq!(timeline.len(), 4);
        assert!(timeline.duration().unwrap().is_infinite());
    }

    #[test]
    fn test_letter_reveal_plays() {
        let (mut store, letters) = store_with(5);
        let mut seq = Sequencer::with_seed(5);
        seq.schedule(AnimationPreset::letter_reveal(&letters)).unwrap();

        // Hidden set lands on the first frame
        seq.tick(0.0, &mut store);
        for &letter in &letters {
            assert_eq!(store.get_float(letter, "opacity"), Some(0.0));
            assert_eq!(store.get_float(letter, "blur"), Some(20.0));
        }

        // Reveal (1.36s) and color shift (ends at 1.48s) are done
        seq.tick(1.6, &mut store);
        for &letter in &letters {
            assert!((store.get_float(letter, "opacity").unwrap() - 1.0).abs() < 1e-4);
            let color = store.get(letter, "color").and_then(|v| v.as_color()).unwrap();
            assert!(color.approx_eq(&Color::from_hex(ACCENT), 1e-4));
        }
    }

    #[test]
    fn test_particle_drift_parameters() {
        let (_, particles) = store_with(50);
        let mut source = seeded_source(9);
        let steps = AnimationPreset::particle_drift(&particles, &mut source);

        assert_eq!(steps.len(), 50);
        for (i, step) in steps.iter().enumerate() {
            assert!((3.0..=6.0).contains(&step.get_duration()));
            assert!((step.get_delay() - i as f32 * 0.1).abs() < 1e-4);
            assert!(step.is_yoyo());
            assert!(step.get_repeat().is_infinite());
        }
    }

    #[test]
    fn test_progress_pulse_cycle() {
        let (mut store, ids) = store_with(1);
        let mut seq = Sequencer::with_seed(1);
        seq.schedule_step(AnimationPreset::progress_pulse(ids[0])).unwrap();

        seq.tick(1.5, &mut store);
        assert!((store.get_float(ids[0], "width").unwrap() - 100.0).abs() < 1e-3);
        seq.tick(1.5, &mut store);
        assert!(store.get_float(ids[0], "width").unwrap().abs() < 1e-3);
    }

    #[test]
    fn test_reveal_directions() {
        assert_eq!(RevealDirection::Up.offset(30.0), ("y", 30.0));
        assert_eq!(RevealDirection::FromLeft.offset(30.0), ("x", -30.0));
        assert_eq!(RevealDirection::FromRight.offset(30.0), ("x", 30.0));
    }

    #[test]
    fn test_morph_master_nests_shared_cycle() {
        let (_, boxes) = store_with(3);
        let master = AnimationPreset::morph_boxes(&boxes);
        let morph = AnimationPreset::morph_box(&boxes).duration().unwrap();

        assert!(morph > 0.0);
        assert_eq!(master.len(), 2);
        assert!(master.duration().unwrap().is_infinite());
    }
}
