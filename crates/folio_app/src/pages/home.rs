//! Home page
//!
//! Every section starts hidden and pushed 30px aside, then fades and slides
//! back in the first time it scrolls into view.

use folio_animation::{AnimationPreset, RevealDirection};
use folio_core::{ElementId, Rect};

use crate::error::Result;
use crate::page::{MountContext, Page};

/// Reveal sections of the home page: label, top, height, direction
const SECTIONS: &[(&str, f32, f32, RevealDirection)] = &[
    ("hero", 96.0, 480.0, RevealDirection::Up),
    ("about-text", 820.0, 360.0, RevealDirection::FromLeft),
    ("about-card", 820.0, 360.0, RevealDirection::FromRight),
    ("skills-heading", 1420.0, 140.0, RevealDirection::Up),
    ("skills-frontend", 1620.0, 320.0, RevealDirection::Up),
    ("skills-backend", 1620.0, 320.0, RevealDirection::Up),
    ("skills-tools", 1620.0, 320.0, RevealDirection::Up),
    ("contact", 2200.0, 360.0, RevealDirection::Up),
];

#[derive(Default)]
pub struct HomePage {
    sections: Vec<(ElementId, RevealDirection)>,
}

impl HomePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Section handles in page order
    pub fn sections(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.sections.iter().map(|(id, _)| *id)
    }
}

impl Page for HomePage {
    fn name(&self) -> &'static str {
        "home"
    }

    fn mount(&mut self, ctx: &mut MountContext<'_>) -> Result<()> {
        let width = ctx.viewport.width;
        let reveal = ctx.config.reveal.clone();

        for &(label, top, height, direction) in SECTIONS {
            let (left, w) = match direction {
                RevealDirection::FromLeft => (0.0, width / 2.0),
                RevealDirection::FromRight => (width / 2.0, width / 2.0),
                RevealDirection::Up => (0.0, width),
            };
            let id = ctx.element(label, Rect::new(left, top, w, height));
            ctx.scope.schedule_step(AnimationPreset::reveal_hidden(
                [id],
                direction,
                reveal.distance,
            ))?;
            self.sections.push((id, direction));
        }

        let sequencer = ctx.scope.sequencer();
        let directions = self.sections.clone();
        let easing = reveal.easing();
        let subscription = ctx.scope.viewport().observe(self.sections(), move |event| {
            if !event.is_visible {
                return;
            }
            let direction = directions
                .iter()
                .find(|(id, _)| *id == event.element)
                .map(|(_, direction)| *direction)
                .unwrap_or_default();

            let step = AnimationPreset::reveal([event.element], direction, reveal.duration, easing);
            if let Err(err) = sequencer.borrow_mut().schedule_step(step) {
                tracing::warn!("Could not reveal {:?}: {}", event.element, err);
            }
        });
        ctx.scope.hold(subscription);

        tracing::debug!("Home page mounted with {} reveal sections", self.sections.len());
        Ok(())
    }
}
