//! Animation practice page
//!
//! A row of boxes driven by the nested morph timeline, under a title whose
//! letters reveal from the centre.

use folio_animation::{AnimationPreset, TimelineHandle};
use folio_core::{ElementId, Rect};

use crate::error::Result;
use crate::page::{MountContext, Page};

const TITLE: &str = "Motion";

#[derive(Default)]
pub struct LandingPage {
    title: Vec<ElementId>,
    boxes: Vec<ElementId>,
    morph: Option<TimelineHandle>,
}

impl LandingPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &[ElementId] {
        &self.title
    }

    pub fn boxes(&self) -> &[ElementId] {
        &self.boxes
    }

    /// Handle of the endless morph master timeline
    pub fn morph(&self) -> Option<TimelineHandle> {
        self.morph
    }
}

impl Page for LandingPage {
    fn name(&self) -> &'static str {
        "landing"
    }

    fn mount(&mut self, ctx: &mut MountContext<'_>) -> Result<()> {
        let width = ctx.viewport.width;

        let letter_width = 64.0;
        let left = (width - letter_width * TITLE.len() as f32) / 2.0;
        for (i, letter) in TITLE.chars().enumerate() {
            let bounds = Rect::new(left + i as f32 * letter_width, 80.0, letter_width, 96.0);
            self.title.push(ctx.element(format!("title-{letter}-{i}"), bounds));
        }
        ctx.scope.schedule(AnimationPreset::letter_reveal(&self.title))?;

        let count = ctx.config.scene.morph_box_count;
        let size = 96.0;
        let gap = 48.0;
        let row = count as f32 * size + count.saturating_sub(1) as f32 * gap;
        let start = (width - row) / 2.0;
        for i in 0..count {
            let bounds = Rect::new(start + i as f32 * (size + gap), 320.0, size, size);
            let id = ctx.element(format!("morph-box-{i}"), bounds);
            ctx.set(id, "scale", 1.0);
            ctx.set(id, "rotation", 0.0);
            ctx.set(id, "cornerRadius", 8.0);
            self.boxes.push(id);
        }

        if !self.boxes.is_empty() {
            self.morph = Some(ctx.scope.schedule(AnimationPreset::morph_boxes(&self.boxes))?);
        }

        tracing::debug!("Landing page mounted with {} morph boxes", self.boxes.len());
        Ok(())
    }
}
