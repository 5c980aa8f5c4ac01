//! About page
//!
//! The showcase page: a drifting particle field, a heading whose letters
//! reveal from the centre and then float, floating shapes, a card
//! entrance, a cycling background gradient, a pulsing progress bar and a
//! slow spinner. The heading and shapes follow the pointer with a parallax
//! offset, and hovering the heading recolors its letters.

use folio_animation::AnimationPreset;
use folio_core::{ElementId, Rect, Size};

use crate::config::ParallaxConfig;
use crate::error::Result;
use crate::page::{MountContext, Page};
use crate::scope::{PageScope, SharedSequencer};

const HEADING: &str = "About";

#[derive(Default)]
pub struct AboutPage {
    container: Option<ElementId>,
    heading: Option<ElementId>,
    letters: Vec<ElementId>,
    particles: Vec<ElementId>,
    shapes: Vec<ElementId>,
}

impl AboutPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn heading(&self) -> Option<ElementId> {
        self.heading
    }

    pub fn letters(&self) -> &[ElementId] {
        &self.letters
    }

    pub fn particles(&self) -> &[ElementId] {
        &self.particles
    }

    pub fn shapes(&self) -> &[ElementId] {
        &self.shapes
    }

    fn is_heading(&self, element: ElementId) -> bool {
        self.heading == Some(element) || self.letters.contains(&element)
    }

    fn mount_background(&mut self, ctx: &mut MountContext<'_>) -> Result<()> {
        let viewport = ctx.viewport;
        let container = ctx.element("about", Rect::new(0.0, 0.0, viewport.width, viewport.height));
        ctx.scope.schedule_step(AnimationPreset::gradient_cycle(container))?;
        self.container = Some(container);

        // Particles are scattered with the page's own random stream so a
        // seeded config lays them out the same way every time
        let sequencer = ctx.scope.sequencer();
        for i in 0..ctx.config.scene.particle_count {
            let (x, y) = {
                let mut seq = sequencer.borrow_mut();
                let source = seq.value_source();
                (source.draw(0.0, viewport.width), source.draw(0.0, viewport.height))
            };
            let particle = ctx.element(format!("particle-{i}"), Rect::new(x, y, 4.0, 4.0));
            self.particles.push(particle);
        }

        let steps = {
            let mut seq = sequencer.borrow_mut();
            AnimationPreset::particle_drift(&self.particles, seq.value_source())
        };
        for step in steps {
            ctx.scope.schedule_step(step)?;
        }

        Ok(())
    }

    fn mount_heading(&mut self, ctx: &mut MountContext<'_>) -> Result<()> {
        let Size { width, height } = ctx.viewport;
        let letter_width = 96.0;
        let heading_width = letter_width * HEADING.chars().count() as f32;
        let left = (width - heading_width) / 2.0;
        let top = height / 2.0 - 80.0;

        let heading = ctx.element("about-heading", Rect::new(left, top, heading_width, 160.0));
        self.heading = Some(heading);

        for (i, letter) in HEADING.chars().enumerate() {
            let bounds = Rect::new(left + i as f32 * letter_width, top, letter_width, 160.0);
            let id = ctx.element(format!("letter-{letter}-{i}"), bounds);
            self.letters.push(id);
        }

        ctx.scope.schedule(AnimationPreset::letter_reveal(&self.letters))?;
        Ok(())
    }

    fn mount_decorations(&mut self, ctx: &mut MountContext<'_>) -> Result<()> {
        let Size { width, height } = ctx.viewport;
        let sequencer = ctx.scope.sequencer();

        for i in 0..ctx.config.scene.shape_count {
            let column = (i % 4) as f32;
            let row = (i / 4) as f32;
            let bounds = Rect::new(
                width * (0.1 + column * 0.25),
                height * (0.15 + row * 0.6),
                64.0,
                64.0,
            );
            let shape = ctx.element(format!("shape-{i}"), bounds);
            self.shapes.push(shape);
        }
        let steps = {
            let mut seq = sequencer.borrow_mut();
            AnimationPreset::floating_shapes(&self.shapes, seq.value_source())
        };
        for step in steps {
            ctx.scope.schedule_step(step)?;
        }

        let card = ctx.element("about-card", Rect::new(width / 2.0 - 200.0, height * 0.7, 400.0, 160.0));
        ctx.scope.schedule_step(AnimationPreset::card_entrance(card))?;

        let bar = ctx.element("progress-bar", Rect::new(width / 2.0 - 150.0, height - 60.0, 300.0, 6.0));
        ctx.set(bar, "width", 0.0);
        ctx.scope.schedule_step(AnimationPreset::progress_pulse(bar))?;

        let spinner = ctx.element("spinner", Rect::new(width - 96.0, height - 96.0, 48.0, 48.0));
        ctx.set(spinner, "rotation", 0.0);
        ctx.scope.schedule_step(AnimationPreset::slow_spin(spinner))?;

        Ok(())
    }

    fn mount_parallax(&self, ctx: &mut MountContext<'_>) {
        let parallax = ctx.config.parallax.clone();
        if !parallax.enabled {
            return;
        }
        let Some(heading) = self.heading else {
            return;
        };

        let sequencer = ctx.scope.sequencer();
        let shapes = self.shapes.clone();
        let subscription = ctx.pointer.subscribe(move |event| {
            follow_pointer(&sequencer, &parallax, heading, &shapes, event.x, event.y);
        });
        ctx.scope.hold(subscription);
    }
}

/// Retarget heading and shape offsets toward the pointer
fn follow_pointer(
    sequencer: &SharedSequencer,
    parallax: &ParallaxConfig,
    heading: ElementId,
    shapes: &[ElementId],
    x: f32,
    y: f32,
) {
    let easing = parallax.easing();
    let mut seq = sequencer.borrow_mut();

    let (dx, dy) = (x * parallax.strength, y * parallax.strength);
    seq.tween_to(heading, "x", dx, parallax.heading_duration, easing);
    seq.tween_to(
        heading,
        "y",
        dy * parallax.heading_y_factor,
        parallax.heading_duration,
        easing,
    );

    for (i, &shape) in shapes.iter().enumerate() {
        let (fx, fy) = parallax.shape_factors(i);
        seq.tween_to(shape, "x", dx * fx, parallax.shape_duration, easing);
        seq.tween_to(shape, "y", dy * fy, parallax.shape_duration, easing);
    }
}

impl Page for AboutPage {
    fn name(&self) -> &'static str {
        "about"
    }

    fn mount(&mut self, ctx: &mut MountContext<'_>) -> Result<()> {
        self.mount_background(ctx)?;
        self.mount_heading(ctx)?;
        self.mount_decorations(ctx)?;
        self.mount_parallax(ctx);

        tracing::debug!(
            "About page mounted: {} particles, {} letters, {} shapes",
            self.particles.len(),
            self.letters.len(),
            self.shapes.len()
        );
        Ok(())
    }

    fn on_hover(&mut self, scope: &PageScope, element: ElementId, hovered: bool) -> Result<bool> {
        if !self.is_heading(element) {
            return Ok(false);
        }
        scope.schedule_step(AnimationPreset::letter_hover(&self.letters, hovered))?;
        Ok(true)
    }
}
