//! Headless tour of the portfolio pages
//!
//! Mounts each page, scrolls, moves the pointer and hovers the heading,
//! logging element values along the way.
//!
//! Run with:
//! ```sh
//! RUST_LOG=debug cargo run -p folio_app --example headless_tour
//! ```

use anyhow::Context;
use folio_app::prelude::*;
use tracing_subscriber::EnvFilter;

const FRAME: f32 = 1.0 / 60.0;

fn run_for(app: &mut FolioApp, seconds: f32) {
    let frames = (seconds / FRAME).round() as usize;
    for _ in 0..frames {
        app.frame(FRAME);
    }
}

fn report(app: &FolioApp, label: &str, property: &str) -> anyhow::Result<()> {
    let id = app
        .store()
        .find(label)
        .with_context(|| format!("no element labelled '{}'", label))?;
    let value = app.store().get(id, property);
    tracing::info!("{label}.{property} = {:?}", value);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = FolioConfig::from_toml_str(
        r#"
        seed = 2024

        [scene]
        particle_count = 12
        "#,
    )?;
    let mut app = FolioApp::new(config, Size::new(1280.0, 720.0));

    app.navigate(PageKind::Home)?;
    run_for(&mut app, 1.0);
    report(&app, "hero", "opacity")?;
    report(&app, "contact", "opacity")?;

    app.on_scroll(2000.0);
    run_for(&mut app, 1.0);
    report(&app, "contact", "opacity")?;

    app.navigate(PageKind::About)?;
    run_for(&mut app, 2.0);
    report(&app, "letter-A-0", "color")?;

    app.on_pointer_move(1280.0, 0.0);
    run_for(&mut app, 1.0);
    report(&app, "about-heading", "x")?;
    report(&app, "about-heading", "y")?;

    let heading = app
        .store()
        .find("about-heading")
        .context("about heading missing")?;
    app.on_hover(heading, true)?;
    run_for(&mut app, 0.5);
    report(&app, "letter-A-0", "color")?;
    report(&app, "letter-A-0", "scale")?;

    app.navigate_to("/practice")?;
    run_for(&mut app, 1.0);
    report(&app, "morph-box-0", "scale")?;
    report(&app, "morph-box-0", "rotation")?;

    app.unmount();
    tracing::info!("Tour finished, {} elements left", app.store().len());
    Ok(())
}
