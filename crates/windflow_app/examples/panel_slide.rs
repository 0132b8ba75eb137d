//! Headless Panel Slide Demo
//!
//! Drives the windflow app the way a host would: the animation scheduler
//! ticks on a background thread, a few control events retune the flow
//! renderer, and the expand button slides the panel in and back out while
//! the main loop logs the panel offset and the view padding.
//!
//! Run with: cargo run -p windflow_app --example panel_slide [-- path/to/windflow.toml]

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use windflow_animation::AnimationScheduler;
use windflow_app::{PanelState, WindflowApp, WindflowConfig, EXPAND_CONTROL};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => WindflowConfig::load(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => WindflowConfig::default(),
    };

    let mut scheduler = AnimationScheduler::new();
    scheduler.set_target_fps(config.scheduler.target_fps);
    scheduler.start_background();

    let mut app = WindflowApp::new(config, scheduler.handle())?;

    app.handle_control("trailWidth", "3")?;
    app.handle_control("flowRepresentation", "flow-to")?;
    app.handle_control("effectsEnabled", "false")?;
    tracing::info!(renderer = ?app.layer().renderer(), "renderer retuned");

    for settled in [PanelState::Expanded, PanelState::Collapsed] {
        app.handle_control(EXPAND_CONTROL, "")?;

        while app.panel_state() != settled {
            if scheduler.take_needs_redraw() {
                tracing::info!(
                    offset = app.panel().offset_px,
                    padding_left = app.view().padding().left,
                    "frame"
                );
            }
            thread::sleep(Duration::from_millis(16));
        }
        tracing::info!(state = ?settled, offset = app.panel().offset_px, "panel settled");
    }

    scheduler.stop_background();
    Ok(())
}
