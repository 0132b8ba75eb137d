//! Windflow application
//!
//! Ties the layer, the view and the slide panel together and routes control
//! events to them. The host owns the frame loop: it ticks the animation
//! scheduler and redraws from the snapshots exposed here.

use crate::config::WindflowConfig;
use crate::controls::ControlEvent;
use crate::error::Result;
use crate::layer::FlowLayer;
use crate::lock;
use crate::panel::{PanelController, PanelState};
use crate::view::{MapView, SlidePanel};
use std::sync::{Arc, Mutex};
use windflow_animation::SchedulerHandle;

pub struct WindflowApp {
    config: WindflowConfig,
    layer: FlowLayer,
    view: Arc<Mutex<MapView>>,
    panel: Arc<Mutex<SlidePanel>>,
    controller: PanelController,
}

impl WindflowApp {
    pub fn new(config: WindflowConfig, scheduler: SchedulerHandle) -> Result<Self> {
        config.validate()?;

        let layer = FlowLayer::new(&config.layer);
        let view = Arc::new(Mutex::new(MapView::new(&config.view)));
        let panel = Arc::new(Mutex::new(SlidePanel::new(config.panel.margin)));
        let controller = PanelController::new(
            scheduler,
            &config.panel,
            config.view.default_padding,
            Arc::clone(&panel),
            Arc::clone(&view),
        );

        tracing::info!(
            layer = layer.title(),
            basemap = %config.view.basemap,
            "windflow app initialized"
        );

        Ok(Self {
            config,
            layer,
            view,
            panel,
            controller,
        })
    }

    /// Apply one control event
    pub fn handle_event(&mut self, event: ControlEvent) -> Result<()> {
        tracing::trace!(?event, "control event");
        match event {
            ControlEvent::Renderer(param) => self.layer.set_renderer_param(param),
            ControlEvent::EffectsToggled(enabled) => {
                self.layer.set_effects_enabled(enabled);
                Ok(())
            }
            ControlEvent::ExpandToggled => self.controller.toggle(),
        }
    }

    /// Parse and apply a raw control event
    pub fn handle_control(&mut self, id: &str, value: &str) -> Result<()> {
        match ControlEvent::from_control(id, value) {
            Ok(event) => self.handle_event(event),
            Err(err) => {
                tracing::warn!(id, value, %err, "ignoring control event");
                Err(err)
            }
        }
    }

    pub fn config(&self) -> &WindflowConfig {
        &self.config
    }

    pub fn layer(&self) -> &FlowLayer {
        &self.layer
    }

    /// Current view state
    pub fn view(&self) -> MapView {
        lock(&self.view).clone()
    }

    /// Current panel state
    pub fn panel(&self) -> SlidePanel {
        *lock(&self.panel)
    }

    pub fn panel_state(&self) -> PanelState {
        self.controller.state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::layer::LayerEffect;
    use crate::renderer::RendererParam;
    use windflow_animation::{AnimationScheduler, ManualClock};

    fn app() -> (WindflowApp, AnimationScheduler, ManualClock) {
        let clock = ManualClock::new(0.0);
        let scheduler = AnimationScheduler::with_clock(Arc::new(clock.clone()));
        let app = WindflowApp::new(WindflowConfig::default(), scheduler.handle()).unwrap();
        (app, scheduler, clock)
    }

    #[test]
    fn test_initial_state() {
        let (app, _scheduler, _clock) = app();
        assert_eq!(app.panel().offset_px, -280.0);
        assert_eq!(app.view().padding().left, 20.0);
        assert_eq!(app.panel_state(), PanelState::Collapsed);
        assert_eq!(app.layer().effect(), Some(LayerEffect::DEFAULT_BLOOM));
    }

    #[test]
    fn test_controls_update_layer() {
        let (mut app, _scheduler, _clock) = app();
        app.handle_control("trailWidth", "5").unwrap();
        app.handle_control("flowSpeed", "3").unwrap();
        app.handle_control("effectsEnabled", "false").unwrap();

        assert_eq!(app.layer().renderer().trail_width_px, 5.0);
        assert_eq!(app.layer().renderer().flow_speed, 3.0);
        assert_eq!(app.layer().effect(), None);
    }

    #[test]
    fn test_bad_control_leaves_layer_alone() {
        let (mut app, _scheduler, _clock) = app();
        assert!(matches!(
            app.handle_event(ControlEvent::Renderer(RendererParam::TrailLength(-4.0))),
            Err(AppError::InvalidParameter { .. })
        ));
        assert!(app.handle_control("nope", "1").is_err());
        assert_eq!(app.layer().revision(), 0);
    }

    #[test]
    fn test_expand_button_slides_panel() {
        let (mut app, scheduler, clock) = app();
        app.handle_control("btnExpand", "").unwrap();
        assert_eq!(app.panel_state(), PanelState::Expanding);

        for _ in 0..40 {
            clock.advance(16.0);
            scheduler.tick();
        }
        assert_eq!(app.panel_state(), PanelState::Expanded);
        assert_eq!(app.panel().offset_px, 0.0);
        assert_eq!(app.view().padding().left, 300.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let scheduler = AnimationScheduler::new();
        let mut config = WindflowConfig::default();
        config.panel.duration_ms = -1.0;
        assert!(matches!(
            WindflowApp::new(config, scheduler.handle()),
            Err(AppError::InvalidConfig(_))
        ));
    }
}
