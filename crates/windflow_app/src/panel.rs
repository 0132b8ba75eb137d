//! Slide panel controller
//!
//! Expanding slides the controls panel in from the left and widens the map
//! view's left padding by the same amount, so the map's visible center moves
//! with the panel. Collapsing reverses it. Each transition is one animation
//! run over the panel offset.

use crate::config::PanelConfig;
use crate::error::Result;
use crate::lock;
use crate::view::{EdgePadding, MapView, SlidePanel};
use std::sync::{Arc, Mutex};
use windflow_animation::{AnimationSpec, Easing, RunHandle, SchedulerHandle};

const OFFSET_KEY: &str = "offset";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelState {
    Collapsed,
    Expanding,
    Expanded,
    Collapsing,
}

/// Panel state plus the transition that last set it
///
/// Each transition bumps `generation`. A completion only settles the panel if
/// no newer transition has started since.
#[derive(Clone, Copy, Debug)]
struct Phase {
    state: PanelState,
    generation: u64,
}

impl Phase {
    /// Settle into `settled` if `generation` is still the current transition
    fn settle(&mut self, generation: u64, settled: PanelState) -> bool {
        if self.generation != generation {
            return false;
        }
        self.state = settled;
        true
    }
}

/// Maps a panel offset to the view padding that keeps the map beside it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelGeometry {
    /// Offset of the collapsed panel
    pub margin: f32,
    /// View padding while collapsed
    pub default_padding: f32,
}

impl PanelGeometry {
    pub fn padding_for_offset(&self, offset: f32) -> EdgePadding {
        EdgePadding::left(offset - self.margin + self.default_padding)
    }
}

pub struct PanelController {
    scheduler: SchedulerHandle,
    geometry: PanelGeometry,
    duration_ms: f64,
    easing: Easing,
    panel: Arc<Mutex<SlidePanel>>,
    view: Arc<Mutex<MapView>>,
    phase: Arc<Mutex<Phase>>,
    active: Option<RunHandle>,
}

impl PanelController {
    /// Create a controller for a collapsed panel
    ///
    /// Moves the panel to the collapsed offset and sets the matching padding.
    pub fn new(
        scheduler: SchedulerHandle,
        config: &PanelConfig,
        default_padding: f32,
        panel: Arc<Mutex<SlidePanel>>,
        view: Arc<Mutex<MapView>>,
    ) -> Self {
        let geometry = PanelGeometry {
            margin: config.margin,
            default_padding,
        };
        lock(&panel).offset_px = geometry.margin;
        lock(&view).set_padding(geometry.padding_for_offset(geometry.margin));

        Self {
            scheduler,
            geometry,
            duration_ms: config.duration_ms,
            easing: config.easing.clone(),
            panel,
            view,
            phase: Arc::new(Mutex::new(Phase {
                state: PanelState::Collapsed,
                generation: 0,
            })),
            active: None,
        }
    }

    pub fn state(&self) -> PanelState {
        lock(&self.phase).state
    }

    pub fn geometry(&self) -> PanelGeometry {
        self.geometry
    }

    /// Slide the panel in. Returns false if it is already in or on its way.
    pub fn expand(&mut self) -> Result<bool> {
        match self.state() {
            PanelState::Expanded | PanelState::Expanding => Ok(false),
            PanelState::Collapsed | PanelState::Collapsing => {
                self.transition(0.0, PanelState::Expanding, PanelState::Expanded)?;
                Ok(true)
            }
        }
    }

    /// Slide the panel out. Returns false if it is already out or on its way.
    pub fn collapse(&mut self) -> Result<bool> {
        match self.state() {
            PanelState::Collapsed | PanelState::Collapsing => Ok(false),
            PanelState::Expanded | PanelState::Expanding => {
                let margin = self.geometry.margin;
                self.transition(margin, PanelState::Collapsing, PanelState::Collapsed)?;
                Ok(true)
            }
        }
    }

    /// Expand if collapsed (or collapsing), collapse otherwise
    pub fn toggle(&mut self) -> Result<()> {
        match self.state() {
            PanelState::Collapsed | PanelState::Collapsing => self.expand()?,
            PanelState::Expanded | PanelState::Expanding => self.collapse()?,
        };
        Ok(())
    }

    /// Start a run from the current offset to `target`, replacing any run in flight
    fn transition(&mut self, target: f32, moving: PanelState, settled: PanelState) -> Result<()> {
        if let Some(previous) = self.active.take() {
            if previous.cancel() {
                tracing::debug!(run = ?previous.id(), "panel transition interrupted");
            }
        }

        let from = lock(&self.panel).offset_px;
        let (previous_state, generation) = {
            let mut phase = lock(&self.phase);
            let previous = phase.state;
            phase.state = moving;
            phase.generation += 1;
            (previous, phase.generation)
        };

        let panel = Arc::clone(&self.panel);
        let view = Arc::clone(&self.view);
        let phase = Arc::clone(&self.phase);
        let geometry = self.geometry;

        let spec = AnimationSpec::new()
            .from([(OFFSET_KEY, from)])
            .to([(OFFSET_KEY, target)])
            .easing(self.easing.clone())
            .duration_ms(self.duration_ms)
            .on_progress(move |values| {
                if let Some(offset) = values.get(OFFSET_KEY) {
                    lock(&panel).offset_px = offset;
                    lock(&view).set_padding(geometry.padding_for_offset(offset));
                }
            })
            .on_complete(move |elapsed_ms| {
                if lock(&phase).settle(generation, settled) {
                    tracing::debug!(?settled, elapsed_ms, "panel transition finished");
                } else {
                    tracing::debug!(?settled, elapsed_ms, "panel transition superseded");
                }
            });

        match self.scheduler.animate(spec) {
            Ok(run) => {
                tracing::debug!(run = ?run.id(), from, target, ?moving, "panel transition started");
                self.active = Some(run);
                Ok(())
            }
            Err(err) => {
                let mut phase = lock(&self.phase);
                if phase.generation == generation {
                    phase.state = previous_state;
                }
                drop(phase);
                Err(err.into())
            }
        }
    }
}
