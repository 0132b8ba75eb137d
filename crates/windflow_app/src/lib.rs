//! Windflow demo application model
//!
//! A wind-flow layer over a map view, a set of controls that retune the
//! layer's flow renderer, and a controls panel that slides in and out.
//! Drawing is left to the host; this crate owns the state and the panel
//! animation.
//!
//! # Example
//!
//! ```
//! use windflow_animation::AnimationScheduler;
//! use windflow_app::{WindflowApp, WindflowConfig};
//!
//! let scheduler = AnimationScheduler::new();
//! let mut app = WindflowApp::new(WindflowConfig::default(), scheduler.handle()).unwrap();
//!
//! app.handle_control("density", "0.6").unwrap();
//! app.handle_control("btnExpand", "").unwrap();
//! ```

pub mod app;
pub mod config;
pub mod controls;
pub mod error;
pub mod layer;
pub mod panel;
pub mod renderer;
pub mod view;

pub use app::WindflowApp;
pub use config::{LayerConfig, PanelConfig, SchedulerConfig, ViewConfig, WindflowConfig};
pub use controls::{ControlEvent, EFFECTS_CONTROL, EXPAND_CONTROL};
pub use error::{AppError, Result};
pub use layer::{FlowLayer, LayerEffect};
pub use panel::{PanelController, PanelGeometry, PanelState};
pub use renderer::{ColorStop, FlowRenderer, FlowRepresentation, RendererParam};
pub use view::{EdgePadding, MapView, SlidePanel};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock shared view state, recovering from a panicked animation callback
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
