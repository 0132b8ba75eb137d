//! Windflow Animation System
//!
//! Frame-driven interpolation of named scalar values.
//!
//! # Features
//!
//! - **Tweens**: interpolate a [`ValueSet`] from start to end values over a duration
//! - **Easing**: named curves (including the sine ease-in used by the slide panel)
//!   and arbitrary custom functions; output may overshoot
//! - **Scheduler**: ticks every in-flight run once per frame, driven by the host
//!   or by a background thread
//! - **Cancellable runs**: every run returns a [`RunHandle`]
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use windflow_animation::{AnimationScheduler, AnimationSpec, Easing, ManualClock};
//!
//! let clock = ManualClock::new(0.0);
//! let scheduler = AnimationScheduler::with_clock(Arc::new(clock.clone()));
//!
//! let run = scheduler
//!     .animate(
//!         AnimationSpec::new()
//!             .from([("offset", -280.0)])
//!             .to([("offset", 0.0)])
//!             .easing(Easing::InSine)
//!             .duration_ms(500.0),
//!     )
//!     .unwrap();
//!
//! clock.set(500.0);
//! scheduler.tick();
//! assert!(run.is_completed());
//! ```

pub mod clock;
pub mod easing;
pub mod error;
pub mod run;
pub mod scheduler;
pub mod tween;
pub mod values;

pub use clock::{Clock, ManualClock, SystemClock};
pub use easing::{in_sine, Easing, EasingFn};
pub use error::{AnimationError, Result};
pub use run::{RunHandle, RunId, RunState};
pub use scheduler::{
    animate, is_scheduler_initialized, set_global_scheduler, try_get_scheduler,
    AnimationScheduler, SchedulerHandle, WakeCallback,
};
pub use tween::{
    AnimationSpec, CompleteCallback, ProgressCallback, ResolvedSpec, Tween, TweenFrame,
    DEFAULT_DURATION_MS,
};
pub use values::{Interpolate, ValueSet};
