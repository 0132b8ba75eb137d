//! Animation specs and tweens
//!
//! [`AnimationSpec`] is what callers build: start and end values, an easing
//! curve, a duration and two optional callbacks. Resolving a spec validates it
//! and fills in the defaults, producing a [`Tween`] (the pure interpolation)
//! plus the callbacks the scheduler will drive.

use crate::easing::Easing;
use crate::error::{AnimationError, Result};
use crate::values::{Interpolate, ValueSet};
use std::fmt;

/// Duration used when a spec does not set one
pub const DEFAULT_DURATION_MS: f64 = 500.0;

/// Receives the interpolated values on every tick
pub type ProgressCallback = Box<dyn FnMut(&ValueSet) + Send>;

/// Receives the elapsed milliseconds once, when the run completes
pub type CompleteCallback = Box<dyn FnOnce(f64) + Send>;

/// Description of one animation run
///
/// Every field is optional. Omitted fields resolve to linear easing, no-op
/// callbacks, empty value sets and [`DEFAULT_DURATION_MS`].
///
/// # Example
///
/// ```
/// use windflow_animation::{AnimationSpec, Easing};
///
/// let spec = AnimationSpec::new()
///     .from([("offset", -280.0)])
///     .to([("offset", 0.0)])
///     .easing(Easing::InSine)
///     .duration_ms(500.0)
///     .on_progress(|values| {
///         let _offset = values.get("offset");
///     });
/// assert!(spec.resolve().is_ok());
/// ```
#[derive(Default)]
pub struct AnimationSpec {
    pub easing: Option<Easing>,
    pub on_progress: Option<ProgressCallback>,
    pub on_complete: Option<CompleteCallback>,
    pub from: ValueSet,
    pub to: ValueSet,
    pub duration_ms: Option<f64>,
}

impl AnimationSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the start values
    pub fn from(mut self, values: impl Into<ValueSet>) -> Self {
        self.from = values.into();
        self
    }

    /// Set the end values
    pub fn to(mut self, values: impl Into<ValueSet>) -> Self {
        self.to = values.into();
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn on_progress<F>(mut self, f: F) -> Self
    where
        F: FnMut(&ValueSet) + Send + 'static,
    {
        self.on_progress = Some(Box::new(f));
        self
    }

    pub fn on_complete<F>(mut self, f: F) -> Self
    where
        F: FnOnce(f64) + Send + 'static,
    {
        self.on_complete = Some(Box::new(f));
        self
    }

    /// Validate the spec and fill in defaults
    pub fn resolve(self) -> Result<ResolvedSpec> {
        let tween = Tween::new(
            self.from,
            self.to,
            self.easing.unwrap_or_default(),
            self.duration_ms.unwrap_or(DEFAULT_DURATION_MS),
        )?;

        Ok(ResolvedSpec {
            tween,
            on_progress: self
                .on_progress
                .unwrap_or_else(|| Box::new(|_: &ValueSet| {})),
            on_complete: self.on_complete.unwrap_or_else(|| Box::new(|_: f64| {})),
        })
    }
}

impl fmt::Debug for AnimationSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationSpec")
            .field("easing", &self.easing)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("duration_ms", &self.duration_ms)
            .field("on_progress", &self.on_progress.is_some())
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

/// A validated spec with every default applied
pub struct ResolvedSpec {
    pub tween: Tween,
    pub on_progress: ProgressCallback,
    pub on_complete: CompleteCallback,
}

// ============================================================================
// Tween
// ============================================================================

/// The pure interpolation of one run: values as a function of elapsed time
#[derive(Clone, Debug)]
pub struct Tween {
    from: ValueSet,
    to: ValueSet,
    easing: Easing,
    duration_ms: f64,
}

/// One sample of a tween
#[derive(Clone, Debug, PartialEq)]
pub struct TweenFrame {
    /// Normalized time, clamped to 0.0..=1.0
    pub progress: f64,
    /// Eased progress, unclamped
    pub factor: f32,
    pub values: ValueSet,
}

impl TweenFrame {
    /// Whether this is the last frame of the run
    ///
    /// Exact comparison is sound because `progress` went through `min(_, 1.0)`.
    #[allow(clippy::float_cmp)]
    pub fn is_final(&self) -> bool {
        self.progress == 1.0
    }
}

impl Tween {
    pub fn new(from: ValueSet, to: ValueSet, easing: Easing, duration_ms: f64) -> Result<Self> {
        if !duration_ms.is_finite() || duration_ms <= 0.0 {
            return Err(AnimationError::InvalidConfiguration(format!(
                "duration must be a positive number of milliseconds, got {duration_ms}"
            )));
        }

        if let Some(key) = from.first_key_missing_from(&to) {
            return Err(AnimationError::MismatchedKeys {
                key: key.to_string(),
                missing_in: "to",
            });
        }
        if let Some(key) = to.first_key_missing_from(&from) {
            return Err(AnimationError::MismatchedKeys {
                key: key.to_string(),
                missing_in: "from",
            });
        }

        if let Some((key, value)) = from.iter().chain(to.iter()).find(|(_, v)| !v.is_finite()) {
            return Err(AnimationError::InvalidConfiguration(format!(
                "value for `{key}` is not finite: {value}"
            )));
        }

        Ok(Self {
            from,
            to,
            easing,
            duration_ms,
        })
    }

    pub fn from_values(&self) -> &ValueSet {
        &self.from
    }

    pub fn to_values(&self) -> &ValueSet {
        &self.to
    }

    pub fn easing(&self) -> &Easing {
        &self.easing
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Normalized progress after `elapsed_ms`
    pub fn progress_at(&self, elapsed_ms: f64) -> f64 {
        (elapsed_ms / self.duration_ms).min(1.0).max(0.0)
    }

    /// Sample the tween after `elapsed_ms`
    pub fn sample(&self, elapsed_ms: f64) -> TweenFrame {
        let progress = self.progress_at(elapsed_ms);
        let factor = self.easing.apply(progress as f32);
        TweenFrame {
            progress,
            factor,
            values: self.from.lerp(&self.to, factor),
        }
    }
}
