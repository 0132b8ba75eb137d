//! Easing functions
//!
//! An easing maps normalized progress (0.0 to 1.0) to an interpolation factor.
//! The factor is never clamped: curves like [`Easing::OutBack`] overshoot past
//! 1.0 and the interpolated values overshoot with them.

use serde::Deserialize;
use std::f32::consts::PI;
use std::fmt;
use std::sync::Arc;

/// A user-supplied easing curve
pub type EasingFn = Arc<dyn Fn(f32) -> f32 + Send + Sync>;

/// Easing curve applied to the progress of an animation run
///
/// Named curves can be selected from configuration files using their
/// kebab-case names (`"linear"`, `"in-sine"`, `"out-back"`, ...).
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Identity: the factor equals the progress
    #[default]
    Linear,
    /// `-cos(t * PI / 2) + 1`, starts slow with zero initial velocity
    InSine,
    OutSine,
    InOutSine,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    /// Overshoots the end value before settling on it
    OutBack,
    /// Arbitrary curve
    #[serde(skip)]
    Custom(EasingFn),
}

impl Easing {
    /// Wrap an arbitrary function as an easing curve
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(f32) -> f32 + Send + Sync + 'static,
    {
        Easing::Custom(Arc::new(f))
    }

    /// Map progress `t` to an interpolation factor
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::InSine => in_sine(t),
            Easing::OutSine => (t * PI / 2.0).sin(),
            Easing::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Easing::InQuad => t * t,
            Easing::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::InCubic => t * t * t,
            Easing::OutCubic => 1.0 - (1.0 - t).powi(3),
            Easing::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::OutBack => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
            Easing::Custom(f) => f(t),
        }
    }
}

/// Sine ease-in used by the slide panel
pub fn in_sine(t: f32) -> f32 {
    -(t * PI / 2.0).cos() + 1.0
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Easing::Linear => "Linear",
            Easing::InSine => "InSine",
            Easing::OutSine => "OutSine",
            Easing::InOutSine => "InOutSine",
            Easing::InQuad => "InQuad",
            Easing::OutQuad => "OutQuad",
            Easing::InOutQuad => "InOutQuad",
            Easing::InCubic => "InCubic",
            Easing::OutCubic => "OutCubic",
            Easing::InOutCubic => "InOutCubic",
            Easing::OutBack => "OutBack",
            Easing::Custom(_) => "Custom(..)",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMED: [Easing; 11] = [
        Easing::Linear,
        Easing::InSine,
        Easing::OutSine,
        Easing::InOutSine,
        Easing::InQuad,
        Easing::OutQuad,
        Easing::InOutQuad,
        Easing::InCubic,
        Easing::OutCubic,
        Easing::InOutCubic,
        Easing::OutBack,
    ];

    #[test]
    fn test_in_sine_boundaries() {
        assert_eq!(in_sine(0.0), 0.0);
        assert!((in_sine(1.0) - 1.0).abs() < 1e-6);
        assert!((in_sine(0.5) - 0.292_893).abs() < 1e-5);
    }

    #[test]
    fn test_in_sine_monotonic() {
        let mut prev = in_sine(0.0);
        for i in 1..=1000 {
            let next = in_sine(i as f32 / 1000.0);
            assert!(next >= prev, "in_sine decreased at step {i}");
            prev = next;
        }
    }

    #[test]
    fn test_in_sine_starts_slow() {
        // Zero derivative at 0: the first 1% of time covers far less than 1% of distance
        assert!(in_sine(0.01) < 0.001);
    }

    #[test]
    fn test_named_curves_hit_endpoints() {
        for easing in NAMED.iter() {
            assert!(easing.apply(0.0).abs() < 1e-5, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-5, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_out_back_overshoots() {
        let peak = (0..=100)
            .map(|i| Easing::OutBack.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_custom_easing() {
        let step = Easing::custom(|t| if t < 0.5 { 0.0 } else { 1.0 });
        assert_eq!(step.apply(0.25), 0.0);
        assert_eq!(step.apply(0.75), 1.0);
        assert_eq!(format!("{step:?}"), "Custom(..)");
    }

    #[test]
    fn test_deserialize_names() {
        #[derive(Deserialize)]
        struct Cfg {
            easing: Easing,
        }

        let cfg: Cfg = toml::from_str(r#"easing = "in-sine""#).unwrap();
        assert!(matches!(cfg.easing, Easing::InSine));

        let cfg: Cfg = toml::from_str(r#"easing = "in-out-cubic""#).unwrap();
        assert!(matches!(cfg.easing, Easing::InOutCubic));

        assert!(toml::from_str::<Cfg>(r#"easing = "custom""#).is_err());
    }
}
