//! Flow renderer parameters
//!
//! The flow renderer's tunables form a closed set. Controls produce a
//! [`RendererParam`] and the renderer applies it through a typed setter, so an
//! unknown or malformed control never reaches the renderer.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use windflow_animation::Interpolate;

/// Which end of a streamline the flow is drawn from
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowRepresentation {
    /// Data values describe where the wind blows from
    #[default]
    FlowFrom,
    /// Data values describe where the wind blows to
    FlowTo,
}

impl FlowRepresentation {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowRepresentation::FlowFrom => "flow-from",
            FlowRepresentation::FlowTo => "flow-to",
        }
    }
}

impl fmt::Display for FlowRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowRepresentation {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "flow-from" => Ok(FlowRepresentation::FlowFrom),
            "flow-to" => Ok(FlowRepresentation::FlowTo),
            other => Err(AppError::InvalidParameter {
                param: "flowRepresentation",
                value: other.to_string(),
            }),
        }
    }
}

/// One change to the flow renderer
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RendererParam {
    /// Streamline width in pixels
    TrailWidth(f32),
    /// Streamline density
    Density(f32),
    /// Maximum streamline length in pixels
    MaxPathLength(f32),
    /// Animation speed of the streamlines
    FlowSpeed(f32),
    /// Length of the fading trail in pixels
    TrailLength(f32),
    FlowRepresentation(FlowRepresentation),
}

impl RendererParam {
    /// Id of the control that edits this parameter
    pub fn control_id(&self) -> &'static str {
        match self {
            RendererParam::TrailWidth(_) => "trailWidth",
            RendererParam::Density(_) => "density",
            RendererParam::MaxPathLength(_) => "maxPathLength",
            RendererParam::FlowSpeed(_) => "flowSpeed",
            RendererParam::TrailLength(_) => "trailLength",
            RendererParam::FlowRepresentation(_) => "flowRepresentation",
        }
    }

    /// Parse a raw control event (control id plus its value as text)
    pub fn from_control(id: &str, value: &str) -> Result<Self> {
        let number = |param: &'static str| -> Result<f32> {
            value
                .trim()
                .parse::<f32>()
                .map_err(|_| AppError::InvalidParameter {
                    param,
                    value: value.to_string(),
                })
        };

        Ok(match id {
            "trailWidth" => RendererParam::TrailWidth(number("trailWidth")?),
            "density" => RendererParam::Density(number("density")?),
            "maxPathLength" => RendererParam::MaxPathLength(number("maxPathLength")?),
            "flowSpeed" => RendererParam::FlowSpeed(number("flowSpeed")?),
            "trailLength" => RendererParam::TrailLength(number("trailLength")?),
            "flowRepresentation" => RendererParam::FlowRepresentation(value.trim().parse()?),
            other => return Err(AppError::UnknownControl(other.to_string())),
        })
    }
}

/// A magnitude-to-color stop of the renderer's color ramp
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ColorStop {
    pub value: f32,
    pub color: [u8; 3],
}

impl ColorStop {
    pub const fn new(value: f32, color: [u8; 3]) -> Self {
        Self { value, color }
    }
}

/// Flow renderer configuration for the wind layer
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FlowRenderer {
    pub trail_width_px: f32,
    pub density: f32,
    pub max_path_length: f32,
    pub flow_speed: f32,
    pub trail_length: f32,
    pub flow_representation: FlowRepresentation,
    /// Color ramp over wind magnitude, sorted by value
    pub color_stops: Vec<ColorStop>,
}

impl Default for FlowRenderer {
    fn default() -> Self {
        Self {
            trail_width_px: 2.0,
            density: 1.0,
            max_path_length: 200.0,
            flow_speed: 10.0,
            trail_length: 100.0,
            flow_representation: FlowRepresentation::FlowFrom,
            color_stops: vec![
                ColorStop::new(0.0, [40, 146, 199]),
                ColorStop::new(5.0, [160, 194, 155]),
                ColorStop::new(10.0, [218, 230, 119]),
            ],
        }
    }
}

fn check_non_negative(param: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(AppError::InvalidParameter {
            param,
            value: value.to_string(),
        })
    }
}

impl FlowRenderer {
    /// Apply one parameter change
    ///
    /// On error the renderer is left untouched.
    pub fn apply(&mut self, param: RendererParam) -> Result<()> {
        let id = param.control_id();
        match param {
            RendererParam::TrailWidth(v) => self.trail_width_px = check_non_negative(id, v)?,
            RendererParam::Density(v) => self.density = check_non_negative(id, v)?,
            RendererParam::MaxPathLength(v) => self.max_path_length = check_non_negative(id, v)?,
            RendererParam::FlowSpeed(v) => self.flow_speed = check_non_negative(id, v)?,
            RendererParam::TrailLength(v) => self.trail_length = check_non_negative(id, v)?,
            RendererParam::FlowRepresentation(r) => self.flow_representation = r,
        }
        Ok(())
    }

    /// Check every numeric field and the color ramp ordering
    pub fn validate(&self) -> Result<()> {
        check_non_negative("trailWidth", self.trail_width_px)?;
        check_non_negative("density", self.density)?;
        check_non_negative("maxPathLength", self.max_path_length)?;
        check_non_negative("flowSpeed", self.flow_speed)?;
        check_non_negative("trailLength", self.trail_length)?;

        if self.color_stops.windows(2).any(|w| w[0].value > w[1].value) {
            return Err(AppError::InvalidConfig(
                "color stops must be sorted by value".into(),
            ));
        }
        Ok(())
    }

    /// Color for a wind magnitude, interpolated between the surrounding stops
    pub fn color_at(&self, magnitude: f32) -> Option<[u8; 3]> {
        let first = self.color_stops.first()?;
        let last = self.color_stops.last()?;

        if magnitude <= first.value {
            return Some(first.color);
        }
        if magnitude >= last.value {
            return Some(last.color);
        }

        let upper = self
            .color_stops
            .iter()
            .position(|stop| stop.value >= magnitude)?;
        let (lo, hi) = (&self.color_stops[upper - 1], &self.color_stops[upper]);
        let t = (magnitude - lo.value) / (hi.value - lo.value);

        let mut color = [0u8; 3];
        for (channel, (a, b)) in color.iter_mut().zip(lo.color.iter().zip(hi.color.iter())) {
            *channel = f32::from(*a).lerp(&f32::from(*b), t).round() as u8;
        }
        Some(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slider_controls() {
        assert_eq!(
            RendererParam::from_control("trailWidth", "3.5").unwrap(),
            RendererParam::TrailWidth(3.5)
        );
        assert_eq!(
            RendererParam::from_control("flowSpeed", " 12 ").unwrap(),
            RendererParam::FlowSpeed(12.0)
        );
        assert_eq!(
            RendererParam::from_control("flowRepresentation", "flow-to").unwrap(),
            RendererParam::FlowRepresentation(FlowRepresentation::FlowTo)
        );
    }

    #[test]
    fn test_parse_rejects_unknown_and_malformed() {
        assert!(matches!(
            RendererParam::from_control("color", "1"),
            Err(AppError::UnknownControl(id)) if id == "color"
        ));
        assert!(matches!(
            RendererParam::from_control("density", "lots"),
            Err(AppError::InvalidParameter { param: "density", .. })
        ));
        assert!(matches!(
            RendererParam::from_control("flowRepresentation", "sideways"),
            Err(AppError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_apply_each_param() {
        let mut renderer = FlowRenderer::default();
        renderer.apply(RendererParam::TrailWidth(4.0)).unwrap();
        renderer.apply(RendererParam::Density(0.5)).unwrap();
        renderer.apply(RendererParam::MaxPathLength(300.0)).unwrap();
        renderer.apply(RendererParam::FlowSpeed(5.0)).unwrap();
        renderer.apply(RendererParam::TrailLength(50.0)).unwrap();
        renderer
            .apply(RendererParam::FlowRepresentation(FlowRepresentation::FlowTo))
            .unwrap();

        assert_eq!(renderer.trail_width_px, 4.0);
        assert_eq!(renderer.density, 0.5);
        assert_eq!(renderer.max_path_length, 300.0);
        assert_eq!(renderer.flow_speed, 5.0);
        assert_eq!(renderer.trail_length, 50.0);
        assert_eq!(renderer.flow_representation, FlowRepresentation::FlowTo);
    }

    #[test]
    fn test_apply_rejects_bad_values() {
        let mut renderer = FlowRenderer::default();
        let before = renderer.clone();
        assert!(renderer.apply(RendererParam::Density(-1.0)).is_err());
        assert!(renderer.apply(RendererParam::FlowSpeed(f32::NAN)).is_err());
        assert_eq!(renderer, before);
    }

    #[test]
    fn test_color_ramp() {
        let renderer = FlowRenderer::default();
        assert_eq!(renderer.color_at(-3.0), Some([40, 146, 199]));
        assert_eq!(renderer.color_at(5.0), Some([160, 194, 155]));
        assert_eq!(renderer.color_at(50.0), Some([218, 230, 119]));
        // Halfway between the first two stops
        assert_eq!(renderer.color_at(2.5), Some([100, 170, 177]));

        let empty = FlowRenderer {
            color_stops: Vec::new(),
            ..FlowRenderer::default()
        };
        assert_eq!(empty.color_at(1.0), None);
    }

    #[test]
    fn test_validate_stop_order() {
        let mut renderer = FlowRenderer::default();
        assert!(renderer.validate().is_ok());
        renderer.color_stops.reverse();
        assert!(matches!(renderer.validate(), Err(AppError::InvalidConfig(_))));
    }
}
