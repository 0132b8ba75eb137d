//! UI control events
//!
//! Raw events arrive as a control id and a text value. They are parsed into a
//! [`ControlEvent`] once, at the edge, and everything past that point works
//! with typed values.

use crate::error::{AppError, Result};
use crate::renderer::RendererParam;

/// Id of the checkbox that toggles the layer effect
pub const EFFECTS_CONTROL: &str = "effectsEnabled";
/// Id of the button that slides the panel
pub const EXPAND_CONTROL: &str = "btnExpand";

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlEvent {
    /// A slider or the flow representation radio group changed
    Renderer(RendererParam),
    /// The effects checkbox changed
    EffectsToggled(bool),
    /// The expand/collapse button was clicked
    ExpandToggled,
}

impl ControlEvent {
    pub fn from_control(id: &str, value: &str) -> Result<Self> {
        match id {
            EFFECTS_CONTROL => match value.trim() {
                "true" | "on" | "1" => Ok(ControlEvent::EffectsToggled(true)),
                "false" | "off" | "0" | "" => Ok(ControlEvent::EffectsToggled(false)),
                other => Err(AppError::InvalidParameter {
                    param: EFFECTS_CONTROL,
                    value: other.to_string(),
                }),
            },
            EXPAND_CONTROL => Ok(ControlEvent::ExpandToggled),
            _ => RendererParam::from_control(id, value).map(ControlEvent::Renderer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::FlowRepresentation;

    #[test]
    fn test_parse_events() {
        assert_eq!(
            ControlEvent::from_control("density", "0.8").unwrap(),
            ControlEvent::Renderer(RendererParam::Density(0.8))
        );
        assert_eq!(
            ControlEvent::from_control("flowRepresentation", "flow-to").unwrap(),
            ControlEvent::Renderer(RendererParam::FlowRepresentation(
                FlowRepresentation::FlowTo
            ))
        );
        assert_eq!(
            ControlEvent::from_control(EFFECTS_CONTROL, "false").unwrap(),
            ControlEvent::EffectsToggled(false)
        );
        assert_eq!(
            ControlEvent::from_control(EXPAND_CONTROL, "").unwrap(),
            ControlEvent::ExpandToggled
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(ControlEvent::from_control(EFFECTS_CONTROL, "maybe").is_err());
        assert!(matches!(
            ControlEvent::from_control("legend", "1"),
            Err(AppError::UnknownControl(_))
        ));
    }
}
