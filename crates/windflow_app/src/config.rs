//! Windflow configuration file handling
//!
//! Every section and field is optional; anything left out falls back to the
//! values the demo ships with.
//!
//! ```toml
//! [view]
//! basemap = "dark-gray-vector"
//! center = [-98.0, 39.0]
//! zoom = 4.0
//! default_padding = 20.0
//!
//! [panel]
//! margin = -280.0
//! duration_ms = 500.0
//! easing = "in-sine"
//!
//! [layer]
//! title = "Winds"
//! effects_enabled = true
//!
//! [layer.renderer]
//! trail_width_px = 2.0
//! density = 1.0
//!
//! [scheduler]
//! target_fps = 120
//! ```

use crate::error::{AppError, Result};
use crate::renderer::FlowRenderer;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use windflow_animation::Easing;

/// Root configuration
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct WindflowConfig {
    pub view: ViewConfig,
    pub panel: PanelConfig,
    pub layer: LayerConfig,
    pub scheduler: SchedulerConfig,
}

/// Initial map view
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub basemap: String,
    /// Longitude, latitude
    pub center: [f64; 2],
    pub zoom: f32,
    /// Left padding while the panel is collapsed
    pub default_padding: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            basemap: "dark-gray-vector".to_string(),
            center: [-98.0, 39.0],
            zoom: 4.0,
            default_padding: 20.0,
        }
    }
}

/// Slide panel geometry and transition
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Horizontal offset of the collapsed panel (negative: off to the left)
    pub margin: f32,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            margin: -280.0,
            duration_ms: 500.0,
            easing: Easing::InSine,
        }
    }
}

/// Wind layer source and rendering
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LayerConfig {
    pub url: String,
    pub title: String,
    /// Whether the bloom effect starts enabled
    pub effects_enabled: bool,
    pub renderer: FlowRenderer,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            url: "https://tiledimageservices.arcgis.com/V6ZHFr6zdgNZuVG0/arcgis/rest/services/NLDAS_Hourly_8_30_2021/ImageServer".to_string(),
            title: "Winds".to_string(),
            effects_enabled: true,
            renderer: FlowRenderer::default(),
        }
    }
}

/// Animation scheduler settings
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Frame rate of the background animation thread
    pub target_fps: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { target_fps: 120 }
    }
}

impl WindflowConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded windflow config");
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: WindflowConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let panel = &self.panel;
        if !panel.duration_ms.is_finite() || panel.duration_ms <= 0.0 {
            return Err(AppError::InvalidConfig(format!(
                "panel.duration_ms must be positive, got {}",
                panel.duration_ms
            )));
        }
        if !panel.margin.is_finite() {
            return Err(AppError::InvalidConfig("panel.margin must be finite".into()));
        }
        if !self.view.default_padding.is_finite() || self.view.default_padding < 0.0 {
            return Err(AppError::InvalidConfig(format!(
                "view.default_padding must be non-negative, got {}",
                self.view.default_padding
            )));
        }
        if self.scheduler.target_fps == 0 {
            return Err(AppError::InvalidConfig(
                "scheduler.target_fps must be at least 1".into(),
            ));
        }
        self.layer.renderer.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::FlowRepresentation;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = WindflowConfig::from_toml_str("").unwrap();
        assert_eq!(config.view.default_padding, 20.0);
        assert_eq!(config.view.zoom, 4.0);
        assert_eq!(config.panel.margin, -280.0);
        assert_eq!(config.panel.duration_ms, 500.0);
        assert!(matches!(config.panel.easing, Easing::InSine));
        assert_eq!(config.layer.title, "Winds");
        assert!(config.layer.effects_enabled);
        assert_eq!(config.layer.renderer, FlowRenderer::default());
        assert_eq!(config.scheduler.target_fps, 120);
    }

    #[test]
    fn test_partial_overrides() {
        let config = WindflowConfig::from_toml_str(
            r#"
            [panel]
            duration_ms = 250.0
            easing = "out-cubic"

            [layer.renderer]
            density = 0.5
            flow_representation = "flow-to"
            "#,
        )
        .unwrap();

        assert_eq!(config.panel.duration_ms, 250.0);
        assert_eq!(config.panel.margin, -280.0);
        assert!(matches!(config.panel.easing, Easing::OutCubic));
        assert_eq!(config.layer.renderer.density, 0.5);
        assert_eq!(config.layer.renderer.trail_width_px, 2.0);
        assert_eq!(
            config.layer.renderer.flow_representation,
            FlowRepresentation::FlowTo
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        for text in [
            "[panel]\nduration_ms = 0.0",
            "[view]\ndefault_padding = -5.0",
            "[scheduler]\ntarget_fps = 0",
            "[layer.renderer]\ntrail_width_px = -1.0",
        ] {
            assert!(
                matches!(
                    WindflowConfig::from_toml_str(text),
                    Err(AppError::InvalidConfig(_)) | Err(AppError::InvalidParameter { .. })
                ),
                "accepted: {text}"
            );
        }
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            WindflowConfig::from_toml_str("[panel\n"),
            Err(AppError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = WindflowConfig::load(Path::new("/nonexistent/windflow.toml")).unwrap_err();
        assert!(matches!(err, AppError::ConfigRead { .. }));
    }
}
