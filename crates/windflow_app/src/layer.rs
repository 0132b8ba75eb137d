//! Wind flow layer

use crate::config::LayerConfig;
use crate::error::Result;
use crate::renderer::{FlowRenderer, RendererParam};
use std::fmt;

/// Post-processing effect applied to the whole layer
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayerEffect {
    Bloom {
        strength: f32,
        radius_px: f32,
        threshold: f32,
    },
}

impl LayerEffect {
    /// The glow the demo applies to the streamlines
    pub const DEFAULT_BLOOM: LayerEffect = LayerEffect::Bloom {
        strength: 1.5,
        radius_px: 0.5,
        threshold: 0.0,
    };
}

impl fmt::Display for LayerEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerEffect::Bloom {
                strength,
                radius_px,
                threshold,
            } => write!(f, "bloom({strength}, {radius_px}px, {threshold})"),
        }
    }
}

/// Imagery tile layer drawn with the flow renderer
#[derive(Clone, Debug)]
pub struct FlowLayer {
    url: String,
    title: String,
    renderer: FlowRenderer,
    effect: Option<LayerEffect>,
    /// Bumped every time the renderer is replaced
    revision: u64,
}

impl FlowLayer {
    pub fn new(config: &LayerConfig) -> Self {
        Self {
            url: config.url.clone(),
            title: config.title.clone(),
            renderer: config.renderer.clone(),
            effect: config.effects_enabled.then_some(LayerEffect::DEFAULT_BLOOM),
            revision: 0,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn renderer(&self) -> &FlowRenderer {
        &self.renderer
    }

    pub fn effect(&self) -> Option<LayerEffect> {
        self.effect
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the renderer with a copy that has `param` applied
    ///
    /// The layer only ever sees whole renderers, never a half-applied change.
    pub fn set_renderer_param(&mut self, param: RendererParam) -> Result<()> {
        let mut next = self.renderer.clone();
        next.apply(param)?;
        self.renderer = next;
        self.revision += 1;
        tracing::debug!(?param, revision = self.revision, "flow renderer updated");
        Ok(())
    }

    pub fn set_effects_enabled(&mut self, enabled: bool) {
        self.effect = enabled.then_some(LayerEffect::DEFAULT_BLOOM);
        tracing::debug!(effect = ?self.effect, "layer effect changed");
    }
}
