//! Map view state the app drives
//!
//! Only the parts the demo mutates are modelled; drawing belongs to the host.

use crate::config::ViewConfig;

/// Space reserved along each edge of the view, in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgePadding {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl EdgePadding {
    /// Padding on the left edge only
    pub fn left(left: f32) -> Self {
        Self {
            left,
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MapView {
    basemap: String,
    center: [f64; 2],
    zoom: f32,
    padding: EdgePadding,
}

impl MapView {
    pub fn new(config: &ViewConfig) -> Self {
        Self {
            basemap: config.basemap.clone(),
            center: config.center,
            zoom: config.zoom,
            padding: EdgePadding::left(config.default_padding),
        }
    }

    pub fn basemap(&self) -> &str {
        &self.basemap
    }

    /// Longitude, latitude
    pub fn center(&self) -> [f64; 2] {
        self.center
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn padding(&self) -> EdgePadding {
        self.padding
    }

    pub fn set_padding(&mut self, padding: EdgePadding) {
        self.padding = padding;
    }
}

/// The sliding controls panel; only its horizontal offset matters here
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlidePanel {
    pub offset_px: f32,
}

impl SlidePanel {
    pub fn new(offset_px: f32) -> Self {
        Self { offset_px }
    }
}
