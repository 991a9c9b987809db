//! Paint properties for primitives.

use serde::{Deserialize, Serialize};

/// Fill, stroke and handle colours plus opacity of a primitive.
///
/// Colours are kept as CSS colour strings; the surface only stores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub fill: String,
    pub stroke: String,
    pub corner_color: String,
    pub opacity: f64,
}

impl Style {
    pub fn new(
        fill: impl Into<String>,
        stroke: impl Into<String>,
        corner_color: impl Into<String>,
        opacity: f64,
    ) -> Self {
        Self {
            fill: fill.into(),
            stroke: stroke.into(),
            corner_color: corner_color.into(),
            opacity,
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::new("transparent", "#000000", "#000000", 1.0)
    }
}
