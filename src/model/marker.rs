//! Marker value objects.
//!
//! A marker is an immutable snapshot of an annotation: its id, unit,
//! options and geometry. Edits on the surface produce new markers through
//! the projection; a marker is never updated in place.

use serde::{Deserialize, Serialize};

use annotate_canvas::Style;

use crate::error::{AnnotateError, Result};
use crate::geometry::{Point, Unit};

/// The three marker kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerKind {
    #[serde(rename = "MarkerRect")]
    Rect,
    #[serde(rename = "MarkerRound")]
    Round,
    #[serde(rename = "MarkerPoly")]
    Poly,
}

impl MarkerKind {
    /// Get the display name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            MarkerKind::Rect => "MarkerRect",
            MarkerKind::Round => "MarkerRound",
            MarkerKind::Poly => "MarkerPoly",
        }
    }
}

/// Styles applied to a marker depending on interaction state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleSet {
    pub neutral: Style,
    pub hover: Style,
    pub active: Style,
}

impl Default for StyleSet {
    fn default() -> Self {
        Self {
            neutral: Style::new("rgba(0,0,255,0.1)", "#0000ff", "#0000ff", 1.0),
            hover: Style::new("rgba(0,0,255,0.25)", "#3333ff", "#3333ff", 1.0),
            active: Style::new("rgba(255,0,0,0.2)", "#ff0000", "#ff0000", 1.0),
        }
    }
}

/// Interaction flags and styles carried by a marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerOptions {
    pub selectable: bool,
    pub has_borders: bool,
    pub transparent_corners: bool,
    pub draggable: bool,
    pub lock_rotation: bool,
    pub has_controls: bool,
    pub style: StyleSet,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self {
            selectable: true,
            has_borders: false,
            transparent_corners: false,
            draggable: true,
            lock_rotation: true,
            has_controls: true,
            style: StyleSet::default(),
        }
    }
}

/// Geometry of a marker, in the marker's unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum MarkerShape {
    /// Center-anchored rectangle.
    #[serde(rename = "MarkerRect")]
    Rect {
        center_x: f64,
        center_y: f64,
        width: f64,
        height: f64,
    },
    /// Circle with `width` as its diameter.
    #[serde(rename = "MarkerRound")]
    Round {
        center_x: f64,
        center_y: f64,
        width: f64,
    },
    /// Open vertex sequence; closure is implied when drawn.
    #[serde(rename = "MarkerPoly")]
    Poly { dots: Vec<Point> },
}

impl MarkerShape {
    pub fn kind(&self) -> MarkerKind {
        match self {
            MarkerShape::Rect { .. } => MarkerKind::Rect,
            MarkerShape::Round { .. } => MarkerKind::Round,
            MarkerShape::Poly { .. } => MarkerKind::Poly,
        }
    }
}

/// Everything about a marker except its geometry: what a draw request
/// carries and what a placed object remembers about its marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerTemplate {
    pub id: String,
    pub kind: MarkerKind,
    pub unit: Unit,
    pub options: MarkerOptions,
}

impl MarkerTemplate {
    pub fn new(id: impl Into<String>, kind: MarkerKind, unit: Unit, options: MarkerOptions) -> Self {
        Self {
            id: id.into(),
            kind,
            unit,
            options,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    id: String,
    unit: Unit,
    options: MarkerOptions,
    #[serde(flatten)]
    shape: MarkerShape,
}

/// Check that every value is finite, non-negative and, for percent,
/// no greater than one.
pub fn validate_values(unit: Unit, values: impl IntoIterator<Item = f64>) -> Result<()> {
    for value in values {
        if !value.is_finite() {
            return Err(AnnotateError::validation(format!(
                "value {} is not a finite number",
                value
            )));
        }
        if value < 0.0 {
            return Err(AnnotateError::validation(format!("value {} < 0", value)));
        }
        if unit == Unit::Percent && value > 1.0 {
            return Err(AnnotateError::validation(format!(
                "unit is percent but value {} > 1",
                value
            )));
        }
    }
    Ok(())
}

impl Marker {
    /// Build a marker after validating its geometry against `unit`.
    pub fn new(
        id: impl Into<String>,
        options: MarkerOptions,
        shape: MarkerShape,
        unit: Unit,
    ) -> Result<Self> {
        match &shape {
            MarkerShape::Rect {
                center_x,
                center_y,
                width,
                height,
            } => validate_values(unit, [*center_x, *center_y, *width, *height])?,
            MarkerShape::Round {
                center_x,
                center_y,
                width,
            } => validate_values(unit, [*center_x, *center_y, *width])?,
            MarkerShape::Poly { dots } => {
                validate_values(unit, dots.iter().flat_map(|d| [d.x, d.y]))?
            }
        }
        Ok(Self {
            id: id.into(),
            unit,
            options,
            shape,
        })
    }

    pub fn rect(
        id: impl Into<String>,
        options: MarkerOptions,
        center_x: f64,
        center_y: f64,
        width: f64,
        height: f64,
        unit: Unit,
    ) -> Result<Self> {
        Self::new(
            id,
            options,
            MarkerShape::Rect {
                center_x,
                center_y,
                width,
                height,
            },
            unit,
        )
    }

    pub fn round(
        id: impl Into<String>,
        options: MarkerOptions,
        center_x: f64,
        center_y: f64,
        width: f64,
        unit: Unit,
    ) -> Result<Self> {
        Self::new(
            id,
            options,
            MarkerShape::Round {
                center_x,
                center_y,
                width,
            },
            unit,
        )
    }

    pub fn poly(
        id: impl Into<String>,
        options: MarkerOptions,
        dots: Vec<Point>,
        unit: Unit,
    ) -> Result<Self> {
        Self::new(id, options, MarkerShape::Poly { dots }, unit)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn options(&self) -> &MarkerOptions {
        &self.options
    }

    pub fn shape(&self) -> &MarkerShape {
        &self.shape
    }

    pub fn kind(&self) -> MarkerKind {
        self.shape.kind()
    }

    /// Center of a rect or round marker. Polygons have no stored center.
    pub fn center(&self) -> Option<Point> {
        match self.shape {
            MarkerShape::Rect {
                center_x, center_y, ..
            }
            | MarkerShape::Round {
                center_x, center_y, ..
            } => Some(Point::new(center_x, center_y)),
            MarkerShape::Poly { .. } => None,
        }
    }

    /// Width and height; a round marker is as tall as it is wide.
    pub fn size(&self) -> Option<(f64, f64)> {
        match self.shape {
            MarkerShape::Rect { width, height, .. } => Some((width, height)),
            MarkerShape::Round { width, .. } => Some((width, width)),
            MarkerShape::Poly { .. } => None,
        }
    }

    pub fn dots(&self) -> Option<&[Point]> {
        match &self.shape {
            MarkerShape::Poly { dots } => Some(dots),
            _ => None,
        }
    }

    pub fn template(&self) -> MarkerTemplate {
        MarkerTemplate::new(self.id.clone(), self.kind(), self.unit, self.options.clone())
    }
}
