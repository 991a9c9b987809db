//! Region of interest used to frame the viewport.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Unit};

/// A rectangular region described by its center `point`, its size and the
/// unit of all three.
///
/// Only used transiently to compute a framing; it is not marker state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    pub point: Point,
    pub width: f64,
    pub height: f64,
    pub unit: Unit,
}

impl RegionOfInterest {
    pub fn new(point: Point, width: f64, height: f64, unit: Unit) -> Self {
        Self {
            point,
            width,
            height,
            unit,
        }
    }
}
