//! Home region and viewport framing.
//!
//! A home is stored with its size in image pixels (what zoom-to-fit needs)
//! and its center as a fraction of the image (what panning needs),
//! whatever unit it was supplied in.

use serde::{Deserialize, Serialize};

use crate::error::{AnnotateError, Result};
use crate::geometry::{to_percent, to_pixel, ImageExtent, Point, Size, Unit};
use crate::model::{validate_values, RegionOfInterest};
use crate::viewer::Viewer;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Home {
    /// Center, as a fraction of the image size
    pub point: Point,
    /// Width in image pixels
    pub width: f64,
    /// Height in image pixels
    pub height: f64,
}

impl Home {
    /// Normalize a region of interest against the image.
    pub fn from_roi(roi: &RegionOfInterest, extent: &ImageExtent) -> Result<Self> {
        validate_values(roi.unit, [roi.point.x, roi.point.y, roi.width, roi.height])?;
        if roi.width == 0.0 || roi.height == 0.0 {
            return Err(AnnotateError::validation(format!(
                "home region {}x{} has no area",
                roi.width, roi.height
            )));
        }

        let home = match roi.unit {
            Unit::Percent => Self {
                point: roi.point,
                width: to_pixel(roi.width, extent.width),
                height: to_pixel(roi.height, extent.height),
            },
            Unit::Pixel => Self {
                point: extent.point_to_percent(roi.point),
                width: roi.width,
                height: roi.height,
            },
        };
        Ok(home)
    }

    /// Home around a box (image pixels), grown by `margin` on every side.
    pub fn around(center: Point, size: Size, margin: f64, extent: &ImageExtent) -> Self {
        Self {
            point: extent.point_to_percent(center),
            width: size.width + 2.0 * margin,
            height: size.height + 2.0 * margin,
        }
    }

    /// Center in image pixels.
    pub fn center(&self, extent: &ImageExtent) -> Point {
        extent.point_to_pixel(self.point)
    }

    /// The home as a region of interest in `unit`.
    pub fn to_roi(&self, unit: Unit, extent: &ImageExtent) -> RegionOfInterest {
        match unit {
            Unit::Percent => RegionOfInterest::new(
                self.point,
                to_percent(self.width, extent.width),
                to_percent(self.height, extent.height),
                unit,
            ),
            Unit::Pixel => RegionOfInterest::new(self.center(extent), self.width, self.height, unit),
        }
    }

    /// Screen pixels per image pixel that fit the home in `container`.
    pub fn image_zoom(&self, container: Size) -> f64 {
        let by_height = container.height / self.height;
        let by_width = container.width / self.width;
        by_height.min(by_width)
    }
}

/// How the viewport should be placed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Framing {
    /// The viewer's own fit-whole-image behaviour.
    FitImage,
    Region {
        /// Screen pixels per image pixel
        image_zoom: f64,
        /// Point to center, in image pixels
        center: Point,
    },
}

impl Framing {
    pub fn for_home(home: Option<&Home>, container: Size, extent: &ImageExtent) -> Self {
        match home {
            None => Framing::FitImage,
            Some(home) => Framing::Region {
                image_zoom: home.image_zoom(container),
                center: home.center(extent),
            },
        }
    }

    pub fn apply<V: Viewer + ?Sized>(&self, viewer: &mut V) {
        match *self {
            Framing::FitImage => viewer.go_home(),
            Framing::Region { image_zoom, center } => {
                let zoom = viewer.image_to_viewport_zoom(image_zoom);
                viewer.zoom_to(zoom);
                viewer.pan_to(center);
            }
        }
    }
}
