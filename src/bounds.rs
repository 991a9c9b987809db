//! Image containment checks for placed and in-progress objects.
//!
//! Center-anchored candidates are tested by their two extreme corners.
//! Top-left-anchored candidates (polygons, rectangle previews) are grown
//! outward by half the on-screen stroke so that the stroke itself stays on
//! the image.

use annotate_canvas::{Origin, Primitive, Shape};

use crate::geometry::{ImageExtent, Point};

/// Position and size of a candidate object, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub origin: Origin,
}

impl Frame {
    pub fn new(left: f64, top: f64, width: f64, height: f64, origin: Origin) -> Self {
        Self {
            left,
            top,
            width,
            height,
            origin,
        }
    }

    /// Frame of a primitive as currently placed, scale included.
    pub fn of(primitive: &Primitive) -> Self {
        let size = primitive.scaled_size();
        Self::new(
            primitive.left,
            primitive.top,
            size.width,
            size.height,
            primitive.origin,
        )
    }
}

/// Decides whether candidate frames stay inside the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsGuard {
    extent: ImageExtent,
    /// Stroke width in screen pixels
    stroke_width: f64,
    /// Screen pixels per image pixel
    zoom: f64,
}

impl BoundsGuard {
    pub fn new(extent: ImageExtent, stroke_width: f64, zoom: f64) -> Self {
        Self {
            extent,
            stroke_width,
            zoom,
        }
    }

    /// Half the stroke width, in image pixels.
    fn stroke_margin(&self) -> f64 {
        if self.zoom > 0.0 {
            self.stroke_width / self.zoom / 2.0
        } else {
            0.0
        }
    }

    pub fn fits(&self, frame: &Frame) -> bool {
        let (top_left, bottom_right) = match frame.origin {
            Origin::Center => (
                Point::new(
                    frame.left - frame.width / 2.0,
                    frame.top - frame.height / 2.0,
                ),
                Point::new(
                    frame.left + frame.width / 2.0,
                    frame.top + frame.height / 2.0,
                ),
            ),
            Origin::TopLeft => {
                let margin = self.stroke_margin();
                (
                    Point::new(frame.left - margin, frame.top - margin),
                    Point::new(
                        frame.left + frame.width + margin,
                        frame.top + frame.height + margin,
                    ),
                )
            }
        };
        self.extent.contains(top_left) && self.extent.contains(bottom_right)
    }

    pub fn fits_primitive(&self, primitive: &Primitive) -> bool {
        self.fits(&Frame::of(primitive))
    }

    /// Validate a live move: keep and save the new position if it fits,
    /// otherwise put the last good position back. Returns whether the
    /// move was kept.
    pub fn guard_move(&self, primitive: &mut Primitive) -> bool {
        if self.fits_primitive(primitive) {
            primitive.save_state();
            true
        } else {
            log::trace!(
                "BoundsGuard: move to ({:.1}, {:.1}) rejected",
                primitive.left,
                primitive.top
            );
            primitive.restore_position();
            false
        }
    }

    /// Validate a live resize. An accepted scale is baked into the shape
    /// (rect width/height, circle radius) and the scale reset to 1;
    /// polygons keep their scale factors. A rejected scale is dropped
    /// entirely: scale and position go back to the last good state.
    pub fn guard_scale(&self, primitive: &mut Primitive) -> bool {
        if !self.fits_primitive(primitive) {
            log::trace!(
                "BoundsGuard: scale ({:.3}, {:.3}) rejected",
                primitive.scale_x,
                primitive.scale_y
            );
            let (scale_x, scale_y) = primitive
                .saved_state()
                .map_or((1.0, 1.0), |state| (state.scale_x, state.scale_y));
            primitive.scale_x = scale_x;
            primitive.scale_y = scale_y;
            primitive.restore_position();
            return false;
        }

        match &mut primitive.shape {
            Shape::Rect { width, height } => {
                *width *= primitive.scale_x;
                *height *= primitive.scale_y;
                primitive.scale_x = 1.0;
                primitive.scale_y = 1.0;
            }
            Shape::Circle { radius } => {
                *radius *= primitive.scale_y;
                primitive.scale_x = 1.0;
                primitive.scale_y = 1.0;
            }
            Shape::Polygon(_) | Shape::Line { .. } => {}
        }
        true
    }
}
