//! Units and image-space geometry.
//!
//! Markers can be expressed in two unit systems:
//! - **percent**: fractions of the image size in `[0, 1]`, stable across
//!   image resolutions
//! - **pixel**: absolute image pixels, stable across zoom and pan

use serde::{Deserialize, Serialize};

pub use annotate_canvas::{point_in_polygon, Point, Size};

/// Unit system of a marker or region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Percent,
    Pixel,
}

/// Scale a percent value to pixels of a dimension.
pub fn to_pixel(value: f64, dimension: f64) -> f64 {
    value * dimension
}

/// Scale a pixel value to a fraction of a dimension.
pub fn to_percent(value: f64, dimension: f64) -> f64 {
    value / dimension
}

/// Pixel dimensions of the image being annotated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageExtent {
    pub width: f64,
    pub height: f64,
}

impl ImageExtent {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether `point` (image pixels) lies on the image.
    ///
    /// Tested by ray casting against the image outline grown by one pixel
    /// on the far edges, so it agrees with polygon containment.
    pub fn contains(&self, point: Point) -> bool {
        let w = self.width + 1.0;
        let h = self.height + 1.0;
        let outline = [
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ];
        point_in_polygon(point, &outline)
    }

    pub fn point_to_pixel(&self, point: Point) -> Point {
        Point::new(to_pixel(point.x, self.width), to_pixel(point.y, self.height))
    }

    pub fn point_to_percent(&self, point: Point) -> Point {
        Point::new(
            to_percent(point.x, self.width),
            to_percent(point.y, self.height),
        )
    }
}

impl From<Size> for ImageExtent {
    fn from(size: Size) -> Self {
        Self::new(size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_percent_pixel_roundtrip() {
        for dimension in [1.0, 3.0, 640.0, 13920.0] {
            for step in 0..=20 {
                let v = step as f64 / 20.0;
                assert!(approx_eq(to_percent(to_pixel(v, dimension), dimension), v));
            }
        }
    }

    #[test]
    fn test_image_contains_corners_and_edges() {
        let image = ImageExtent::new(100.0, 50.0);
        assert!(image.contains(Point::new(0.0, 0.0)));
        assert!(image.contains(Point::new(100.0, 50.0)));
        assert!(image.contains(Point::new(50.0, 25.0)));
        assert!(image.contains(Point::new(100.5, 50.5)));
    }

    #[test]
    fn test_image_rejects_outside_points() {
        let image = ImageExtent::new(100.0, 50.0);
        assert!(!image.contains(Point::new(-0.1, 10.0)));
        assert!(!image.contains(Point::new(10.0, -0.1)));
        assert!(!image.contains(Point::new(102.0, 10.0)));
        assert!(!image.contains(Point::new(10.0, 52.0)));
    }

    #[test]
    fn test_image_contains_matches_bounds_check() {
        let image = ImageExtent::new(20.0, 10.0);
        for xi in -4..=50 {
            for yi in -4..=30 {
                let p = Point::new(xi as f64 * 0.5 + 0.25, yi as f64 * 0.5 + 0.25);
                let expected = p.x >= 0.0 && p.x < 21.0 && p.y >= 0.0 && p.y < 11.0;
                assert_eq!(image.contains(p), expected, "{:?}", p);
            }
        }
    }

    #[test]
    fn test_unit_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Unit::Percent).unwrap(), "\"percent\"");
        assert_eq!(serde_json::to_string(&Unit::Pixel).unwrap(), "\"pixel\"");
    }
}
