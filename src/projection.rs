//! Conversion between markers and surface primitives.
//!
//! The surface is laid out in image pixels. Markers in percent units are
//! scaled by the image size on the way in and divided by it on the way out.

use annotate_canvas::{Origin, Primitive};

use crate::error::Result;
use crate::geometry::{to_percent, to_pixel, ImageExtent, Point, Unit};
use crate::model::{Marker, MarkerKind, MarkerShape, MarkerTemplate};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    extent: ImageExtent,
}

impl Projection {
    pub fn new(extent: ImageExtent) -> Self {
        Self { extent }
    }

    pub fn extent(&self) -> ImageExtent {
        self.extent
    }

    fn length_to_pixel(&self, unit: Unit, value: f64, dimension: f64) -> f64 {
        match unit {
            Unit::Percent => to_pixel(value, dimension),
            Unit::Pixel => value,
        }
    }

    fn length_from_pixel(&self, unit: Unit, value: f64, dimension: f64) -> f64 {
        match unit {
            // The image outline tolerates one pixel past the far edge, so
            // percent values can overshoot by a hair
            Unit::Percent => to_percent(value, dimension).clamp(0.0, 1.0),
            Unit::Pixel => value.max(0.0),
        }
    }

    fn point_to_pixel(&self, unit: Unit, point: Point) -> Point {
        Point::new(
            self.length_to_pixel(unit, point.x, self.extent.width),
            self.length_to_pixel(unit, point.y, self.extent.height),
        )
    }

    fn point_from_pixel(&self, unit: Unit, point: Point) -> Point {
        Point::new(
            self.length_from_pixel(unit, point.x, self.extent.width),
            self.length_from_pixel(unit, point.y, self.extent.height),
        )
    }

    /// Build the surface primitive for a marker. `stroke_width` is in image
    /// pixels.
    pub fn to_primitive(&self, marker: &Marker, stroke_width: f64) -> Primitive {
        let unit = marker.unit();
        let primitive = match marker.shape() {
            MarkerShape::Rect {
                center_x,
                center_y,
                width,
                height,
            } => {
                let center = self.point_to_pixel(unit, Point::new(*center_x, *center_y));
                Primitive::rect(
                    center.x,
                    center.y,
                    self.length_to_pixel(unit, *width, self.extent.width),
                    self.length_to_pixel(unit, *height, self.extent.height),
                    Origin::Center,
                )
            }
            MarkerShape::Round {
                center_x,
                center_y,
                width,
            } => {
                let center = self.point_to_pixel(unit, Point::new(*center_x, *center_y));
                let diameter = self.length_to_pixel(unit, *width, self.extent.width);
                Primitive::circle(center, diameter / 2.0)
            }
            MarkerShape::Poly { dots } => Primitive::polygon(
                dots.iter()
                    .map(|dot| self.point_to_pixel(unit, *dot))
                    .collect(),
            ),
        };

        let options = marker.options();
        let mut primitive = primitive
            .with_style(options.style.neutral.clone())
            .with_name(marker.id())
            .with_stroke_width(stroke_width);
        primitive.selectable = options.selectable;
        primitive
    }

    /// Read a marker back from its primitive.
    ///
    /// Polygons use `real_points` (absolute vertices cached after an edit)
    /// when given, otherwise the vertices with the current transform
    /// applied.
    pub fn to_marker(
        &self,
        template: &MarkerTemplate,
        primitive: &Primitive,
        real_points: Option<&[Point]>,
    ) -> Result<Marker> {
        let unit = template.unit;
        let options = template.options.clone();
        let id = template.id.clone();

        match template.kind {
            MarkerKind::Poly => {
                let absolute = match real_points {
                    Some(points) => points.to_vec(),
                    None => primitive.absolute_points(),
                };
                let dots = absolute
                    .into_iter()
                    .map(|p| self.point_from_pixel(unit, p))
                    .collect();
                Marker::poly(id, options, dots, unit)
            }
            MarkerKind::Rect | MarkerKind::Round => {
                let center = self.point_from_pixel(unit, primitive.center_point());
                let size = primitive.scaled_size();
                let width = self.length_from_pixel(unit, size.width, self.extent.width);
                if template.kind == MarkerKind::Round {
                    Marker::round(id, options, center.x, center.y, width, unit)
                } else {
                    let height = self.length_from_pixel(unit, size.height, self.extent.height);
                    Marker::rect(id, options, center.x, center.y, width, height, unit)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MarkerOptions;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    fn projection() -> Projection {
        Projection::new(ImageExtent::new(200.0, 100.0))
    }

    #[test]
    fn test_percent_rect_is_scaled_per_axis() {
        let marker =
            Marker::rect("r", MarkerOptions::default(), 0.5, 0.5, 0.2, 0.4, Unit::Percent).unwrap();
        let primitive = projection().to_primitive(&marker, 1.0);
        assert_eq!(primitive.origin, Origin::Center);
        assert_eq!((primitive.left, primitive.top), (100.0, 50.0));
        assert_eq!(primitive.base_size().width, 40.0);
        assert_eq!(primitive.base_size().height, 40.0);
        assert_eq!(primitive.name.as_deref(), Some("r"));
        assert_eq!(primitive.style, marker.options().style.neutral);
    }

    #[test]
    fn test_round_trip_keeps_geometry() {
        let projection = projection();
        let markers = [
            Marker::rect("a", MarkerOptions::default(), 0.25, 0.75, 0.1, 0.2, Unit::Percent),
            Marker::round("b", MarkerOptions::default(), 30.0, 40.0, 12.0, Unit::Pixel),
            Marker::poly(
                "c",
                MarkerOptions::default(),
                vec![Point::new(0.1, 0.1), Point::new(0.5, 0.2), Point::new(0.3, 0.6)],
                Unit::Percent,
            ),
        ];
        for marker in markers {
            let marker = marker.unwrap();
            let primitive = projection.to_primitive(&marker, 1.0);
            let back = projection
                .to_marker(&marker.template(), &primitive, None)
                .unwrap();
            assert_eq!(back.id(), marker.id());
            assert_eq!(back.kind(), marker.kind());
            match (back.shape(), marker.shape()) {
                (MarkerShape::Poly { dots: a }, MarkerShape::Poly { dots: b }) => {
                    for (p, q) in a.iter().zip(b) {
                        assert!(approx_eq(p.x, q.x) && approx_eq(p.y, q.y));
                    }
                }
                _ => {
                    let (c1, c2) = (back.center().unwrap(), marker.center().unwrap());
                    assert!(approx_eq(c1.x, c2.x) && approx_eq(c1.y, c2.y));
                    let (s1, s2) = (back.size().unwrap(), marker.size().unwrap());
                    assert!(approx_eq(s1.0, s2.0) && approx_eq(s1.1, s2.1));
                }
            }
        }
    }

    #[test]
    fn test_real_points_take_precedence() {
        let projection = projection();
        let marker = Marker::poly(
            "p",
            MarkerOptions::default(),
            vec![Point::new(10.0, 10.0), Point::new(20.0, 10.0), Point::new(20.0, 20.0)],
            Unit::Pixel,
        )
        .unwrap();
        let primitive = projection.to_primitive(&marker, 1.0);
        let real = [Point::new(1.0, 2.0), Point::new(3.0, 4.0), Point::new(5.0, 6.0)];
        let back = projection
            .to_marker(&marker.template(), &primitive, Some(&real))
            .unwrap();
        assert_eq!(back.dots(), Some(&real[..]));
    }

    #[test]
    fn test_percent_overshoot_is_clamped() {
        let projection = projection();
        let template = MarkerTemplate::new(
            "edge",
            MarkerKind::Poly,
            Unit::Percent,
            MarkerOptions::default(),
        );
        let primitive = Primitive::polygon(vec![
            Point::new(0.0, 0.0),
            Point::new(200.5, 0.0),
            Point::new(200.5, 100.5),
        ]);
        let marker = projection.to_marker(&template, &primitive, None).unwrap();
        assert!(marker.dots().unwrap().iter().all(|d| d.x <= 1.0 && d.y <= 1.0));
    }
}
