//! 2D affine transform matrices.
//!
//! Stored as `[a, b, c, d, e, f]`, mapping `(x, y)` to
//! `(a*x + c*y + e, b*x + d*y + f)`.

use crate::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix(pub [f64; 6]);

impl Matrix {
    pub const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    pub fn translate(x: f64, y: f64) -> Self {
        Matrix([1.0, 0.0, 0.0, 1.0, x, y])
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Matrix([sx, 0.0, 0.0, sy, 0.0, 0.0])
    }

    /// Rotation by `degrees`, clockwise on a y-down surface.
    pub fn rotate(degrees: f64) -> Self {
        if degrees == 0.0 {
            return Self::IDENTITY;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        Matrix([cos, sin, -sin, cos, 0.0, 0.0])
    }

    /// `self · other`: apply `other` first, then `self`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a1 * a2 + c1 * b2,
            b1 * a2 + d1 * b2,
            a1 * c2 + c1 * d2,
            b1 * c2 + d1 * d2,
            a1 * e2 + c1 * f2 + e1,
            b1 * e2 + d1 * f2 + f1,
        ])
    }

    /// Inverse transform, or `None` for a singular matrix.
    pub fn invert(&self) -> Option<Matrix> {
        let [a, b, c, d, e, f] = self.0;
        let det = a * d - b * c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(Matrix([
            d / det,
            -b / det,
            -c / det,
            a / det,
            (c * f - d * e) / det,
            (b * e - a * f) / det,
        ]))
    }

    pub fn transform_point(&self, p: Point) -> Point {
        let [a, b, c, d, e, f] = self.0;
        Point::new(a * p.x + c * p.y + e, b * p.x + d * p.y + f)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn approx_eq(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
    }

    #[test]
    fn test_translate_then_scale_order() {
        // scale first, then translate
        let m = Matrix::translate(10.0, 20.0).multiply(&Matrix::scale(2.0, 3.0));
        let p = m.transform_point(Point::new(1.0, 1.0));
        assert!(approx_eq(p, Point::new(12.0, 23.0)));
    }

    #[test]
    fn test_invert_roundtrip() {
        let m = Matrix::translate(5.0, -3.0)
            .multiply(&Matrix::rotate(30.0))
            .multiply(&Matrix::scale(2.0, 0.5));
        let inv = m.invert().unwrap();
        let p = Point::new(7.0, 11.0);
        assert!(approx_eq(inv.transform_point(m.transform_point(p)), p));
    }

    #[test]
    fn test_singular_matrix_has_no_inverse() {
        assert!(Matrix::scale(0.0, 1.0).invert().is_none());
    }

    #[test]
    fn test_rotate_matches_point_rotation() {
        let p = Point::new(3.0, 4.0);
        let rotated = Matrix::rotate(45.0).transform_point(p);
        assert!(approx_eq(rotated, p.rotate_around(Point::default(), 45.0)));
    }
}
