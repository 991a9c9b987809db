//! Drawable primitives and their transform math.
//!
//! A primitive is positioned by `left`/`top` relative to its [`Origin`],
//! scaled by `scale_x`/`scale_y` and rotated by `angle` degrees around its
//! center. Polygon vertices are stored in the polygon's own coordinate
//! frame; `path_offset` is the center of their bounding box, so a vertex
//! `p` is drawn at `transform_matrix() * (p - path_offset)`.

use crate::geometry::{bounds_of, point_in_polygon};
use crate::{Matrix, Point, Size, Style};

/// Which point of the primitive `left`/`top` refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Center,
    TopLeft,
}

/// What a primitive is used for. Guide roles are transient helpers that
/// are never part of a committed shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Content,
    GuideDot,
    GuideLine,
    GuideFill,
}

impl Role {
    pub fn is_guide(&self) -> bool {
        !matches!(self, Role::Content)
    }
}

/// Polygon vertex data.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    points: Vec<Point>,
    path_offset: Point,
    width: f64,
    height: f64,
}

impl PolygonShape {
    fn new(points: Vec<Point>) -> Self {
        let mut shape = Self {
            points,
            path_offset: Point::default(),
            width: 0.0,
            height: 0.0,
        };
        shape.update_dimensions();
        shape
    }

    /// Recompute the bounding box; returns its top-left corner.
    fn update_dimensions(&mut self) -> Point {
        let (min, max) = bounds_of(&self.points).unwrap_or_default();
        self.width = max.x - min.x;
        self.height = max.y - min.y;
        self.path_offset = Point::new(min.x + self.width / 2.0, min.y + self.height / 2.0);
        min
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn path_offset(&self) -> Point {
        self.path_offset
    }
}

/// Geometry of a primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect { width: f64, height: f64 },
    Circle { radius: f64 },
    Polygon(PolygonShape),
    Line { from: Point, to: Point },
}

/// Last validated placement of a primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavedState {
    pub left: f64,
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    pub shape: Shape,
    pub left: f64,
    pub top: f64,
    pub origin: Origin,
    pub scale_x: f64,
    pub scale_y: f64,
    pub angle: f64,
    pub stroke_width: f64,
    pub style: Style,
    pub role: Role,
    /// Caller-assigned name, used for marker ids.
    pub name: Option<String>,
    pub selectable: bool,
    /// Whether hit-testing considers this primitive at all.
    pub evented: bool,
    pub lock_movement: bool,
    saved: Option<SavedState>,
}

impl Primitive {
    fn with_shape(shape: Shape, left: f64, top: f64, origin: Origin) -> Self {
        Self {
            shape,
            left,
            top,
            origin,
            scale_x: 1.0,
            scale_y: 1.0,
            angle: 0.0,
            stroke_width: 1.0,
            style: Style::default(),
            role: Role::Content,
            name: None,
            selectable: true,
            evented: true,
            lock_movement: false,
            saved: None,
        }
    }

    pub fn rect(left: f64, top: f64, width: f64, height: f64, origin: Origin) -> Self {
        Self::with_shape(Shape::Rect { width, height }, left, top, origin)
    }

    /// Circle centered on `center`.
    pub fn circle(center: Point, radius: f64) -> Self {
        Self::with_shape(Shape::Circle { radius }, center.x, center.y, Origin::Center)
    }

    /// Polygon whose vertices are given in surface coordinates; it is placed
    /// so that they are drawn exactly where given.
    pub fn polygon(points: Vec<Point>) -> Self {
        let shape = PolygonShape::new(points);
        let (min, _) = bounds_of(&shape.points).unwrap_or_default();
        Self::with_shape(Shape::Polygon(shape), min.x, min.y, Origin::TopLeft)
    }

    pub fn line(from: Point, to: Point) -> Self {
        let mut line = Self::with_shape(Shape::Line { from, to }, 0.0, 0.0, Origin::Center);
        line.sync_line_position();
        line
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_stroke_width(mut self, stroke_width: f64) -> Self {
        self.stroke_width = stroke_width;
        self
    }

    /// Make the primitive purely decorative: not selectable and not hit.
    pub fn inert(mut self) -> Self {
        self.selectable = false;
        self.evented = false;
        self
    }

    // -------------------------------------------------------------------
    // Dimensions and placement
    // -------------------------------------------------------------------

    /// Size before scaling.
    pub fn base_size(&self) -> Size {
        match &self.shape {
            Shape::Rect { width, height } => Size::new(*width, *height),
            Shape::Circle { radius } => Size::new(radius * 2.0, radius * 2.0),
            Shape::Polygon(poly) => Size::new(poly.width, poly.height),
            Shape::Line { from, to } => Size::new((to.x - from.x).abs(), (to.y - from.y).abs()),
        }
    }

    /// Size after applying `scale_x`/`scale_y`.
    pub fn scaled_size(&self) -> Size {
        let base = self.base_size();
        Size::new(base.width * self.scale_x, base.height * self.scale_y)
    }

    pub fn center_point(&self) -> Point {
        let position = Point::new(self.left, self.top);
        match self.origin {
            Origin::Center => position,
            Origin::TopLeft => {
                let size = self.scaled_size();
                position
                    .offset(size.width / 2.0, size.height / 2.0)
                    .rotate_around(position, self.angle)
            }
        }
    }

    /// Move the primitive so its center lands on `center`.
    pub fn set_center_point(&mut self, center: Point) {
        let position = match self.origin {
            Origin::Center => center,
            Origin::TopLeft => {
                let size = self.scaled_size();
                center
                    .offset(-size.width / 2.0, -size.height / 2.0)
                    .rotate_around(center, self.angle)
            }
        };
        self.left = position.x;
        self.top = position.y;
    }

    /// Place the primitive so that the relative point (`origin_x`,
    /// `origin_y`) of its box, where `(0, 0)` is top-left and `(1, 1)`
    /// bottom-right, lands on `position`.
    pub fn set_position_by_origin(&mut self, position: Point, origin_x: f64, origin_y: f64) {
        let size = self.scaled_size();
        let center = position
            .offset(
                (0.5 - origin_x) * size.width,
                (0.5 - origin_y) * size.height,
            )
            .rotate_around(position, self.angle);
        self.set_center_point(center);
    }

    /// Object-to-surface transform: translate(center) · rotate · scale.
    pub fn transform_matrix(&self) -> Matrix {
        let center = self.center_point();
        Matrix::translate(center.x, center.y)
            .multiply(&Matrix::rotate(self.angle))
            .multiply(&Matrix::scale(self.scale_x, self.scale_y))
    }

    /// Express a surface point relative to the center, with the rotation
    /// removed but the scale kept.
    pub fn to_local_point(&self, point: Point) -> Point {
        let center = self.center_point();
        point.rotate_around(center, -self.angle) - center
    }

    // -------------------------------------------------------------------
    // Shape specific accessors
    // -------------------------------------------------------------------

    pub fn radius(&self) -> Option<f64> {
        match self.shape {
            Shape::Circle { radius } => Some(radius),
            _ => None,
        }
    }

    pub fn polygon_shape(&self) -> Option<&PolygonShape> {
        match &self.shape {
            Shape::Polygon(poly) => Some(poly),
            _ => None,
        }
    }

    /// Overwrite one polygon vertex (object frame). Dimensions are not
    /// updated until [`Primitive::update_polygon_dimensions`].
    pub fn set_polygon_point(&mut self, index: usize, point: Point) -> bool {
        match &mut self.shape {
            Shape::Polygon(poly) => match poly.points.get_mut(index) {
                Some(slot) => {
                    *slot = point;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Replace the polygon vertices and recompute dimensions.
    pub fn set_polygon_points(&mut self, points: Vec<Point>) {
        if let Shape::Polygon(poly) = &mut self.shape {
            poly.points = points;
            self.update_polygon_dimensions();
        }
    }

    /// Recompute the polygon's bounding box and path offset, and reset
    /// `left`/`top` to the untransformed bounding box.
    pub fn update_polygon_dimensions(&mut self) {
        let Shape::Polygon(poly) = &mut self.shape else {
            return;
        };
        let min = poly.update_dimensions();
        let position = match self.origin {
            Origin::TopLeft => min,
            Origin::Center => poly.path_offset,
        };
        self.left = position.x;
        self.top = position.y;
    }

    /// Polygon vertices with the current transform applied.
    pub fn absolute_points(&self) -> Vec<Point> {
        match &self.shape {
            Shape::Polygon(poly) => {
                let matrix = self.transform_matrix();
                poly.points
                    .iter()
                    .map(|p| matrix.transform_point(*p - poly.path_offset))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn set_line_end(&mut self, to: Point) {
        if let Shape::Line { to: end, .. } = &mut self.shape {
            *end = to;
            self.sync_line_position();
        }
    }

    fn sync_line_position(&mut self) {
        if let Shape::Line { from, to } = self.shape {
            self.left = (from.x + to.x) / 2.0;
            self.top = (from.y + to.y) / 2.0;
        }
    }

    // -------------------------------------------------------------------
    // Hit testing
    // -------------------------------------------------------------------

    pub fn contains_point(&self, point: Point) -> bool {
        match &self.shape {
            Shape::Polygon(_) => point_in_polygon(point, &self.absolute_points()),
            Shape::Line { .. } => false,
            Shape::Rect { width, height } => {
                self.local_unscaled(point).is_some_and(|local| {
                    local.x.abs() <= width / 2.0 && local.y.abs() <= height / 2.0
                })
            }
            Shape::Circle { radius } => self
                .local_unscaled(point)
                .is_some_and(|local| local.distance_to(&Point::default()) <= *radius),
        }
    }

    fn local_unscaled(&self, point: Point) -> Option<Point> {
        self.transform_matrix()
            .invert()
            .map(|inverse| inverse.transform_point(point))
    }

    // -------------------------------------------------------------------
    // Last-known-good state
    // -------------------------------------------------------------------

    pub fn save_state(&mut self) {
        self.saved = Some(SavedState {
            left: self.left,
            top: self.top,
            scale_x: self.scale_x,
            scale_y: self.scale_y,
        });
    }

    pub fn saved_state(&self) -> Option<SavedState> {
        self.saved
    }

    /// Put `left`/`top` back to the last saved state. Returns false when
    /// nothing was ever saved.
    pub fn restore_position(&mut self) -> bool {
        match self.saved {
            Some(state) => {
                self.left = state.left;
                self.top = state.top;
                true
            }
            None => false,
        }
    }
}
