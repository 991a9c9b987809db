//! annotate_canvas - an in-memory 2D drawing surface
//!
//! Stores rect, circle, polygon and line primitives in z-order, computes
//! their transforms, hit-tests pointer positions and remembers the last
//! validated placement of each primitive. Rendering is left to the host.

mod canvas;
mod geometry;
mod matrix;
mod primitive;
mod style;

pub use canvas::{Canvas, ObjectId};
pub use geometry::{bounds_of, point_in_polygon, Point, Size};
pub use matrix::Matrix;
pub use primitive::{Origin, PolygonShape, Primitive, Role, SavedState, Shape};
pub use style::Style;
