//! annotate_osd - image annotation markers over a deep-zoom viewer
//!
//! Places rectangle, circle and polygon markers on a drawing surface laid
//! over a pannable, zoomable image. Markers are kept inside the image,
//! drawn interactively, edited vertex by vertex, and reported to observers
//! through an event stream. A home region can be framed in the viewer.
//!
//! ```
//! use annotate_osd::{Annotator, AnnotatorConfig, Marker, MarkerOptions, Size, Unit, Viewport};
//!
//! let viewer = Viewport::new(Size::new(1000.0, 800.0), Size::new(500.0, 400.0));
//! let mut annotator = Annotator::new(viewer, AnnotatorConfig::default());
//! let marker = Marker::rect("cell-1", MarkerOptions::default(), 0.5, 0.5, 0.1, 0.1, Unit::Percent)?;
//! annotator.add_marker(marker)?;
//! assert!(annotator.has_marker("cell-1"));
//! # Ok::<(), annotate_osd::AnnotateError>(())
//! ```

mod annotator;
mod bounds;
mod config;
mod constants;
mod debounce;
mod draw;
mod edit;
mod error;
mod events;
mod geometry;
mod handlers;
mod home;
mod message;
mod model;
mod projection;
mod viewer;

#[cfg(test)]
mod tests;

pub use annotate_canvas::{Canvas, Matrix, ObjectId, Primitive, Role, Style};
pub use annotator::Annotator;
pub use bounds::{BoundsGuard, Frame};
pub use config::{AnnotatorConfig, ConfigError, LogLevel, CONFIG_VERSION};
pub use debounce::Debouncer;
pub use draw::{DrawRequest, DrawState, PolygonTrace};
pub use edit::{PolygonEditor, VertexControl};
pub use error::{AnnotateError, Result};
pub use events::{EventType, MarkerEvent, SubscriptionId, TransformAction};
pub use geometry::{ImageExtent, Point, Size, Unit};
pub use home::{Framing, Home};
pub use message::{PointerMessage, ViewerMessage};
pub use model::{
    Marker, MarkerKind, MarkerOptions, MarkerShape, MarkerTemplate, RegionOfInterest, StyleSet,
};
pub use projection::Projection;
pub use viewer::{Viewer, Viewport};
