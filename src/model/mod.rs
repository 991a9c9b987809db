//! Data models for annotate_osd.

mod marker;
mod roi;

pub use marker::{
    validate_values, Marker, MarkerKind, MarkerOptions, MarkerShape, MarkerTemplate, StyleSet,
};
pub use roi::RegionOfInterest;
