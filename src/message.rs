//! Input messages dispatched to the annotator.
//!
//! Hosts translate their native pointer and viewer callbacks into these
//! and feed them through [`Annotator::handle_pointer`] and
//! [`Annotator::handle_viewer`].
//!
//! [`Annotator::handle_pointer`]: crate::Annotator::handle_pointer
//! [`Annotator::handle_viewer`]: crate::Annotator::handle_viewer

use crate::geometry::Point;

/// Pointer input, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerMessage {
    Down(Point),
    Move(Point),
    Up(Point),
}

/// Viewer notifications.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerMessage {
    /// The viewer zoomed (one step of a possibly continuous gesture).
    Zoom,
    /// The container changed size.
    Resize,
}
