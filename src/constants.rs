//! Global constants for annotate_osd

/// Default marker stroke width, in screen pixels
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Default radius of polygon vertex dots while drawing, in screen pixels
pub const DEFAULT_DOT_RADIUS: f64 = 5.0;

/// Margin added on every side when framing a marker as home, in image pixels
pub const DEFAULT_HOME_MARGIN: f64 = 50.0;

/// Smallest circle preview radius while drawing, in screen pixels
pub const DEFAULT_MIN_ROUND_RADIUS: f64 = 3.0;

/// Quiescence window for viewer zoom bursts, in milliseconds
pub const DEFAULT_ZOOM_DEBOUNCE_MS: u64 = 50;

/// Quiescence window for viewer resize bursts, in milliseconds
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 200;

/// Minimum number of vertices before a polygon can be closed
pub const MIN_POLYGON_VERTICES: usize = 3;

/// Guide polygon colours used while collecting polygon vertices
pub mod guide {
    pub const STROKE: &str = "#333333";
    pub const FILL: &str = "#cccccc";
    pub const OPACITY: f64 = 0.3;
}
