//! Deep-zoom viewer interface and a headless viewport.
//!
//! Zoom follows the deep-zoom convention: a viewport zoom of 1.0 shows the
//! full image width across the container width. The "image zoom" is the
//! number of screen pixels per image pixel, which is also the zoom of the
//! drawing surface laid over the viewer.

use annotate_canvas::Matrix;

use crate::geometry::{Point, Size};

/// What the annotator needs from the pan/zoom viewer.
pub trait Viewer {
    /// Image dimensions in pixels.
    fn image_size(&self) -> Size;

    /// Container dimensions in screen pixels.
    fn container_size(&self) -> Size;

    /// Current viewport zoom.
    fn zoom(&self) -> f64;

    /// Image pixel shown at the center of the container.
    fn center(&self) -> Point;

    fn zoom_to(&mut self, zoom: f64);

    /// Pan so that `image_point` (image pixels) is centered.
    fn pan_to(&mut self, image_point: Point);

    /// Fit the whole image in the container.
    fn go_home(&mut self);

    /// Convert an image zoom (screen px per image px) to a viewport zoom.
    fn image_to_viewport_zoom(&self, image_zoom: f64) -> f64 {
        let image = self.image_size();
        let container = self.container_size();
        if container.width == 0.0 {
            return image_zoom;
        }
        image_zoom * image.width / container.width
    }

    /// Convert a viewport zoom to an image zoom.
    fn viewport_to_image_zoom(&self, zoom: f64) -> f64 {
        let image = self.image_size();
        let container = self.container_size();
        if image.width == 0.0 {
            return zoom;
        }
        zoom * container.width / image.width
    }

    /// Screen pixels per image pixel at the current zoom.
    fn image_zoom(&self) -> f64 {
        self.viewport_to_image_zoom(self.zoom())
    }

    /// Image pixels to container (screen) coordinates.
    fn viewport_transform(&self) -> Matrix {
        let container = self.container_size();
        let center = self.center();
        let zoom = self.image_zoom();
        Matrix::translate(container.width / 2.0, container.height / 2.0)
            .multiply(&Matrix::scale(zoom, zoom))
            .multiply(&Matrix::translate(-center.x, -center.y))
    }

    fn image_to_screen(&self, point: Point) -> Point {
        self.viewport_transform().transform_point(point)
    }

    fn screen_to_image(&self, point: Point) -> Option<Point> {
        self.viewport_transform()
            .invert()
            .map(|inverse| inverse.transform_point(point))
    }
}

/// Headless viewer state: image and container sizes, zoom and center.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    image: Size,
    container: Size,
    zoom: f64,
    center: Point,
}

impl Viewport {
    /// Open an image in a container; the view starts fitted (home).
    pub fn new(image: Size, container: Size) -> Self {
        let mut viewport = Self {
            image,
            container,
            zoom: 1.0,
            center: Point::default(),
        };
        viewport.go_home();
        viewport
    }

    /// Change the container size; zoom and center are kept.
    pub fn resize(&mut self, container: Size) {
        log::debug!(
            "Viewport: resize {}x{} -> {}x{}",
            self.container.width,
            self.container.height,
            container.width,
            container.height
        );
        self.container = container;
    }

    /// Zoom by `factor` around the current center.
    pub fn zoom_by(&mut self, factor: f64) {
        self.zoom_to(self.zoom * factor);
    }
}

impl Viewer for Viewport {
    fn image_size(&self) -> Size {
        self.image
    }

    fn container_size(&self) -> Size {
        self.container
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn center(&self) -> Point {
        self.center
    }

    fn zoom_to(&mut self, zoom: f64) {
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
        } else {
            log::warn!("Viewport: ignoring invalid zoom {}", zoom);
        }
    }

    fn pan_to(&mut self, image_point: Point) {
        self.center = image_point;
    }

    fn go_home(&mut self) {
        let fit_w = self.container.width / self.image.width;
        let fit_h = self.container.height / self.image.height;
        let image_zoom = fit_w.min(fit_h);
        if image_zoom.is_finite() && image_zoom > 0.0 {
            self.zoom = self.image_to_viewport_zoom(image_zoom);
        }
        self.center = Point::new(self.image.width / 2.0, self.image.height / 2.0);
    }
}
