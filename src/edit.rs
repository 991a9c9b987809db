//! Per-vertex edit controls for committed polygons.
//!
//! Each vertex gets a control anchored on its cyclic predecessor. Dragging
//! a control rewrites that vertex in the polygon's own frame, then moves
//! the polygon so the anchor vertex stays where it was on screen: a vertex
//! change alters the bounding box, which would otherwise shift the whole
//! shape.

use annotate_canvas::{Matrix, Primitive};

use crate::geometry::{ImageExtent, Point};

/// Edit handle for one polygon vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexControl {
    pub index: usize,
    /// Vertex kept fixed while this one is dragged.
    pub anchor: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonEditor {
    controls: Vec<VertexControl>,
    /// Absolute vertices as of the last finished edit.
    real_points: Option<Vec<Point>>,
}

impl PolygonEditor {
    /// Create one control per vertex of `polygon`. Non-polygons get none.
    pub fn attach(polygon: &Primitive) -> Self {
        let count = polygon.polygon_shape().map_or(0, |poly| poly.points().len());
        let controls = (0..count)
            .map(|index| VertexControl {
                index,
                anchor: if index > 0 { index - 1 } else { count - 1 },
            })
            .collect();
        log::debug!("PolygonEditor: attached {} control(s)", count);
        Self {
            controls,
            real_points: None,
        }
    }

    pub fn controls(&self) -> &[VertexControl] {
        &self.controls
    }

    pub fn real_points(&self) -> Option<&[Point]> {
        self.real_points.as_deref()
    }

    /// Screen position of a control: the vertex offset from the path center,
    /// through the polygon transform, then through `viewport`.
    pub fn control_position(
        &self,
        polygon: &Primitive,
        index: usize,
        viewport: &Matrix,
    ) -> Option<Point> {
        let poly = polygon.polygon_shape()?;
        let vertex = *poly.points().get(index)?;
        let matrix = viewport.multiply(&polygon.transform_matrix());
        Some(matrix.transform_point(vertex - poly.path_offset()))
    }

    pub fn control_positions(&self, polygon: &Primitive, viewport: &Matrix) -> Vec<Point> {
        self.controls
            .iter()
            .filter_map(|control| self.control_position(polygon, control.index, viewport))
            .collect()
    }

    /// Move vertex `index` so that it is drawn at `pointer` (image pixels).
    ///
    /// Returns false without touching the polygon when the pointer is off
    /// the image or the index has no control.
    pub fn drag_vertex(
        &self,
        polygon: &mut Primitive,
        index: usize,
        pointer: Point,
        extent: &ImageExtent,
    ) -> bool {
        if !extent.contains(pointer) {
            log::trace!(
                "PolygonEditor: vertex {} drag to ({:.1}, {:.1}) is off the image",
                index,
                pointer.x,
                pointer.y
            );
            return false;
        }
        let Some(control) = self.controls.get(index).copied() else {
            return false;
        };
        let Some(poly) = polygon.polygon_shape() else {
            return false;
        };
        let Some(anchor_vertex) = poly.points().get(control.anchor).copied() else {
            return false;
        };

        // Where the anchor is drawn before the edit
        let anchor_absolute = polygon
            .transform_matrix()
            .transform_point(anchor_vertex - poly.path_offset());

        // Pointer in the polygon's own frame
        let local = polygon.to_local_point(pointer);
        let base = polygon.base_size();
        let size = polygon.scaled_size();
        let path_offset = poly.path_offset();
        let vertex = Point::new(
            local.x * size_ratio(base.width, size.width) + path_offset.x,
            local.y * size_ratio(base.height, size.height) + path_offset.y,
        );
        polygon.set_polygon_point(control.index, vertex);
        polygon.update_polygon_dimensions();

        // Re-anchor on the predecessor
        let Some(poly) = polygon.polygon_shape() else {
            return false;
        };
        let base = polygon.base_size();
        let relative = anchor_vertex - poly.path_offset();
        let origin_x = fraction_of(relative.x, base.width) + 0.5;
        let origin_y = fraction_of(relative.y, base.height) + 0.5;
        polygon.set_position_by_origin(anchor_absolute, origin_x, origin_y);

        log::trace!(
            "PolygonEditor: vertex {} -> ({:.2}, {:.2}), anchored on {}",
            control.index,
            vertex.x,
            vertex.y,
            control.anchor
        );
        true
    }

    /// Cache the absolute vertices after an edit is finished.
    pub fn refresh_real_points(&mut self, polygon: &Primitive) {
        self.real_points = Some(polygon.absolute_points());
    }
}

/// Base-to-transformed size ratio; a flat axis keeps its scale.
fn size_ratio(base: f64, transformed: f64) -> f64 {
    if transformed == 0.0 {
        1.0
    } else {
        base / transformed
    }
}

/// Offset as a fraction of the base size; a flat axis has no offset.
fn fraction_of(offset: f64, base: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        offset / base
    }
}
