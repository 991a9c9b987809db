//! Input handlers for the annotator.
//!
//! Pointer input is routed to the draw session while drawing and to the
//! native hover/selection behaviour otherwise. Transform gestures (move,
//! scale, vertex drag) go through the bounds guard. Viewer zoom and resize
//! notifications are debounced and handled from `tick`.

use annotate_canvas::{ObjectId, Role, Shape, Style};
use web_time::Instant;

use crate::annotator::{Annotator, PlacedMarker};
use crate::draw::{CommittedDraw, DrawContext};
use crate::error::{AnnotateError, Result};
use crate::events::{EventType, TransformAction};
use crate::geometry::Point;
use crate::message::{PointerMessage, ViewerMessage};
use crate::model::StyleSet;
use crate::viewer::Viewer;

impl<V: Viewer> Annotator<V> {
    // =========================================================================
    // Pointer
    // =========================================================================

    pub fn handle_pointer(&mut self, msg: PointerMessage) {
        match msg {
            PointerMessage::Down(pointer) => self.on_mouse_down(pointer),
            PointerMessage::Move(pointer) => self.on_mouse_move(pointer),
            PointerMessage::Up(pointer) => self.on_mouse_up(pointer),
        }
    }

    pub fn on_mouse_down(&mut self, pointer: Point) {
        if self.draw.is_drawing() {
            let target = self.canvas.hit_test(pointer);
            let ctx = DrawContext {
                extent: self.projection.extent(),
                zoom: self.canvas.zoom(),
                config: &self.config,
            };
            let committed = self
                .draw
                .pointer_down(&mut self.canvas, &ctx, pointer, target);
            if let Some(done) = committed {
                self.commit_draw(done);
            }
            return;
        }

        let target = self
            .marker_at(pointer)
            .filter(|object| self.canvas.get(*object).is_some_and(|p| p.selectable));
        self.select(target);
    }

    pub fn on_mouse_move(&mut self, pointer: Point) {
        if self.draw.is_drawing() {
            let ctx = DrawContext {
                extent: self.projection.extent(),
                zoom: self.canvas.zoom(),
                config: &self.config,
            };
            self.draw.pointer_move(&mut self.canvas, &ctx, pointer);
            return;
        }

        let target = self.marker_at(pointer);
        if target == self.hovered {
            return;
        }
        if let Some(previous) = self.hovered.take() {
            if !self.is_selected(previous) {
                self.apply_style(previous, |set| &set.neutral);
            }
            self.emit_for(EventType::MouseOut, None, previous);
        }
        if let Some(object) = target {
            if !self.is_selected(object) {
                self.apply_style(object, |set| &set.hover);
            }
            self.emit_for(EventType::MouseOver, None, object);
        }
        self.hovered = target;
    }

    pub fn on_mouse_up(&mut self, _pointer: Point) {
        if let Some(done) = self.draw.pointer_up(&mut self.canvas) {
            self.commit_draw(done);
        }
    }

    fn commit_draw(&mut self, done: CommittedDraw) {
        let Some(primitive) = self.canvas.get(done.object) else {
            log::warn!("Annotator: committed object {} is missing", done.object);
            return;
        };
        let id = done.template.id.clone();
        let placed = PlacedMarker::new(done.object, done.template, primitive);
        self.placed.insert(id, placed);
        self.emit_for(EventType::CreateMarker, None, done.object);
    }

    /// Topmost placed marker under the pointer.
    fn marker_at(&self, pointer: Point) -> Option<ObjectId> {
        self.canvas
            .hit_test(pointer)
            .filter(|object| self.placed_by_object(*object).is_some())
    }

    fn is_selected(&self, object: ObjectId) -> bool {
        self.canvas.active_object() == Some(object)
    }

    fn select(&mut self, target: Option<ObjectId>) {
        let current = self.canvas.active_object();
        if target == current {
            return;
        }

        match (current, target) {
            (None, Some(object)) => {
                self.canvas.set_active_object(Some(object));
                self.apply_style(object, |set| &set.active);
                self.emit_for(EventType::SelectionCreated, None, object);
            }
            (Some(previous), Some(object)) => {
                self.apply_style(previous, |set| &set.neutral);
                self.emit_for(EventType::SelectionDeselected, None, previous);
                self.canvas.set_active_object(Some(object));
                self.apply_style(object, |set| &set.active);
                self.emit_for(EventType::SelectionSelected, None, object);
            }
            (Some(previous), None) => {
                self.apply_style(previous, |set| &set.neutral);
                self.emit_for(EventType::SelectionCleared, None, previous);
                self.canvas.discard_active_object();
            }
            (None, None) => {}
        }
    }

    /// Paint a placed marker with one of its own styles.
    fn apply_style(&mut self, object: ObjectId, pick: fn(&StyleSet) -> &Style) {
        let Some(style) = self
            .placed_by_object(object)
            .map(|placed| pick(&placed.template.options.style).clone())
        else {
            return;
        };
        if let Some(primitive) = self.canvas.get_mut(object) {
            primitive.style = style;
        }
    }

    // =========================================================================
    // Transforms
    // =========================================================================

    /// Whether a transform may start; a transform attempted while drawing
    /// drops the selection instead.
    fn transform_allowed(&mut self) -> bool {
        if self.draw.is_drawing() {
            self.canvas.discard_active_object();
            return false;
        }
        true
    }

    /// Move a marker so its center lands on `center` (image pixels).
    ///
    /// Returns whether the move was kept. Out-of-image candidates put the
    /// marker back at its last good position.
    pub fn move_object(&mut self, id: &str, center: Point) -> bool {
        if !self.transform_allowed() {
            return false;
        }
        let guard = self.guard();
        let Some(placed) = self.placed.get_mut(id) else {
            return false;
        };
        let Some(primitive) = self.canvas.get_mut(placed.object) else {
            return false;
        };
        if primitive.lock_movement || !placed.template.options.draggable {
            log::trace!("Annotator: '{}' is locked", id);
            return false;
        }

        primitive.set_center_point(center);
        let kept = guard.guard_move(primitive);
        if kept {
            if let Some(editor) = placed.editor.as_mut() {
                editor.refresh_real_points(primitive);
            }
        }
        kept
    }

    /// Apply live scale factors around the marker's center and emit
    /// `object:scaling`. Returns whether the new size was accepted.
    pub fn scale_object(
        &mut self,
        id: &str,
        scale_x: f64,
        scale_y: f64,
        action: TransformAction,
    ) -> bool {
        if !self.transform_allowed() {
            return false;
        }
        let guard = self.guard();
        let Some(placed) = self.placed.get_mut(id) else {
            return false;
        };
        let object = placed.object;
        let Some(primitive) = self.canvas.get_mut(object) else {
            return false;
        };

        let center = primitive.center_point();
        primitive.scale_x = scale_x;
        primitive.scale_y = scale_y;
        primitive.set_center_point(center);
        let accepted = guard.guard_scale(primitive) && guard.guard_move(primitive);
        if accepted {
            if let Some(editor) = placed.editor.as_mut() {
                editor.refresh_real_points(primitive);
            }
        }
        log::trace!(
            "Annotator: scale '{}' by ({:.3}, {:.3}) {}",
            id,
            scale_x,
            scale_y,
            if accepted { "accepted" } else { "rejected" }
        );

        self.apply_style(object, |set| &set.active);
        self.emit_for(EventType::ObjectScaling, Some(action), object);
        accepted
    }

    /// End of a transform gesture: emit `object:modified`.
    pub fn finish_transform(&mut self, id: &str, action: TransformAction) -> bool {
        if self.draw.is_drawing() {
            return false;
        }
        let Some(placed) = self.placed.get_mut(id) else {
            return false;
        };
        let object = placed.object;
        if let (Some(editor), Some(primitive)) = (placed.editor.as_mut(), self.canvas.get(object))
        {
            editor.refresh_real_points(primitive);
        }
        self.emit_for(EventType::ObjectModified, Some(action), object);
        true
    }

    /// Drag vertex `index` of polygon `id` to `pointer` (image pixels).
    ///
    /// `Ok(false)` when the drag is refused: off the image, not a polygon,
    /// no such vertex, or a draw session is active.
    pub fn drag_vertex(&mut self, id: &str, index: usize, pointer: Point) -> Result<bool> {
        if !self.transform_allowed() {
            return Ok(false);
        }
        let extent = self.extent();
        let placed = self
            .placed
            .get_mut(id)
            .ok_or_else(|| AnnotateError::not_found(id))?;
        let Some(editor) = placed.editor.as_mut() else {
            return Ok(false);
        };
        let Some(primitive) = self.canvas.get_mut(placed.object) else {
            return Err(AnnotateError::not_found(id));
        };

        let moved = editor.drag_vertex(primitive, index, pointer, &extent);
        if moved {
            primitive.save_state();
            editor.refresh_real_points(primitive);
        }
        Ok(moved)
    }

    /// Screen positions of a polygon's vertex controls.
    pub fn control_positions(&self, id: &str) -> Vec<Point> {
        let Some(placed) = self.placed.get(id) else {
            return Vec::new();
        };
        match (placed.editor.as_ref(), self.canvas.get(placed.object)) {
            (Some(editor), Some(primitive)) => {
                editor.control_positions(primitive, &self.canvas.viewport_transform())
            }
            _ => Vec::new(),
        }
    }

    // =========================================================================
    // Viewer
    // =========================================================================

    pub fn handle_viewer(&mut self, msg: ViewerMessage) {
        match msg {
            ViewerMessage::Zoom => self.on_viewer_zoom(),
            ViewerMessage::Resize => self.on_viewer_resize(),
        }
    }

    /// The viewer zoomed. The overlay follows immediately; stroke widths
    /// are rescaled once the gesture settles.
    pub fn on_viewer_zoom(&mut self) {
        self.on_viewer_zoom_at(Instant::now());
    }

    pub fn on_viewer_zoom_at(&mut self, now: Instant) {
        self.canvas
            .set_viewport_transform(self.viewer.viewport_transform());
        self.zoom_debounce.trigger_at(now);
    }

    /// The container was resized. The view goes home once resizing settles.
    pub fn on_viewer_resize(&mut self) {
        self.on_viewer_resize_at(Instant::now());
    }

    pub fn on_viewer_resize_at(&mut self, now: Instant) {
        self.resize_debounce.trigger_at(now);
    }

    /// Run settled viewer work. Returns whether anything ran.
    pub fn tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        let mut ran = false;
        if self.zoom_debounce.poll_at(now) {
            self.sync_viewport();
            self.reset_stroke_widths();
            ran = true;
        }
        if self.resize_debounce.poll_at(now) {
            log::debug!("Annotator: resize settled, going home");
            self.go_home();
            ran = true;
        }
        ran
    }

    /// Viewer panning is suspended while drawing.
    pub fn allows_viewer_drag(&self) -> bool {
        !self.draw.is_drawing()
    }

    /// Copy the viewer's zoom and transform onto the surface.
    pub(crate) fn sync_viewport(&mut self) {
        self.canvas.set_zoom(self.viewer.image_zoom());
        self.canvas
            .set_viewport_transform(self.viewer.viewport_transform());
    }

    /// Keep strokes and vertex dots a constant size on screen.
    pub(crate) fn reset_stroke_widths(&mut self) {
        let zoom = self.canvas.zoom();
        if !(zoom.is_finite() && zoom > 0.0) {
            log::warn!("Annotator: stroke reset skipped at zoom {}", zoom);
            return;
        }
        let stroke_width = self.config.stroke_width / zoom;
        let dot_radius = self.config.dot_radius / zoom;

        for primitive in self.canvas.iter_mut() {
            match primitive.role {
                Role::Content | Role::GuideLine => primitive.stroke_width = stroke_width,
                Role::GuideDot => {
                    if let Shape::Circle { radius } = &mut primitive.shape {
                        *radius = dot_radius;
                    }
                }
                Role::GuideFill => {}
            }
        }
        log::debug!(
            "Annotator: strokes rescaled to {:.3} px at zoom {:.4}",
            stroke_width,
            zoom
        );
    }
}
