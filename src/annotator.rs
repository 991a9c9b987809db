//! The annotator: markers over a pannable, zoomable image.
//!
//! [`Annotator`] owns the drawing surface laid over a [`Viewer`], the map
//! from marker id to surface object, the draw session, the home region and
//! the event bus. Marker, draw-mode and home operations live here; pointer,
//! transform and viewer event handlers live in `handlers`.

use std::collections::HashMap;

use annotate_canvas::{Canvas, ObjectId, Primitive, Role};

use crate::bounds::BoundsGuard;
use crate::config::AnnotatorConfig;
use crate::debounce::Debouncer;
use crate::draw::{DrawRequest, DrawSession, DrawState};
use crate::edit::PolygonEditor;
use crate::error::{AnnotateError, Result};
use crate::events::{EventBus, EventType, MarkerEvent, SubscriptionId, TransformAction};
use crate::geometry::{ImageExtent, Unit};
use crate::home::{Framing, Home};
use crate::model::{Marker, MarkerKind, MarkerTemplate, RegionOfInterest};
use crate::projection::Projection;
use crate::viewer::Viewer;

/// A marker currently on the surface.
#[derive(Debug, Clone)]
pub(crate) struct PlacedMarker {
    pub(crate) object: ObjectId,
    pub(crate) template: MarkerTemplate,
    /// Vertex controls, for polygons only.
    pub(crate) editor: Option<PolygonEditor>,
}

impl PlacedMarker {
    pub(crate) fn new(object: ObjectId, template: MarkerTemplate, primitive: &Primitive) -> Self {
        let editor =
            (template.kind == MarkerKind::Poly).then(|| PolygonEditor::attach(primitive));
        Self {
            object,
            template,
            editor,
        }
    }
}

#[derive(Debug)]
pub struct Annotator<V: Viewer> {
    pub(crate) viewer: V,
    pub(crate) config: AnnotatorConfig,
    pub(crate) canvas: Canvas,
    pub(crate) projection: Projection,
    /// Marker id to surface object.
    pub(crate) placed: HashMap<String, PlacedMarker>,
    pub(crate) draw: DrawSession,
    pub(crate) home: Option<Home>,
    pub(crate) events: EventBus,
    pub(crate) hovered: Option<ObjectId>,
    pub(crate) zoom_debounce: Debouncer,
    pub(crate) resize_debounce: Debouncer,
}

impl<V: Viewer> Annotator<V> {
    /// Lay a surface over an opened viewer.
    pub fn new(viewer: V, config: AnnotatorConfig) -> Self {
        let extent = ImageExtent::from(viewer.image_size());
        let mut annotator = Self {
            zoom_debounce: Debouncer::new(config.zoom_debounce()),
            resize_debounce: Debouncer::new(config.resize_debounce()),
            viewer,
            config,
            canvas: Canvas::new(),
            projection: Projection::new(extent),
            placed: HashMap::new(),
            draw: DrawSession::new(),
            home: None,
            events: EventBus::new(),
            hovered: None,
        };
        annotator.sync_viewport();
        log::info!(
            "Annotator: opened {}x{} image, zoom {:.4}",
            extent.width,
            extent.height,
            annotator.canvas.zoom()
        );
        annotator
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    /// Mutable viewer access; report zoom and resize through
    /// [`Annotator::on_viewer_zoom`] and [`Annotator::on_viewer_resize`].
    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn config(&self) -> &AnnotatorConfig {
        &self.config
    }

    pub fn extent(&self) -> ImageExtent {
        self.projection.extent()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&MarkerEvent) + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Marker stroke width in image pixels at the current zoom.
    pub(crate) fn stroke_width(&self) -> f64 {
        self.config.stroke_width / self.canvas.zoom()
    }

    pub(crate) fn guard(&self) -> BoundsGuard {
        BoundsGuard::new(self.extent(), self.config.stroke_width, self.canvas.zoom())
    }

    // =========================================================================
    // Markers
    // =========================================================================

    pub fn has_marker(&self, id: &str) -> bool {
        self.placed.contains_key(id)
    }

    /// Current state of a placed marker.
    pub fn marker(&self, id: &str) -> Option<Marker> {
        let placed = self.placed.get(id)?;
        self.project(placed)
    }

    /// Every placed marker, bottom of the stack first.
    pub fn markers(&self) -> Vec<Marker> {
        self.canvas
            .iter()
            .filter_map(|(object, _)| self.placed_by_object(object))
            .filter_map(|placed| self.project(placed))
            .collect()
    }

    pub fn marker_count(&self) -> usize {
        self.placed.len()
    }

    pub fn selected_marker_id(&self) -> Option<&str> {
        let active = self.canvas.active_object()?;
        self.placed_by_object(active)
            .map(|placed| placed.template.id.as_str())
    }

    /// Place a marker on the surface.
    ///
    /// Fails if the id is taken (placed or being drawn) or if the marker
    /// does not fit on the image.
    pub fn add_marker(&mut self, marker: Marker) -> Result<()> {
        let id = marker.id();
        if self.has_marker(id) || self.draw.pending_id() == Some(id) {
            return Err(AnnotateError::duplicate(id));
        }

        let mut primitive = self.projection.to_primitive(&marker, self.stroke_width());
        if !self.guard().fits_primitive(&primitive) {
            return Err(AnnotateError::out_of_bounds(id));
        }
        primitive.save_state();
        primitive.lock_movement = self.draw.is_drawing();

        let object = self.canvas.add(primitive);
        if let Some(primitive) = self.canvas.get(object) {
            let placed = PlacedMarker::new(object, marker.template(), primitive);
            self.placed.insert(id.to_string(), placed);
        }
        if self.draw.is_drawing() {
            self.raise_guide_dots();
        }

        log::info!(
            "Annotator: added {} '{}' as {}",
            marker.kind().name(),
            id,
            object
        );
        Ok(())
    }

    /// Remove a marker, announcing it first. Unknown ids are ignored.
    pub fn delete_marker(&mut self, id: &str) -> bool {
        let Some(placed) = self.placed.get(id) else {
            log::debug!("Annotator: delete of unknown marker '{}' ignored", id);
            return false;
        };
        let object = placed.object;
        self.emit_for(EventType::DeleteMarker, None, object);

        self.canvas.remove(object);
        self.placed.remove(id);
        if self.hovered == Some(object) {
            self.hovered = None;
        }
        log::info!("Annotator: deleted marker '{}'", id);
        true
    }

    /// Remove everything from the surface, including a draw in progress.
    pub fn clear(&mut self) {
        self.events.emit(MarkerEvent::new(EventType::ClearCanvas, None));
        self.canvas.clear();
        self.placed.clear();
        self.draw.reset();
        self.hovered = None;
        log::info!("Annotator: cleared");
    }

    /// Tear down the surface and give the viewer back.
    pub fn destroy(mut self) -> V {
        self.clear();
        self.events.clear();
        self.zoom_debounce.cancel();
        self.resize_debounce.cancel();
        log::info!("Annotator: destroyed");
        self.viewer
    }

    // =========================================================================
    // Draw mode
    // =========================================================================

    /// Start drawing a new marker. Placed objects are locked until the
    /// draw is committed or cancelled.
    pub fn set_draw_mode(&mut self, request: DrawRequest) -> Result<()> {
        let template = request.into_template()?;
        if self.has_marker(&template.id) {
            return Err(AnnotateError::duplicate(template.id));
        }
        self.draw.arm(&mut self.canvas, template)
    }

    pub fn cancel_draw_mode(&mut self) {
        self.draw.cancel(&mut self.canvas);
    }

    pub fn is_drawing(&self) -> bool {
        self.draw.is_drawing()
    }

    /// Id of the marker being drawn.
    pub fn pending_marker_id(&self) -> Option<&str> {
        self.draw.pending_id()
    }

    pub fn draw_state(&self) -> &DrawState {
        self.draw.state()
    }

    // =========================================================================
    // Home
    // =========================================================================

    pub fn home(&self) -> Option<&Home> {
        self.home.as_ref()
    }

    /// The home region expressed in `unit`.
    pub fn home_region(&self, unit: Unit) -> Option<RegionOfInterest> {
        let extent = self.extent();
        self.home.map(|home| home.to_roi(unit, &extent))
    }

    /// Frame the home region, or the whole image when none is set.
    pub fn go_home(&mut self) {
        let framing = Framing::for_home(
            self.home.as_ref(),
            self.viewer.container_size(),
            &self.extent(),
        );
        log::debug!("Annotator: go home {:?}", framing);
        framing.apply(&mut self.viewer);
        self.sync_viewport();
        self.reset_stroke_widths();
    }

    pub fn set_home(&mut self, roi: &RegionOfInterest, go_home: bool) -> Result<()> {
        let home = Home::from_roi(roi, &self.extent())?;
        log::info!(
            "Annotator: home set at ({:.4}, {:.4}), {:.1}x{:.1} px",
            home.point.x,
            home.point.y,
            home.width,
            home.height
        );
        self.home = Some(home);
        if go_home {
            self.go_home();
        }
        Ok(())
    }

    /// Use a placed marker's bounding box, plus the configured margin, as
    /// home.
    pub fn set_home_from_marker(&mut self, id: &str, go_home: bool) -> Result<()> {
        let placed = self
            .placed
            .get(id)
            .ok_or_else(|| AnnotateError::not_found(id))?;
        let primitive = self
            .canvas
            .get(placed.object)
            .ok_or_else(|| AnnotateError::not_found(id))?;

        let home = Home::around(
            primitive.center_point(),
            primitive.scaled_size(),
            self.config.home_margin,
            &self.extent(),
        );
        log::info!("Annotator: home set on marker '{}'", id);
        self.home = Some(home);
        if go_home {
            self.go_home();
        }
        Ok(())
    }

    pub fn unset_home(&mut self, go_home: bool) {
        self.home = None;
        if go_home {
            self.go_home();
        }
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    pub(crate) fn placed_by_object(&self, object: ObjectId) -> Option<&PlacedMarker> {
        let primitive = self.canvas.get(object)?;
        if primitive.role != Role::Content {
            return None;
        }
        let placed = self.placed.get(primitive.name.as_deref()?)?;
        (placed.object == object).then_some(placed)
    }

    /// Marker projection of a placed object; failures are logged.
    pub(crate) fn project(&self, placed: &PlacedMarker) -> Option<Marker> {
        let primitive = self.canvas.get(placed.object)?;
        let real_points = placed.editor.as_ref().and_then(PolygonEditor::real_points);
        match self
            .projection
            .to_marker(&placed.template, primitive, real_points)
        {
            Ok(marker) => Some(marker),
            Err(err) => {
                log::warn!(
                    "Annotator: could not project '{}': {}",
                    placed.template.id,
                    err
                );
                None
            }
        }
    }

    /// Emit an event carrying the projection of `object`. Nothing is
    /// emitted when the object is not a placed marker.
    pub(crate) fn emit_for(
        &mut self,
        kind: EventType,
        action: Option<TransformAction>,
        object: ObjectId,
    ) {
        let Some(marker) = self
            .placed_by_object(object)
            .and_then(|placed| self.project(placed))
        else {
            log::warn!("Annotator: {:?} for {} skipped", kind, object);
            return;
        };
        let mut event = MarkerEvent::new(kind, Some(marker));
        event.action = action;
        self.events.emit(event);
    }

    /// Keep polygon vertex dots above everything else while drawing.
    pub(crate) fn raise_guide_dots(&mut self) {
        let dots: Vec<ObjectId> = self
            .canvas
            .iter()
            .filter(|(_, p)| p.role == Role::GuideDot)
            .map(|(id, _)| id)
            .collect();
        for id in dots {
            self.canvas.bring_to_front(id);
        }
    }
}
