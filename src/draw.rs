//! Interactive marker creation.
//!
//! One [`DrawSession`] exists per annotator. Arming it with a request
//! locks every placed object; pointer events then drive it through the
//! kind-specific protocol:
//!
//! - rect / round: pointer-down drops a zero-size preview, pointer-move
//!   resizes it (bounds-guarded), pointer-up commits a non-degenerate
//!   preview or discards it and waits for another attempt.
//! - poly: each click adds a vertex dot, a rubber-band line and a
//!   translucent guide polygon; clicking the first dot once at least
//!   three vertices exist replaces all helpers with the final polygon.
//!
//! A commit or a cancel returns the session to idle and unlocks the
//! surface.

use annotate_canvas::{Canvas, ObjectId, Origin, Primitive, Role, Shape};

use crate::bounds::{BoundsGuard, Frame};
use crate::config::AnnotatorConfig;
use crate::constants::MIN_POLYGON_VERTICES;
use crate::error::{AnnotateError, Result};
use crate::geometry::{ImageExtent, Point, Unit};
use crate::model::{MarkerKind, MarkerOptions, MarkerTemplate};

/// Request to enter draw mode for one new marker.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRequest {
    /// Id the finished marker will get; required.
    pub id: Option<String>,
    pub kind: MarkerKind,
    pub unit: Unit,
    pub options: MarkerOptions,
}

impl DrawRequest {
    pub fn new(id: impl Into<String>, kind: MarkerKind) -> Self {
        Self {
            id: Some(id.into()),
            kind,
            unit: Unit::default(),
            options: MarkerOptions::default(),
        }
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_options(mut self, options: MarkerOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve the request into a template, failing without an id.
    pub fn into_template(self) -> Result<MarkerTemplate> {
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .ok_or(AnnotateError::MissingId)?;
        Ok(MarkerTemplate::new(id, self.kind, self.unit, self.options))
    }
}

/// Surface parameters a draw step needs.
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    pub extent: ImageExtent,
    /// Screen pixels per image pixel
    pub zoom: f64,
    pub config: &'a AnnotatorConfig,
}

impl DrawContext<'_> {
    /// Marker stroke width in image pixels.
    fn stroke_width(&self) -> f64 {
        self.config.stroke_width / self.zoom
    }

    fn guard(&self) -> BoundsGuard {
        BoundsGuard::new(self.extent, self.config.stroke_width, self.zoom)
    }
}

/// Helper primitives of a polygon under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonTrace {
    vertices: Vec<Point>,
    dots: Vec<ObjectId>,
    lines: Vec<ObjectId>,
    active_line: Option<ObjectId>,
    guide: Option<ObjectId>,
}

impl PolygonTrace {
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn first_dot(&self) -> Option<ObjectId> {
        self.dots.first().copied()
    }

    /// Every helper primitive currently on the surface.
    pub fn helpers(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.dots
            .iter()
            .chain(self.lines.iter())
            .chain(self.guide.iter())
            .copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DrawState {
    #[default]
    Idle,
    /// Waiting for the first pointer-down.
    Armed(MarkerTemplate),
    /// Rect or round preview being sized.
    Dragging {
        template: MarkerTemplate,
        origin: Point,
        preview: ObjectId,
    },
    /// Polygon vertices being collected.
    Collecting {
        template: MarkerTemplate,
        trace: PolygonTrace,
    },
}

/// A finished draw: the primitive now on the surface and its marker data.
#[derive(Debug, Clone, PartialEq)]
pub struct CommittedDraw {
    pub template: MarkerTemplate,
    pub object: ObjectId,
}

#[derive(Debug, Default)]
pub struct DrawSession {
    state: DrawState,
}

impl DrawSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        !matches!(self.state, DrawState::Idle)
    }

    /// Template of the marker being drawn.
    pub fn template(&self) -> Option<&MarkerTemplate> {
        match &self.state {
            DrawState::Idle => None,
            DrawState::Armed(template)
            | DrawState::Dragging { template, .. }
            | DrawState::Collecting { template, .. } => Some(template),
        }
    }

    pub fn pending_id(&self) -> Option<&str> {
        self.template().map(|t| t.id.as_str())
    }

    /// Enter draw mode. The caller has already checked the id against the
    /// placed markers.
    pub fn arm(&mut self, canvas: &mut Canvas, template: MarkerTemplate) -> Result<()> {
        if let Some(id) = self.pending_id() {
            return Err(AnnotateError::DrawInProgress { id: id.to_string() });
        }
        log::debug!(
            "DrawSession: armed {} '{}' ({:?})",
            template.kind.name(),
            template.id,
            template.unit
        );
        canvas.lock_all(true);
        self.state = DrawState::Armed(template);
        Ok(())
    }

    /// Discard whatever is in progress and unlock the surface.
    pub fn cancel(&mut self, canvas: &mut Canvas) {
        match std::mem::take(&mut self.state) {
            DrawState::Idle => return,
            DrawState::Armed(template) => {
                log::debug!("DrawSession: cancelled '{}' before drawing", template.id);
            }
            DrawState::Dragging {
                template, preview, ..
            } => {
                canvas.remove(preview);
                log::debug!("DrawSession: cancelled '{}', preview removed", template.id);
            }
            DrawState::Collecting { template, trace } => {
                let count = remove_helpers(canvas, &trace);
                log::debug!(
                    "DrawSession: cancelled '{}', {} helper(s) removed",
                    template.id,
                    count
                );
            }
        }
        canvas.lock_all(false);
    }

    /// Forget the session without touching the surface, for when the
    /// surface itself was cleared.
    pub fn reset(&mut self) {
        self.state = DrawState::Idle;
    }

    pub fn pointer_down(
        &mut self,
        canvas: &mut Canvas,
        ctx: &DrawContext<'_>,
        pointer: Point,
        target: Option<ObjectId>,
    ) -> Option<CommittedDraw> {
        if !self.is_drawing() {
            return None;
        }
        if !ctx.extent.contains(pointer) {
            log::trace!("DrawSession: pointer-down outside image ignored");
            return None;
        }

        match std::mem::take(&mut self.state) {
            DrawState::Armed(template) => {
                self.state = match template.kind {
                    MarkerKind::Rect | MarkerKind::Round => {
                        let preview = canvas.add(preview_primitive(&template, ctx, pointer));
                        log::debug!(
                            "DrawSession: {} started at ({:.1}, {:.1})",
                            template.kind.name(),
                            pointer.x,
                            pointer.y
                        );
                        DrawState::Dragging {
                            template,
                            origin: pointer,
                            preview,
                        }
                    }
                    MarkerKind::Poly => {
                        let mut trace = PolygonTrace::default();
                        add_vertex(canvas, ctx, &template, &mut trace, pointer);
                        log::debug!(
                            "DrawSession: polygon started at ({:.1}, {:.1})",
                            pointer.x,
                            pointer.y
                        );
                        DrawState::Collecting { template, trace }
                    }
                };
                None
            }
            DrawState::Collecting {
                template,
                mut trace,
            } => {
                let on_first = target.is_some() && target == trace.first_dot();
                if on_first && trace.vertices.len() >= MIN_POLYGON_VERTICES {
                    return Some(self.close_polygon(canvas, ctx, template, trace));
                }
                if !on_first {
                    add_vertex(canvas, ctx, &template, &mut trace, pointer);
                    log::debug!(
                        "DrawSession: polygon vertex {} at ({:.1}, {:.1})",
                        trace.vertices.len(),
                        pointer.x,
                        pointer.y
                    );
                }
                self.state = DrawState::Collecting { template, trace };
                None
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    pub fn pointer_move(&mut self, canvas: &mut Canvas, ctx: &DrawContext<'_>, pointer: Point) {
        match &mut self.state {
            DrawState::Dragging {
                template,
                origin,
                preview,
            } => {
                let Some(primitive) = canvas.get_mut(*preview) else {
                    log::warn!("DrawSession: preview {} vanished", preview);
                    return;
                };
                resize_preview(primitive, template.kind, *origin, ctx, pointer);
            }
            DrawState::Collecting { trace, .. } => {
                if let Some(line) = trace.active_line.and_then(|id| canvas.get_mut(id)) {
                    line.set_line_end(pointer);
                }
                if let Some(guide) = trace.guide.and_then(|id| canvas.get_mut(id)) {
                    let mut points = trace.vertices.clone();
                    points.push(pointer);
                    guide.set_polygon_points(points);
                }
            }
            DrawState::Idle | DrawState::Armed(_) => {}
        }
    }

    pub fn pointer_up(&mut self, canvas: &mut Canvas) -> Option<CommittedDraw> {
        if !matches!(self.state, DrawState::Dragging { .. }) {
            return None;
        }
        let DrawState::Dragging {
            template,
            origin,
            preview,
        } = std::mem::take(&mut self.state)
        else {
            return None;
        };

        let size = canvas
            .get(preview)
            .map(Primitive::base_size)
            .unwrap_or_default();
        if size.width == 0.0 || size.height == 0.0 {
            canvas.remove(preview);
            log::debug!(
                "DrawSession: zero-size {} at ({:.1}, {:.1}) discarded",
                template.kind.name(),
                origin.x,
                origin.y
            );
            self.state = DrawState::Armed(template);
            return None;
        }

        if let Some(primitive) = canvas.get_mut(preview) {
            if primitive.origin == Origin::TopLeft {
                let center = primitive.center_point();
                primitive.origin = Origin::Center;
                primitive.left = center.x;
                primitive.top = center.y;
            }
            primitive.style = template.options.style.neutral.clone();
            primitive.save_state();
        }
        Some(self.finish(canvas, template, preview))
    }

    fn close_polygon(
        &mut self,
        canvas: &mut Canvas,
        ctx: &DrawContext<'_>,
        template: MarkerTemplate,
        trace: PolygonTrace,
    ) -> CommittedDraw {
        remove_helpers(canvas, &trace);
        let mut polygon = Primitive::polygon(trace.vertices)
            .with_style(template.options.style.neutral.clone())
            .with_name(template.id.clone())
            .with_stroke_width(ctx.stroke_width());
        polygon.selectable = template.options.selectable;
        polygon.save_state();
        let object = canvas.add(polygon);
        self.finish(canvas, template, object)
    }

    fn finish(
        &mut self,
        canvas: &mut Canvas,
        template: MarkerTemplate,
        object: ObjectId,
    ) -> CommittedDraw {
        self.state = DrawState::Idle;
        canvas.lock_all(false);
        log::info!(
            "DrawSession: committed {} '{}' as {}",
            template.kind.name(),
            template.id,
            object
        );
        CommittedDraw { template, object }
    }
}

/// Zero-size rect (top-left anchored) or circle at the pointer.
fn preview_primitive(template: &MarkerTemplate, ctx: &DrawContext<'_>, pointer: Point) -> Primitive {
    let base = match template.kind {
        MarkerKind::Round => Primitive::circle(pointer, 0.0),
        _ => Primitive::rect(pointer.x, pointer.y, 0.0, 0.0, Origin::TopLeft),
    };
    let mut preview = base
        .with_style(template.options.style.active.clone())
        .with_name(template.id.clone())
        .with_stroke_width(ctx.stroke_width());
    preview.selectable = template.options.selectable;
    preview
}

/// Size the preview from the drag origin to the pointer, keeping the last
/// size when the candidate leaves the image.
fn resize_preview(
    primitive: &mut Primitive,
    kind: MarkerKind,
    origin: Point,
    ctx: &DrawContext<'_>,
    pointer: Point,
) {
    let dx = (pointer.x - origin.x).abs();
    let dy = (pointer.y - origin.y).abs();
    let guard = ctx.guard();

    match kind {
        MarkerKind::Round => {
            let radius = dx.max(dy).max(ctx.config.min_round_radius / ctx.zoom);
            let candidate = Frame::new(origin.x, origin.y, radius * 2.0, radius * 2.0, Origin::Center);
            if guard.fits(&candidate) {
                primitive.shape = Shape::Circle { radius };
            }
        }
        _ => {
            let candidate = Frame::new(
                origin.x.min(pointer.x),
                origin.y.min(pointer.y),
                dx,
                dy,
                Origin::TopLeft,
            );
            if guard.fits(&candidate) {
                primitive.left = candidate.left;
                primitive.top = candidate.top;
                primitive.shape = Shape::Rect {
                    width: dx,
                    height: dy,
                };
            }
        }
    }
}

/// Add a vertex: its dot, a rubber-band line starting at it, and a rebuilt
/// guide polygon over all vertices.
fn add_vertex(
    canvas: &mut Canvas,
    ctx: &DrawContext<'_>,
    template: &MarkerTemplate,
    trace: &mut PolygonTrace,
    pointer: Point,
) {
    let style = &template.options.style;

    // The previous rubber band now ends on this vertex
    if let Some(line) = trace.active_line.and_then(|id| canvas.get_mut(id)) {
        line.set_line_end(pointer);
    }

    trace.vertices.push(pointer);

    if let Some(old) = trace.guide.take() {
        canvas.remove(old);
    }
    let guide = Primitive::polygon(trace.vertices.clone())
        .with_style(ctx.config.guide_style.clone())
        .with_role(Role::GuideFill)
        .with_stroke_width(0.0)
        .inert();
    trace.guide = Some(canvas.add(guide));

    let line = Primitive::line(pointer, pointer)
        .with_style(style.hover.clone())
        .with_role(Role::GuideLine)
        .with_stroke_width(ctx.stroke_width())
        .inert();
    let line = canvas.add(line);
    trace.lines.push(line);
    trace.active_line = Some(line);

    let mut dot_style = style.neutral.clone();
    dot_style.fill = if trace.dots.is_empty() {
        style.active.corner_color.clone()
    } else {
        style.neutral.corner_color.clone()
    };
    let mut dot = Primitive::circle(pointer, ctx.config.dot_radius / ctx.zoom)
        .with_style(dot_style)
        .with_role(Role::GuideDot)
        .with_stroke_width(0.0);
    dot.selectable = false;
    trace.dots.push(canvas.add(dot));

    // Dots stay above lines and the guide so the first one can be clicked
    for id in &trace.dots {
        canvas.bring_to_front(*id);
    }
}

fn remove_helpers(canvas: &mut Canvas, trace: &PolygonTrace) -> usize {
    trace
        .helpers()
        .filter(|id| canvas.remove(*id).is_some())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(kind: MarkerKind) -> MarkerTemplate {
        MarkerTemplate::new("new", kind, Unit::Pixel, MarkerOptions::default())
    }

    fn setup(kind: MarkerKind) -> (Canvas, DrawSession, AnnotatorConfig) {
        let mut canvas = Canvas::new();
        let mut session = DrawSession::new();
        session.arm(&mut canvas, template(kind)).unwrap();
        (canvas, session, AnnotatorConfig::default())
    }

    fn ctx(config: &AnnotatorConfig) -> DrawContext<'_> {
        DrawContext {
            extent: ImageExtent::new(100.0, 100.0),
            zoom: 1.0,
            config,
        }
    }

    #[test]
    fn test_request_without_id_is_rejected() {
        let mut request = DrawRequest::new("x", MarkerKind::Rect);
        request.id = None;
        assert_eq!(request.into_template(), Err(AnnotateError::MissingId));

        let mut request = DrawRequest::new("", MarkerKind::Rect);
        request.id = Some(String::new());
        assert_eq!(request.into_template(), Err(AnnotateError::MissingId));
    }

    #[test]
    fn test_arm_twice_is_rejected() {
        let (mut canvas, mut session, _) = setup(MarkerKind::Rect);
        let err = session.arm(&mut canvas, template(MarkerKind::Round)).unwrap_err();
        assert_eq!(err, AnnotateError::DrawInProgress { id: "new".into() });
    }

    #[test]
    fn test_arm_locks_and_cancel_unlocks() {
        let mut canvas = Canvas::new();
        let placed = canvas.add(Primitive::rect(50.0, 50.0, 10.0, 10.0, Origin::Center));
        let mut session = DrawSession::new();
        session.arm(&mut canvas, template(MarkerKind::Rect)).unwrap();
        assert!(canvas.get(placed).unwrap().lock_movement);

        session.cancel(&mut canvas);
        assert!(!session.is_drawing());
        assert!(!canvas.get(placed).unwrap().lock_movement);
    }

    #[test]
    fn test_rect_drag_commits_center_anchored() {
        let (mut canvas, mut session, config) = setup(MarkerKind::Rect);
        let ctx = ctx(&config);

        assert!(session.pointer_down(&mut canvas, &ctx, Point::new(40.0, 30.0), None).is_none());
        session.pointer_move(&mut canvas, &ctx, Point::new(20.0, 60.0));
        let done = session.pointer_up(&mut canvas).unwrap();

        let rect = canvas.get(done.object).unwrap();
        assert_eq!(rect.origin, Origin::Center);
        assert_eq!((rect.left, rect.top), (30.0, 45.0));
        assert_eq!(rect.base_size().width, 20.0);
        assert_eq!(rect.base_size().height, 30.0);
        assert_eq!(rect.style, done.template.options.style.neutral);
        assert!(!session.is_drawing());
    }

    #[test]
    fn test_rect_preview_keeps_last_good_size() {
        let (mut canvas, mut session, config) = setup(MarkerKind::Rect);
        let ctx = ctx(&config);

        session.pointer_down(&mut canvas, &ctx, Point::new(50.0, 50.0), None);
        session.pointer_move(&mut canvas, &ctx, Point::new(80.0, 80.0));
        session.pointer_move(&mut canvas, &ctx, Point::new(150.0, 80.0));

        let DrawState::Dragging { preview, .. } = session.state() else {
            panic!("expected a drag in progress");
        };
        assert_eq!(canvas.get(*preview).unwrap().base_size().width, 30.0);
    }

    #[test]
    fn test_click_without_drag_is_discarded() {
        let (mut canvas, mut session, config) = setup(MarkerKind::Rect);
        let ctx = ctx(&config);

        session.pointer_down(&mut canvas, &ctx, Point::new(50.0, 50.0), None);
        assert!(session.pointer_up(&mut canvas).is_none());
        assert!(session.is_drawing());
        assert!(canvas.is_empty());

        // The user can try again without re-arming
        session.pointer_down(&mut canvas, &ctx, Point::new(10.0, 10.0), None);
        session.pointer_move(&mut canvas, &ctx, Point::new(20.0, 20.0));
        assert!(session.pointer_up(&mut canvas).is_some());
    }

    #[test]
    fn test_round_radius_has_a_floor() {
        let (mut canvas, mut session, config) = setup(MarkerKind::Round);
        let ctx = ctx(&config);

        session.pointer_down(&mut canvas, &ctx, Point::new(50.0, 50.0), None);
        session.pointer_move(&mut canvas, &ctx, Point::new(51.0, 50.0));
        let done = session.pointer_up(&mut canvas).unwrap();
        assert_eq!(canvas.get(done.object).unwrap().radius(), Some(3.0));
    }

    #[test]
    fn test_round_uses_largest_axis() {
        let (mut canvas, mut session, config) = setup(MarkerKind::Round);
        let ctx = ctx(&config);

        session.pointer_down(&mut canvas, &ctx, Point::new(50.0, 50.0), None);
        session.pointer_move(&mut canvas, &ctx, Point::new(45.0, 62.0));
        let done = session.pointer_up(&mut canvas).unwrap();
        let circle = canvas.get(done.object).unwrap();
        assert_eq!(circle.radius(), Some(12.0));
        assert_eq!(circle.center_point(), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_pointer_down_outside_image_is_ignored() {
        let (mut canvas, mut session, config) = setup(MarkerKind::Poly);
        let ctx = ctx(&config);
        session.pointer_down(&mut canvas, &ctx, Point::new(-5.0, 10.0), None);
        assert!(matches!(session.state(), DrawState::Armed(_)));
        assert!(canvas.is_empty());
    }

    #[test]
    fn test_polygon_helpers_and_rubber_band() {
        let (mut canvas, mut session, config) = setup(MarkerKind::Poly);
        let ctx = ctx(&config);

        session.pointer_down(&mut canvas, &ctx, Point::new(10.0, 10.0), None);
        session.pointer_down(&mut canvas, &ctx, Point::new(40.0, 10.0), None);
        session.pointer_move(&mut canvas, &ctx, Point::new(40.0, 40.0));

        let DrawState::Collecting { trace, .. } = session.state() else {
            panic!("expected vertex collection");
        };
        assert_eq!(trace.vertices(), &[Point::new(10.0, 10.0), Point::new(40.0, 10.0)]);
        // 2 dots, 2 lines, 1 guide
        assert_eq!(canvas.len(), 5);

        let active = canvas.get(trace.active_line.unwrap()).unwrap();
        assert_eq!(
            active.shape,
            Shape::Line {
                from: Point::new(40.0, 10.0),
                to: Point::new(40.0, 40.0)
            }
        );
        let guide = canvas.get(trace.guide.unwrap()).unwrap();
        assert_eq!(guide.polygon_shape().unwrap().points().len(), 3);
        assert_eq!(guide.style, config.guide_style);

        let first = canvas.get(trace.first_dot().unwrap()).unwrap();
        assert_eq!(first.style.fill, MarkerOptions::default().style.active.corner_color);
    }

    #[test]
    fn test_first_dot_needs_three_vertices_to_close() {
        let (mut canvas, mut session, config) = setup(MarkerKind::Poly);
        let ctx = ctx(&config);

        session.pointer_down(&mut canvas, &ctx, Point::new(10.0, 10.0), None);
        session.pointer_down(&mut canvas, &ctx, Point::new(40.0, 10.0), None);
        let first = canvas.hit_test(Point::new(10.0, 10.0));
        assert!(session
            .pointer_down(&mut canvas, &ctx, Point::new(10.0, 10.0), first)
            .is_none());

        let DrawState::Collecting { trace, .. } = session.state() else {
            panic!("expected vertex collection");
        };
        assert_eq!(trace.vertices().len(), 2);
    }

    #[test]
    fn test_polygon_close_replaces_helpers() {
        let (mut canvas, mut session, config) = setup(MarkerKind::Poly);
        let ctx = ctx(&config);
        let vertices = [Point::new(5.0, 5.0), Point::new(60.0, 5.0), Point::new(60.0, 60.0)];

        for vertex in vertices {
            let target = canvas.hit_test(vertex);
            session.pointer_down(&mut canvas, &ctx, vertex, target);
        }
        let target = canvas.hit_test(Point::new(6.0, 6.0));
        let done = session
            .pointer_down(&mut canvas, &ctx, Point::new(6.0, 6.0), target)
            .unwrap();

        assert_eq!(canvas.len(), 1);
        let polygon = canvas.get(done.object).unwrap();
        assert_eq!(polygon.absolute_points(), vertices.to_vec());
        assert_eq!(polygon.name.as_deref(), Some("new"));
        assert!(!session.is_drawing());
    }

    #[test]
    fn test_cancel_polygon_removes_every_helper() {
        let (mut canvas, mut session, config) = setup(MarkerKind::Poly);
        let ctx = ctx(&config);
        let placed = canvas.add(Primitive::rect(80.0, 80.0, 4.0, 4.0, Origin::Center));

        for vertex in [Point::new(5.0, 5.0), Point::new(30.0, 5.0), Point::new(30.0, 30.0)] {
            session.pointer_down(&mut canvas, &ctx, vertex, None);
        }
        session.pointer_move(&mut canvas, &ctx, Point::new(20.0, 40.0));
        session.cancel(&mut canvas);

        assert_eq!(canvas.ids(), &[placed]);
        assert!(!session.is_drawing());
    }
}
