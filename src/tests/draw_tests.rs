//! Draw mode driven through pointer messages.

use super::{annotator, approx_eq, kinds, record};
use crate::{
    AnnotateError, DrawRequest, DrawState, EventType, Marker, MarkerKind, MarkerOptions, Point,
    PointerMessage, Unit,
};

#[test]
fn test_polygon_closes_on_first_vertex() {
    let mut annotator = annotator();
    let log = record(&mut annotator);
    annotator
        .set_draw_mode(DrawRequest::new("tri", MarkerKind::Poly).with_unit(Unit::Pixel))
        .unwrap();

    let vertices = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
    for vertex in vertices {
        annotator.handle_pointer(PointerMessage::Down(vertex));
        annotator.handle_pointer(PointerMessage::Up(vertex));
    }
    assert!(log.borrow().is_empty());
    annotator.handle_pointer(PointerMessage::Down(vertices[0]));

    assert_eq!(kinds(&log), vec![EventType::CreateMarker]);
    let created = log.borrow()[0].object.clone().unwrap();
    assert_eq!(created.id(), "tri");
    assert_eq!(created.dots(), Some(&vertices[..]));

    assert!(!annotator.is_drawing());
    assert_eq!(annotator.canvas().len(), 1);
    assert_eq!(annotator.control_positions("tri").len(), 3);
}

#[test]
fn test_rect_drag_emits_create_marker() {
    let mut annotator = annotator();
    let log = record(&mut annotator);
    annotator
        .set_draw_mode(DrawRequest::new("box", MarkerKind::Rect))
        .unwrap();

    annotator.handle_pointer(PointerMessage::Down(Point::new(60.0, 20.0)));
    annotator.handle_pointer(PointerMessage::Move(Point::new(40.0, 30.0)));
    annotator.handle_pointer(PointerMessage::Move(Point::new(20.0, 60.0)));
    annotator.handle_pointer(PointerMessage::Up(Point::new(20.0, 60.0)));

    assert_eq!(kinds(&log), vec![EventType::CreateMarker]);
    let created = annotator.marker("box").unwrap();
    let center = created.center().unwrap();
    let (w, h) = created.size().unwrap();
    assert!(approx_eq(center.x, 0.4) && approx_eq(center.y, 0.4));
    assert!(approx_eq(w, 0.4) && approx_eq(h, 0.4));
    assert_eq!(log.borrow()[0].object.as_ref(), Some(&created));
}

#[test]
fn test_round_drag_emits_create_marker() {
    let mut annotator = annotator();
    let log = record(&mut annotator);
    annotator
        .set_draw_mode(DrawRequest::new("dot", MarkerKind::Round).with_unit(Unit::Pixel))
        .unwrap();

    annotator.on_mouse_down(Point::new(50.0, 50.0));
    annotator.on_mouse_move(Point::new(58.0, 44.0));
    annotator.on_mouse_up(Point::new(58.0, 44.0));

    assert_eq!(kinds(&log), vec![EventType::CreateMarker]);
    let created = annotator.marker("dot").unwrap();
    assert_eq!(created.center(), Some(Point::new(50.0, 50.0)));
    assert_eq!(created.size(), Some((16.0, 16.0)));
}

#[test]
fn test_click_without_drag_creates_nothing() {
    let mut annotator = annotator();
    let log = record(&mut annotator);
    annotator
        .set_draw_mode(DrawRequest::new("box", MarkerKind::Rect))
        .unwrap();

    annotator.on_mouse_down(Point::new(30.0, 30.0));
    annotator.on_mouse_up(Point::new(30.0, 30.0));

    assert!(log.borrow().is_empty());
    assert!(matches!(annotator.draw_state(), DrawState::Armed(_)));
    assert!(annotator.canvas().is_empty());
    assert!(!annotator.has_marker("box"));
}

#[test]
fn test_cancel_polygon_leaves_no_helpers() {
    let mut annotator = annotator();
    annotator
        .add_marker(Marker::rect("a", MarkerOptions::default(), 0.8, 0.8, 0.1, 0.1, Unit::Percent).unwrap())
        .unwrap();
    let before = annotator.canvas().ids().to_vec();
    let log = record(&mut annotator);

    annotator
        .set_draw_mode(DrawRequest::new("p", MarkerKind::Poly))
        .unwrap();
    for vertex in [Point::new(10.0, 10.0), Point::new(40.0, 10.0), Point::new(40.0, 40.0)] {
        annotator.on_mouse_down(vertex);
    }
    annotator.on_mouse_move(Point::new(20.0, 50.0));
    assert!(annotator.canvas().len() > before.len());

    annotator.cancel_draw_mode();
    assert_eq!(annotator.canvas().ids(), &before[..]);
    assert!(log.borrow().is_empty());
    assert!(!annotator.is_drawing());
}

#[test]
fn test_draw_mode_preconditions() {
    let mut annotator = annotator();
    annotator
        .add_marker(Marker::rect("a", MarkerOptions::default(), 0.5, 0.5, 0.1, 0.1, Unit::Percent).unwrap())
        .unwrap();

    let mut anonymous = DrawRequest::new("x", MarkerKind::Rect);
    anonymous.id = None;
    assert_eq!(annotator.set_draw_mode(anonymous), Err(AnnotateError::MissingId));

    assert_eq!(
        annotator.set_draw_mode(DrawRequest::new("a", MarkerKind::Rect)),
        Err(AnnotateError::DuplicateMarker { id: "a".into() })
    );

    annotator
        .set_draw_mode(DrawRequest::new("b", MarkerKind::Rect))
        .unwrap();
    assert_eq!(
        annotator.set_draw_mode(DrawRequest::new("c", MarkerKind::Round)),
        Err(AnnotateError::DrawInProgress { id: "b".into() })
    );
    assert_eq!(annotator.pending_marker_id(), Some("b"));
}

#[test]
fn test_viewer_drag_suspended_while_drawing() {
    let mut annotator = annotator();
    assert!(annotator.allows_viewer_drag());
    annotator
        .set_draw_mode(DrawRequest::new("b", MarkerKind::Rect))
        .unwrap();
    assert!(!annotator.allows_viewer_drag());
    annotator.cancel_draw_mode();
    assert!(annotator.allows_viewer_drag());
}

#[test]
fn test_clicks_off_the_image_are_ignored() {
    let mut annotator = annotator();
    annotator
        .set_draw_mode(DrawRequest::new("p", MarkerKind::Poly))
        .unwrap();
    annotator.on_mouse_down(Point::new(150.0, 20.0));
    assert!(annotator.canvas().is_empty());
}

#[test]
fn test_drawn_marker_carries_request_options() {
    let mut annotator = annotator();
    let options = MarkerOptions {
        draggable: false,
        ..MarkerOptions::default()
    };
    annotator
        .set_draw_mode(DrawRequest::new("box", MarkerKind::Rect).with_options(options.clone()))
        .unwrap();
    annotator.on_mouse_down(Point::new(10.0, 10.0));
    annotator.on_mouse_move(Point::new(30.0, 20.0));
    annotator.on_mouse_up(Point::new(30.0, 20.0));

    assert_eq!(annotator.marker("box").unwrap().options(), &options);
    assert!(!annotator.move_object("box", Point::new(50.0, 50.0)));
}
