//! Scenario tests driving the annotator through a headless viewport.
//!
//! These exercise whole gestures and lifecycles across modules; the
//! per-module unit tests live beside the code.

mod draw_tests;

use std::cell::RefCell;
use std::rc::Rc;

use crate::{Annotator, AnnotatorConfig, EventType, MarkerEvent, Size, Viewport};

pub(crate) const EPSILON: f64 = 1e-9;

pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

pub(crate) fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .try_init();
}

/// Annotator over a 100x100 image shown at one screen pixel per image pixel.
pub(crate) fn annotator() -> Annotator<Viewport> {
    annotator_with(Size::new(100.0, 100.0), Size::new(100.0, 100.0))
}

pub(crate) fn annotator_with(image: Size, container: Size) -> Annotator<Viewport> {
    init_logging();
    Annotator::new(Viewport::new(image, container), AnnotatorConfig::default())
}

pub(crate) type EventLog = Rc<RefCell<Vec<MarkerEvent>>>;

/// Record every event the annotator emits from now on.
pub(crate) fn record(annotator: &mut Annotator<Viewport>) -> EventLog {
    let log: EventLog = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    annotator.subscribe(move |event| sink.borrow_mut().push(event.clone()));
    log
}

pub(crate) fn kinds(log: &EventLog) -> Vec<EventType> {
    log.borrow().iter().map(|event| event.kind).collect()
}
