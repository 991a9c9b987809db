//! Outward event stream.
//!
//! Observers subscribe a closure to the [`EventBus`]. Emission is
//! synchronous: every event is delivered to all current subscribers in
//! subscription order before `emit` returns, and events are delivered in
//! the order they were emitted.

use std::fmt;

use serde::Serialize;

use crate::model::Marker;

/// Kind of lifecycle or interaction event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventType {
    #[serde(rename = "clearCanvas")]
    ClearCanvas,
    #[serde(rename = "createMarker")]
    CreateMarker,
    #[serde(rename = "deleteMarker")]
    DeleteMarker,
    #[serde(rename = "mouse:over")]
    MouseOver,
    #[serde(rename = "mouse:out")]
    MouseOut,
    #[serde(rename = "object:scaling")]
    ObjectScaling,
    #[serde(rename = "object:modified")]
    ObjectModified,
    #[serde(rename = "selection:created")]
    SelectionCreated,
    #[serde(rename = "selection:updated:deselected")]
    SelectionDeselected,
    #[serde(rename = "selection:updated:selected")]
    SelectionSelected,
    #[serde(rename = "selection:cleared")]
    SelectionCleared,
}

/// Surface gesture that produced a scaling or modification event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransformAction {
    /// Uniform corner scaling
    #[serde(rename = "scale")]
    Scale,
    #[serde(rename = "scaleX")]
    ScaleX,
    #[serde(rename = "scaleY")]
    ScaleY,
    /// Whole-object move
    #[serde(rename = "drag")]
    Drag,
    /// Single polygon vertex drag
    #[serde(rename = "modifyPolygon")]
    ModifyPolygon,
}

/// One event on the stream: `{type, action?, object?}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerEvent {
    #[serde(rename = "type")]
    pub kind: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<TransformAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<Marker>,
}

impl MarkerEvent {
    pub fn new(kind: EventType, object: Option<Marker>) -> Self {
        Self {
            kind,
            action: None,
            object,
        }
    }

    pub fn with_action(mut self, action: TransformAction) -> Self {
        self.action = Some(action);
        self
    }

    /// Id of the marker carried by the event, if any.
    pub fn marker_id(&self) -> Option<&str> {
        self.object.as_ref().map(Marker::id)
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&MarkerEvent)>;

/// Ordered fan-out of [`MarkerEvent`]s to registered listeners.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it receives every event emitted from now on.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&MarkerEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        log::debug!("EventBus: subscribed {:?}", id);
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        before != self.listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn emit(&mut self, event: MarkerEvent) {
        log::trace!(
            "EventBus: {:?} {:?} to {} listener(s)",
            event.kind,
            event.marker_id(),
            self.listeners.len()
        );
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
