//! In-memory primitive store with z-order, hit-testing and selection.

use std::collections::HashMap;

use crate::{Matrix, Point, Primitive};

/// Handle to a primitive stored in a [`Canvas`]. Handles are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The drawing surface. Owns every primitive; the last one in z-order is
/// drawn on top and wins hit-tests.
#[derive(Debug, Clone)]
pub struct Canvas {
    objects: HashMap<ObjectId, Primitive>,
    order: Vec<ObjectId>,
    next_id: u64,
    /// Screen pixels per surface unit.
    zoom: f64,
    /// Surface to screen transform.
    viewport: Matrix,
    active: Option<ObjectId>,
}

impl Canvas {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
            order: Vec::new(),
            next_id: 0,
            zoom: 1.0,
            viewport: Matrix::IDENTITY,
            active: None,
        }
    }

    /// Add a primitive on top of the stack.
    pub fn add(&mut self, primitive: Primitive) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        log::trace!("Canvas: add {} ({:?})", id, primitive.role);
        self.objects.insert(id, primitive);
        self.order.push(id);
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<Primitive> {
        let removed = self.objects.remove(&id)?;
        self.order.retain(|o| *o != id);
        if self.active == Some(id) {
            self.active = None;
        }
        log::trace!("Canvas: remove {}", id);
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.order.clear();
        self.active = None;
    }

    pub fn get(&self, id: ObjectId) -> Option<&Primitive> {
        self.objects.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Primitive> {
        self.objects.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Handles in z-order, bottom first.
    pub fn ids(&self) -> &[ObjectId] {
        &self.order
    }

    /// Primitives in z-order, bottom first.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Primitive)> {
        self.order
            .iter()
            .filter_map(|id| self.objects.get(id).map(|p| (*id, p)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Primitive> {
        self.objects.values_mut()
    }

    pub fn bring_to_front(&mut self, id: ObjectId) {
        if let Some(pos) = self.order.iter().position(|o| *o == id) {
            let id = self.order.remove(pos);
            self.order.push(id);
        }
    }

    /// Topmost evented primitive containing `point` (surface coordinates).
    pub fn hit_test(&self, point: Point) -> Option<ObjectId> {
        self.order.iter().rev().copied().find(|id| {
            self.objects
                .get(id)
                .is_some_and(|p| p.evented && p.contains_point(point))
        })
    }

    /// Enable or disable the movement lock on every primitive.
    pub fn lock_all(&mut self, lock: bool) {
        for primitive in self.objects.values_mut() {
            primitive.lock_movement = lock;
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    pub fn viewport_transform(&self) -> Matrix {
        self.viewport
    }

    pub fn set_viewport_transform(&mut self, viewport: Matrix) {
        self.viewport = viewport;
    }

    pub fn active_object(&self) -> Option<ObjectId> {
        self.active
    }

    /// Make `id` the active (selected) object. Unknown handles clear it.
    pub fn set_active_object(&mut self, id: Option<ObjectId>) {
        self.active = id.filter(|id| self.objects.contains_key(id));
    }

    pub fn discard_active_object(&mut self) -> Option<ObjectId> {
        self.active.take()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Origin;

    #[test]
    fn test_add_remove_keeps_order() {
        let mut canvas = Canvas::new();
        let a = canvas.add(Primitive::rect(0.0, 0.0, 1.0, 1.0, Origin::Center));
        let b = canvas.add(Primitive::rect(0.0, 0.0, 1.0, 1.0, Origin::Center));
        let c = canvas.add(Primitive::rect(0.0, 0.0, 1.0, 1.0, Origin::Center));
        assert_eq!(canvas.ids(), &[a, b, c]);

        canvas.remove(b);
        assert_eq!(canvas.ids(), &[a, c]);
        assert!(canvas.get(b).is_none());
        assert!(canvas.remove(b).is_none());
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let mut canvas = Canvas::new();
        let bottom = canvas.add(Primitive::rect(10.0, 10.0, 20.0, 20.0, Origin::Center));
        let top = canvas.add(Primitive::rect(10.0, 10.0, 4.0, 4.0, Origin::Center));

        assert_eq!(canvas.hit_test(Point::new(10.0, 10.0)), Some(top));
        assert_eq!(canvas.hit_test(Point::new(18.0, 18.0)), Some(bottom));
        assert_eq!(canvas.hit_test(Point::new(50.0, 50.0)), None);

        canvas.bring_to_front(bottom);
        assert_eq!(canvas.hit_test(Point::new(10.0, 10.0)), Some(bottom));
    }

    #[test]
    fn test_hit_test_skips_inert() {
        let mut canvas = Canvas::new();
        canvas.add(Primitive::rect(0.0, 0.0, 10.0, 10.0, Origin::Center).inert());
        assert_eq!(canvas.hit_test(Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_removing_active_object_clears_selection() {
        let mut canvas = Canvas::new();
        let a = canvas.add(Primitive::rect(0.0, 0.0, 1.0, 1.0, Origin::Center));
        canvas.set_active_object(Some(a));
        assert_eq!(canvas.active_object(), Some(a));
        canvas.remove(a);
        assert_eq!(canvas.active_object(), None);
    }

    #[test]
    fn test_lock_all() {
        let mut canvas = Canvas::new();
        let a = canvas.add(Primitive::rect(0.0, 0.0, 1.0, 1.0, Origin::Center));
        canvas.lock_all(true);
        assert!(canvas.get(a).unwrap().lock_movement);
        canvas.lock_all(false);
        assert!(!canvas.get(a).unwrap().lock_movement);
    }
}
