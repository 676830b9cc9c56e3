// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-tick registry of simulated bodies.

use flux_geom::{Aabb, Bounded, CapacityError};
use tracing::warn;

/// Gameplay role of a registered body, passed through to contact callbacks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Player-controlled body.
    Player,
    /// Static or slow scenery.
    Field,
    /// Fast, short-lived body.
    Projectile,
}

/// A body registered for the current tick.
///
/// `body` indexes the caller-owned body slice passed to
/// [`crate::PhysicsWorld::step`]; the list never owns the body itself.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PhysicsObject {
    body: usize,
    kind: ObjectKind,
    bounds: Aabb,
}

impl PhysicsObject {
    /// Index into the body slice.
    pub fn body(&self) -> usize {
        self.body
    }

    /// Gameplay role.
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// World bounds cached at the last refresh.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub(crate) fn set_bounds(&mut self, bounds: Aabb) {
        self.bounds = bounds;
    }
}

impl Bounded for PhysicsObject {
    fn aabb(&self) -> Aabb {
        self.bounds
    }
}

/// Fixed-capacity list of [`PhysicsObject`]s, rebuilt every tick.
#[derive(Debug, Clone)]
pub struct ObjectList {
    capacity: usize,
    items: Vec<PhysicsObject>,
}

impl ObjectList {
    /// Empty list holding at most `capacity` objects.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::with_capacity(capacity),
        }
    }

    /// Registers `body` with the given role.
    ///
    /// Overflow is rejected and logged; the list is left unchanged.
    pub fn push(&mut self, body: usize, kind: ObjectKind) -> Result<(), CapacityError> {
        if self.items.len() >= self.capacity {
            let err = CapacityError::Objects {
                capacity: self.capacity,
            };
            warn!(%err, body, "object list full");
            return Err(err);
        }
        self.items.push(PhysicsObject {
            body,
            kind,
            bounds: Aabb::default(),
        });
        Ok(())
    }

    /// Removes every registration.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of registrations.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Registered objects in insertion order.
    pub fn as_slice(&self) -> &[PhysicsObject] {
        &self.items
    }

    /// Iterator over registered objects.
    pub fn iter(&self) -> core::slice::Iter<'_, PhysicsObject> {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> core::slice::IterMut<'_, PhysicsObject> {
        self.items.iter_mut()
    }

    /// Keeps only objects matching `keep`, preserving order.
    pub fn retain(&mut self, keep: impl FnMut(&PhysicsObject) -> bool) {
        self.items.retain(keep);
    }
}

impl<'a> IntoIterator for &'a ObjectList {
    type Item = &'a PhysicsObject;
    type IntoIter = core::slice::Iter<'a, PhysicsObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_past_capacity_is_rejected() {
        let mut list = ObjectList::new(2);
        assert!(list.push(0, ObjectKind::Player).is_ok());
        assert!(list.push(1, ObjectKind::Field).is_ok());
        assert_eq!(
            list.push(2, ObjectKind::Projectile),
            Err(CapacityError::Objects { capacity: 2 })
        );
        assert_eq!(list.len(), 2);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.capacity(), 2);
    }

    #[test]
    fn retain_preserves_order() {
        let mut list = ObjectList::new(8);
        for body in 0..5 {
            assert!(list.push(body, ObjectKind::Field).is_ok());
        }
        list.retain(|o| o.body() % 2 == 0);
        let bodies: Vec<usize> = list.iter().map(PhysicsObject::body).collect();
        assert_eq!(bodies, vec![0, 2, 4]);
    }
}
