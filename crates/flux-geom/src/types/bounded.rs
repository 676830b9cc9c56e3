// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use flux_math::Vec3;

use crate::types::aabb::Aabb;

/// Anything the broad-phase can pair: a world-space AABB plus a reference
/// point used for partitioning and cell hashing.
///
/// Broad-phase structures read proxies through this trait so callers can hand
/// over their own record type (cached bounds, tags, body handles) without
/// copying AABBs into a separate array first.
pub trait Bounded {
    /// World-space bounds.
    fn aabb(&self) -> Aabb;

    /// Reference point; defaults to the AABB centre.
    fn center(&self) -> Vec3 {
        self.aabb().center()
    }
}

impl Bounded for Aabb {
    fn aabb(&self) -> Aabb {
        *self
    }
}

impl<T: Bounded + ?Sized> Bounded for &T {
    fn aabb(&self) -> Aabb {
        (**self).aabb()
    }

    fn center(&self) -> Vec3 {
        (**self).center()
    }
}
