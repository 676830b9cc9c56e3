// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use flux_math::{Mat3, Vec3};

/// Axis-aligned bounding box in world coordinates.
///
/// Invariants:
/// - `min` components are less than or equal to `max` components.
/// - Values are `f32` and represent meters in world space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::ZERO,
        }
    }
}

impl Aabb {
    /// Constructs an AABB from two opposite corners.
    ///
    /// Corners are reordered per component, so `min <= max` holds for any input.
    #[must_use]
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(&b),
            max: a.max(&b),
        }
    }

    /// Returns the minimum corner.
    #[must_use]
    pub fn min(&self) -> Vec3 {
        self.min
    }

    /// Returns the maximum corner.
    #[must_use]
    pub fn max(&self) -> Vec3 {
        self.max
    }

    /// Builds an AABB centered at `center` with half-extents `half`.
    #[must_use]
    pub fn from_center_half_extents(center: Vec3, half: Vec3) -> Self {
        let half = half.abs();
        Self {
            min: center.sub(&half),
            max: center.add(&half),
        }
    }

    /// Bounds of a box with local half-extents `half`, rotated by `rotation`
    /// and centred at `center`.
    ///
    /// The world half-extent on axis `i` is `Σ_j |R_ij| · h_j`.
    #[must_use]
    pub fn from_oriented_box(center: Vec3, half: Vec3, rotation: &Mat3) -> Self {
        let world_half = rotation.abs().transform(&half.abs());
        Self::from_center_half_extents(center, world_half)
    }

    /// Centre point.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.min.add(&self.max).scale(0.5)
    }

    /// Full edge lengths (`max - min`).
    #[must_use]
    pub fn extents(&self) -> Vec3 {
        self.max.sub(&self.min)
    }

    /// Half edge lengths.
    #[must_use]
    pub fn half_extents(&self) -> Vec3 {
        self.extents().scale(0.5)
    }

    /// Returns `true` if this AABB overlaps another (inclusive on faces).
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let a_min = self.min.to_array();
        let a_max = self.max.to_array();
        let b_min = other.min.to_array();
        let b_max = other.max.to_array();
        // Touching faces count as overlap so pairs do not flicker on contact.
        !(a_max[0] < b_min[0]
            || a_min[0] > b_max[0]
            || a_max[1] < b_min[1]
            || a_min[1] > b_max[1]
            || a_max[2] < b_min[2]
            || a_min[2] > b_max[2])
    }

    /// Closest point on (or in) the box to `p`.
    #[must_use]
    pub fn closest_point(&self, p: &Vec3) -> Vec3 {
        p.clamp(&self.min, &self.max)
    }

    /// Returns the union of two AABBs.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(&other.min),
            max: self.max.max(&other.max),
        }
    }

    /// Inflates the box by a uniform margin `m` in all directions.
    #[must_use]
    pub fn inflate(&self, m: f32) -> Self {
        let delta = Vec3::splat(m);
        Self::new(self.min.sub(&delta), self.max.add(&delta))
    }
}
