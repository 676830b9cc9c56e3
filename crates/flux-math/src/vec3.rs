// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::EPSILON;

/// 3D vector used for positions, velocities, forces, and extents.
///
/// * Components encode world-space metres (or metres per second, newtons, …)
///   depending on the calling context.
/// * Arithmetic uses `f32` and is written out per component; no fused
///   multiply-add, so results round identically across targets.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Vec3 {
    data: [f32; 3],
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Unit vector pointing along the positive X axis.
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);

    /// Unit vector pointing along the positive Y axis.
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);

    /// Unit vector pointing along the positive Z axis.
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Creates a vector from components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { data: [x, y, z] }
    }

    /// Creates a vector with every component set to `v`.
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Returns the components as an array.
    pub fn to_array(self) -> [f32; 3] {
        self.data
    }

    /// X component.
    pub fn x(&self) -> f32 {
        self.data[0]
    }

    /// Y component.
    pub fn y(&self) -> f32 {
        self.data[1]
    }

    /// Z component.
    pub fn z(&self) -> f32 {
        self.data[2]
    }

    /// Component on `axis` (`0 = x`, `1 = y`, `2 = z`).
    ///
    /// Out-of-range axes are folded with `axis % 3`.
    pub fn axis(&self, axis: usize) -> f32 {
        self.data[axis % 3]
    }

    /// Returns a copy with the component on `axis` replaced by `value`.
    pub fn with_axis(&self, axis: usize, value: f32) -> Self {
        let mut data = self.data;
        data[axis % 3] = value;
        Self { data }
    }

    fn zip(&self, other: &Self, f: impl Fn(f32, f32) -> f32) -> Self {
        Self::new(
            f(self.data[0], other.data[0]),
            f(self.data[1], other.data[1]),
            f(self.data[2], other.data[2]),
        )
    }

    fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.data[0]), f(self.data[1]), f(self.data[2]))
    }

    /// Adds two vectors.
    pub fn add(&self, other: &Self) -> Self {
        self.zip(other, |a, b| a + b)
    }

    /// Subtracts another vector.
    pub fn sub(&self, other: &Self) -> Self {
        self.zip(other, |a, b| a - b)
    }

    /// Scales the vector by a scalar.
    pub fn scale(&self, scalar: f32) -> Self {
        self.map(|a| a * scalar)
    }

    /// Adds `other * scalar` to this vector.
    pub fn add_scaled(&self, other: &Self, scalar: f32) -> Self {
        self.zip(other, |a, b| a + b * scalar)
    }

    /// Negates every component.
    pub fn neg(&self) -> Self {
        self.map(|a| -a)
    }

    /// Component-wise absolute value.
    pub fn abs(&self) -> Self {
        self.map(f32::abs)
    }

    /// Component-wise minimum.
    pub fn min(&self, other: &Self) -> Self {
        self.zip(other, f32::min)
    }

    /// Component-wise maximum.
    pub fn max(&self, other: &Self) -> Self {
        self.zip(other, f32::max)
    }

    /// Component-wise floor.
    pub fn floor(&self) -> Self {
        self.map(f32::floor)
    }

    /// Clamps every component into `[lo, hi]` taken from the matching components.
    pub fn clamp(&self, lo: &Self, hi: &Self) -> Self {
        self.max(lo).min(hi)
    }

    /// Clamps every component into `[-limit, limit]`.
    pub fn clamp_components(&self, limit: f32) -> Self {
        let limit = limit.abs();
        self.map(|a| a.max(-limit).min(limit))
    }

    /// Largest component value.
    pub fn max_element(&self) -> f32 {
        self.data[0].max(self.data[1]).max(self.data[2])
    }

    /// Index of the largest component; ties resolve to the lowest axis.
    pub fn max_axis(&self) -> usize {
        let [x, y, z] = self.data;
        if x >= y && x >= z {
            0
        } else if y >= z {
            1
        } else {
            2
        }
    }

    /// Dot product with another vector.
    pub fn dot(&self, other: &Self) -> f32 {
        self.data[0] * other.data[0] + self.data[1] * other.data[1] + self.data[2] * other.data[2]
    }

    /// Cross product with another vector.
    pub fn cross(&self, other: &Self) -> Self {
        let [ax, ay, az] = self.data;
        let [bx, by, bz] = other.data;
        Self::new(ay * bz - az * by, az * bx - ax * bz, ax * by - ay * bx)
    }

    /// Vector length (magnitude).
    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Squared magnitude of the vector.
    pub fn length_squared(&self) -> f32 {
        self.dot(self)
    }

    /// Normalises the vector, returning the zero vector if length ≤ `EPSILON`.
    ///
    /// `EPSILON` is a degeneracy threshold: callers test the result against
    /// zero instead of dividing by a vanishing length.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len <= EPSILON {
            return Self::ZERO;
        }
        self.scale(1.0 / len)
    }

    /// Returns `true` when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|c| c.is_finite())
    }
}

/// Converts a 3-element `[f32; 3]` array into a `Vec3` interpreted as `(x, y, z)`.
///
/// # Examples
/// ```
/// use flux_math::Vec3;
/// let v = Vec3::from([1.0, 2.0, 3.0]);
/// assert_eq!(v.to_array(), [1.0, 2.0, 3.0]);
/// ```
impl From<[f32; 3]> for Vec3 {
    fn from(value: [f32; 3]) -> Self {
        Self { data: value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_axis_prefers_lowest_on_ties() {
        assert_eq!(Vec3::new(1.0, 1.0, 1.0).max_axis(), 0);
        assert_eq!(Vec3::new(0.0, 2.0, 2.0).max_axis(), 1);
        assert_eq!(Vec3::new(0.0, 1.0, 2.0).max_axis(), 2);
    }

    #[test]
    fn clamp_components_is_symmetric() {
        let v = Vec3::new(10.0, -10.0, 0.5).clamp_components(2.0);
        assert_eq!(v.to_array(), [2.0, -2.0, 0.5]);
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_eq!(Vec3::UNIT_X.cross(&Vec3::UNIT_Y), Vec3::UNIT_Z);
    }
}
