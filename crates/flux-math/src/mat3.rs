// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use crate::{Quat, Vec3};

/// Column-major 3×3 matrix, used for rotations derived from [`Quat`].
///
/// # Examples
/// ```
/// use flux_math::{Mat3, Vec3};
/// let m = Mat3::identity();
/// let v = Vec3::new(1.0, 2.0, 3.0);
/// assert_eq!(m.transform(&v), v);
/// ```
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Mat3 {
    data: [f32; 9],
}

impl Mat3 {
    /// Returns the identity matrix.
    pub const fn identity() -> Self {
        Self {
            data: [
                1.0, 0.0, 0.0, // col 0
                0.0, 1.0, 0.0, // col 1
                0.0, 0.0, 1.0, // col 2
            ],
        }
    }

    /// Creates a matrix from column-major storage.
    pub const fn new(data: [f32; 9]) -> Self {
        Self { data }
    }

    /// Constructs a rotation matrix from a quaternion.
    pub fn from_quat(q: &Quat) -> Self {
        q.to_mat3()
    }

    /// Returns the column-major storage.
    pub fn to_array(self) -> [f32; 9] {
        self.data
    }

    /// Element at `(row, col)`.
    pub fn at(&self, row: usize, col: usize) -> f32 {
        self.data[(col % 3) * 3 + row % 3]
    }

    /// Multiplies the matrix by a column vector.
    pub fn transform(&self, v: &Vec3) -> Vec3 {
        let [x, y, z] = v.to_array();
        Vec3::new(
            self.at(0, 0) * x + self.at(0, 1) * y + self.at(0, 2) * z,
            self.at(1, 0) * x + self.at(1, 1) * y + self.at(1, 2) * z,
            self.at(2, 0) * x + self.at(2, 1) * y + self.at(2, 2) * z,
        )
    }

    /// Element-wise absolute value.
    ///
    /// `abs(R) * h` is the world half-extent of an oriented box with local
    /// half-extents `h`.
    pub fn abs(&self) -> Self {
        let mut data = self.data;
        for v in &mut data {
            *v = v.abs();
        }
        Self { data }
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::identity()
    }
}
