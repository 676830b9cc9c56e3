// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Rigid bodies and their collision shapes.

use flux_geom::Aabb;
use flux_math::{Quat, Vec3, EPSILON};

use crate::error::BodyError;

/// Collision shape in body-local space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape {
    /// Sphere centred on the body position.
    Sphere {
        /// Radius in metres.
        radius: f32,
    },
    /// Box centred on the body position. Broad-phase bounds follow the body
    /// orientation (OBB); narrow-phase response treats it as axis-aligned.
    Box {
        /// Local half-extents.
        half_extents: Vec3,
    },
    /// Segment `±axis` (local) swept by `radius`.
    Capsule {
        /// Radius in metres.
        radius: f32,
        /// Local half-segment from the centre to one cap centre.
        axis: Vec3,
    },
}

impl Shape {
    fn validate(&self) -> Result<(), BodyError> {
        let radius_ok = |r: f32| r.is_finite() && r > 0.0;
        match self {
            Self::Sphere { radius } if !radius_ok(*radius) => {
                Err(BodyError::InvalidShape("sphere radius must be finite and positive"))
            }
            Self::Box { half_extents } if !half_extents.is_finite() => {
                Err(BodyError::InvalidShape("box half-extents must be finite"))
            }
            Self::Capsule { radius, axis } if !radius_ok(*radius) || !axis.is_finite() => Err(
                BodyError::InvalidShape("capsule radius must be positive and axis finite"),
            ),
            _ => Ok(()),
        }
    }

    /// Radius of the sphere the narrow-phase uses for this shape, if any.
    ///
    /// Capsules respond as their bounding sphere; boxes have none.
    pub fn sphere_radius(&self) -> Option<f32> {
        match self {
            Self::Sphere { radius } => Some(*radius),
            Self::Capsule { radius, axis } => Some(radius + axis.length()),
            Self::Box { .. } => None,
        }
    }

    /// Simplified scalar moment of inertia for a body of `mass`.
    ///
    /// - sphere: `2/5 · m · r²`
    /// - box: mean of the three principal moments, `2/9 · m · |h|²`
    /// - capsule: as its bounding sphere
    pub fn inertia(&self, mass: f32) -> f32 {
        match self {
            Self::Box { half_extents } => 2.0 / 9.0 * mass * half_extents.length_squared(),
            _ => {
                let r = self.sphere_radius().unwrap_or(0.0);
                0.4 * mass * r * r
            }
        }
    }

    /// World-space bounds at `position` with `orientation`.
    pub fn world_aabb(&self, position: Vec3, orientation: &Quat) -> Aabb {
        match self {
            Self::Sphere { radius } => {
                Aabb::from_center_half_extents(position, Vec3::splat(*radius))
            }
            Self::Box { half_extents } => {
                Aabb::from_oriented_box(position, *half_extents, &orientation.to_mat3())
            }
            Self::Capsule { radius, axis } => {
                let tip = orientation.rotate(axis);
                Aabb::new(position.add(&tip), position.sub(&tip)).inflate(*radius)
            }
        }
    }
}

/// A rigid body owned by gameplay code.
///
/// Kinematic state is public; mass and inertia are kept behind setters so the
/// cached inverses always match.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RigidBody {
    /// World-space centre of mass.
    pub position: Vec3,
    /// Linear velocity.
    pub velocity: Vec3,
    /// Force accumulator; cleared by every integration step.
    pub force: Vec3,
    /// Torque accumulator; cleared by every integration step.
    pub torque: Vec3,
    /// Unit quaternion orientation.
    pub orientation: Quat,
    /// Angular velocity (radians per second, world frame).
    pub angular_velocity: Vec3,
    mass: f32,
    inv_mass: f32,
    inertia: f32,
    inv_inertia: f32,
    shape: Shape,
}

impl RigidBody {
    /// Creates a body at rest at `position`.
    ///
    /// Rejects non-positive or non-finite mass and degenerate shapes.
    pub fn new(shape: Shape, mass: f32, position: Vec3) -> Result<Self, BodyError> {
        shape.validate()?;
        let mut body = Self {
            position,
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            orientation: Quat::identity(),
            angular_velocity: Vec3::ZERO,
            mass: 1.0,
            inv_mass: 1.0,
            inertia: 1.0,
            inv_inertia: 1.0,
            shape,
        };
        body.set_mass(mass)?;
        Ok(body)
    }

    /// Shorthand for a sphere body.
    pub fn sphere(radius: f32, mass: f32, position: Vec3) -> Result<Self, BodyError> {
        Self::new(Shape::Sphere { radius }, mass, position)
    }

    /// Sets the initial linear velocity.
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Sets the initial angular velocity.
    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Sets the orientation (normalised).
    pub fn with_orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation.normalize();
        self
    }

    /// Mass in kilograms.
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// `1 / mass`.
    pub fn inv_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Scalar moment of inertia.
    pub fn inertia(&self) -> f32 {
        self.inertia
    }

    /// `1 / inertia`, or zero for shapes with no rotational extent.
    pub fn inv_inertia(&self) -> f32 {
        self.inv_inertia
    }

    /// Collision shape.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Replaces mass (and the inertia derived from it).
    pub fn set_mass(&mut self, mass: f32) -> Result<(), BodyError> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(BodyError::InvalidMass(mass));
        }
        self.mass = mass;
        self.inv_mass = 1.0 / mass;
        self.inertia = self.shape.inertia(mass);
        self.inv_inertia = if self.inertia > EPSILON {
            1.0 / self.inertia
        } else {
            0.0
        };
        Ok(())
    }

    /// Replaces the shape, keeping mass and recomputing inertia.
    pub fn set_shape(&mut self, shape: Shape) -> Result<(), BodyError> {
        shape.validate()?;
        self.shape = shape;
        self.set_mass(self.mass)
    }

    /// Accumulates a force for the next integration step.
    pub fn apply_force(&mut self, force: Vec3) {
        self.force = self.force.add(&force);
    }

    /// Accumulates a torque for the next integration step.
    pub fn apply_torque(&mut self, torque: Vec3) {
        self.torque = self.torque.add(&torque);
    }

    /// Applies an instantaneous impulse at `offset` from the centre of mass.
    pub fn apply_impulse(&mut self, impulse: Vec3, offset: Vec3) {
        self.velocity = self.velocity.add_scaled(&impulse, self.inv_mass);
        self.angular_velocity = self
            .angular_velocity
            .add_scaled(&offset.cross(&impulse), self.inv_inertia);
    }

    /// Velocity of the material point at `offset` from the centre of mass.
    pub fn point_velocity(&self, offset: &Vec3) -> Vec3 {
        self.velocity.add(&self.angular_velocity.cross(offset))
    }

    /// Linear plus rotational kinetic energy.
    pub fn kinetic_energy(&self) -> f32 {
        0.5 * self.mass * self.velocity.length_squared()
            + 0.5 * self.inertia * self.angular_velocity.length_squared()
    }

    /// Linear momentum `m · v`.
    pub fn momentum(&self) -> Vec3 {
        self.velocity.scale(self.mass)
    }

    /// World-space bounds of the shape at the current pose.
    pub fn world_aabb(&self) -> Aabb {
        self.shape.world_aabb(self.position, &self.orientation)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_negative_mass_are_rejected() {
        assert_eq!(
            RigidBody::sphere(1.0, 0.0, Vec3::ZERO),
            Err(BodyError::InvalidMass(0.0))
        );
        assert!(RigidBody::sphere(1.0, -2.0, Vec3::ZERO).is_err());
        assert!(RigidBody::sphere(1.0, f32::NAN, Vec3::ZERO).is_err());
    }

    #[test]
    fn inverse_mass_matches_mass() {
        let mut body = RigidBody::sphere(0.5, 4.0, Vec3::ZERO).unwrap();
        assert_eq!(body.inv_mass(), 0.25);
        body.set_mass(8.0).unwrap();
        assert_eq!(body.inv_mass(), 0.125);
        assert!((body.inertia() - 0.4 * 8.0 * 0.25).abs() < 1e-6);
    }

    #[test]
    fn degenerate_shapes_are_rejected() {
        assert!(RigidBody::sphere(0.0, 1.0, Vec3::ZERO).is_err());
        let capsule = Shape::Capsule {
            radius: 1.0,
            axis: Vec3::new(f32::INFINITY, 0.0, 0.0),
        };
        assert!(RigidBody::new(capsule, 1.0, Vec3::ZERO).is_err());
    }

    #[test]
    fn flat_box_has_no_rotational_response() {
        let body = RigidBody::new(
            Shape::Box {
                half_extents: Vec3::ZERO,
            },
            1.0,
            Vec3::ZERO,
        )
        .unwrap();
        assert_eq!(body.inv_inertia(), 0.0);
    }

    #[test]
    fn rotated_box_bounds_grow() {
        let body = RigidBody::new(
            Shape::Box {
                half_extents: Vec3::new(2.0, 0.5, 0.5),
            },
            1.0,
            Vec3::ZERO,
        )
        .unwrap()
        .with_orientation(Quat::from_axis_angle(Vec3::UNIT_Z, core::f32::consts::FRAC_PI_2));
        let half = body.world_aabb().half_extents().to_array();
        assert!((half[0] - 0.5).abs() < 1e-5);
        assert!((half[1] - 2.0).abs() < 1e-5);
    }

    #[test]
    fn capsule_bounds_cover_both_caps() {
        let body = RigidBody::new(
            Shape::Capsule {
                radius: 0.5,
                axis: Vec3::new(0.0, 1.5, 0.0),
            },
            1.0,
            Vec3::new(10.0, 0.0, 0.0),
        )
        .unwrap();
        let b = body.world_aabb();
        assert_eq!(b.min().to_array(), [9.5, -2.0, -0.5]);
        assert_eq!(b.max().to_array(), [10.5, 2.0, 0.5]);
    }
}
