// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Semi-implicit rigid-body integration and world constraints.
//!
//! Linear motion uses the constant-acceleration update
//! `p += v·dt + ½·a·dt²`, `v += a·dt`. Orientation advances with a two-stage
//! midpoint step on `q̇ = ½·q⊗(0, ω)` and is renormalised every step.

use flux_math::{Quat, Vec3};
use tracing::trace;

use crate::body::RigidBody;

/// Largest timestep a single integration step will take, in seconds.
pub const MAX_DT: f32 = 0.016;

/// Advances `body` by `dt` seconds, clamped to `[0, MAX_DT]`.
pub fn integrate(body: &mut RigidBody, dt: f32) {
    integrate_with_limit(body, dt, MAX_DT);
}

/// Advances `body` by `dt` clamped to `[0, max_dt]`, then clears the force
/// and torque accumulators.
///
/// Non-finite `dt` is treated as zero.
pub fn integrate_with_limit(body: &mut RigidBody, dt: f32, max_dt: f32) {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, max_dt.max(0.0))
    } else {
        0.0
    };

    let accel = body.force.scale(body.inv_mass());
    body.position = body
        .position
        .add_scaled(&body.velocity, dt)
        .add_scaled(&accel, 0.5 * dt * dt);
    body.velocity = body.velocity.add_scaled(&accel, dt);
    body.angular_velocity = body
        .angular_velocity
        .add_scaled(&body.torque, body.inv_inertia() * dt);
    body.orientation = advance_orientation(&body.orientation, &body.angular_velocity, dt);

    body.force = Vec3::ZERO;
    body.torque = Vec3::ZERO;
}

/// `q̇ = ½ · q ⊗ (0, ω)`.
fn spin(q: &Quat, omega: &Vec3) -> Quat {
    q.multiply(&Quat::pure(*omega)).scale(0.5)
}

/// Midpoint step of `q` under constant angular velocity `omega`.
///
/// Always returns a unit quaternion; a degenerate result resets to identity.
pub fn advance_orientation(q: &Quat, omega: &Vec3, dt: f32) -> Quat {
    let mid = q.add(&spin(q, omega).scale(0.5 * dt));
    q.add(&spin(&mid, omega).scale(dt)).normalize()
}

/// Speed limit and spherical world boundary.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Constraints {
    /// Per-component velocity limit (m/s).
    pub max_speed: f32,
    /// Radius of the world sphere centred on the origin.
    pub world_radius: f32,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            max_speed: 500.0,
            world_radius: 5000.0,
        }
    }
}

/// Clamps velocity components and reflects bodies heading out of the world.
///
/// Outside the boundary only the outward normal component is reversed; a body
/// already moving back in is left alone. Returns `true` when a reflection was
/// applied.
pub fn apply_constraints(body: &mut RigidBody, constraints: &Constraints) -> bool {
    body.velocity = body.velocity.clamp_components(constraints.max_speed);

    let radius = constraints.world_radius;
    if body.position.length_squared() <= radius * radius {
        return false;
    }
    let normal = body.position.normalize();
    let outward = body.velocity.dot(&normal);
    if outward <= 0.0 {
        return false;
    }
    body.velocity = body.velocity.add_scaled(&normal, -2.0 * outward);
    trace!(outward, "reflected at world boundary");
    true
}
