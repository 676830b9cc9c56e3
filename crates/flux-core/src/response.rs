// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Impulse-based collision response.
//!
//! Every solver returns the closing speed along the contact normal as
//! `sqrt(-v_rel·n)`, or `0.0` when no impulse was applied (no contact, already
//! separating, or a degenerate configuration). Sphere-box contacts may still
//! correct positions when they return `0.0`. Callers use the value to scale
//! gameplay effects; it is never NaN.

use flux_geom::Aabb;
use flux_math::{Vec3, EPSILON};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::body::{RigidBody, Shape};

/// Restitution and friction coefficients.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseParams {
    /// Sphere-sphere coefficient of restitution.
    pub restitution: f32,
    /// Sphere-box coefficient of restitution.
    pub box_restitution: f32,
    /// Coulomb friction coefficient for sphere-sphere contacts.
    pub friction: f32,
}

impl Default for ResponseParams {
    fn default() -> Self {
        Self {
            restitution: 0.8,
            box_restitution: 0.6,
            friction: 0.5,
        }
    }
}

/// Applies `impulse` to `b` and its negation to `a` at the given lever arms.
fn apply_pair_impulse(
    a: &mut RigidBody,
    b: &mut RigidBody,
    lever_a: Vec3,
    lever_b: Vec3,
    impulse: &Vec3,
) {
    a.apply_impulse(impulse.neg(), lever_a);
    b.apply_impulse(*impulse, lever_b);
}

fn effective_inv_mass(
    a: &RigidBody,
    b: &RigidBody,
    lever_a: &Vec3,
    lever_b: &Vec3,
    dir: &Vec3,
) -> f32 {
    a.inv_mass()
        + b.inv_mass()
        + a.inv_inertia() * lever_a.cross(dir).length_squared()
        + b.inv_inertia() * lever_b.cross(dir).length_squared()
}

/// Resolves a contact between two spheres of radii `radius_a` / `radius_b`
/// centred on the bodies.
///
/// The normal points from `a` to `b` and the contact point sits on `a`'s
/// surface. A restitution impulse is applied first, then a Coulomb friction
/// impulse clamped to `friction · j`. Both act on linear and angular
/// velocity of both bodies; linear momentum is conserved.
pub fn sphere_sphere(
    a: &mut RigidBody,
    b: &mut RigidBody,
    radius_a: f32,
    radius_b: f32,
    params: &ResponseParams,
) -> f32 {
    let delta = b.position.sub(&a.position);
    let reach = radius_a + radius_b;
    let dist_sq = delta.length_squared();
    if dist_sq > reach * reach {
        return 0.0;
    }
    let dist = dist_sq.sqrt();
    if dist <= EPSILON {
        // Coincident centres: no usable normal.
        return 0.0;
    }
    let normal = delta.scale(1.0 / dist);
    let contact = a.position.add_scaled(&normal, radius_a);
    let lever_a = contact.sub(&a.position);
    let lever_b = contact.sub(&b.position);

    let v_rel = b.point_velocity(&lever_b).sub(&a.point_velocity(&lever_a));
    let closing = v_rel.dot(&normal);
    if closing >= 0.0 {
        return 0.0;
    }
    let denom = effective_inv_mass(a, b, &lever_a, &lever_b, &normal);
    if denom <= EPSILON {
        return 0.0;
    }
    let j = -(1.0 + params.restitution) * closing / denom;
    apply_pair_impulse(a, b, lever_a, lever_b, &normal.scale(j));

    let v_rel = b.point_velocity(&lever_b).sub(&a.point_velocity(&lever_a));
    let tangent = v_rel.add_scaled(&normal, -v_rel.dot(&normal)).normalize();
    if tangent != Vec3::ZERO {
        let denom_t = effective_inv_mass(a, b, &lever_a, &lever_b, &tangent);
        if denom_t > EPSILON {
            let limit = (params.friction * j).max(0.0);
            let jt = (-v_rel.dot(&tangent) / denom_t).clamp(-limit, limit);
            apply_pair_impulse(a, b, lever_a, lever_b, &tangent.scale(jt));
        }
    }

    trace!(j, closing, "sphere-sphere impulse");
    (-closing).sqrt()
}

/// Normal and penetration for a sphere whose centre lies inside `bounds`:
/// push out through the nearest face.
fn inside_normal(bounds: &Aabb, center: &Vec3, radius: f32) -> (Vec3, f32) {
    let mut best = (Vec3::UNIT_X, f32::INFINITY);
    for axis in 0..3 {
        let to_min = center.axis(axis) - bounds.min().axis(axis);
        let to_max = bounds.max().axis(axis) - center.axis(axis);
        let (depth, sign) = if to_max <= to_min {
            (to_max, 1.0)
        } else {
            (to_min, -1.0)
        };
        if depth < best.1 {
            best = (Vec3::ZERO.with_axis(axis, sign), depth);
        }
    }
    (best.0, radius + best.1)
}

/// Resolves a sphere (on `sphere`, radius `radius`) against an axis-aligned
/// box centred on `boxed` with `half_extents`.
///
/// Positional correction splits the penetration evenly between both bodies
/// and happens before the separating check. The impulse ignores lever arms;
/// only the sphere picks up spin, from friction at its contact point.
pub fn sphere_aabb(
    sphere: &mut RigidBody,
    radius: f32,
    boxed: &mut RigidBody,
    half_extents: Vec3,
    params: &ResponseParams,
) -> f32 {
    let bounds = Aabb::from_center_half_extents(boxed.position, half_extents);
    let closest = bounds.closest_point(&sphere.position);
    let delta = sphere.position.sub(&closest);
    let dist_sq = delta.length_squared();
    if dist_sq > radius * radius {
        return 0.0;
    }
    let (normal, penetration) = if dist_sq > EPSILON * EPSILON {
        let dist = dist_sq.sqrt();
        (delta.scale(1.0 / dist), radius - dist)
    } else {
        inside_normal(&bounds, &sphere.position, radius)
    };

    sphere.position = sphere.position.add_scaled(&normal, 0.5 * penetration);
    boxed.position = boxed.position.add_scaled(&normal, -0.5 * penetration);

    let v_rel = sphere.velocity.sub(&boxed.velocity);
    let closing = v_rel.dot(&normal);
    if closing >= 0.0 {
        return 0.0;
    }
    let inv_sum = sphere.inv_mass() + boxed.inv_mass();
    if inv_sum <= EPSILON {
        return 0.0;
    }
    let j = -(1.0 + params.box_restitution) * closing / inv_sum;
    let impulse = normal.scale(j);
    sphere.velocity = sphere.velocity.add_scaled(&impulse, sphere.inv_mass());
    boxed.velocity = boxed.velocity.add_scaled(&impulse, -boxed.inv_mass());

    let lever = normal.scale(-radius);
    let slip = sphere.point_velocity(&lever).sub(&boxed.velocity);
    let slip = slip.add_scaled(&normal, -slip.dot(&normal)).normalize();
    let friction = slip.scale(-params.friction * j);
    sphere.angular_velocity = sphere
        .angular_velocity
        .add_scaled(&lever.cross(&friction), sphere.inv_inertia());

    trace!(j, closing, penetration, "sphere-box impulse");
    (-closing).sqrt()
}

/// Picks a solver for the shape pair and applies it.
///
/// Boxes respond as axis-aligned boxes and capsules as their bounding
/// spheres. Box-box contacts are not resolved and return `0.0`.
pub fn respond(a: &mut RigidBody, b: &mut RigidBody, params: &ResponseParams) -> f32 {
    match (a.shape(), b.shape()) {
        (Shape::Box { .. }, Shape::Box { .. }) => {
            trace!("box-box contact left unresolved");
            0.0
        }
        (Shape::Box { half_extents }, other) => match other.sphere_radius() {
            Some(radius) => sphere_aabb(b, radius, a, half_extents, params),
            None => 0.0,
        },
        (other, Shape::Box { half_extents }) => match other.sphere_radius() {
            Some(radius) => sphere_aabb(a, radius, b, half_extents, params),
            None => 0.0,
        },
        (sa, sb) => match (sa.sphere_radius(), sb.sphere_radius()) {
            (Some(ra), Some(rb)) => sphere_sphere(a, b, ra, rb, params),
            _ => 0.0,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sphere_at(x: f32, vx: f32) -> RigidBody {
        RigidBody::sphere(1.0, 1.0, Vec3::new(x, 0.0, 0.0))
            .unwrap()
            .with_velocity(Vec3::new(vx, 0.0, 0.0))
    }

    #[test]
    fn distant_spheres_are_ignored() {
        let mut a = sphere_at(-5.0, 1.0);
        let mut b = sphere_at(5.0, -1.0);
        let params = ResponseParams::default();
        assert_eq!(sphere_sphere(&mut a, &mut b, 1.0, 1.0, &params), 0.0);
        assert_eq!(a.velocity.x(), 1.0);
    }

    #[test]
    fn coincident_centres_do_not_produce_nan() {
        let mut a = sphere_at(0.0, 1.0);
        let mut b = sphere_at(0.0, -1.0);
        let params = ResponseParams::default();
        assert_eq!(sphere_sphere(&mut a, &mut b, 1.0, 1.0, &params), 0.0);
        assert!(a.velocity.is_finite() && b.velocity.is_finite());
    }

    #[test]
    fn sphere_bounces_off_box_face() {
        let mut ball = sphere_at(1.5, -1.0);
        let mut crate_ = RigidBody::new(
            Shape::Box {
                half_extents: Vec3::splat(1.0),
            },
            1.0,
            Vec3::ZERO,
        )
        .unwrap();
        let params = ResponseParams::default();
        let speed = sphere_aabb(&mut ball, 1.0, &mut crate_, Vec3::splat(1.0), &params);
        assert!((speed - 1.0).abs() < 1e-6);
        // 0.5 penetration split evenly.
        assert!((ball.position.x() - 1.75).abs() < 1e-6);
        assert!((crate_.position.x() + 0.25).abs() < 1e-6);
        // j = 1.6 · 1 / 2
        assert!((ball.velocity.x() + 0.2).abs() < 1e-6);
        assert!((crate_.velocity.x() + 0.8).abs() < 1e-6);
        assert_eq!(ball.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn separating_sphere_is_pushed_out_without_impulse() {
        let mut ball = sphere_at(1.5, 1.0);
        let mut crate_ = RigidBody::new(
            Shape::Box {
                half_extents: Vec3::splat(1.0),
            },
            1.0,
            Vec3::ZERO,
        )
        .unwrap();
        let params = ResponseParams::default();
        let speed = sphere_aabb(&mut ball, 1.0, &mut crate_, Vec3::splat(1.0), &params);
        assert_eq!(speed, 0.0);
        assert_eq!(ball.velocity, Vec3::UNIT_X);
        assert_eq!(crate_.velocity, Vec3::ZERO);
        // Still overlapping by 0.5, so each side moves 0.25.
        assert!((ball.position.x() - 1.75).abs() < 1e-6);
        assert!((crate_.position.x() + 0.25).abs() < 1e-6);
    }

    #[test]
    fn centre_inside_box_pushes_out_nearest_face() {
        let bounds = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::new(2.0, 1.0, 2.0));
        let (n, depth) = inside_normal(&bounds, &Vec3::new(0.0, -0.75, 0.5), 0.5);
        assert_eq!(n, Vec3::new(0.0, -1.0, 0.0));
        assert!((depth - 0.75).abs() < 1e-6);
    }

    #[test]
    fn sliding_sphere_picks_up_spin_from_box() {
        let mut ball = RigidBody::sphere(1.0, 1.0, Vec3::new(0.0, 1.9, 0.0))
            .unwrap()
            .with_velocity(Vec3::new(2.0, -1.0, 0.0));
        let mut floor = RigidBody::new(
            Shape::Box {
                half_extents: Vec3::new(10.0, 1.0, 10.0),
            },
            1.0,
            Vec3::ZERO,
        )
        .unwrap();
        let half = Vec3::new(10.0, 1.0, 10.0);
        let speed = sphere_aabb(&mut ball, 1.0, &mut floor, half, &ResponseParams::default());
        assert!(speed > 0.0);
        // Sliding +x over a floor below: friction at the bottom spins it about -z.
        assert!(ball.angular_velocity.z() < 0.0);
        assert_eq!(floor.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn box_pairs_are_not_resolved() {
        let shape = Shape::Box {
            half_extents: Vec3::splat(1.0),
        };
        let mut a = RigidBody::new(shape, 1.0, Vec3::ZERO)
            .unwrap()
            .with_velocity(Vec3::UNIT_X);
        let mut b = RigidBody::new(shape, 1.0, Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert_eq!(respond(&mut a, &mut b, &ResponseParams::default()), 0.0);
        assert_eq!(a.velocity, Vec3::UNIT_X);
    }

    #[test]
    fn dispatch_orders_sphere_and_box() {
        let mut crate_ = RigidBody::new(
            Shape::Box {
                half_extents: Vec3::splat(1.0),
            },
            1.0,
            Vec3::ZERO,
        )
        .unwrap();
        let mut ball = sphere_at(1.5, -1.0);
        let speed = respond(&mut crate_, &mut ball, &ResponseParams::default());
        assert!((speed - 1.0).abs() < 1e-6);
        assert!(ball.position.x() > 1.5);
    }
}
