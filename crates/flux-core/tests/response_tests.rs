// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs, clippy::unwrap_used)]
//! Impulse response: restitution, momentum, and degenerate contacts.

use flux_core::{respond, sphere_sphere, ResponseParams, RigidBody, Shape};
use flux_math::Vec3;
use proptest::prelude::*;

fn ball(x: f32, vx: f32) -> RigidBody {
    RigidBody::sphere(1.0, 1.0, Vec3::new(x, 0.0, 0.0))
        .unwrap()
        .with_velocity(Vec3::new(vx, 0.0, 0.0))
}

fn total_momentum(a: &RigidBody, b: &RigidBody) -> Vec3 {
    a.momentum().add(&b.momentum())
}

#[test]
fn head_on_unit_spheres_rebound_with_restitution() {
    let mut a = ball(-0.9, 1.0);
    let mut b = ball(0.9, -1.0);
    let energy = a.kinetic_energy() + b.kinetic_energy();
    let p = total_momentum(&a, &b);

    let speed = sphere_sphere(&mut a, &mut b, 1.0, 1.0, &ResponseParams::default());

    assert!((speed - 2.0f32.sqrt()).abs() < 1e-6);
    assert!((a.velocity.x() + 0.8).abs() < 1e-6);
    assert!((b.velocity.x() - 0.8).abs() < 1e-6);
    assert_eq!(a.angular_velocity, Vec3::ZERO);
    assert!(a.kinetic_energy() + b.kinetic_energy() < energy);
    assert!(total_momentum(&a, &b).sub(&p).length() < 1e-6);
}

#[test]
fn separating_overlap_is_left_alone() {
    let mut a = ball(-0.5, -1.0);
    let mut b = ball(0.5, 1.0);
    assert_eq!(sphere_sphere(&mut a, &mut b, 1.0, 1.0, &ResponseParams::default()), 0.0);
    assert_eq!(a.velocity.x(), -1.0);
    assert_eq!(b.velocity.x(), 1.0);
}

#[test]
fn glancing_contact_transfers_spin_and_keeps_momentum() {
    let mut a = ball(0.0, 0.0).with_velocity(Vec3::new(0.0, 3.0, 0.0));
    let mut b = ball(1.8, 0.0);
    b.velocity = Vec3::new(-1.0, -3.0, 0.0);
    let p = total_momentum(&a, &b);

    let speed = sphere_sphere(&mut a, &mut b, 1.0, 1.0, &ResponseParams::default());

    assert!(speed > 0.0);
    assert!(total_momentum(&a, &b).sub(&p).length() < 1e-5);
    // Tangential slip along y at a contact on the x axis spins both about z.
    assert!(a.angular_velocity.z() != 0.0);
    assert!(b.angular_velocity.z() != 0.0);
}

#[test]
fn capsules_respond_as_bounding_spheres() {
    let shape = Shape::Capsule {
        radius: 0.5,
        axis: Vec3::new(0.0, 0.5, 0.0),
    };
    let mut a = RigidBody::new(shape, 1.0, Vec3::new(-0.9, 0.0, 0.0))
        .unwrap()
        .with_velocity(Vec3::UNIT_X);
    let mut b = RigidBody::new(shape, 1.0, Vec3::new(0.9, 0.0, 0.0))
        .unwrap()
        .with_velocity(Vec3::UNIT_X.neg());
    assert!(respond(&mut a, &mut b, &ResponseParams::default()) > 0.0);
    assert!(a.velocity.x() < 0.0 && b.velocity.x() > 0.0);
}

#[test]
fn elastic_params_preserve_energy_head_on() {
    let params = ResponseParams {
        restitution: 1.0,
        ..ResponseParams::default()
    };
    let mut a = ball(-0.9, 2.0);
    let mut b = ball(0.9, 0.0);
    sphere_sphere(&mut a, &mut b, 1.0, 1.0, &params);
    assert!(a.velocity.x().abs() < 1e-6);
    assert!((b.velocity.x() - 2.0).abs() < 1e-6);
}

proptest! {
    #[test]
    fn head_on_closing_speed_scales_by_restitution(
        va in 0.01f32..20.0,
        vb in 0.01f32..20.0,
        gap in 0.0f32..1.99,
        e in 0.0f32..1.0,
    ) {
        prop_assume!(gap > 1e-3);
        let params = ResponseParams { restitution: e, ..ResponseParams::default() };
        let mut a = ball(-gap * 0.5, va);
        let mut b = ball(gap * 0.5, -vb);
        let p = total_momentum(&a, &b);
        let before = b.velocity.x() - a.velocity.x();

        let speed = sphere_sphere(&mut a, &mut b, 1.0, 1.0, &params);

        let after = b.velocity.x() - a.velocity.x();
        prop_assert!((speed - (-before).sqrt()).abs() < 1e-4);
        prop_assert!((after - (-e * before)).abs() < 1e-3 * (1.0 + before.abs()));
        prop_assert!(total_momentum(&a, &b).sub(&p).length() < 1e-3);
        prop_assert!(a.velocity.is_finite() && b.velocity.is_finite());
    }

    #[test]
    fn solver_never_produces_nan(
        pa in prop::array::uniform3(-2.0f32..2.0),
        pb in prop::array::uniform3(-2.0f32..2.0),
        va in prop::array::uniform3(-50.0f32..50.0),
        wa in prop::array::uniform3(-50.0f32..50.0),
        radius in 0.1f32..2.0,
    ) {
        let mut a = RigidBody::sphere(radius, 2.0, Vec3::from(pa))
            .unwrap()
            .with_velocity(Vec3::from(va))
            .with_angular_velocity(Vec3::from(wa));
        let crate_shape = Shape::Box { half_extents: Vec3::splat(radius) };
        let mut b = RigidBody::new(crate_shape, 5.0, Vec3::from(pb)).unwrap();
        let params = ResponseParams::default();
        let s1 = respond(&mut a, &mut b, &params);
        let s2 = respond(&mut b, &mut a, &params);
        prop_assert!(s1.is_finite() && s2.is_finite());
        prop_assert!(a.velocity.is_finite() && a.angular_velocity.is_finite());
        prop_assert!(b.velocity.is_finite() && a.position.is_finite());
    }
}
