// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
use flux_math::{Mat3, Quat, Vec3};
use proptest::prelude::*;

fn approx_eq(a: f32, b: f32, tol: f32) {
    let diff = (a - b).abs();
    assert!(diff <= tol, "expected {b}, got {a} (diff {diff})");
}

#[test]
fn vec3_normalize_degenerate_returns_zero() {
    let v = Vec3::new(1e-12, -1e-12, 0.0);
    assert_eq!(v.normalize().to_array(), [0.0, 0.0, 0.0]);
}

#[test]
fn quat_identity_properties() {
    let id = Quat::identity();
    assert_eq!(id.multiply(&id).to_array(), id.to_array());
    assert_eq!(id.to_mat3(), Mat3::identity());
}

#[test]
fn quat_negated_angle_undoes_rotation() {
    let axis = Vec3::new(1.0, 2.0, 3.0);
    let q = Quat::from_axis_angle(axis, 0.7);
    let inverse = Quat::from_axis_angle(axis, -0.7);
    let v = Vec3::new(-4.0, 0.5, 2.0);
    let back = inverse.rotate(&q.rotate(&v)).to_array();
    for (got, want) in back.iter().zip(v.to_array()) {
        approx_eq(*got, want, 1e-5);
    }
}

#[test]
fn abs_rotation_bounds_rotated_box() {
    // A unit cube rotated 45° about Z spans sqrt(2) on X and Y.
    let q = Quat::from_axis_angle(Vec3::UNIT_Z, core::f32::consts::FRAC_PI_4);
    let half = q.to_mat3().abs().transform(&Vec3::splat(1.0)).to_array();
    approx_eq(half[0], 2.0f32.sqrt(), 1e-5);
    approx_eq(half[1], 2.0f32.sqrt(), 1e-5);
    approx_eq(half[2], 1.0, 1e-6);
}

proptest! {
    #[test]
    fn rotation_preserves_length(
        axis in prop::array::uniform3(-10.0f32..10.0),
        angle in -6.3f32..6.3,
        v in prop::array::uniform3(-100.0f32..100.0),
    ) {
        let q = Quat::from_axis_angle(Vec3::from(axis), angle);
        let v = Vec3::from(v);
        let rotated = q.rotate(&v);
        prop_assert!((rotated.length() - v.length()).abs() <= 1e-3 * (1.0 + v.length()));
    }

    #[test]
    fn normalize_yields_unit_quaternion(c in prop::array::uniform4(-50.0f32..50.0)) {
        let q = Quat::from(c);
        prop_assume!(q.length() > 1e-3);
        prop_assert!((q.normalize().length() - 1.0).abs() < 1e-5);
    }
}
