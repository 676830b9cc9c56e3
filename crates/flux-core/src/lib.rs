// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![forbid(unsafe_code)]
#![doc = r"Rigid-body core for Flux.

A caller owns a slice of [`RigidBody`] values and registers the ones to
simulate with a [`PhysicsWorld`]. Each [`PhysicsWorld::step`]:

1. integrates every registered body (force and torque accumulators are
   cleared; `dt` is clamped to `max_dt`),
2. applies the speed limit and spherical world boundary,
3. rebuilds the configured broad phase from fresh bounds,
4. hands each overlapping pair to a callback as a [`Contact`], which may call
   [`Contact::respond`] for the default impulse response.

The integrator and solvers are also usable on their own: see [`integrate`],
[`apply_constraints`], [`sphere_sphere`], [`sphere_aabb`] and [`respond`].
"]

/// Rigid bodies and shapes.
pub mod body;
/// World configuration.
pub mod config;
/// Error types.
pub mod error;
/// Integration and world constraints.
pub mod integrator;
/// Per-tick object registry.
pub mod object;
/// Impulse collision response.
pub mod response;
/// Simulation context.
pub mod world;

pub use body::{RigidBody, Shape};
pub use config::{BroadPhaseKind, PhysicsConfig};
pub use error::{BodyError, CapacityError, ConfigError};
pub use integrator::{
    advance_orientation, apply_constraints, integrate, integrate_with_limit, Constraints, MAX_DT,
};
pub use object::{ObjectKind, ObjectList, PhysicsObject};
pub use response::{respond, sphere_aabb, sphere_sphere, ResponseParams};
pub use world::{Contact, PhysicsWorld, StepStats};
