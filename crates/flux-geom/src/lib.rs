// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![forbid(unsafe_code)]
#![doc = r"Geometry primitives and broad-phase collision detection for Flux.

This crate provides:
- Axis-aligned bounding boxes (`Aabb`) and the `Bounded` proxy trait.
- A `BroadPhase` trait with four fixed-capacity implementations that are
  rebuilt from scratch each tick: `Bvh`, `SpatialHash`, `SweepAndPrune`, and
  the all-pairs `BruteForce` reference.

Design notes:
- Every strategy reports the same pair set: each overlapping pair once,
  overlap inclusive on faces.
- Capacity overflow is logged through `tracing` and drops the excess; no
  buffer grows past its configured size.
- Float32 throughout; operations favor clarity and reproducibility.
"]

/// Broad-phase trait and implementations.
pub mod broad;
/// Foundational geometric types.
pub mod types;

pub use broad::{
    BroadPhase, BruteForce, BuildReport, Bvh, BvhNode, CapacityError, SpatialHash, SweepAndPrune,
    MAX_HASH_ENTRIES, MAX_PROXIES,
};
pub use types::aabb::Aabb;
pub use types::bounded::Bounded;
