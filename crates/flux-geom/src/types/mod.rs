// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Core geometry types used by the broad-phase (AABB, bounded proxies).
//!
//! Overlap semantics are inclusive on faces; every broad-phase strategy in
//! this crate agrees on that so their pair sets are interchangeable.

#[doc = "Axis-aligned bounding boxes (world space)."]
pub mod aabb;
#[doc = "The `Bounded` proxy trait consumed by every broad-phase."]
pub mod bounded;
