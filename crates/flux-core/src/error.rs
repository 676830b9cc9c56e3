// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error types for body construction and configuration.
//!
//! Capacity overflow uses [`flux_geom::CapacityError`] so the object list and
//! the broad-phase structures report it the same way.

use thiserror::Error;

pub use flux_geom::CapacityError;

/// Rejected rigid-body parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BodyError {
    /// Mass must be finite and strictly positive; `inv_mass` is `1 / mass`.
    #[error("mass must be finite and positive, got {0}")]
    InvalidMass(f32),
    /// Shape dimensions must be finite, radii strictly positive.
    #[error("invalid shape: {0}")]
    InvalidShape(&'static str),
}

/// Error type for loading or validating a [`crate::PhysicsConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field holds a value the simulation cannot run with.
    #[error("invalid config field `{field}`: {reason}")]
    Invalid {
        /// Offending field name.
        field: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// Serialization/deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
