// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Simulation configuration, loadable from JSON.

use flux_geom::{MAX_HASH_ENTRIES, MAX_PROXIES};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::integrator::{Constraints, MAX_DT};
use crate::response::ResponseParams;

/// Broad-phase strategy a [`crate::PhysicsWorld`] runs each tick.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadPhaseKind {
    /// Bounding-volume hierarchy.
    #[default]
    Bvh,
    /// Uniform-grid spatial hash.
    SpatialHash,
    /// 3-axis sweep-and-prune.
    SweepAndPrune,
    /// All-pairs reference.
    BruteForce,
}

/// Tunables for a [`crate::PhysicsWorld`].
///
/// Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Object list and broad-phase capacity.
    pub max_objects: usize,
    /// Largest timestep taken per integration step, seconds.
    pub max_dt: f32,
    /// Per-component velocity limit, m/s.
    pub max_speed: f32,
    /// Radius of the spherical world boundary.
    pub world_radius: f32,
    /// Collision response coefficients.
    pub response: ResponseParams,
    /// Strategy used by `PhysicsWorld::step`.
    pub broad_phase: BroadPhaseKind,
    /// Most proxies per BVH leaf.
    pub bvh_leaf_size: usize,
    /// Spatial-hash cell edge; should be at least the largest AABB edge.
    pub hash_cell_size: f32,
    /// Number of spatial-hash buckets.
    pub hash_table_size: usize,
    /// Entries per spatial-hash bucket.
    pub hash_bucket_capacity: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        let limits = Constraints::default();
        Self {
            max_objects: 1024,
            max_dt: MAX_DT,
            max_speed: limits.max_speed,
            world_radius: limits.world_radius,
            response: ResponseParams::default(),
            broad_phase: BroadPhaseKind::default(),
            bvh_leaf_size: 4,
            hash_cell_size: 8.0,
            hash_table_size: 4096,
            hash_bucket_capacity: 64,
        }
    }
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

impl PhysicsConfig {
    /// Deserializes and validates a JSON config.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_slice(bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Deserializes and validates a JSON config string.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Self::from_json_slice(text.as_bytes())
    }

    /// Pretty-printed JSON.
    pub fn to_json_vec(&self) -> Result<Vec<u8>, ConfigError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Rejects values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_objects == 0 {
            return Err(invalid("max_objects", "must be at least 1"));
        }
        if self.max_objects > MAX_PROXIES {
            return Err(invalid("max_objects", "exceeds the broad-phase proxy limit"));
        }
        if !positive(self.max_dt) {
            return Err(invalid("max_dt", "must be finite and positive"));
        }
        if !positive(self.max_speed) {
            return Err(invalid("max_speed", "must be finite and positive"));
        }
        if !positive(self.world_radius) {
            return Err(invalid("world_radius", "must be finite and positive"));
        }
        let coefficient = |c: f32| c.is_finite() && (0.0..=1.0).contains(&c);
        if !coefficient(self.response.restitution) {
            return Err(invalid("response.restitution", "must be within [0, 1]"));
        }
        if !coefficient(self.response.box_restitution) {
            return Err(invalid("response.box_restitution", "must be within [0, 1]"));
        }
        if !(self.response.friction.is_finite() && self.response.friction >= 0.0) {
            return Err(invalid("response.friction", "must be finite and non-negative"));
        }
        if self.bvh_leaf_size == 0 {
            return Err(invalid("bvh_leaf_size", "must be at least 1"));
        }
        if !positive(self.hash_cell_size) {
            return Err(invalid("hash_cell_size", "must be finite and positive"));
        }
        if self.hash_table_size == 0 || self.hash_bucket_capacity == 0 {
            return Err(invalid("hash_table_size", "table and buckets must be non-empty"));
        }
        let entries = self.hash_table_size.checked_mul(self.hash_bucket_capacity);
        if !entries.is_some_and(|n| n <= MAX_HASH_ENTRIES) {
            return Err(invalid("hash_table_size", "table_size * bucket_capacity is too large"));
        }
        Ok(())
    }

    /// Integrator limits derived from this config.
    pub fn constraints(&self) -> Constraints {
        Constraints {
            max_speed: self.max_speed,
            world_radius: self.world_radius,
        }
    }
}
