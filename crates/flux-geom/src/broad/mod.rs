// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Broad-phase interfaces and four interchangeable implementations.
//!
//! Contract (applies to every implementation here):
//! - Structures are rebuilt from scratch each tick with [`BroadPhase::build`];
//!   nothing persists between frames.
//! - Storage is fixed-capacity. Overflow is reported in the [`BuildReport`],
//!   logged, and the excess is dropped; buffers never grow past their limit.
//! - [`BroadPhase::for_each_pair`] streams pairs of indices into the slice
//!   given to `build`. Every pair whose AABBs overlap (inclusive on faces) is
//!   reported exactly once, never as `(i, i)`.

use thiserror::Error;

use crate::types::bounded::Bounded;

#[doc = "All-pairs reference implementation."]
pub mod brute_force;
#[doc = "Bounding-volume hierarchy with midpoint splits."]
pub mod bvh;
#[doc = "3-axis sweep-and-prune with per-axis overlap bitsets."]
pub mod sap;
#[doc = "Uniform-grid spatial hash."]
pub mod spatial_hash;

pub use brute_force::BruteForce;
pub use bvh::{Bvh, BvhNode};
pub use sap::SweepAndPrune;
pub use spatial_hash::SpatialHash;

/// Most proxies a broad phase is meant to be sized for. Proxy and node
/// indices are stored as `u32`, and the BVH arena holds `2 * max_objects`.
pub const MAX_PROXIES: usize = 1 << 20;

/// Most spatial-hash entries (`table_size * bucket_capacity`) worth
/// preallocating.
pub const MAX_HASH_ENTRIES: usize = 1 << 24;

/// A fixed-capacity buffer refused an entry.
///
/// Never fatal: the offending entry is dropped and the structure stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CapacityError {
    /// More proxies than a structure was sized for.
    #[error("object capacity exceeded (capacity {capacity})")]
    Objects {
        /// Configured maximum.
        capacity: usize,
    },
    /// A spatial-hash bucket is full.
    #[error("spatial hash bucket {bucket} full (capacity {capacity})")]
    HashBucket {
        /// Bucket index within the table.
        bucket: usize,
        /// Entries per bucket.
        capacity: usize,
    },
}

/// Outcome of a rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Proxies that made it into the structure.
    pub inserted: usize,
    /// Proxies dropped for lack of capacity.
    pub dropped: usize,
}

impl BuildReport {
    /// Report for a build that kept `inserted` and dropped `dropped`.
    pub const fn new(inserted: usize, dropped: usize) -> Self {
        Self { inserted, dropped }
    }
}

/// Broad-phase interface: rebuild from a proxy slice, then stream overlapping
/// index pairs into a callback.
pub trait BroadPhase {
    /// Short, stable strategy name for logs.
    fn name(&self) -> &'static str;

    /// Rebuilds the structure from `objects`, discarding previous state.
    fn build<T: Bounded>(&mut self, objects: &[T]) -> BuildReport;

    /// Invokes `on_pair(i, j)` once per overlapping pair.
    ///
    /// `objects` must be the slice passed to the preceding [`BroadPhase::build`].
    fn for_each_pair<T, F>(&mut self, objects: &[T], on_pair: F)
    where
        T: Bounded,
        F: FnMut(usize, usize);

    /// Collects pairs canonicalised as `(min, max)` and sorted ascending.
    fn pairs<T: Bounded>(&mut self, objects: &[T]) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        self.for_each_pair(objects, |a, b| out.push((a.min(b), a.max(b))));
        out.sort_unstable();
        out
    }
}
