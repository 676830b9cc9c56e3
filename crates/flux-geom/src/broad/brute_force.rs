// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use tracing::warn;

use crate::broad::{BroadPhase, BuildReport, CapacityError};
use crate::types::{aabb::Aabb, bounded::Bounded};

/// `O(n^2)` all-pairs broad-phase.
///
/// Serves as the correctness baseline the accelerated structures are
/// cross-checked against, and is a reasonable choice for a handful of bodies.
/// Pairs are emitted in ascending `(i, j)` order with `i < j`.
#[derive(Debug, Clone)]
pub struct BruteForce {
    max_objects: usize,
    items: Vec<Aabb>,
}

impl BruteForce {
    /// Creates an empty pairing list holding at most `max_objects` proxies.
    #[must_use]
    pub fn new(max_objects: usize) -> Self {
        Self {
            max_objects,
            items: Vec::with_capacity(max_objects),
        }
    }
}

impl BroadPhase for BruteForce {
    fn name(&self) -> &'static str {
        "brute_force"
    }

    fn build<T: Bounded>(&mut self, objects: &[T]) -> BuildReport {
        self.items.clear();
        let kept = objects.len().min(self.max_objects);
        self.items.extend(objects[..kept].iter().map(Bounded::aabb));
        let dropped = objects.len() - kept;
        if dropped > 0 {
            let err = CapacityError::Objects {
                capacity: self.max_objects,
            };
            warn!(%err, dropped, "brute-force broad-phase dropped proxies");
        }
        BuildReport::new(kept, dropped)
    }

    fn for_each_pair<T, F>(&mut self, _objects: &[T], mut on_pair: F)
    where
        T: Bounded,
        F: FnMut(usize, usize),
    {
        for (i, a) in self.items.iter().enumerate() {
            for (j, b) in self.items.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) {
                    on_pair(i, j);
                }
            }
        }
    }
}
