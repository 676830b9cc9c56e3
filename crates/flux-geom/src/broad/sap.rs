// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::cmp::Ordering;

use tracing::{debug, warn};

use crate::broad::{BroadPhase, BuildReport, CapacityError};
use crate::types::bounded::Bounded;

/// One interval end on a single axis.
#[derive(Debug, Clone, Copy)]
struct Endpoint {
    value: f32,
    is_max: bool,
    index: u32,
}

impl Endpoint {
    /// Value, then min-before-max, then proxy index. The min-first rule makes
    /// touching intervals count as overlapping, matching `Aabb::overlaps`.
    fn order(a: &Self, b: &Self) -> Ordering {
        a.value
            .total_cmp(&b.value)
            .then(a.is_max.cmp(&b.is_max))
            .then(a.index.cmp(&b.index))
    }
}

/// Sweep-and-prune over all three axes.
///
/// Each axis is swept independently into a dense, symmetric `N×N` overlap
/// bitset. A pair overlaps in 3D exactly when its bit survives the word-wise
/// AND of the three axes, so the result is exact rather than a single-axis
/// approximation.
#[derive(Debug, Clone)]
pub struct SweepAndPrune {
    max_objects: usize,
    endpoints: Vec<Endpoint>,
    active: Vec<u32>,
    axis_bits: [Vec<u64>; 3],
    words_per_row: usize,
    built_len: usize,
}

impl SweepAndPrune {
    /// Creates empty buffers for up to `max_objects` proxies.
    #[must_use]
    pub fn new(max_objects: usize) -> Self {
        Self {
            max_objects,
            endpoints: Vec::with_capacity(2 * max_objects),
            active: Vec::with_capacity(max_objects),
            axis_bits: [Vec::new(), Vec::new(), Vec::new()],
            words_per_row: 0,
            built_len: 0,
        }
    }

    fn sweep_axis<T: Bounded>(&mut self, axis: usize, objects: &[T]) {
        let n = self.built_len;
        let words = self.words_per_row;

        self.endpoints.clear();
        for (i, obj) in objects[..n].iter().enumerate() {
            let b = obj.aabb();
            // `+ 0.0` folds -0.0 into +0.0 so `total_cmp` agrees with `<=`.
            self.endpoints.push(Endpoint {
                value: b.min().axis(axis) + 0.0,
                is_max: false,
                index: i as u32,
            });
            self.endpoints.push(Endpoint {
                value: b.max().axis(axis) + 0.0,
                is_max: true,
                index: i as u32,
            });
        }
        self.endpoints.sort_unstable_by(Endpoint::order);

        let bits = &mut self.axis_bits[axis];
        bits.clear();
        bits.resize(n * words, 0);
        self.active.clear();

        for e in &self.endpoints {
            let i = e.index as usize;
            if e.is_max {
                if let Some(pos) = self.active.iter().position(|&o| o == e.index) {
                    self.active.swap_remove(pos);
                }
                continue;
            }
            for &o in &self.active {
                let o = o as usize;
                bits[i * words + o / 64] |= 1u64 << (o % 64);
                bits[o * words + i / 64] |= 1u64 << (i % 64);
            }
            self.active.push(e.index);
        }
    }

    /// `true` when the last build found proxies `i` and `j` overlapping.
    pub fn overlapping(&self, i: usize, j: usize) -> bool {
        if i >= self.built_len || j >= self.built_len || i == j {
            return false;
        }
        self.axis_bits[0][i * self.words_per_row + j / 64] & (1u64 << (j % 64)) != 0
    }
}

impl BroadPhase for SweepAndPrune {
    fn name(&self) -> &'static str {
        "sweep_and_prune"
    }

    fn build<T: Bounded>(&mut self, objects: &[T]) -> BuildReport {
        let kept = objects.len().min(self.max_objects);
        let dropped = objects.len() - kept;
        if dropped > 0 {
            let err = CapacityError::Objects {
                capacity: self.max_objects,
            };
            warn!(%err, dropped, "sweep-and-prune dropped proxies");
        }
        self.built_len = kept;
        self.words_per_row = kept.div_ceil(64);

        for axis in 0..3 {
            self.sweep_axis(axis, objects);
        }

        let [x, y, z] = &mut self.axis_bits;
        for ((a, b), c) in x.iter_mut().zip(y.iter()).zip(z.iter()) {
            *a &= b & c;
        }

        debug!(proxies = kept, "sweep-and-prune built");
        BuildReport::new(kept, dropped)
    }

    fn for_each_pair<T, F>(&mut self, _objects: &[T], mut on_pair: F)
    where
        T: Bounded,
        F: FnMut(usize, usize),
    {
        let words = self.words_per_row;
        let bits = &self.axis_bits[0];
        for i in 0..self.built_len {
            for (w, &word) in bits[i * words..(i + 1) * words].iter().enumerate() {
                let base = w * 64;
                // Only bits j > i.
                if base + 64 <= i + 1 {
                    continue;
                }
                let mut pending = word;
                if i >= base {
                    pending &= !((1u64 << (i - base + 1)) - 1);
                }
                while pending != 0 {
                    let j = base + pending.trailing_zeros() as usize;
                    on_pair(i, j);
                    pending &= pending - 1;
                }
            }
        }
    }
}
