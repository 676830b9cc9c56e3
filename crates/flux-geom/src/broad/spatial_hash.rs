// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use flux_math::Vec3;
use tracing::{debug, warn};

use crate::broad::{BroadPhase, BuildReport, CapacityError};
use crate::types::bounded::Bounded;

/// Per-axis multipliers used to scatter grid cells across the table.
pub const CELL_PRIMES: [i64; 3] = [73_856_093, 19_349_663, 83_492_791];

/// Uniform-grid spatial hash with fixed-capacity buckets.
///
/// Each proxy is inserted once, into the bucket of the cell containing its
/// centre. A query visits the 3×3×3 block of cells around the query proxy, so
/// pairing is complete only while `cell_size` is at least the largest AABB
/// edge; builds that violate this log a warning. Distinct cells may share a
/// bucket; AABB tests discard the false hits. Proxies past `max_objects`
/// are dropped like overflowing bucket entries.
#[derive(Debug, Clone)]
pub struct SpatialHash {
    max_objects: usize,
    cell_size: f32,
    bucket_capacity: usize,
    buckets: Vec<Vec<u32>>,
    present: Vec<bool>,
}

impl SpatialHash {
    /// Creates a table for up to `max_objects` proxies: `table_size` buckets
    /// holding `bucket_capacity` entries each, over cells of edge `cell_size`.
    ///
    /// Degenerate geometry is clamped: at least one bucket, and a cell size
    /// no smaller than `flux_math::EPSILON`.
    #[must_use]
    pub fn new(
        max_objects: usize,
        cell_size: f32,
        table_size: usize,
        bucket_capacity: usize,
    ) -> Self {
        let cell_size = if cell_size.is_finite() {
            cell_size.max(flux_math::EPSILON)
        } else {
            1.0
        };
        Self {
            max_objects,
            cell_size,
            bucket_capacity,
            buckets: (0..table_size.max(1))
                .map(|_| Vec::with_capacity(bucket_capacity))
                .collect(),
            present: Vec::with_capacity(max_objects),
        }
    }

    /// Cell edge length.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Number of buckets.
    pub fn table_size(&self) -> usize {
        self.buckets.len()
    }

    /// Integer grid coordinates of the cell containing `p`.
    pub fn cell_of(&self, p: &Vec3) -> [i64; 3] {
        // Float-to-int `as` saturates, so far-away or non-finite points land
        // in an edge cell instead of wrapping.
        let c = p.scale(1.0 / self.cell_size).floor();
        [c.x() as i64, c.y() as i64, c.z() as i64]
    }

    /// Bucket index for a grid cell:
    /// `|(x·P1) ^ (y·P2) ^ (z·P3)| mod table_size`.
    pub fn bucket_of(&self, cell: [i64; 3]) -> usize {
        let h = cell[0].wrapping_mul(CELL_PRIMES[0])
            ^ cell[1].wrapping_mul(CELL_PRIMES[1])
            ^ cell[2].wrapping_mul(CELL_PRIMES[2]);
        (h.unsigned_abs() % self.buckets.len() as u64) as usize
    }

    /// Appends proxy `index` to the bucket of the cell containing `center`.
    ///
    /// An index past `max_objects` or a full bucket rejects the entry and
    /// leaves the table untouched.
    pub fn insert(&mut self, index: usize, center: &Vec3) -> Result<(), CapacityError> {
        if index >= self.max_objects {
            return Err(CapacityError::Objects {
                capacity: self.max_objects,
            });
        }
        let bucket = self.bucket_of(self.cell_of(center));
        let slot = &mut self.buckets[bucket];
        if slot.len() >= self.bucket_capacity {
            return Err(CapacityError::HashBucket {
                bucket,
                capacity: self.bucket_capacity,
            });
        }
        slot.push(index as u32);
        if let Some(flag) = self.present.get_mut(index) {
            *flag = true;
        }
        Ok(())
    }

    /// Entries currently stored in `bucket`.
    pub fn bucket(&self, bucket: usize) -> &[u32] {
        self.buckets.get(bucket).map_or(&[], Vec::as_slice)
    }

    fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.present.clear();
    }
}

impl BroadPhase for SpatialHash {
    fn name(&self) -> &'static str {
        "spatial_hash"
    }

    fn build<T: Bounded>(&mut self, objects: &[T]) -> BuildReport {
        self.clear();
        let kept = objects.len().min(self.max_objects);
        self.present.resize(kept, false);

        let mut report = BuildReport::new(0, objects.len() - kept);
        if report.dropped > 0 {
            let err = CapacityError::Objects {
                capacity: self.max_objects,
            };
            warn!(%err, dropped = report.dropped, "spatial hash dropped proxies");
        }
        let mut oversized = 0usize;
        for (i, obj) in objects[..kept].iter().enumerate() {
            if obj.aabb().extents().max_element() > self.cell_size {
                oversized += 1;
            }
            match self.insert(i, &obj.center()) {
                Ok(()) => report.inserted += 1,
                Err(err) => {
                    warn!(%err, proxy = i, "spatial hash dropped proxy");
                    report.dropped += 1;
                }
            }
        }
        if oversized > 0 {
            warn!(
                oversized,
                cell_size = self.cell_size,
                "proxies larger than a hash cell may miss pairs"
            );
        }
        debug!(inserted = report.inserted, dropped = report.dropped, "spatial hash built");
        report
    }

    fn for_each_pair<T, F>(&mut self, objects: &[T], mut on_pair: F)
    where
        T: Bounded,
        F: FnMut(usize, usize),
    {
        let mut visited = [0usize; 27];
        for (i, obj) in objects.iter().enumerate() {
            if !self.present.get(i).copied().unwrap_or(false) {
                continue;
            }
            let a_box = obj.aabb();
            let [cx, cy, cz] = self.cell_of(&obj.center());
            let mut n_visited = 0;
            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let bucket = self.bucket_of([
                            cx.saturating_add(dx),
                            cy.saturating_add(dy),
                            cz.saturating_add(dz),
                        ]);
                        if visited[..n_visited].contains(&bucket) {
                            continue;
                        }
                        visited[n_visited] = bucket;
                        n_visited += 1;

                        for &j in &self.buckets[bucket] {
                            let j = j as usize;
                            // Each pair is reported from its lower index only.
                            if j <= i {
                                continue;
                            }
                            if let Some(other) = objects.get(j) {
                                if a_box.overlaps(&other.aabb()) {
                                    on_pair(i, j);
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
