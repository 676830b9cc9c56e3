// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
use core::ops::Range;

use tracing::{debug, warn};

use crate::broad::{BroadPhase, BuildReport, CapacityError};
use crate::types::{aabb::Aabb, bounded::Bounded};

/// Default maximum number of proxies stored in a leaf.
pub const DEFAULT_LEAF_SIZE: usize = 4;

/// One node of the hierarchy.
///
/// Leaves own a `(first, count)` range of the shared index array; interior
/// nodes own two children and an empty range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BvhNode {
    bounds: Aabb,
    children: Option<[u32; 2]>,
    first: u32,
    count: u32,
}

impl BvhNode {
    fn leaf(first: usize, count: usize) -> Self {
        Self {
            bounds: Aabb::default(),
            children: None,
            first: first as u32,
            count: count as u32,
        }
    }

    /// Union of every proxy below this node.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Left and right child indices; `None` for leaves.
    pub fn children(&self) -> Option<[u32; 2]> {
        self.children
    }

    /// `true` when the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Number of proxies referenced directly by this node.
    pub fn count(&self) -> usize {
        self.count as usize
    }

    /// Slice range of the index array owned by this node.
    pub fn range(&self) -> Range<usize> {
        let first = self.first as usize;
        first..first + self.count as usize
    }
}

/// Bounding-volume hierarchy rebuilt top-down every tick.
///
/// Build and traversal are iterative with explicit stacks. Splits cut the
/// node's largest axis at the midpoint of its bounds (no SAH); a degenerate
/// partition falls back to an even split so every level makes progress. The
/// node arena holds `2 × max_objects` nodes, which a binary tree over
/// `max_objects` leaves can never exceed.
#[derive(Debug, Clone)]
pub struct Bvh {
    max_objects: usize,
    leaf_size: usize,
    nodes: Vec<BvhNode>,
    indices: Vec<u32>,
    build_stack: Vec<u32>,
    pair_stack: Vec<(u32, u32)>,
    built_len: usize,
}

impl Bvh {
    /// Creates an empty hierarchy for up to `max_objects` proxies with the
    /// default leaf size.
    #[must_use]
    pub fn new(max_objects: usize) -> Self {
        Self::with_leaf_size(max_objects, DEFAULT_LEAF_SIZE)
    }

    /// Creates an empty hierarchy with an explicit leaf size (at least 1).
    #[must_use]
    pub fn with_leaf_size(max_objects: usize, leaf_size: usize) -> Self {
        Self {
            max_objects,
            leaf_size: leaf_size.max(1),
            nodes: Vec::with_capacity(2 * max_objects),
            indices: Vec::with_capacity(max_objects),
            build_stack: Vec::new(),
            pair_stack: Vec::new(),
            built_len: 0,
        }
    }

    /// Arena capacity in nodes.
    pub fn node_capacity(&self) -> usize {
        2 * self.max_objects
    }

    /// Nodes of the last build; index 0 is the root.
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// Proxy indices permuted so every leaf owns a contiguous range.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    fn range_bounds<T: Bounded>(&self, range: Range<usize>, objects: &[T]) -> Aabb {
        self.indices[range]
            .iter()
            .map(|&i| objects[i as usize].aabb())
            .reduce(|acc, b| acc.union(&b))
            .unwrap_or_default()
    }
}

/// Moves every index whose proxy centre lies below `split` on `axis` to the
/// front of `indices`; returns how many were moved.
fn partition<T: Bounded>(indices: &mut [u32], objects: &[T], axis: usize, split: f32) -> usize {
    let mut lo = 0;
    let mut hi = indices.len();
    while lo < hi {
        if objects[indices[lo] as usize].center().axis(axis) < split {
            lo += 1;
        } else {
            hi -= 1;
            indices.swap(lo, hi);
        }
    }
    lo
}

fn ordered(a: u32, b: u32) -> (u32, u32) {
    (a.min(b), a.max(b))
}

fn leaf_pairs<T, F>(
    indices: &[u32],
    (a, b): (&BvhNode, &BvhNode),
    same: bool,
    objects: &[T],
    on_pair: &mut F,
) where
    T: Bounded,
    F: FnMut(usize, usize),
{
    for (pos, &ia) in indices[a.range()].iter().enumerate() {
        let a_box = objects[ia as usize].aabb();
        let partners = if same {
            &indices[a.range()][pos + 1..]
        } else {
            &indices[b.range()]
        };
        for &ib in partners {
            if ia == ib {
                continue;
            }
            if a_box.overlaps(&objects[ib as usize].aabb()) {
                on_pair(ia as usize, ib as usize);
            }
        }
    }
}

impl BroadPhase for Bvh {
    fn name(&self) -> &'static str {
        "bvh"
    }

    fn build<T: Bounded>(&mut self, objects: &[T]) -> BuildReport {
        self.nodes.clear();
        self.indices.clear();
        self.build_stack.clear();

        let kept = objects.len().min(self.max_objects);
        let dropped = objects.len() - kept;
        if dropped > 0 {
            let err = CapacityError::Objects {
                capacity: self.max_objects,
            };
            warn!(%err, dropped, "bvh dropped proxies");
        }
        self.built_len = kept;
        if kept == 0 {
            return BuildReport::new(0, dropped);
        }

        self.indices.extend(0..kept as u32);
        self.nodes.push(BvhNode::leaf(0, kept));
        self.build_stack.push(0);

        while let Some(node_idx) = self.build_stack.pop() {
            let node_idx = node_idx as usize;
            let range = self.nodes[node_idx].range();
            let bounds = self.range_bounds(range.clone(), objects);
            self.nodes[node_idx].bounds = bounds;

            let count = range.len();
            if count <= self.leaf_size {
                continue;
            }

            let axis = bounds.extents().max_axis();
            let split = bounds.center().axis(axis);
            let mut mid = partition(&mut self.indices[range.clone()], objects, axis, split);
            if mid == 0 || mid == count {
                mid = count / 2;
            }

            let left = self.nodes.len() as u32;
            self.nodes.push(BvhNode::leaf(range.start, mid));
            self.nodes.push(BvhNode::leaf(range.start + mid, count - mid));
            let node = &mut self.nodes[node_idx];
            node.children = Some([left, left + 1]);
            node.count = 0;

            self.build_stack.push(left + 1);
            self.build_stack.push(left);
        }

        debug!(proxies = kept, nodes = self.nodes.len(), "bvh built");
        BuildReport::new(kept, dropped)
    }

    fn for_each_pair<T, F>(&mut self, objects: &[T], mut on_pair: F)
    where
        T: Bounded,
        F: FnMut(usize, usize),
    {
        if self.nodes.is_empty() {
            return;
        }
        if objects.len() < self.built_len {
            warn!(
                built = self.built_len,
                given = objects.len(),
                "bvh queried with fewer proxies than it was built from"
            );
            return;
        }

        self.pair_stack.clear();
        self.pair_stack.push((0, 0));

        while let Some((a, b)) = self.pair_stack.pop() {
            // Mirror image of a pair already queued by a self-expansion.
            if a > b {
                continue;
            }
            let na = self.nodes[a as usize];
            let nb = self.nodes[b as usize];
            if a != b && !na.bounds.overlaps(&nb.bounds) {
                continue;
            }

            match (na.children, nb.children) {
                (None, None) => {
                    leaf_pairs(&self.indices, (&na, &nb), a == b, objects, &mut on_pair);
                }
                (Some([l, r]), None) => {
                    self.pair_stack.push(ordered(l, b));
                    self.pair_stack.push(ordered(r, b));
                }
                (None, Some([l, r])) => {
                    self.pair_stack.push(ordered(a, l));
                    self.pair_stack.push(ordered(a, r));
                }
                (Some([al, ar]), Some([bl, br])) => {
                    if a == b {
                        self.pair_stack.push((al, al));
                        self.pair_stack.push((al, ar));
                        self.pair_stack.push((ar, al));
                        self.pair_stack.push((ar, ar));
                    } else {
                        self.pair_stack.push(ordered(al, bl));
                        self.pair_stack.push(ordered(al, br));
                        self.pair_stack.push(ordered(ar, bl));
                        self.pair_stack.push(ordered(ar, br));
                    }
                }
            }
        }
    }
}
