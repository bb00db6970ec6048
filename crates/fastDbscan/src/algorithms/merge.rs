//! Reconciliation of cluster fragments produced by concurrent expansions.
//!
//! ## Purpose
//!
//! Two workers may expand the same density-connected component under two
//! different ids: one claims a core point while the other expands that
//! point's neighborhood. Every such case leaves a lost claim on a core point
//! in some worker's conflict log. This module folds those conflicts into a
//! union-find over cluster ids once all workers have joined.
//!
//! ## Invariants
//!
//! * Two ids are merged only through a conflict on a core point.
//! * Stored labels are never rewritten; merging only affects the result view.

use crate::algorithms::expansion::Conflict;
use crate::primitives::label::ClusterId;

/// Union-find over the raw cluster ids issued during one run.
#[derive(Debug, Clone)]
pub struct ClusterMerger {
    parent: Vec<usize>,
    rank: Vec<u8>,
    merges: usize,
}

impl ClusterMerger {
    /// Create singleton sets for ids `1..=issued`.
    pub fn new(issued: usize) -> Self {
        Self {
            parent: (0..=issued).collect(),
            rank: vec![0; issued + 1],
            merges: 0,
        }
    }

    /// Build the merger from every conflict whose point is a core point.
    pub fn from_conflicts<'c, I, F>(issued: usize, conflicts: I, is_core: F) -> Self
    where
        I: IntoIterator<Item = &'c Conflict>,
        F: Fn(usize) -> bool,
    {
        let mut merger = Self::new(issued);
        for conflict in conflicts {
            if is_core(conflict.point) {
                merger.union(conflict.expanding, conflict.owner);
            }
        }
        merger
    }

    fn find_raw(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find_raw(self.parent[x]); // Path compression
        }
        self.parent[x]
    }

    /// Representative id of the set containing `id`.
    pub fn find(&mut self, id: ClusterId) -> ClusterId {
        let root = self.find_raw(id.get());
        ClusterId::new(root).unwrap_or(id)
    }

    /// Merge the sets of `a` and `b`. Returns `false` if they were already merged.
    pub fn union(&mut self, a: ClusterId, b: ClusterId) -> bool {
        let pa = self.find_raw(a.get());
        let pb = self.find_raw(b.get());

        if pa == pb {
            return false;
        }

        // Union by rank
        if self.rank[pa] < self.rank[pb] {
            self.parent[pa] = pb;
        } else if self.rank[pa] > self.rank[pb] {
            self.parent[pb] = pa;
        } else {
            self.parent[pb] = pa;
            self.rank[pa] += 1;
        }

        self.merges += 1;
        true
    }

    /// Number of successful unions.
    pub fn merges(&self) -> usize {
        self.merges
    }
}
