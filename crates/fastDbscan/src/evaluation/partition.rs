//! Clustering results and partition comparison.
//!
//! ## Purpose
//!
//! This module turns the final state of a point store into the public
//! result: one output label per input point, in input order, with `0` for
//! noise and `1..=k` for clusters.
//!
//! ## Design notes
//!
//! * **Compact ids**: Raw ids are resolved through the merger and renumbered
//!   by first appearance in input order, so ids are dense.
//! * **Comparison**: Runs are compared up to relabeling, because numeric ids
//!   depend on scheduling.
//!
//! ## Invariants
//!
//! * `labels.len() == points.len() == core.len()`.
//! * Every id in `1..=n_clusters` labels at least one point.

use std::collections::HashMap;

use num_traits::Float;

use crate::algorithms::merge::ClusterMerger;
use crate::primitives::label::Label;
use crate::primitives::store::PointStore;

/// Output label of a noise point.
pub const NOISE: usize = 0;

// ============================================================================
// Diagnostics
// ============================================================================

/// Counters describing how a run was executed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunDiagnostics {
    /// Worker threads in the pool.
    pub workers: usize,
    /// Range queries issued across all workers.
    pub neighbor_queries: usize,
    /// Raw cluster ids issued before merging.
    pub clusters_seeded: usize,
    /// Raw ids folded into another id by the merge step.
    pub clusters_merged: usize,
    /// Pairs of touching clusters recorded for the merge step.
    pub conflicts: usize,
}

// ============================================================================
// Result
// ============================================================================

/// Labeled points returned by a clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct DbscanResult<T> {
    /// Input coordinates, in input order.
    pub points: Vec<[T; 2]>,
    /// Output label per point: `0` for noise, `1..=n_clusters` otherwise.
    pub labels: Vec<usize>,
    /// Whether each point is a core point.
    pub core: Vec<bool>,
    /// Number of clusters.
    pub n_clusters: usize,
    /// Number of noise points.
    pub n_noise: usize,
    /// Execution counters.
    pub diagnostics: RunDiagnostics,
}

impl<T: Float> DbscanResult<T> {
    /// Build the result from a fully processed store.
    pub fn from_store(
        store: PointStore<T>,
        merger: &mut ClusterMerger,
        diagnostics: RunDiagnostics,
    ) -> Self {
        let mut compact: HashMap<usize, usize> = HashMap::new();
        let mut n_noise = 0;

        let labels: Vec<usize> = store
            .labels()
            .into_iter()
            .map(|label| match label {
                Label::Cluster(raw) => {
                    let root = merger.find(raw).get();
                    let next = compact.len() + 1;
                    *compact.entry(root).or_insert(next)
                }
                Label::Noise | Label::Unlabeled => {
                    n_noise += 1;
                    NOISE
                }
            })
            .collect();

        let core = store.core_flags();
        Self {
            points: store.into_coords(),
            labels,
            core,
            n_clusters: compact.len(),
            n_noise,
            diagnostics,
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the result holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// `(x, y, label)` per point, in input order.
    pub fn triples(&self) -> impl Iterator<Item = (T, T, usize)> + '_ {
        self.points
            .iter()
            .zip(&self.labels)
            .map(|(p, &label)| (p[0], p[1], label))
    }

    /// Member indices of each cluster; entry `k` holds cluster `k + 1`.
    ///
    /// Sized by the largest label present, so a hand-built result whose
    /// labels exceed `n_clusters` is still grouped.
    pub fn clusters(&self) -> Vec<Vec<usize>> {
        let largest = self.labels.iter().copied().max().unwrap_or(NOISE);
        let mut groups = vec![Vec::new(); largest.max(self.n_clusters)];
        for (i, &label) in self.labels.iter().enumerate() {
            if let Some(group) = label.checked_sub(1).and_then(|k| groups.get_mut(k)) {
                group.push(i);
            }
        }
        groups
    }

    /// Indices of noise points.
    pub fn noise_indices(&self) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, label)| **label == NOISE)
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of core points.
    pub fn core_sample_indices(&self) -> Vec<usize> {
        self.core
            .iter()
            .enumerate()
            .filter(|(_, core)| **core)
            .map(|(i, _)| i)
            .collect()
    }

    /// Whether `other` groups the points the same way, ignoring cluster numbering.
    pub fn same_partition<U>(&self, other: &DbscanResult<U>) -> bool {
        same_partition(&self.labels, &other.labels)
    }
}

/// Compare two label vectors up to a renaming of cluster ids.
///
/// Noise must match noise exactly; cluster ids must map one-to-one.
pub fn same_partition(a: &[usize], b: &[usize]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut forward: HashMap<usize, usize> = HashMap::new();
    let mut backward: HashMap<usize, usize> = HashMap::new();

    for (&la, &lb) in a.iter().zip(b) {
        if (la == NOISE) != (lb == NOISE) {
            return false;
        }
        if la == NOISE {
            continue;
        }
        if *forward.entry(la).or_insert(lb) != lb || *backward.entry(lb).or_insert(la) != la {
            return false;
        }
    }

    true
}
