//! Density-reachability expansion from a core point.
//!
//! ## Purpose
//!
//! This module grows a cluster from a seed core point by absorbing every
//! point density-reachable from it. It is called by workers of the scheduler
//! and runs concurrently with other expansions over the same store.
//!
//! ## Design notes
//!
//! * **Iterative**: A FIFO frontier replaces recursion.
//! * **Claim on enqueue**: A point enters a frontier only after its label CAS
//!   succeeded, so across all workers each point is enqueued at most once.
//! * **Two gates**: `visited` gates neighbor computation (at most once per
//!   point across all workers); `label` gates membership (one CAS winner).
//! * **Conflict log**: A claim that loses to another cluster on a point
//!   already known to be core is recorded once per pair of clusters, so the
//!   engine can merge fragments of one component.
//!
//! ## Key concepts
//!
//! * **Core Point**: A point whose neighborhood (itself included) holds at
//!   least `min_pts` points.
//! * **Border Point**: A non-core point absorbed through a core neighbor.
//! * **Witness**: For two adjacent core points owned by different clusters,
//!   whichever was marked core later sees the other one flagged when it
//!   claims its neighborhood, and records the conflict.
//!
//! ## Invariants
//!
//! * Every point on a frontier is labeled with the expanding cluster.
//! * A claim never overwrites another cluster's label.
//! * The conflict log holds at most one entry per `(expanding, owner)` pair.
//!
//! ## Non-goals
//!
//! * This module does not pick seeds or issue cluster ids (see the engine).

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};

use num_traits::Float;

use crate::math::neighborhood::RangeQuery;
use crate::primitives::errors::DbscanError;
use crate::primitives::label::{Claim, ClusterId};
use crate::primitives::store::PointStore;

// ============================================================================
// Expansion Records
// ============================================================================

/// A lost claim on a core point: `expanding` reached `point`, which `owner` had already claimed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    /// Cluster being expanded when the claim failed.
    pub expanding: ClusterId,
    /// Core point whose claim failed.
    pub point: usize,
    /// Cluster that owns the point.
    pub owner: ClusterId,
}

/// Counters and conflicts accumulated by one worker across its expansions.
#[derive(Debug, Clone, Default)]
pub struct ExpansionLog {
    /// Range queries issued.
    pub neighbor_queries: usize,
    /// Points whose claim this worker won.
    pub absorbed: usize,
    /// One core-point witness per pair of clusters found touching.
    pub conflicts: Vec<Conflict>,
    witnessed: HashSet<(ClusterId, ClusterId)>,
}

impl ExpansionLog {
    /// Record that `expanding` lost core point `point` to `owner`.
    ///
    /// Returns `false` when this pair already has a witness.
    pub fn record_conflict(
        &mut self,
        expanding: ClusterId,
        point: usize,
        owner: ClusterId,
    ) -> bool {
        if !self.witnessed.insert((expanding, owner)) {
            return false;
        }
        self.conflicts.push(Conflict {
            expanding,
            point,
            owner,
        });
        true
    }
}

/// Reusable per-worker buffers.
#[derive(Debug, Default)]
pub struct ExpansionScratch {
    /// Points waiting to be examined.
    pub frontier: VecDeque<usize>,
    /// Output buffer for range queries.
    pub neighbors: Vec<usize>,
}

impl ExpansionScratch {
    /// Create empty buffers.
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Cluster Expander
// ============================================================================

/// Grows clusters over a shared store using a range query.
#[derive(Debug)]
pub struct ClusterExpander<'a, T, Q> {
    store: &'a PointStore<T>,
    finder: &'a Q,
    min_pts: usize,
}

impl<'a, T, Q> ClusterExpander<'a, T, Q>
where
    T: Float + Send + Sync,
    Q: RangeQuery,
{
    /// Create an expander with density threshold `min_pts`.
    pub fn new(store: &'a PointStore<T>, finder: &'a Q, min_pts: usize) -> Self {
        Self {
            store,
            finder,
            min_pts,
        }
    }

    /// Density threshold.
    pub fn min_pts(&self) -> usize {
        self.min_pts
    }

    /// Whether a neighborhood of `count` points (self included) makes a core point.
    #[inline]
    pub fn is_core(&self, count: usize) -> bool {
        count >= self.min_pts
    }

    /// Absorb everything density-reachable from core point `seed` into `id`.
    ///
    /// `seeds` is the neighborhood of `seed`, which the caller has already
    /// visited and marked core. The frontier is left empty on success. When
    /// `abort` is raised by another worker the expansion stops at the next
    /// frontier pop and returns `Ok`; the caller is expected to discard the run.
    pub fn expand(
        &self,
        seed: usize,
        id: ClusterId,
        seeds: &[usize],
        scratch: &mut ExpansionScratch,
        log: &mut ExpansionLog,
        abort: &AtomicBool,
    ) -> Result<(), DbscanError> {
        let ExpansionScratch {
            frontier,
            neighbors,
        } = scratch;
        frontier.clear();

        self.absorb(id, seed, frontier, log);
        for &j in seeds.iter().filter(|&&j| j != seed) {
            self.absorb(id, j, frontier, log);
        }

        while let Some(q) = frontier.pop_front() {
            if abort.load(Ordering::Relaxed) {
                frontier.clear();
                return Ok(());
            }

            // Visited elsewhere: that worker owns the neighborhood of `q`.
            if !self.store.try_visit(q) {
                continue;
            }
            self.finder.range_query(q, neighbors)?;
            log.neighbor_queries += 1;

            if self.is_core(neighbors.len()) {
                self.store.mark_core(q);
                for &j in neighbors.iter().filter(|&&j| j != q) {
                    self.absorb(id, j, frontier, log);
                }
            }
        }

        Ok(())
    }

    /// Claim `point` for `id`, enqueueing it if the claim landed on an unvisited point.
    fn absorb(
        &self,
        id: ClusterId,
        point: usize,
        frontier: &mut VecDeque<usize>,
        log: &mut ExpansionLog,
    ) {
        match self.store.try_claim(point, id) {
            Claim::Won => {
                log.absorbed += 1;
                if !self.store.is_visited(point) {
                    frontier.push_back(point);
                }
            }
            Claim::AlreadyOwned => {}
            Claim::Lost(owner) => {
                if self.store.is_core(point) {
                    log.record_conflict(id, point, owner);
                }
            }
        }
    }
}
