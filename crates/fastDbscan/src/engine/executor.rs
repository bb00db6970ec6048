//! Run orchestration for DBSCAN clustering.
//!
//! ## Purpose
//!
//! This module wires the layers below into one clustering run: validate the
//! configuration, load the point store, let the scheduler drain every point,
//! merge cluster fragments and build the result.
//!
//! ## Design notes
//!
//! * **Validate first**: Configuration errors are reported before any thread
//!   is started.
//! * **Reusable pool**: The executor owns its scheduler, so repeated runs
//!   reuse the same worker threads.
//! * **All-or-nothing**: A run either labels every point or returns an error.
//! * **Generics**: Generic over `Float` coordinate types.
//!
//! ## Key concepts
//!
//! * **DbscanConfig**: The four tunables of a run.
//! * **Merge step**: Lost claims on core points connect fragments of one
//!   density-connected component.
//!
//! ## Invariants
//!
//! * The result has exactly one label per input point, in input order.
//!
//! ## Non-goals
//!
//! * This module does not read or write point files (see the text adapter).
//! * This module does not time runs or track memory (see the profiled adapter).

use num_traits::Float;
use tracing::{debug, info, info_span};

use crate::algorithms::merge::ClusterMerger;
use crate::engine::scheduler::Scheduler;
use crate::evaluation::partition::{DbscanResult, RunDiagnostics};
use crate::math::neighborhood::LinearScan;
use crate::primitives::cancel::CancellationToken;
use crate::primitives::errors::DbscanError;
use crate::primitives::label::ClusterIdGenerator;
use crate::primitives::store::PointStore;

/// Default neighborhood radius.
pub const DEFAULT_EPSILON: f64 = 2.5;

/// Default density threshold.
pub const DEFAULT_MIN_PTS: usize = 2;

/// Default worker pool size.
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// Default capacity of a single range query.
pub const DEFAULT_MAX_NEIGHBORS: usize = 10_000;

// ============================================================================
// Configuration
// ============================================================================

/// Tunables of a clustering run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DbscanConfig<T> {
    /// Neighborhood radius.
    pub epsilon: T,
    /// Minimum neighborhood size (self included) of a core point.
    pub min_pts: usize,
    /// Maximum number of neighbors a single range query may return.
    pub max_neighbors: usize,
    /// Worker pool size.
    pub max_concurrency: usize,
}

impl<T: Float> Default for DbscanConfig<T> {
    fn default() -> Self {
        Self {
            epsilon: T::from(DEFAULT_EPSILON).unwrap_or_else(T::one),
            min_pts: DEFAULT_MIN_PTS,
            max_neighbors: DEFAULT_MAX_NEIGHBORS,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl<T: Float> DbscanConfig<T> {
    /// Check every parameter.
    pub fn validate(&self) -> Result<(), DbscanError> {
        if !self.epsilon.is_finite() || self.epsilon < T::zero() {
            return Err(DbscanError::InvalidEpsilon(
                self.epsilon.to_f64().unwrap_or(f64::NAN),
            ));
        }
        if self.min_pts == 0 {
            return Err(DbscanError::InvalidMinPts(self.min_pts));
        }
        if self.max_neighbors == 0 {
            return Err(DbscanError::InvalidNeighborCapacity(self.max_neighbors));
        }
        if self.max_concurrency == 0 {
            return Err(DbscanError::InvalidConcurrency(self.max_concurrency));
        }
        Ok(())
    }
}

// ============================================================================
// Executor
// ============================================================================

/// Validated configuration bound to a running worker pool.
#[derive(Debug)]
pub struct DbscanExecutor<T> {
    config: DbscanConfig<T>,
    scheduler: Scheduler,
}

impl<T: Float + Send + Sync> DbscanExecutor<T> {
    /// Validate `config` and start the worker pool.
    pub fn new(config: DbscanConfig<T>) -> Result<Self, DbscanError> {
        config.validate()?;
        let scheduler = Scheduler::new(config.max_concurrency)?;
        Ok(Self { config, scheduler })
    }

    /// Configuration of this executor.
    pub fn config(&self) -> &DbscanConfig<T> {
        &self.config
    }

    /// Cluster `points`, blocking until every worker has finished.
    pub fn run(
        &self,
        points: &[[T; 2]],
        cancel: Option<&CancellationToken>,
    ) -> Result<DbscanResult<T>, DbscanError> {
        let span = info_span!(
            "dbscan",
            points = points.len(),
            epsilon = self.config.epsilon.to_f64(),
            min_pts = self.config.min_pts,
            workers = self.scheduler.workers(),
        );
        let _entered = span.enter();

        let store = PointStore::new(points)?;
        let ids = ClusterIdGenerator::new();

        let reports = {
            let scan = LinearScan::new(&store, self.config.epsilon, self.config.max_neighbors);
            self.scheduler
                .run(&store, &scan, self.config.min_pts, &ids, cancel)?
        };

        let conflicts = reports.iter().flat_map(|r| &r.log.conflicts);
        let mut merger = ClusterMerger::from_conflicts(ids.issued(), conflicts, |p| {
            store.is_core(p)
        });
        debug!(
            seeded = ids.issued(),
            merged = merger.merges(),
            "resolved cluster fragments"
        );

        let diagnostics = RunDiagnostics {
            workers: self.scheduler.workers(),
            neighbor_queries: reports.iter().map(|r| r.log.neighbor_queries).sum(),
            clusters_seeded: ids.issued(),
            clusters_merged: merger.merges(),
            conflicts: reports.iter().map(|r| r.log.conflicts.len()).sum(),
        };

        let result = DbscanResult::from_store(store, &mut merger, diagnostics);
        info!(
            clusters = result.n_clusters,
            noise = result.n_noise,
            "clustering finished"
        );
        Ok(result)
    }
}
