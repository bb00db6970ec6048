//! Fixed-size worker pool that drains the shared point queue.
//!
//! ## Purpose
//!
//! This module distributes every point index of a store across a bounded
//! pool of worker threads. Each worker visits points, seeds clusters from
//! unvisited core points and expands them in place.
//!
//! ## Design notes
//!
//! * **Bounded creation**: The pool owns exactly `max_concurrency` threads,
//!   built once with `rayon::ThreadPoolBuilder`; no task object is created
//!   per point.
//! * **Shared queue**: All indices are pushed into a `crossbeam_deque`
//!   injector before the workers start; a worker exits when it finds the
//!   queue empty.
//! * **Buffer reuse**: Each worker owns its neighbor buffer and frontier.
//! * **Abort**: The first worker to fail raises a shared flag; the others
//!   stop at their next queue or frontier pop.
//!
//! ## Key concepts
//!
//! * **Seed**: An unvisited, unlabeled core point popped from the queue; it
//!   receives a fresh cluster id. An unvisited core point that an expansion
//!   already claimed is expanded under its owner's id instead.
//! * **Cancellation**: Checked only before popping the queue, so in-flight
//!   expansions always complete.
//!
//! ## Invariants
//!
//! * Every index is popped from the queue at most once.
//! * A cluster id is issued only for a point whose visit this worker won and
//!   that no cluster had claimed when the worker read its label.
//!
//! ## Non-goals
//!
//! * This module does not merge clusters or build results (see the executor).

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_deque::{Injector, Steal};
use num_traits::Float;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{Span, debug, warn};

use crate::algorithms::expansion::{ClusterExpander, ExpansionLog, ExpansionScratch};
use crate::math::neighborhood::RangeQuery;
use crate::primitives::cancel::CancellationToken;
use crate::primitives::errors::DbscanError;
use crate::primitives::label::{ClusterIdGenerator, Label};
use crate::primitives::store::PointStore;

// ============================================================================
// Worker Report
// ============================================================================

/// What one worker did during a run.
#[derive(Debug, Clone, Default)]
pub struct WorkerReport {
    /// Pool index of the worker.
    pub worker: usize,
    /// Indices popped from the shared queue.
    pub dispatched: usize,
    /// Clusters seeded by this worker.
    pub seeded: usize,
    /// Expansion counters and core-point conflicts.
    pub log: ExpansionLog,
}

// ============================================================================
// Scheduler
// ============================================================================

/// Bounded pool of clustering workers.
#[derive(Debug)]
pub struct Scheduler {
    pool: ThreadPool,
    workers: usize,
}

impl Scheduler {
    /// Start a pool of `max_concurrency` worker threads.
    pub fn new(max_concurrency: usize) -> Result<Self, DbscanError> {
        if max_concurrency == 0 {
            return Err(DbscanError::InvalidConcurrency(max_concurrency));
        }

        let pool = ThreadPoolBuilder::new()
            .num_threads(max_concurrency)
            .thread_name(|idx| format!("fastdbscan-worker-{}", idx))
            .build()
            .map_err(|e| DbscanError::ThreadPool(e.to_string()))?;

        Ok(Self {
            pool,
            workers: max_concurrency,
        })
    }

    /// Number of worker threads.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Process every point of `store` and return one report per worker.
    ///
    /// Blocks until all workers have drained the queue. Fails with the first
    /// worker error, or with [`DbscanError::Cancelled`] if `cancel` stopped
    /// dispatch before the queue was empty.
    pub fn run<T, Q>(
        &self,
        store: &PointStore<T>,
        finder: &Q,
        min_pts: usize,
        ids: &ClusterIdGenerator,
        cancel: Option<&CancellationToken>,
    ) -> Result<Vec<WorkerReport>, DbscanError>
    where
        T: Float + Send + Sync,
        Q: RangeQuery,
    {
        let queue = Injector::new();
        for index in 0..store.len() {
            queue.push(index);
        }

        let abort = AtomicBool::new(false);
        let expander = ClusterExpander::new(store, finder, min_pts);
        let span = Span::current();

        let outcomes = self.pool.broadcast(|ctx| {
            span.in_scope(|| {
                let worker = Worker {
                    index: ctx.index(),
                    queue: &queue,
                    store,
                    finder,
                    expander: &expander,
                    ids,
                    abort: &abort,
                    cancel,
                };
                worker.drain()
            })
        });

        let mut reports = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            reports.push(outcome?);
        }

        if !queue.is_empty() {
            warn!("clustering cancelled with points still queued");
            return Err(DbscanError::Cancelled);
        }

        Ok(reports)
    }
}

// ============================================================================
// Worker
// ============================================================================

struct Worker<'a, T, Q> {
    index: usize,
    queue: &'a Injector<usize>,
    store: &'a PointStore<T>,
    finder: &'a Q,
    expander: &'a ClusterExpander<'a, T, Q>,
    ids: &'a ClusterIdGenerator,
    abort: &'a AtomicBool,
    cancel: Option<&'a CancellationToken>,
}

impl<T, Q> Worker<'_, T, Q>
where
    T: Float + Send + Sync,
    Q: RangeQuery,
{
    fn drain(&self) -> Result<WorkerReport, DbscanError> {
        let mut report = WorkerReport {
            worker: self.index,
            ..WorkerReport::default()
        };
        let mut scratch = ExpansionScratch::new();
        let mut seeds = Vec::new();

        loop {
            if self.abort.load(Ordering::Relaxed) || self.cancel.is_some_and(|c| c.is_cancelled())
            {
                break;
            }

            let index = match self.queue.steal() {
                Steal::Success(index) => index,
                Steal::Empty => break,
                Steal::Retry => continue,
            };
            report.dispatched += 1;

            if let Err(err) = self.process(index, &mut seeds, &mut scratch, &mut report) {
                self.abort.store(true, Ordering::Relaxed);
                warn!(worker = self.index, point = index, error = %err, "worker aborted run");
                return Err(err);
            }
        }

        debug!(
            worker = self.index,
            dispatched = report.dispatched,
            seeded = report.seeded,
            "worker finished"
        );
        Ok(report)
    }

    fn process(
        &self,
        index: usize,
        seeds: &mut Vec<usize>,
        scratch: &mut ExpansionScratch,
        report: &mut WorkerReport,
    ) -> Result<(), DbscanError> {
        if !self.store.try_visit(index) {
            return Ok(());
        }

        self.finder.range_query(index, seeds)?;
        report.log.neighbor_queries += 1;

        if !self.expander.is_core(seeds.len()) {
            // Upgraded later if a cluster reaches this point.
            self.store.mark_noise(index);
            return Ok(());
        }

        self.store.mark_core(index);
        // Already reached by an expansion: grow that cluster instead of a new one.
        let id = match self.store.label(index) {
            Label::Cluster(owner) => owner,
            Label::Unlabeled | Label::Noise => {
                let id = self.ids.next_id();
                report.seeded += 1;
                debug!(
                    cluster = id.get(),
                    seed = index,
                    neighbors = seeds.len(),
                    "seeded cluster"
                );
                id
            }
        };

        self.expander
            .expand(index, id, seeds, scratch, &mut report.log, self.abort)
    }
}
