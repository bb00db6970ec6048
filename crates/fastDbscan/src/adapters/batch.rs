//! Batch adapter for DBSCAN clustering.
//!
//! ## Purpose
//!
//! This module provides the batch execution adapter: a complete point set is
//! clustered in memory by a fixed-size worker pool, and the labeled points
//! are returned in input order.
//!
//! ## Design notes
//!
//! * **Processing**: Processes the entire point set in a single run.
//! * **Delegation**: Delegates computation to the execution engine.
//! * **Parallelism**: Worker count is set with `max_concurrency`.
//! * **Generics**: Generic over `Float` types.
//!
//! ## Key concepts
//!
//! * **Batch Processing**: Validates, executes, and returns results.
//! * **Builder Pattern**: Fluent API for configuration with sensible defaults.
//! * **Cancellation**: An optional token stops dispatch of queued points.
//!
//! ## Invariants
//!
//! * Coordinates must be finite.
//! * Output order matches input order.
//!
//! ## Non-goals
//!
//! * This adapter does not support incremental insertion of points.

// External dependencies
use num_traits::Float;
use std::fmt::Debug;
use std::result::Result;

// Internal dependencies
use crate::engine::executor::{DbscanConfig, DbscanExecutor};
use crate::evaluation::partition::DbscanResult;
use crate::input::{DbscanInput, zip_columns};
use crate::primitives::cancel::CancellationToken;
use crate::primitives::errors::DbscanError;

// ============================================================================
// Batch DBSCAN Builder
// ============================================================================

/// Builder for the batch DBSCAN processor.
#[derive(Debug, Clone)]
pub struct BatchDbscanBuilder<T> {
    /// Run configuration.
    pub config: DbscanConfig<T>,
    /// Optional cancellation token observed by every run.
    pub cancellation: Option<CancellationToken>,
}

impl<T: Float> Default for BatchDbscanBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> BatchDbscanBuilder<T> {
    /// Create a new batch builder with default parameters.
    ///
    /// # Defaults
    ///
    /// * epsilon: 2.5
    /// * min_pts: 2
    /// * max_neighbors: 10 000
    /// * max_concurrency: 16
    pub fn new() -> Self {
        Self {
            config: DbscanConfig::default(),
            cancellation: None,
        }
    }

    // ========================================================================
    // Shared Setters
    // ========================================================================

    /// Set the neighborhood radius.
    pub fn epsilon(mut self, epsilon: T) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    /// Set the minimum neighborhood size (self included) of a core point.
    pub fn min_pts(mut self, min_pts: usize) -> Self {
        self.config.min_pts = min_pts;
        self
    }

    /// Set the capacity of a single range query.
    pub fn max_neighbors(mut self, max_neighbors: usize) -> Self {
        self.config.max_neighbors = max_neighbors;
        self
    }

    // ========================================================================
    // Batch-Specific Setters
    // ========================================================================

    /// Set the worker pool size.
    pub fn max_concurrency(mut self, workers: usize) -> Self {
        self.config.max_concurrency = workers;
        self
    }

    /// Attach a cancellation token.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    // ========================================================================
    // Build Method
    // ========================================================================

    /// Validate the configuration and start the worker pool.
    pub fn build(self) -> Result<BatchDbscan<T>, DbscanError>
    where
        T: Send + Sync,
    {
        let executor = DbscanExecutor::new(self.config)?;
        Ok(BatchDbscan {
            executor,
            cancellation: self.cancellation,
        })
    }
}

// ============================================================================
// Batch DBSCAN Processor
// ============================================================================

/// Batch DBSCAN processor bound to a worker pool.
#[derive(Debug)]
pub struct BatchDbscan<T> {
    executor: DbscanExecutor<T>,
    cancellation: Option<CancellationToken>,
}

impl<T: Float + Debug + Send + Sync> BatchDbscan<T> {
    /// Cluster the provided points.
    pub fn fit<I>(&self, points: &I) -> Result<DbscanResult<T>, DbscanError>
    where
        I: DbscanInput<T> + ?Sized,
    {
        let points = points.as_points()?;
        self.executor.run(&points, self.cancellation.as_ref())
    }

    /// Cluster points given as separate x and y columns.
    pub fn fit_columns(&self, x: &[T], y: &[T]) -> Result<DbscanResult<T>, DbscanError> {
        let points = zip_columns(x, y)?;
        self.executor.run(&points, self.cancellation.as_ref())
    }

    /// Configuration used by every run of this processor.
    pub fn config(&self) -> &DbscanConfig<T> {
        self.executor.config()
    }
}
