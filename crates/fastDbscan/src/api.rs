//! High-level API for DBSCAN clustering.
//!
//! ## Purpose
//!
//! This module provides the primary user-facing entry point. It implements a
//! fluent builder for the clustering parameters and the choice of an
//! execution adapter (Batch or Profiled).
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with sensible defaults for all parameters.
//! * **Polymorphic**: Marker types select the adapter-specific builder.
//! * **Validated**: Parameters are validated when `.build()` is called on the adapter.
//! * **Type-Safe**: Generic over `Float` types for flexible precision.
//!
//! ## Key concepts
//!
//! * **Execution Adapters**: Batch and Profiled.
//! * **Configuration Flow**: Builder pattern ending in `.adapter(Adapter::Type)`.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`DbscanBuilder`](crate::api::DbscanBuilder) via `Dbscan::new()`.
//! 2. Chain configuration methods (`.epsilon()`, `.min_pts()`, etc.).
//! 3. Select an adapter via `.adapter(Adapter::Batch)` to get an execution builder.

// External dependencies
use num_traits::Float;
use std::fmt::Debug;

// Internal dependencies
use crate::adapters::batch::BatchDbscanBuilder;
use crate::adapters::profiled::ProfiledDbscanBuilder;
use crate::engine::executor::DbscanConfig;
use crate::evaluation::partition::DbscanResult;
use crate::input::DbscanInput;
use crate::primitives::errors::DbscanError;

// ============================================================================
// Builder
// ============================================================================

/// Adapter-independent clustering parameters.
#[derive(Debug, Clone)]
pub struct DbscanBuilder<T> {
    /// Neighborhood radius.
    pub epsilon: T,
    /// Minimum neighborhood size (self included) of a core point.
    pub min_pts: usize,
    /// Capacity of a single range query.
    pub max_neighbors: usize,
    /// Worker pool size; adapters fall back to their own default.
    pub max_concurrency: Option<usize>,
}

impl<T: Float> Default for DbscanBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> DbscanBuilder<T> {
    /// Create a builder with default parameters.
    pub fn new() -> Self {
        let defaults = DbscanConfig::<T>::default();
        Self {
            epsilon: defaults.epsilon,
            min_pts: defaults.min_pts,
            max_neighbors: defaults.max_neighbors,
            max_concurrency: None,
        }
    }

    /// Set the neighborhood radius.
    pub fn epsilon(mut self, epsilon: T) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the minimum neighborhood size (self included) of a core point.
    pub fn min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Set the capacity of a single range query.
    pub fn max_neighbors(mut self, max_neighbors: usize) -> Self {
        self.max_neighbors = max_neighbors;
        self
    }

    /// Set the worker pool size.
    pub fn max_concurrency(mut self, workers: usize) -> Self {
        self.max_concurrency = Some(workers);
        self
    }

    /// Select an execution adapter.
    pub fn adapter<A: DbscanAdapter<T>>(self, _adapter: A) -> A::Output {
        A::convert(self)
    }
}

/// Conversion from the generic builder into an adapter-specific builder.
pub trait DbscanAdapter<T> {
    /// Adapter-specific builder.
    type Output;

    /// Carry the generic parameters over.
    fn convert(builder: DbscanBuilder<T>) -> Self::Output;
}

// ============================================================================
// Adapter Module
// ============================================================================

/// Adapter selection namespace.
#[allow(non_snake_case)]
pub mod Adapter {
    pub use super::{Batch, Profiled};
}

// ============================================================================
// Adapter Marker Types
// ============================================================================

/// Marker for parallel in-memory batch processing.
#[derive(Debug, Clone, Copy)]
pub struct Batch;

impl<T: Float> DbscanAdapter<T> for Batch {
    type Output = BatchDbscanBuilder<T>;

    fn convert(builder: DbscanBuilder<T>) -> Self::Output {
        let mut batch = BatchDbscanBuilder::new()
            .epsilon(builder.epsilon)
            .min_pts(builder.min_pts)
            .max_neighbors(builder.max_neighbors);
        if let Some(workers) = builder.max_concurrency {
            batch = batch.max_concurrency(workers);
        }
        batch
    }
}

/// Marker for batch processing with timing and allocation tracking.
#[derive(Debug, Clone, Copy)]
pub struct Profiled;

impl<T: Float> DbscanAdapter<T> for Profiled {
    type Output = ProfiledDbscanBuilder<T>;

    fn convert(builder: DbscanBuilder<T>) -> Self::Output {
        ProfiledDbscanBuilder {
            batch: Batch::convert(builder),
            allocator: None,
        }
    }
}

// ============================================================================
// Convenience Entry Point
// ============================================================================

/// Cluster `points` with the batch adapter and default pool size and capacity.
pub fn cluster<T, I>(points: &I, epsilon: T, min_pts: usize) -> Result<DbscanResult<T>, DbscanError>
where
    T: Float + Debug + Send + Sync,
    I: DbscanInput<T> + ?Sized,
{
    DbscanBuilder::new()
        .epsilon(epsilon)
        .min_pts(min_pts)
        .adapter(Batch)
        .build()?
        .fit(points)
}
