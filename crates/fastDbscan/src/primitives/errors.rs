//! Error types for DBSCAN clustering.
//!
//! ## Purpose
//!
//! This module defines the single error type returned by every fallible
//! operation of the clustering core: configuration validation, input
//! validation, range-query capacity overflow, and run cancellation.
//!
//! ## Design notes
//!
//! * **Fail-fast**: Configuration errors are raised by `build()`, before any
//!   worker is started.
//! * **No partial results**: Any error detected mid-run aborts the run; the
//!   caller never receives a half-labeled point set.
//!
//! ## Non-goals
//!
//! * Loader and writer failures (I/O, malformed records) are not represented
//!   here; see [`crate::adapters::text::TextError`].

use thiserror::Error;

/// Errors produced by the DBSCAN engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DbscanError {
    /// Neighborhood radius is negative or not finite.
    #[error("invalid epsilon: {0} (must be finite and non-negative)")]
    InvalidEpsilon(f64),

    /// Density threshold is zero.
    #[error("invalid min_pts: {0} (must be at least 1)")]
    InvalidMinPts(usize),

    /// Worker pool size is zero.
    #[error("invalid max_concurrency: {0} (must be at least 1)")]
    InvalidConcurrency(usize),

    /// Range query capacity is zero.
    #[error("invalid max_neighbors: {0} (must be at least 1)")]
    InvalidNeighborCapacity(usize),

    /// A coordinate is NaN or infinite.
    #[error("non-finite coordinate at point {index}")]
    NonFiniteCoordinate {
        /// Index of the offending point.
        index: usize,
    },

    /// Input container could not be viewed as a list of 2D points.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A range query found more neighbors than the configured capacity.
    #[error(
        "neighbor query for point {index} found more than {capacity} neighbors (at least {found})"
    )]
    CapacityExceeded {
        /// Index of the query point.
        index: usize,
        /// Number of neighbors found when the scan stopped.
        found: usize,
        /// Configured `max_neighbors`.
        capacity: usize,
    },

    /// The run was cancelled before every point was processed.
    #[error("clustering cancelled before completion")]
    Cancelled,

    /// The worker pool could not be created.
    #[error("failed to start worker pool: {0}")]
    ThreadPool(String),
}

impl DbscanError {
    /// Whether this error was raised by configuration validation.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidEpsilon(_)
                | Self::InvalidMinPts(_)
                | Self::InvalidConcurrency(_)
                | Self::InvalidNeighborCapacity(_)
        )
    }
}
