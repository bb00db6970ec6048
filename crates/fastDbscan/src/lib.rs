//! # fastDbscan
//!
//! Concurrent density-based clustering (DBSCAN) of 2D points.
//!
//! ## Overview
//!
//! Points are loaded into a shared store, and a fixed-size pool of worker
//! threads drains a queue of point indices. A worker that finds an unvisited
//! core point issues a fresh cluster id and expands the cluster with an
//! iterative frontier. Per-point state is synchronized with atomics only:
//! a test-and-set gates neighbor computation, and a compare-and-swap gates
//! cluster membership, so exactly one cluster ever wins a point.
//!
//! Clusters that two workers grew from different seeds of the same
//! density-connected component are merged after the workers join, which
//! makes the partition independent of the worker count.
//!
//! ## Quick start
//!
//! ```ignore
//! use fastDbscan::prelude::*;
//!
//! let points = vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [50.0, 50.0]];
//!
//! let result = Dbscan::new()
//!     .epsilon(1.5)
//!     .min_pts(2)
//!     .adapter(Batch)
//!     .max_concurrency(4)
//!     .build()?
//!     .fit(&points)?;
//!
//! assert_eq!(result.labels, vec![1, 1, 1, 0]);
//! ```
//!
//! ## Feature flags
//!
//! * `cpu` (default): accept `ndarray` matrices as input.

#![allow(non_snake_case)]
#![warn(missing_docs)]

/// Layer 1: primitives.
pub mod primitives;

/// Layer 2: math.
pub mod math;

/// Layer 3: algorithms.
pub mod algorithms;

/// Layer 4: evaluation.
pub mod evaluation;

/// Layer 5: engine.
pub mod engine;

/// Layer 6: adapters.
pub mod adapters;

/// Layer 7: API.
pub mod api;

/// Input abstractions.
pub mod input;

/// Commonly used types.
pub mod prelude {
    pub use crate::adapters::batch::{BatchDbscan, BatchDbscanBuilder};
    pub use crate::adapters::profiled::{
        AllocationSnapshot, ProfiledDbscan, ProfiledDbscanBuilder, ProfiledResult, RunProfile,
        TrackingAllocator,
    };
    pub use crate::adapters::text::{TextError, read_points, write_labeled};
    pub use crate::api::{Adapter, Batch, DbscanBuilder as Dbscan, Profiled, cluster};
    pub use crate::evaluation::partition::{DbscanResult, NOISE, RunDiagnostics, same_partition};
    pub use crate::input::DbscanInput;
    pub use crate::primitives::cancel::CancellationToken;
    pub use crate::primitives::errors::DbscanError;
}

/// Building blocks for advanced use and bindings.
pub mod internals {
    pub use crate::{adapters, algorithms, api, engine, evaluation, input, math, primitives};
}

pub use api::cluster;
