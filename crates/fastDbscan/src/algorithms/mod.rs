//! Layer 3: Algorithms
//!
//! ## Purpose
//!
//! This layer provides the DBSCAN building blocks: iterative cluster
//! expansion over the shared store and the merge step that reconciles
//! clusters split by concurrent expansion.
//!
//! ## Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms ← You are here
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Density-reachability expansion.
pub mod expansion;

/// Union-find merging of cluster ids.
pub mod merge;
