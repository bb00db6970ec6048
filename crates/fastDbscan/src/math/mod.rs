//! Layer 2: Math
//!
//! ## Purpose
//!
//! This layer provides the distance kernel and the fixed-radius neighbor
//! search used by the clustering algorithms.
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
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```
//!

/// Squared Euclidean distance.
pub mod distance;

/// Range queries (linear scan).
pub mod neighborhood;
