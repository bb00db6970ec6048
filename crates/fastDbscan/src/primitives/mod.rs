//! Layer 1: Primitives
//!
//! ## Purpose
//!
//! This layer provides the data model shared by every other layer: the
//! per-point concurrent state, cluster labels, errors and cancellation.
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
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives ← You are here
//! ```

/// Cooperative cancellation token.
pub mod cancel;

/// Error types.
pub mod errors;

/// Label state machine and cluster id counter.
pub mod label;

/// Shared point storage.
pub mod store;
