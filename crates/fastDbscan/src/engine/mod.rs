//! Layer 5: Engine
//!
//! ## Purpose
//!
//! This layer provides the parallel execution engine for DBSCAN. It owns
//! the fixed-size worker pool and orchestrates a run from validated
//! configuration to labeled result.
//!
//! ## Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters
//!   ↓
//! Layer 5: Engine ← You are here
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Run orchestration and configuration.
pub mod executor;

/// Bounded worker pool over the shared point queue.
pub mod scheduler;
