//! Layer 6: Adapters
//!
//! ## Purpose
//!
//! This layer provides the execution adapters selected through the API
//! builder, plus the text collaborators that feed and drain the engine.
//!
//! ## Architecture
//!
//! ```text
//! Layer 7: API
//!   ↓
//! Layer 6: Adapters ← You are here
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// In-memory batch clustering.
pub mod batch;

/// Batch clustering with timing and allocation tracking.
pub mod profiled;

/// Plain-text point loader and labeled-point writer.
pub mod text;
