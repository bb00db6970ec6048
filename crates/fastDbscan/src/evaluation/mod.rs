//! Layer 4: Evaluation
//!
//! ## Purpose
//!
//! This layer turns the shared point state left by the engine into the
//! public result, and compares results up to cluster renumbering.
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
//! Layer 4: Evaluation ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Results, diagnostics and partition comparison.
pub mod partition;
