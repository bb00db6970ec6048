//! Cooperative cancellation of a clustering run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag that asks workers to stop taking new points from the queue.
///
/// Cancellation is cooperative: an expansion already in progress always runs
/// to completion, and a cancelled run reports [`DbscanError::Cancelled`]
/// instead of returning partial labels.
///
/// [`DbscanError::Cancelled`]: crate::primitives::errors::DbscanError::Cancelled
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Every clone observes it.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}
