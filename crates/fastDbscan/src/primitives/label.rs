//! Cluster labels and their lock-free per-point storage.
//!
//! ## Purpose
//!
//! This module provides the label state machine of a point and the atomic
//! cell that stores it, plus the process-wide cluster id counter.
//!
//! ## Design notes
//!
//! * **Single word**: A label is encoded in one `AtomicUsize` so that every
//!   transition is one compare-and-swap.
//! * **Encoding**: `0` is `Unlabeled`, `usize::MAX` is `Noise`, anything else
//!   is a cluster id.
//!
//! ## Invariants
//!
//! * Transitions are `Unlabeled -> Noise`, `Unlabeled -> Cluster(id)` and
//!   `Noise -> Cluster(id)`. A cluster id is never overwritten.
//! * At most one cluster id ever wins a claim on a given point.
//! * Cluster ids start at 1 and are never reused within a run.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

const UNLABELED: usize = 0;
const NOISE: usize = usize::MAX;

// ============================================================================
// Cluster Id
// ============================================================================

/// Identifier of a cluster within one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClusterId(NonZeroUsize);

impl ClusterId {
    /// Build a cluster id from its raw value; `None` for 0 and the noise marker.
    pub fn new(raw: usize) -> Option<Self> {
        if raw == NOISE {
            return None;
        }
        NonZeroUsize::new(raw).map(Self)
    }

    /// Raw positive value of this id.
    pub fn get(self) -> usize {
        self.0.get()
    }
}

/// Monotonic source of fresh cluster ids shared by all workers.
#[derive(Debug)]
pub struct ClusterIdGenerator {
    next: AtomicUsize,
}

impl Default for ClusterIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterIdGenerator {
    /// Create a generator whose first id is 1.
    pub fn new() -> Self {
        Self {
            next: AtomicUsize::new(1),
        }
    }

    /// Issue a fresh id.
    pub fn next_id(&self) -> ClusterId {
        let raw = self.next.fetch_add(1, Ordering::Relaxed);
        debug_assert!(raw != UNLABELED && raw != NOISE, "cluster id space exhausted");
        ClusterId::new(raw).unwrap_or(ClusterId(NonZeroUsize::MIN))
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> usize {
        self.next.load(Ordering::Relaxed) - 1
    }
}

// ============================================================================
// Label
// ============================================================================

/// Clustering state of a single point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Label {
    /// Not yet assigned.
    #[default]
    Unlabeled,
    /// Visited, not a core point, and not claimed by any cluster (yet).
    Noise,
    /// Member of a cluster.
    Cluster(ClusterId),
}

impl Label {
    fn encode(self) -> usize {
        match self {
            Label::Unlabeled => UNLABELED,
            Label::Noise => NOISE,
            Label::Cluster(id) => id.get(),
        }
    }

    fn decode(raw: usize) -> Self {
        match raw {
            UNLABELED => Label::Unlabeled,
            NOISE => Label::Noise,
            other => ClusterId::new(other).map_or(Label::Unlabeled, Label::Cluster),
        }
    }

    /// Cluster id, if the point is a cluster member.
    pub fn cluster(self) -> Option<ClusterId> {
        match self {
            Label::Cluster(id) => Some(id),
            _ => None,
        }
    }
}

/// Result of [`AtomicLabel::try_claim`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// The claim landed; the point now belongs to the requested cluster.
    Won,
    /// The point already belonged to the requested cluster.
    AlreadyOwned,
    /// Another cluster owns the point.
    Lost(ClusterId),
}

/// Lock-free label cell.
#[derive(Debug, Default)]
pub struct AtomicLabel(AtomicUsize);

impl AtomicLabel {
    /// A fresh, unlabeled cell.
    pub fn new() -> Self {
        Self(AtomicUsize::new(UNLABELED))
    }

    /// Current label.
    pub fn load(&self) -> Label {
        Label::decode(self.0.load(Ordering::Acquire))
    }

    /// Claim the point for `id`.
    ///
    /// Each attempt is a single compare-and-swap from `Unlabeled` or `Noise`
    /// to `Cluster(id)`. The loop only retries when the observed value was
    /// upgraded from `Unlabeled` to `Noise` between the load and the swap.
    pub fn try_claim(&self, id: ClusterId) -> Claim {
        let target = id.get();
        let mut current = self.0.load(Ordering::Acquire);
        loop {
            match Label::decode(current) {
                Label::Cluster(owner) if owner == id => return Claim::AlreadyOwned,
                Label::Cluster(owner) => return Claim::Lost(owner),
                Label::Unlabeled | Label::Noise => {}
            }
            match self
                .0
                .compare_exchange(current, target, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return Claim::Won,
                Err(observed) => current = observed,
            }
        }
    }

    /// Mark an unlabeled point as noise. Returns `false` if it was already labeled.
    pub fn mark_noise(&self) -> bool {
        self.0
            .compare_exchange(UNLABELED, NOISE, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl From<Label> for AtomicLabel {
    fn from(label: Label) -> Self {
        Self(AtomicUsize::new(label.encode()))
    }
}
