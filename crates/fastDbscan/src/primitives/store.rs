//! Shared per-point state for a clustering run.
//!
//! ## Purpose
//!
//! This module provides `PointStore`, the single structure shared by every
//! worker: immutable coordinates plus the concurrency-safe `visited`, `core`
//! and `label` fields of each point.
//!
//! ## Design notes
//!
//! * **No coarse lock**: Every mutable field is an independent atomic.
//! * **Index-stable**: Points are addressed by their input index; the store
//!   never grows or shrinks after construction.
//! * **No sentinels**: Every slot holds a real point, including the origin.
//!
//! ## Invariants
//!
//! * Coordinates are finite and written once, at construction.
//! * `visited` flips `false -> true` at most once per point.
//! * `core` is set only by the worker that won the visit of the point.
//!
//! ## Non-goals
//!
//! * This module does not support insertion or removal during a run.

use num_traits::Float;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::primitives::errors::DbscanError;
use crate::primitives::label::{AtomicLabel, Claim, ClusterId, Label};

/// Coordinates and concurrent clustering state of a fixed set of 2D points.
#[derive(Debug)]
pub struct PointStore<T> {
    coords: Vec<[T; 2]>,
    visited: Vec<AtomicBool>,
    core: Vec<AtomicBool>,
    labels: Vec<AtomicLabel>,
}

impl<T: Float> PointStore<T> {
    /// Load points into a fresh store with every point unvisited and unlabeled.
    pub fn new(points: &[[T; 2]]) -> Result<Self, DbscanError> {
        if let Some(index) = points
            .iter()
            .position(|p| !p[0].is_finite() || !p[1].is_finite())
        {
            return Err(DbscanError::NonFiniteCoordinate { index });
        }

        let n = points.len();
        Ok(Self {
            coords: points.to_vec(),
            visited: (0..n).map(|_| AtomicBool::new(false)).collect(),
            core: (0..n).map(|_| AtomicBool::new(false)).collect(),
            labels: (0..n).map(|_| AtomicLabel::new()).collect(),
        })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether the store holds no points.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// All coordinates, in input order.
    pub fn coords(&self) -> &[[T; 2]] {
        &self.coords
    }

    /// Coordinates of point `i`.
    #[inline]
    pub fn point(&self, i: usize) -> [T; 2] {
        self.coords[i]
    }

    /// Atomically mark point `i` visited. Returns `true` only for the caller
    /// that performed the `false -> true` transition.
    #[inline]
    pub fn try_visit(&self, i: usize) -> bool {
        !self.visited[i].swap(true, Ordering::AcqRel)
    }

    /// Whether point `i` has been visited.
    pub fn is_visited(&self, i: usize) -> bool {
        self.visited[i].load(Ordering::Acquire)
    }

    /// Record that point `i` is a core point.
    ///
    /// Core flags are sequentially consistent: of two workers that each mark
    /// a point core and then read the other's flag, at least one sees it set.
    pub fn mark_core(&self, i: usize) {
        self.core[i].store(true, Ordering::SeqCst);
    }

    /// Whether point `i` was found to be a core point.
    pub fn is_core(&self, i: usize) -> bool {
        self.core[i].load(Ordering::SeqCst)
    }

    /// Current label of point `i`.
    pub fn label(&self, i: usize) -> Label {
        self.labels[i].load()
    }

    /// Claim point `i` for cluster `id`; see [`AtomicLabel::try_claim`].
    #[inline]
    pub fn try_claim(&self, i: usize, id: ClusterId) -> Claim {
        self.labels[i].try_claim(id)
    }

    /// Mark point `i` as noise if it is still unlabeled.
    pub fn mark_noise(&self, i: usize) -> bool {
        self.labels[i].mark_noise()
    }

    /// Snapshot of every label, in input order.
    pub fn labels(&self) -> Vec<Label> {
        self.labels.iter().map(AtomicLabel::load).collect()
    }

    /// Snapshot of every core flag, in input order.
    pub fn core_flags(&self) -> Vec<bool> {
        self.core.iter().map(|c| c.load(Ordering::Acquire)).collect()
    }

    /// Consume the store, returning the coordinates.
    pub fn into_coords(self) -> Vec<[T; 2]> {
        self.coords
    }
}
