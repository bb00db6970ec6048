//! Range queries over a point store.
//!
//! ## Purpose
//!
//! This module answers "which points lie within epsilon of point i" for the
//! scheduler and the cluster expander. The provided implementation is a
//! linear scan of the store.
//!
//! ## Design notes
//!
//! * **Squared distances**: The query radius is squared once at construction.
//! * **Self-inclusive**: Point `i` is always in its own neighborhood.
//! * **Bounded output**: A query that would return more than `capacity`
//!   indices fails with `CapacityExceeded` instead of truncating.
//! * **Caller-owned buffers**: Results are written into a reusable `Vec` so
//!   workers do not allocate per query.
//!
//! ## Key concepts
//!
//! * **RangeQuery Trait**: The seam a spatial index would plug into.
//! * **LinearScan**: Brute-force `O(n)` query, read-only and `Sync`.
//!
//! ## Invariants
//!
//! * A successful query returns indices in ascending order.
//! * Queries never mutate the store and are safe to run from many threads.
//!
//! ## Non-goals
//!
//! * This module does not build a spatial index (k-d tree, grid).

use num_traits::Float;

use crate::math::distance::{squared_euclidean, squared_radius};
use crate::primitives::errors::DbscanError;
use crate::primitives::store::PointStore;

/// Fixed-radius neighbor search.
pub trait RangeQuery: Sync {
    /// Number of points that can be queried.
    fn len(&self) -> usize;

    /// Whether there is nothing to query.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write the indices of all points within the radius of point `index`
    /// (itself included) into `out`, replacing its previous contents.
    fn range_query(&self, index: usize, out: &mut Vec<usize>) -> Result<(), DbscanError>;
}

/// Brute-force range query over every point of a store.
#[derive(Debug)]
pub struct LinearScan<'a, T> {
    store: &'a PointStore<T>,
    epsilon_sq: T,
    capacity: usize,
}

impl<'a, T: Float> LinearScan<'a, T> {
    /// Create a scanner with radius `epsilon` returning at most `capacity` indices.
    pub fn new(store: &'a PointStore<T>, epsilon: T, capacity: usize) -> Self {
        Self {
            store,
            epsilon_sq: squared_radius(epsilon),
            capacity,
        }
    }

    /// Maximum number of indices a single query may return.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Float + Send + Sync> RangeQuery for LinearScan<'_, T> {
    fn len(&self) -> usize {
        self.store.len()
    }

    fn range_query(&self, index: usize, out: &mut Vec<usize>) -> Result<(), DbscanError> {
        out.clear();
        let query = self.store.point(index);

        for (j, &candidate) in self.store.coords().iter().enumerate() {
            if squared_euclidean(query, candidate) <= self.epsilon_sq {
                if out.len() == self.capacity {
                    return Err(DbscanError::CapacityExceeded {
                        index,
                        found: self.capacity + 1,
                        capacity: self.capacity,
                    });
                }
                out.push(j);
            }
        }

        Ok(())
    }
}
