//! Planar distance helpers.
//!
//! Every neighborhood test in the crate compares squared distances against a
//! squared radius, so no square root is ever taken on the hot path.

use num_traits::Float;

/// Squared Euclidean distance between two planar points.
#[inline]
pub fn squared_euclidean<T: Float>(a: [T; 2], b: [T; 2]) -> T {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    dx * dx + dy * dy
}

/// Square a neighborhood radius.
#[inline]
pub fn squared_radius<T: Float>(epsilon: T) -> T {
    epsilon * epsilon
}
