//! Input abstractions for DBSCAN clustering.
//!
//! ## Purpose
//!
//! This module provides a unified abstraction for clustering inputs, allowing
//! the `fit` method to accept several point layouts (arrays of pairs, tuples,
//! ndarray matrices) through a single interface.
//!
//! ## Design notes
//!
//! * **Zero-copy where possible**: Array and ndarray inputs are viewed in place.
//! * **Interoperability**: Bridges standard Rust collections with ndarray.
//! * **Fail-fast validation**: Matrix shape and memory layout are checked
//!   before any clustering work starts.
//!
//! ## Key concepts
//!
//! * **DbscanInput Trait**: Requires types to provide a slice of `[T; 2]` points.
//! * **Point Order**: Output labels follow the order of this slice.
//!
//! ## Invariants
//!
//! * Returned points represent all rows of the input container, in order.
//! * Matrix inputs must have exactly two columns and standard layout.
//!
//! ## Non-goals
//!
//! * This module does not check that coordinates are finite (the store does).
//! * This module does not read files (see the text adapter).

// Feature-gated imports
#[cfg(feature = "cpu")]
use ndarray::{ArrayBase, Data, Ix2};

// External dependencies
use num_traits::Float;
use std::borrow::Cow;

// Internal dependencies
use crate::primitives::errors::DbscanError;

/// Trait for types that can be used as input for DBSCAN clustering.
pub trait DbscanInput<T: Float> {
    /// View or convert the input as a list of planar points.
    fn as_points(&self) -> Result<Cow<'_, [[T; 2]]>, DbscanError>;
}

impl<T: Float> DbscanInput<T> for [[T; 2]] {
    fn as_points(&self) -> Result<Cow<'_, [[T; 2]]>, DbscanError> {
        Ok(Cow::Borrowed(self))
    }
}

impl<T: Float> DbscanInput<T> for Vec<[T; 2]> {
    fn as_points(&self) -> Result<Cow<'_, [[T; 2]]>, DbscanError> {
        Ok(Cow::Borrowed(self.as_slice()))
    }
}

impl<T: Float, const N: usize> DbscanInput<T> for [[T; 2]; N] {
    fn as_points(&self) -> Result<Cow<'_, [[T; 2]]>, DbscanError> {
        Ok(Cow::Borrowed(self.as_slice()))
    }
}

impl<T: Float> DbscanInput<T> for [(T, T)] {
    fn as_points(&self) -> Result<Cow<'_, [[T; 2]]>, DbscanError> {
        Ok(Cow::Owned(self.iter().map(|&(x, y)| [x, y]).collect()))
    }
}

impl<T: Float> DbscanInput<T> for Vec<(T, T)> {
    fn as_points(&self) -> Result<Cow<'_, [[T; 2]]>, DbscanError> {
        self.as_slice().as_points()
    }
}

#[cfg(feature = "cpu")]
impl<T: Float, S> DbscanInput<T> for ArrayBase<S, Ix2>
where
    S: Data<Elem = T>,
{
    fn as_points(&self) -> Result<Cow<'_, [[T; 2]]>, DbscanError> {
        if self.ncols() != 2 {
            return Err(DbscanError::InvalidInput(format!(
                "ndarray input must have 2 columns, found {}",
                self.ncols()
            )));
        }
        let flat = self.as_slice().ok_or_else(|| {
            DbscanError::InvalidInput("ndarray input must be contiguous in memory".to_string())
        })?;
        Ok(Cow::Owned(
            flat.chunks_exact(2).map(|xy| [xy[0], xy[1]]).collect(),
        ))
    }
}

/// Zip separate coordinate columns into points.
pub fn zip_columns<T: Float>(x: &[T], y: &[T]) -> Result<Vec<[T; 2]>, DbscanError> {
    if x.len() != y.len() {
        return Err(DbscanError::InvalidInput(format!(
            "x and y must have the same length ({} != {})",
            x.len(),
            y.len()
        )));
    }
    Ok(x.iter().zip(y).map(|(&a, &b)| [a, b]).collect())
}
