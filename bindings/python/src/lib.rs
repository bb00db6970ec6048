//! Python bindings for fastDbscan.
//!
//! Provides Python access to the fastDbscan Rust library via PyO3.

#![allow(non_snake_case)]
#![deny(missing_docs)]

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::fmt::Display;

use ::fastDbscan::prelude::{Batch, Dbscan, DbscanResult, RunDiagnostics};

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert a DbscanError to a PyErr
fn to_py_error(e: impl Display) -> PyErr {
    PyValueError::new_err(e.to_string())
}

// ============================================================================
// Python Classes
// ============================================================================

/// Counters collected while clustering.
#[pyclass(name = "Diagnostics")]
#[derive(Clone)]
pub struct PyDiagnostics {
    /// Worker threads used
    #[pyo3(get)]
    pub workers: usize,

    /// Range queries issued
    #[pyo3(get)]
    pub neighbor_queries: usize,

    /// Cluster ids issued before merging
    #[pyo3(get)]
    pub clusters_seeded: usize,

    /// Fragments merged into another cluster
    #[pyo3(get)]
    pub clusters_merged: usize,

    /// Pairs of touching clusters recorded for merging
    #[pyo3(get)]
    pub conflicts: usize,
}

impl From<&RunDiagnostics> for PyDiagnostics {
    fn from(d: &RunDiagnostics) -> Self {
        Self {
            workers: d.workers,
            neighbor_queries: d.neighbor_queries,
            clusters_seeded: d.clusters_seeded,
            clusters_merged: d.clusters_merged,
            conflicts: d.conflicts,
        }
    }
}

#[pymethods]
impl PyDiagnostics {
    fn __repr__(&self) -> String {
        format!(
            "Diagnostics(workers={}, neighbor_queries={}, clusters_seeded={}, clusters_merged={}, conflicts={})",
            self.workers,
            self.neighbor_queries,
            self.clusters_seeded,
            self.clusters_merged,
            self.conflicts
        )
    }
}

/// Result of a clustering run.
#[pyclass(name = "DbscanResult")]
pub struct PyDbscanResult {
    inner: DbscanResult<f64>,
}

#[pymethods]
impl PyDbscanResult {
    /// Cluster label per point (0 = noise, clusters numbered from 1)
    #[getter]
    fn labels<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<i64>> {
        let labels = self.inner.labels.iter().map(|&l| l as i64).collect();
        PyArray1::from_vec(py, labels)
    }

    /// Core flag per point
    #[getter]
    fn core(&self) -> Vec<bool> {
        self.inner.core.clone()
    }

    /// x coordinates in input order
    #[getter]
    fn x<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        PyArray1::from_vec(py, self.inner.points.iter().map(|p| p[0]).collect())
    }

    /// y coordinates in input order
    #[getter]
    fn y<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        PyArray1::from_vec(py, self.inner.points.iter().map(|p| p[1]).collect())
    }

    /// Number of clusters
    #[getter]
    fn n_clusters(&self) -> usize {
        self.inner.n_clusters
    }

    /// Number of noise points
    #[getter]
    fn n_noise(&self) -> usize {
        self.inner.n_noise
    }

    /// Run counters
    #[getter]
    fn diagnostics(&self) -> PyDiagnostics {
        PyDiagnostics::from(&self.inner.diagnostics)
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "DbscanResult(n={}, n_clusters={}, n_noise={})",
            self.inner.len(),
            self.inner.n_clusters,
            self.inner.n_noise
        )
    }
}

// ============================================================================
// Python Functions
// ============================================================================

/// Density-based clustering of 2D points.
///
/// Parameters
/// ----------
/// x : array_like
///     x coordinates.
/// y : array_like
///     y coordinates.
/// epsilon : float, optional
///     Neighborhood radius (default: 2.5).
/// min_pts : int, optional
///     Minimum neighborhood size, self included, of a core point (default: 2).
/// max_concurrency : int, optional
///     Number of worker threads (default: 16).
/// max_neighbors : int, optional
///     Maximum neighbors of a single point before the run fails (default: 10000).
///
/// Returns
/// -------
/// DbscanResult
///     Labels, core flags and cluster counts.
#[pyfunction]
#[pyo3(signature = (
    x, y,
    epsilon=2.5,
    min_pts=2,
    max_concurrency=16,
    max_neighbors=10000
))]
fn cluster(
    py: Python<'_>,
    x: PyReadonlyArray1<'_, f64>,
    y: PyReadonlyArray1<'_, f64>,
    epsilon: f64,
    min_pts: usize,
    max_concurrency: usize,
    max_neighbors: usize,
) -> PyResult<PyDbscanResult> {
    let x_slice = x.as_slice().map_err(to_py_error)?;
    let y_slice = y.as_slice().map_err(to_py_error)?;

    let model = Dbscan::new()
        .epsilon(epsilon)
        .min_pts(min_pts)
        .max_neighbors(max_neighbors)
        .adapter(Batch)
        .max_concurrency(max_concurrency)
        .build()
        .map_err(to_py_error)?;

    let result = py
        .allow_threads(|| model.fit_columns(x_slice, y_slice))
        .map_err(to_py_error)?;

    Ok(PyDbscanResult { inner: result })
}

// ============================================================================
// Module Registration
// ============================================================================

/// fastdbscan: Concurrent DBSCAN clustering for Python.
#[pymodule]
fn fastdbscan(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyDbscanResult>()?;
    m.add_class::<PyDiagnostics>()?;
    m.add_function(wrap_pyfunction!(cluster, m)?)?;
    Ok(())
}
