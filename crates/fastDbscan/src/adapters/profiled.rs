//! Profiled adapter: timing and allocation tracking around batch runs.
//!
//! ## Purpose
//!
//! This module measures a clustering run from the outside: wall-clock time
//! and, when the application installs [`TrackingAllocator`] as its global
//! allocator, the bytes allocated and released during the run.
//!
//! ## Design notes
//!
//! * **External**: Nothing in the engine knows it is being measured; the
//!   adapter wraps a [`BatchDbscan`] processor.
//! * **Opt-in memory**: Allocation totals are only reported when an allocator
//!   handle is supplied, since the crate cannot install a global allocator.
//!
//! ## Key concepts
//!
//! * **Snapshot Delta**: Allocation counters are read before and after the
//!   run; the profile holds the difference.
//!
//! ## Invariants
//!
//! * Counters are monotonic; deltas never underflow.
//!
//! ## Non-goals
//!
//! * This adapter does not attribute allocations to individual workers.
//! * Allocations made by other threads during the run are included.

// External dependencies
use num_traits::Float;
use std::alloc::{GlobalAlloc, Layout, System};
use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::info;

// Internal dependencies
use crate::adapters::batch::{BatchDbscan, BatchDbscanBuilder};
use crate::evaluation::partition::DbscanResult;
use crate::input::DbscanInput;
use crate::primitives::cancel::CancellationToken;
use crate::primitives::errors::DbscanError;

// ============================================================================
// Allocation Tracking
// ============================================================================

/// Global allocator wrapper that counts allocations.
///
/// ```ignore
/// #[global_allocator]
/// static GLOBAL: fastDbscan::prelude::TrackingAllocator =
///     fastDbscan::prelude::TrackingAllocator::new();
/// ```
#[derive(Debug)]
pub struct TrackingAllocator {
    inner: System,
    allocated: AtomicUsize,
    deallocated: AtomicUsize,
    allocation_count: AtomicUsize,
    deallocation_count: AtomicUsize,
}

impl Default for TrackingAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingAllocator {
    /// Create an allocator with zeroed counters.
    pub const fn new() -> Self {
        Self {
            inner: System,
            allocated: AtomicUsize::new(0),
            deallocated: AtomicUsize::new(0),
            allocation_count: AtomicUsize::new(0),
            deallocation_count: AtomicUsize::new(0),
        }
    }

    /// Current counter values.
    pub fn snapshot(&self) -> AllocationSnapshot {
        AllocationSnapshot {
            allocated: self.allocated.load(Ordering::Relaxed),
            deallocated: self.deallocated.load(Ordering::Relaxed),
            allocations: self.allocation_count.load(Ordering::Relaxed),
            deallocations: self.deallocation_count.load(Ordering::Relaxed),
        }
    }
}

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { self.inner.alloc(layout) };
        if !ptr.is_null() {
            self.allocated.fetch_add(layout.size(), Ordering::Relaxed);
            self.allocation_count.fetch_add(1, Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { self.inner.dealloc(ptr, layout) };
        self.deallocated.fetch_add(layout.size(), Ordering::Relaxed);
        self.deallocation_count.fetch_add(1, Ordering::Relaxed);
    }
}

/// Allocation counters at one instant, or the difference between two instants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationSnapshot {
    /// Bytes allocated.
    pub allocated: usize,
    /// Bytes released.
    pub deallocated: usize,
    /// Number of allocations.
    pub allocations: usize,
    /// Number of deallocations.
    pub deallocations: usize,
}

impl AllocationSnapshot {
    /// Counters accumulated since `earlier`.
    pub fn since(&self, earlier: &AllocationSnapshot) -> AllocationSnapshot {
        AllocationSnapshot {
            allocated: self.allocated.saturating_sub(earlier.allocated),
            deallocated: self.deallocated.saturating_sub(earlier.deallocated),
            allocations: self.allocations.saturating_sub(earlier.allocations),
            deallocations: self.deallocations.saturating_sub(earlier.deallocations),
        }
    }

    /// Bytes still held (allocated minus released), floored at zero.
    pub fn net(&self) -> usize {
        self.allocated.saturating_sub(self.deallocated)
    }
}

// ============================================================================
// Profiler
// ============================================================================

/// Measurements taken around one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunProfile {
    /// Wall-clock duration.
    pub elapsed: Duration,
    /// Allocation delta, when an allocator handle was supplied.
    pub memory: Option<AllocationSnapshot>,
}

/// Times a closure and reads allocation counters around it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Profiler {
    allocator: Option<&'static TrackingAllocator>,
}

impl Profiler {
    /// Profiler that only measures time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Profiler that also reads `allocator`'s counters.
    pub fn with_allocator(allocator: &'static TrackingAllocator) -> Self {
        Self {
            allocator: Some(allocator),
        }
    }

    /// Run `f` and return its output along with the measurements.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> (R, RunProfile) {
        let before = self.allocator.map(TrackingAllocator::snapshot);
        let start = Instant::now();
        let output = f();
        let elapsed = start.elapsed();
        let memory = self
            .allocator
            .zip(before)
            .map(|(alloc, before)| alloc.snapshot().since(&before));

        (output, RunProfile { elapsed, memory })
    }
}

// ============================================================================
// Profiled DBSCAN Builder
// ============================================================================

/// Builder for a batch processor wrapped in a profiler.
#[derive(Debug, Clone)]
pub struct ProfiledDbscanBuilder<T> {
    /// Wrapped batch builder.
    pub batch: BatchDbscanBuilder<T>,
    /// Allocator whose counters are read around each run.
    pub allocator: Option<&'static TrackingAllocator>,
}

impl<T: Float> Default for ProfiledDbscanBuilder<T> {
    fn default() -> Self {
        Self {
            batch: BatchDbscanBuilder::new(),
            allocator: None,
        }
    }
}

impl<T: Float> ProfiledDbscanBuilder<T> {
    /// Set the neighborhood radius.
    pub fn epsilon(mut self, epsilon: T) -> Self {
        self.batch = self.batch.epsilon(epsilon);
        self
    }

    /// Set the minimum neighborhood size (self included) of a core point.
    pub fn min_pts(mut self, min_pts: usize) -> Self {
        self.batch = self.batch.min_pts(min_pts);
        self
    }

    /// Set the capacity of a single range query.
    pub fn max_neighbors(mut self, max_neighbors: usize) -> Self {
        self.batch = self.batch.max_neighbors(max_neighbors);
        self
    }

    /// Set the worker pool size.
    pub fn max_concurrency(mut self, workers: usize) -> Self {
        self.batch = self.batch.max_concurrency(workers);
        self
    }

    /// Attach a cancellation token.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.batch = self.batch.cancellation(token);
        self
    }

    /// Read allocation counters from `allocator` around each run.
    pub fn allocator(mut self, allocator: &'static TrackingAllocator) -> Self {
        self.allocator = Some(allocator);
        self
    }

    /// Build the profiled processor.
    pub fn build(self) -> Result<ProfiledDbscan<T>, DbscanError>
    where
        T: Send + Sync,
    {
        let profiler = match self.allocator {
            Some(allocator) => Profiler::with_allocator(allocator),
            None => Profiler::new(),
        };
        Ok(ProfiledDbscan {
            batch: self.batch.build()?,
            profiler,
        })
    }
}

// ============================================================================
// Profiled DBSCAN Processor
// ============================================================================

/// Clustering result with the measurements of its run.
#[derive(Debug, Clone)]
pub struct ProfiledResult<T> {
    /// Labeled points.
    pub result: DbscanResult<T>,
    /// Time and memory measurements.
    pub profile: RunProfile,
}

/// Batch processor that profiles every run.
#[derive(Debug)]
pub struct ProfiledDbscan<T> {
    batch: BatchDbscan<T>,
    profiler: Profiler,
}

impl<T: Float + Debug + Send + Sync> ProfiledDbscan<T> {
    /// Cluster the provided points and measure the run.
    pub fn fit<I>(&self, points: &I) -> Result<ProfiledResult<T>, DbscanError>
    where
        I: DbscanInput<T> + ?Sized,
    {
        let (result, profile) = self.profiler.run(|| self.batch.fit(points));
        let result = result?;

        match profile.memory {
            Some(memory) => info!(
                elapsed_ms = profile.elapsed.as_secs_f64() * 1e3,
                allocated_kb = memory.allocated / 1024,
                deallocated_kb = memory.deallocated / 1024,
                net_kb = memory.net() / 1024,
                points = result.len(),
                "profiled clustering run"
            ),
            None => info!(
                elapsed_ms = profile.elapsed.as_secs_f64() * 1e3,
                points = result.len(),
                "profiled clustering run"
            ),
        }

        Ok(ProfiledResult { result, profile })
    }
}
