//! Allocation Tracking
//!
//! A `GlobalAlloc` wrapper around the system allocator that keeps cumulative,
//! process-wide counters of allocated and freed bytes. The counters are never
//! reset; the collector takes a snapshot before and after each measured call
//! and records the difference, so measurements of consecutive workloads never
//! bleed into one another.
//!
//! Counters are global rather than thread-local so that allocations made by
//! worker threads inside concurrency workloads are attributed to the call that
//! spawned the work.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

static ALLOCATED_BYTES: AtomicU64 = AtomicU64::new(0);
static ALLOCATION_COUNT: AtomicU64 = AtomicU64::new(0);
static FREED_BYTES: AtomicU64 = AtomicU64::new(0);
static FREE_COUNT: AtomicU64 = AtomicU64::new(0);
static TRACKING_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Global allocator that counts every allocation and deallocation.
///
/// Install it in the benchmark binary:
///
/// ```ignore
/// #[global_allocator]
/// static GLOBAL: pacebench::TrackingAllocator = pacebench::TrackingAllocator;
/// ```
pub struct TrackingAllocator;

#[inline]
fn record_alloc(size: usize) {
    if !TRACKING_ACTIVE.load(Ordering::Relaxed) {
        TRACKING_ACTIVE.store(true, Ordering::Relaxed);
    }
    ALLOCATED_BYTES.fetch_add(size as u64, Ordering::Relaxed);
    ALLOCATION_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[inline]
fn record_free(size: usize) {
    FREED_BYTES.fetch_add(size as u64, Ordering::Relaxed);
    FREE_COUNT.fetch_add(1, Ordering::Relaxed);
}

unsafe impl GlobalAlloc for TrackingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc_zeroed(layout) };
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
        record_free(layout.size());
    }

    // A successful realloc counts as freeing the old block and allocating the new one.
    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            record_free(layout.size());
            record_alloc(new_size);
        }
        new_ptr
    }
}

/// Whether `TrackingAllocator` has served at least one allocation.
///
/// Returns `false` when the binary did not install it as the global
/// allocator, in which case every allocation delta reads as zero.
pub fn tracking_active() -> bool {
    TRACKING_ACTIVE.load(Ordering::Relaxed)
}

/// Point-in-time copy of the cumulative allocation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationSnapshot {
    /// Bytes allocated since process start
    pub allocated_bytes: u64,
    /// Allocations since process start
    pub allocation_count: u64,
    /// Bytes freed since process start
    pub freed_bytes: u64,
    /// Deallocations since process start
    pub free_count: u64,
}

impl AllocationSnapshot {
    /// Read the current counters.
    #[inline]
    pub fn now() -> Self {
        Self {
            allocated_bytes: ALLOCATED_BYTES.load(Ordering::Relaxed),
            allocation_count: ALLOCATION_COUNT.load(Ordering::Relaxed),
            freed_bytes: FREED_BYTES.load(Ordering::Relaxed),
            free_count: FREE_COUNT.load(Ordering::Relaxed),
        }
    }

    /// Activity between `earlier` and `self`.
    #[inline]
    pub fn since(&self, earlier: &AllocationSnapshot) -> AllocationDelta {
        AllocationDelta {
            allocated_bytes: self.allocated_bytes.saturating_sub(earlier.allocated_bytes),
            allocation_count: self.allocation_count.saturating_sub(earlier.allocation_count),
            freed_bytes: self.freed_bytes.saturating_sub(earlier.freed_bytes),
            free_count: self.free_count.saturating_sub(earlier.free_count),
        }
    }
}

/// Allocator activity attributed to one measured call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationDelta {
    /// Bytes allocated during the call
    pub allocated_bytes: u64,
    /// Number of allocations during the call
    pub allocation_count: u64,
    /// Bytes freed during the call
    pub freed_bytes: u64,
    /// Number of deallocations during the call
    pub free_count: u64,
}

impl AllocationDelta {
    /// Per-invocation average when one sample covers `batch` invocations.
    pub fn per_invocation(self, batch: u64) -> Self {
        let batch = batch.max(1);
        Self {
            allocated_bytes: self.allocated_bytes / batch,
            allocation_count: self.allocation_count / batch,
            freed_bytes: self.freed_bytes / batch,
            free_count: self.free_count / batch,
        }
    }
}
