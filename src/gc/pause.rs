//! Process-wide allocator pause accounting.
//!
//! Memory in a Rust process is reclaimed eagerly, one `dealloc` at a time,
//! so the cost a backend imposes on memory management shows up as time spent
//! inside the global allocator rather than as collector pauses. This module
//! measures that time.
//!
//! ## Architecture
//!
//! ```text
//!   #[global_allocator] TrackingAllocator<System>
//!        │  alloc / alloc_zeroed / realloc / dealloc
//!        │  timed with Instant, added to process-wide atomics
//!        ▼
//!   COUNTERS { allocations, frees, bytes_allocated, bytes_freed, pause_ns }
//!        ▲
//!        │  cumulative_pause()   force_collection()
//!   AllocatorClock ── implements ──► PauseClock
//! ```
//!
//! `force_collection` asks the C allocator to hand free pages back to the OS
//! (`malloc_trim` on glibc), timing it like any other allocator call.
//!
//! Readings are cumulative for the life of the process; callers subtract an
//! earlier reading to get a delta and never interpret an absolute value.
//!
//! ## Example Usage
//!
//! ```ignore
//! use cachebench::gc::TrackingAllocator;
//!
//! #[global_allocator]
//! static ALLOC: TrackingAllocator = TrackingAllocator::system();
//! ```

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Source of a cumulative, monotonically non-decreasing pause counter.
pub trait PauseClock {
    /// Runs a full reclamation cycle before a reading.
    fn force_collection(&self);

    /// Total pause time since process start.
    fn cumulative_pause(&self) -> Duration;
}

struct Counters {
    allocations: AtomicU64,
    frees: AtomicU64,
    bytes_allocated: AtomicU64,
    bytes_freed: AtomicU64,
    pause_ns: AtomicU64,
}

impl Counters {
    const fn new() -> Self {
        Self {
            allocations: AtomicU64::new(0),
            frees: AtomicU64::new(0),
            bytes_allocated: AtomicU64::new(0),
            bytes_freed: AtomicU64::new(0),
            pause_ns: AtomicU64::new(0),
        }
    }

    #[inline]
    fn add_pause(&self, elapsed: Duration) {
        self.pause_ns
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    #[inline]
    fn record_alloc(&self, size: usize, elapsed: Duration) {
        self.allocations.fetch_add(1, Ordering::Relaxed);
        self.bytes_allocated
            .fetch_add(size as u64, Ordering::Relaxed);
        self.add_pause(elapsed);
    }

    #[inline]
    fn record_free(&self, size: usize, elapsed: Duration) {
        self.frees.fetch_add(1, Ordering::Relaxed);
        self.bytes_freed.fetch_add(size as u64, Ordering::Relaxed);
        self.add_pause(elapsed);
    }
}

static COUNTERS: Counters = Counters::new();

/// Global allocator wrapper that times every call into `A`.
#[derive(Debug, Default)]
pub struct TrackingAllocator<A = System> {
    inner: A,
}

impl TrackingAllocator<System> {
    pub const fn system() -> Self {
        Self { inner: System }
    }
}

impl<A> TrackingAllocator<A> {
    pub const fn new(inner: A) -> Self {
        Self { inner }
    }
}

// SAFETY: every call is forwarded unchanged to `inner`; the wrapper only
// reads the clock and updates atomics, neither of which allocates.
unsafe impl<A: GlobalAlloc> GlobalAlloc for TrackingAllocator<A> {
    #[inline]
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let start = Instant::now();
        let ptr = unsafe { self.inner.alloc(layout) };
        if !ptr.is_null() {
            COUNTERS.record_alloc(layout.size(), start.elapsed());
        }
        ptr
    }

    #[inline]
    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let start = Instant::now();
        let ptr = unsafe { self.inner.alloc_zeroed(layout) };
        if !ptr.is_null() {
            COUNTERS.record_alloc(layout.size(), start.elapsed());
        }
        ptr
    }

    #[inline]
    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        let start = Instant::now();
        unsafe { self.inner.dealloc(ptr, layout) };
        COUNTERS.record_free(layout.size(), start.elapsed());
    }

    #[inline]
    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let start = Instant::now();
        let new_ptr = unsafe { self.inner.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            let elapsed = start.elapsed();
            COUNTERS.record_free(layout.size(), Duration::ZERO);
            COUNTERS.record_alloc(new_size, elapsed);
        }
        new_ptr
    }
}

/// Snapshot of the process-wide allocator counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AllocStats {
    pub allocations: u64,
    pub frees: u64,
    pub bytes_allocated: u64,
    pub bytes_freed: u64,
    #[serde(rename = "pause_ns", serialize_with = "crate::gc::serialize_nanos")]
    pub pause: Duration,
}

impl AllocStats {
    pub fn snapshot() -> Self {
        Self {
            allocations: COUNTERS.allocations.load(Ordering::Relaxed),
            frees: COUNTERS.frees.load(Ordering::Relaxed),
            bytes_allocated: COUNTERS.bytes_allocated.load(Ordering::Relaxed),
            bytes_freed: COUNTERS.bytes_freed.load(Ordering::Relaxed),
            pause: Duration::from_nanos(COUNTERS.pause_ns.load(Ordering::Relaxed)),
        }
    }

    /// Counter growth since `earlier`.
    pub fn since(&self, earlier: &AllocStats) -> AllocStats {
        AllocStats {
            allocations: self.allocations.saturating_sub(earlier.allocations),
            frees: self.frees.saturating_sub(earlier.frees),
            bytes_allocated: self.bytes_allocated.saturating_sub(earlier.bytes_allocated),
            bytes_freed: self.bytes_freed.saturating_sub(earlier.bytes_freed),
            pause: self.pause.saturating_sub(earlier.pause),
        }
    }
}

/// [`PauseClock`] backed by [`TrackingAllocator`]'s counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocatorClock;

impl AllocatorClock {
    /// Whether a [`TrackingAllocator`] is installed as the global allocator.
    ///
    /// Without one every reading stays at zero.
    pub fn is_tracking() -> bool {
        let before = COUNTERS.allocations.load(Ordering::Relaxed);
        let scratch = std::hint::black_box(Box::new([0u8; 64]));
        drop(scratch);
        COUNTERS.allocations.load(Ordering::Relaxed) != before
    }
}

impl PauseClock for AllocatorClock {
    fn force_collection(&self) {
        let start = Instant::now();
        release_free_memory();
        COUNTERS.add_pause(start.elapsed());
    }

    fn cumulative_pause(&self) -> Duration {
        Duration::from_nanos(COUNTERS.pause_ns.load(Ordering::Relaxed))
    }
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
fn release_free_memory() {
    // SAFETY: malloc_trim only walks the allocator's own free lists.
    unsafe {
        libc::malloc_trim(0);
    }
}

#[cfg(not(all(target_os = "linux", target_env = "gnu")))]
fn release_free_memory() {}
