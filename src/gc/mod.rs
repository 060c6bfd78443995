//! Allocator-pause overhead of sustained insert churn.
//!
//! ## Key Components
//!
//! - [`Corpus`]: keys and values built once and replayed.
//! - [`GcOverhead`]: the warm-up / churn sequence producing a [`GcReport`].
//! - [`PauseClock`]: cumulative pause counter; [`AllocatorClock`] reads the
//!   counters kept by [`TrackingAllocator`].

pub mod corpus;
pub mod overhead;
pub mod pause;

use std::time::Duration;

use serde::Serializer;

pub use corpus::Corpus;
pub use overhead::{GcOverhead, GcOverheadConfig, GcReport};
pub use pause::{AllocStats, AllocatorClock, PauseClock, TrackingAllocator};

/// Serializes a `Duration` as whole nanoseconds.
pub fn serialize_nanos<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
}
