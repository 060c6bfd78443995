//! cachebench: throughput and allocator-pause comparison harness for
//! in-memory key/value caches.
//!
//! One benchmark body drives every backend through the [`backend::Backend`]
//! contract. Typed values reach byte-only engines through a
//! [`codec::PayloadCodec`]; keys come precomputed from [`keys`] so no
//! formatting happens inside a timed region.
//!
//! ## Key Components
//!
//! - [`driver::SequentialDriver`] / [`driver::ParallelDriver`]: timed Set and
//!   Get loops reporting a [`driver::Measurement`].
//! - [`gc::GcOverhead`]: replays a [`gc::Corpus`] through a backend and
//!   reports cumulative allocator pause deltas read from a [`gc::PauseClock`].

pub mod backend;
pub mod codec;
pub mod config;
pub mod driver;
pub mod error;
pub mod gc;
pub mod keys;

pub mod prelude;
