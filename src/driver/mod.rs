//! Timed Set/Get drivers.
//!
//! Both drivers keep setup (backend construction, pre-population) outside the
//! timed region and report a [`Measurement`]: operation count, hit count,
//! refused operations and elapsed wall time. Benchmark hosts call
//! `measure_set` / `measure_get` with the iteration count they want timed.

pub mod measurement;
pub mod parallel;
pub mod sequential;

pub use measurement::Measurement;
pub use parallel::ParallelDriver;
pub use sequential::SequentialDriver;
