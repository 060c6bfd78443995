//! Common imports for benchmark bodies and tests.
//!
//! ```
//! use cachebench::prelude::*;
//!
//! let driver: SequentialDriver<RawCodec> =
//!     SequentialDriver::new(&BenchConfig::default().with_entries(10)).unwrap();
//! let m = driver.measure_set::<DashMapBackend<bytes::Bytes>>(20);
//! assert_eq!(m.operations, 20);
//! ```

pub use crate::backend::{
    Backend, BackendKind, CapacityHints, DashMapBackend, LockedMapBackend, MokaBackend,
    QuickCacheBackend, StdMapBackend,
};
pub use crate::codec::{BinaryCodec, JsonCodec, PayloadCodec, RawCodec, Record};
pub use crate::config::BenchConfig;
pub use crate::driver::{Measurement, ParallelDriver, SequentialDriver};
pub use crate::error::{BackendError, CodecError, ConfigError};
pub use crate::gc::{AllocatorClock, Corpus, GcOverhead, GcOverheadConfig, GcReport, PauseClock};
pub use crate::keys::{KeyPool, ShardedKeys, key, parallel_key};
