//! Single-threaded Set/Get measurements.
//!
//! ## Measurement Lifecycle
//!
//! ```text
//!   setup (untimed)     build backend; for Get, populate all identifiers
//!   timed region        `iterations` ops, identifier cycling over [0, N)
//!   teardown            backend dropped
//! ```
//!
//! Identifiers wrap modulo N, so `iterations` may exceed the key universe.
//!
//! ## Example Usage
//!
//! ```
//! use cachebench::backend::StdMapBackend;
//! use cachebench::codec::{BinaryCodec, Record};
//! use cachebench::config::BenchConfig;
//! use cachebench::driver::SequentialDriver;
//!
//! let driver: SequentialDriver<BinaryCodec> =
//!     SequentialDriver::new(&BenchConfig::default().with_entries(100)).unwrap();
//! let m = driver.measure_get::<StdMapBackend<Record>>(250);
//! assert_eq!(m.hits, 250);
//! ```

use std::time::Instant;

use tracing::debug;

use crate::backend::{Backend, CapacityHints};
use crate::codec::PayloadCodec;
use crate::config::BenchConfig;
use crate::driver::measurement::Measurement;
use crate::error::ConfigError;
use crate::keys::{KeyPool, OffsetSource};

/// Drives one backend from the calling thread.
#[derive(Debug, Clone)]
pub struct SequentialDriver<C> {
    codec: C,
    keys: KeyPool,
    hints: CapacityHints,
    seed: u64,
}

impl<C: PayloadCodec> SequentialDriver<C> {
    /// Fails when `config` does not pass [`BenchConfig::validate`].
    pub fn new(config: &BenchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            codec: C::default(),
            keys: KeyPool::sequential(config.entries),
            hints: config.capacity_hints(),
            seed: config.seed,
        })
    }

    pub fn keys(&self) -> &KeyPool {
        &self.keys
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub fn hints(&self) -> &CapacityHints {
        &self.hints
    }

    /// Builds an empty backend sized by this driver's hints.
    pub fn build<B: Backend<C::Value>>(&self) -> B {
        B::with_capacity(&self.hints)
    }

    /// Stores every identifier once, in order.
    pub fn populate<B: Backend<C::Value>>(&self, backend: &B) -> Measurement {
        let start = Instant::now();
        let mut m = Measurement::default();
        for (id, key) in self.keys.iter().enumerate() {
            m.record_set(key, backend.set(key, self.codec.make_value(id)));
        }
        m.elapsed = start.elapsed();
        debug!(backend = B::NAME, entries = self.keys.len(), errors = m.errors, "populated");
        m
    }

    /// `iterations` Sets starting at identifier `start`.
    pub fn run_sets<B: Backend<C::Value>>(
        &self,
        backend: &B,
        start: usize,
        iterations: u64,
    ) -> Measurement {
        let n = self.keys.len();
        let mut m = Measurement::default();
        if n == 0 {
            return m;
        }
        let mut id = start % n;
        let timer = Instant::now();
        for _ in 0..iterations {
            let key = self.keys.get(id);
            m.record_set(key, backend.set(key, self.codec.make_value(id)));
            id += 1;
            if id == n {
                id = 0;
            }
        }
        m.elapsed = timer.elapsed();
        m
    }

    /// `iterations` Gets starting at identifier `start`.
    pub fn run_gets<B: Backend<C::Value>>(
        &self,
        backend: &B,
        start: usize,
        iterations: u64,
    ) -> Measurement {
        let n = self.keys.len();
        let mut m = Measurement::default();
        if n == 0 {
            return m;
        }
        let mut id = start % n;
        let timer = Instant::now();
        for _ in 0..iterations {
            let key = self.keys.get(id);
            m.record_get(key, backend.get(key));
            id += 1;
            if id == n {
                id = 0;
            }
        }
        m.elapsed = timer.elapsed();
        m
    }

    /// Times `iterations` Sets into a freshly built backend.
    pub fn measure_set<B: Backend<C::Value>>(&self, iterations: u64) -> Measurement {
        let backend = self.build::<B>();
        let start = self.start_offset();
        self.run_sets(&backend, start, iterations)
    }

    /// Times `iterations` Gets against a fully populated backend.
    pub fn measure_get<B: Backend<C::Value>>(&self, iterations: u64) -> Measurement {
        let backend = self.build::<B>();
        self.populate(&backend);
        let start = self.start_offset();
        self.run_gets(&backend, start, iterations)
    }

    fn start_offset(&self) -> usize {
        OffsetSource::new(self.seed).next_offset(self.keys.len())
    }
}
