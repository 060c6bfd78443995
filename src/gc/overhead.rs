//! GC-overhead driver: repeated full population of a fresh backend.
//!
//! ## Sequence
//!
//! ```text
//!   force_collection ─► baseline = cumulative_pause
//!   Corpus::build(entries, value_size)                    (once)
//!   populate(fresh backend)                               (warm-up)
//!   force_collection ─► startup = cumulative_pause - baseline
//!   populate(fresh backend) × repeat                      (churn)
//!   force_collection ─► total   = cumulative_pause - baseline
//! ```
//!
//! Each population constructs a new backend, inserts every corpus entry,
//! checks identifier 1 against the corpus and drops the backend. Set errors
//! and a failed check are logged and counted; neither stops the run.

use std::fmt;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, warn};

use crate::backend::{
    Backend, BackendKind, CapacityHints, DashMapBackend, LockedMapBackend, MokaBackend,
    QuickCacheBackend, StdMapBackend,
};
use crate::codec::RawCodec;
use crate::error::ConfigError;
use crate::gc::corpus::Corpus;
use crate::gc::pause::PauseClock;

pub const DEFAULT_GC_ENTRIES: usize = 20_000_000;
pub const DEFAULT_GC_REPEAT: usize = 50;
pub const DEFAULT_GC_VALUE_SIZE: usize = 100;
pub const DEFAULT_GC_MAX_ENTRY_SIZE: usize = 200;
/// Long enough that nothing expires during a run.
pub const DEFAULT_GC_LIFE_WINDOW: Duration = Duration::from_secs(100 * 60);

/// Identifier read back after every population.
const CHECK_ID: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GcOverheadConfig {
    pub backend: BackendKind,
    pub entries: usize,
    pub repeat: usize,
    pub value_size: usize,
    /// Engine sizing; `max_entries` always tracks `entries`.
    pub hints: CapacityHints,
}

impl GcOverheadConfig {
    pub fn new(backend: BackendKind, entries: usize, repeat: usize, value_size: usize) -> Self {
        Self {
            backend,
            entries,
            repeat,
            value_size,
            hints: CapacityHints {
                max_entries: entries,
                max_entry_size: DEFAULT_GC_MAX_ENTRY_SIZE,
                life_window: DEFAULT_GC_LIFE_WINDOW,
            },
        }
    }

    pub fn with_max_entry_size(mut self, max_entry_size: usize) -> Self {
        self.hints.max_entry_size = max_entry_size;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entries == 0 {
            return Err(ConfigError::Zero { name: "entries" });
        }
        if self.hints.max_entry_size == 0 {
            return Err(ConfigError::Zero {
                name: "max_entry_size",
            });
        }
        Ok(())
    }
}

impl Default for GcOverheadConfig {
    fn default() -> Self {
        Self::new(
            BackendKind::Moka,
            DEFAULT_GC_ENTRIES,
            DEFAULT_GC_REPEAT,
            DEFAULT_GC_VALUE_SIZE,
        )
    }
}

/// Result of one GC-overhead run. Pause figures are deltas from `baseline`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GcReport {
    pub backend: BackendKind,
    pub entries: usize,
    pub repeat: usize,
    pub value_size: usize,
    /// Absolute counter reading the deltas are taken against.
    #[serde(rename = "baseline_ns", serialize_with = "crate::gc::serialize_nanos")]
    pub baseline: Duration,
    #[serde(rename = "startup_ns", serialize_with = "crate::gc::serialize_nanos")]
    pub startup: Duration,
    #[serde(rename = "total_ns", serialize_with = "crate::gc::serialize_nanos")]
    pub total: Duration,
    /// Refused Sets summed over every population.
    pub set_errors: u64,
    /// Entries not retained after population, summed over every population.
    pub lost_entries: u64,
    /// Identifier 1 read back equal to the corpus value after every
    /// population.
    pub first_element_ok: bool,
}

impl GcReport {
    /// Whether the run produced anything worth flagging to the operator.
    pub fn has_anomalies(&self) -> bool {
        self.set_errors > 0 || self.lost_entries > 0 || !self.first_element_ok
    }
}

impl fmt::Display for GcReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "GC pause baseline: {:?}", self.baseline)?;
        writeln!(f, "GC pause for startup: {:?}", self.startup)?;
        write!(f, "GC pause for {}: {:?}", self.backend, self.total)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Population {
    set_errors: u64,
    lost_entries: u64,
    first_element_ok: bool,
}

/// Drives [`GcOverheadConfig`] runs against a [`PauseClock`].
#[derive(Debug)]
pub struct GcOverhead<P> {
    config: GcOverheadConfig,
    clock: P,
}

impl<P: PauseClock> GcOverhead<P> {
    pub fn new(config: GcOverheadConfig, clock: P) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &GcOverheadConfig {
        &self.config
    }

    /// Runs the full sequence against backend type `B`.
    pub fn run<B: Backend<Bytes>>(&self) -> Result<GcReport, ConfigError> {
        self.config.validate()?;
        let config = &self.config;

        self.clock.force_collection();
        let baseline = self.clock.cumulative_pause();
        debug!(backend = B::NAME, ?baseline, "baseline recorded");

        let corpus = Corpus::build(config.entries, config.value_size)?;
        debug!(
            entries = corpus.len(),
            bytes = corpus.values_len(),
            "corpus built"
        );

        let mut totals = self.populate::<B>(&corpus);
        self.clock.force_collection();
        let startup = self.clock.cumulative_pause().saturating_sub(baseline);
        debug!(backend = B::NAME, ?startup, "warm-up population finished");

        for round in 0..config.repeat {
            let pass = self.populate::<B>(&corpus);
            totals.set_errors += pass.set_errors;
            totals.lost_entries += pass.lost_entries;
            totals.first_element_ok &= pass.first_element_ok;
            debug!(backend = B::NAME, round, "churn population finished");
        }

        self.clock.force_collection();
        let total = self.clock.cumulative_pause().saturating_sub(baseline);
        drop(corpus);

        Ok(GcReport {
            backend: config.backend,
            entries: config.entries,
            repeat: config.repeat,
            value_size: config.value_size,
            baseline,
            startup,
            total,
            set_errors: totals.set_errors,
            lost_entries: totals.lost_entries,
            first_element_ok: totals.first_element_ok,
        })
    }

    /// Dispatches [`run`](Self::run) on the configured backend.
    pub fn run_kind(&self) -> Result<GcReport, ConfigError> {
        match self.config.backend {
            BackendKind::StdMap => self.run::<StdMapBackend<Bytes>>(),
            BackendKind::LockedMap => self.run::<LockedMapBackend<Bytes>>(),
            BackendKind::DashMap => self.run::<DashMapBackend<Bytes>>(),
            BackendKind::QuickCache => self.run::<QuickCacheBackend<RawCodec>>(),
            BackendKind::Moka => self.run::<MokaBackend<RawCodec>>(),
        }
    }

    fn populate<B: Backend<Bytes>>(&self, corpus: &Corpus) -> Population {
        let backend = B::with_capacity(&self.config.hints);
        let mut set_errors = 0u64;
        for (key, value) in corpus.iter() {
            if let Err(err) = backend.set(key, value) {
                if set_errors == 0 {
                    warn!(backend = B::NAME, key, error = %err, "set failed");
                }
                set_errors += 1;
            }
        }
        if set_errors > 0 {
            warn!(backend = B::NAME, set_errors, "population finished with errors");
        }

        let lost_entries = corpus.len().saturating_sub(backend.len()) as u64;
        if lost_entries > 0 {
            debug!(backend = B::NAME, lost_entries, "entries not retained");
        }

        Population {
            set_errors,
            lost_entries,
            first_element_ok: check_first_element(&backend, corpus),
        }
    }
}

/// Reads identifier 1 back and compares it with the corpus value.
///
/// A corpus too small to contain identifier 1 passes trivially.
fn check_first_element<B: Backend<Bytes>>(backend: &B, corpus: &Corpus) -> bool {
    if corpus.len() <= CHECK_ID {
        return true;
    }
    let key = corpus.key(CHECK_ID);
    let expected = corpus.value(CHECK_ID);
    match backend.get(key) {
        Ok(Some(found)) if found == expected => true,
        Ok(Some(found)) => {
            warn!(
                backend = B::NAME,
                key,
                expected = expected.len(),
                found = found.len(),
                "value mismatch"
            );
            false
        },
        Ok(None) => {
            warn!(backend = B::NAME, key, "value missing after population");
            false
        },
        Err(err) => {
            warn!(backend = B::NAME, key, error = %err, "read back failed");
            false
        },
    }
}
