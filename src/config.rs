//! Shared run configuration.
//!
//! [`BenchConfig`] carries the knobs every throughput measurement uses: the
//! key universe, engine sizing, worker count, and the seed for start
//! offsets.
//!
//! ```
//! use cachebench::config::BenchConfig;
//!
//! let config = BenchConfig::default();
//! assert_eq!(config.entries, 10_000);
//! assert_eq!(config.capacity_hints().max_entry_size, 256);
//! ```

use std::num::NonZeroUsize;
use std::thread;
use std::time::Duration;

use crate::backend::CapacityHints;
use crate::error::ConfigError;

/// Size of the key universe driven by the throughput benchmarks.
pub const DEFAULT_ENTRIES: usize = 10_000;
/// Largest accepted entry, in bytes.
pub const DEFAULT_MAX_ENTRY_SIZE: usize = 256;
pub const DEFAULT_LIFE_WINDOW: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Identifiers are drawn from `[0, entries)`.
    pub entries: usize,
    pub max_entry_size: usize,
    pub life_window: Duration,
    /// Parallel worker count.
    pub workers: usize,
    pub seed: u64,
}

impl BenchConfig {
    /// Engine sizing derived from this configuration.
    pub fn capacity_hints(&self) -> CapacityHints {
        CapacityHints {
            max_entries: self.entries,
            max_entry_size: self.max_entry_size,
            life_window: self.life_window,
        }
    }

    pub fn with_entries(mut self, entries: usize) -> Self {
        self.entries = entries;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Rejects configurations that cannot drive a measurement.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entries == 0 {
            return Err(ConfigError::Zero { name: "entries" });
        }
        if self.workers == 0 {
            return Err(ConfigError::Zero { name: "workers" });
        }
        if self.max_entry_size == 0 {
            return Err(ConfigError::Zero {
                name: "max_entry_size",
            });
        }
        Ok(())
    }
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            entries: DEFAULT_ENTRIES,
            max_entry_size: DEFAULT_MAX_ENTRY_SIZE,
            life_window: DEFAULT_LIFE_WINDOW,
            workers: available_workers(),
            seed: DEFAULT_SEED,
        }
    }
}

/// Host parallelism, or 1 when it cannot be queried.
pub fn available_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = BenchConfig::default();
        assert!(config.workers >= 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_entries_rejected() {
        let config = BenchConfig::default().with_entries(0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::Zero { name: "entries" })
        );
    }

    #[test]
    fn hints_mirror_config() {
        let config = BenchConfig::default().with_entries(123);
        let hints = config.capacity_hints();
        assert_eq!(hints.max_entries, 123);
        assert_eq!(hints.life_window, DEFAULT_LIFE_WINDOW);
    }
}
