//! The backend contract shared by every engine under test.
//!
//! ## Architecture
//!
//! ```text
//!   driver ──set(&str, V)──►  Backend<V>  ──►  engine
//!          ◄─get(&str)─────               ◄──
//!
//!   map backends     store V directly
//!   byte backends    store Bytes, V ⇄ Bytes through a PayloadCodec
//! ```
//!
//! Construction receives [`CapacityHints`] and happens outside every timed
//! region; engines may pre-allocate their full capacity there.
//!
//! Thread safety is expressed through auto traits: a backend that is `Sync`
//! may be shared by the parallel driver, one that is not is limited to the
//! sequential driver.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::error::{BackendError, ConfigError};

/// Sizing information passed through unchanged to an engine's constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityHints {
    /// Expected number of live entries.
    pub max_entries: usize,
    /// Largest accepted `key.len() + value.len()`, in bytes.
    pub max_entry_size: usize,
    /// Retention window for time-windowed engines.
    pub life_window: Duration,
}

impl CapacityHints {
    /// Byte budget for engines sized by total payload.
    #[inline]
    pub fn byte_budget(&self) -> u64 {
        (self.max_entries as u64).saturating_mul(self.max_entry_size as u64)
    }

    /// Returns `EntryTooLarge` if `key` and `value` together exceed the
    /// per-entry limit.
    #[inline]
    pub fn check_entry(&self, key: &str, value: &[u8]) -> Result<(), BackendError> {
        let size = key.len() + value.len();
        if size > self.max_entry_size {
            Err(BackendError::EntryTooLarge {
                size,
                limit: self.max_entry_size,
            })
        } else {
            Ok(())
        }
    }
}

impl Default for CapacityHints {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            max_entry_size: 256,
            life_window: Duration::from_secs(10 * 60),
        }
    }
}

/// Uniform Set/Get contract over structurally different engines.
pub trait Backend<V>: Sized {
    /// Selector name, as accepted by [`BackendKind::from_str`].
    const NAME: &'static str;

    /// Builds an empty engine sized by `hints`.
    fn with_capacity(hints: &CapacityHints) -> Self;

    /// Stores `value` under `key`.
    fn set(&self, key: &str, value: V) -> Result<(), BackendError>;

    /// Fetches the value stored under `key`. A miss is `Ok(None)`.
    fn get(&self, key: &str) -> Result<Option<V>, BackendError>;

    /// Number of entries currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runtime backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// `HashMap`, single-threaded.
    StdMap,
    /// `HashMap` behind one reader-writer lock.
    LockedMap,
    /// Lock-striped `DashMap`.
    DashMap,
    /// Byte-budgeted `quick_cache`.
    QuickCache,
    /// `moka` with a retention window.
    Moka,
}

impl BackendKind {
    pub const ALL: [BackendKind; 5] = [
        BackendKind::StdMap,
        BackendKind::LockedMap,
        BackendKind::DashMap,
        BackendKind::QuickCache,
        BackendKind::Moka,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::StdMap => "stdmap",
            BackendKind::LockedMap => "lockedmap",
            BackendKind::DashMap => "dashmap",
            BackendKind::QuickCache => "quickcache",
            BackendKind::Moka => "moka",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BackendKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownBackend(s.to_owned()))
    }
}
