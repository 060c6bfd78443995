//! Error types for the cachebench harness.
//!
//! ## Key Components
//!
//! - [`BackendError`]: returned by a backend adapter when a write is refused
//!   or a stored payload cannot be converted back to its typed form. These
//!   are reported and counted by the drivers, never fatal.
//! - [`CodecError`]: returned by a [`PayloadCodec`](crate::codec::PayloadCodec)
//!   when a value cannot be serialized or deserialized.
//! - [`ConfigError`]: returned when a run is configured with an unknown
//!   backend or an unusable size. The GC tool treats it as fatal.
//!
//! ## Example Usage
//!
//! ```
//! use cachebench::backend::BackendKind;
//! use cachebench::error::ConfigError;
//!
//! let err = "memcached".parse::<BackendKind>().unwrap_err();
//! assert!(matches!(err, ConfigError::UnknownBackend(_)));
//! assert!(err.to_string().contains("memcached"));
//! ```

use thiserror::Error;

// ---------------------------------------------------------------------------
// CodecError
// ---------------------------------------------------------------------------

/// Error returned when a payload cannot be converted to or from bytes.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("binary encode failed: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("binary decode failed: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("json codec failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("decoded {consumed} of {len} bytes, trailing data left")]
    TrailingBytes { consumed: usize, len: usize },
}

// ---------------------------------------------------------------------------
// BackendError
// ---------------------------------------------------------------------------

/// Error returned by a backend adapter.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The entry is larger than the engine's per-entry limit.
    #[error("entry of {size} bytes exceeds the {limit} byte entry limit")]
    EntryTooLarge { size: usize, limit: usize },

    /// The value could not be converted through the adapter's codec.
    #[error(transparent)]
    Codec(#[from] CodecError),
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when run configuration is invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(
        "unknown cache: {0} (expected one of: stdmap, lockedmap, dashmap, quickcache, moka)"
    )]
    UnknownBackend(String),

    #[error("{name} must be > 0")]
    Zero { name: &'static str },

    #[error("corpus of {entries} entries × {value_size} bytes overflows usize")]
    CorpusTooLarge { entries: usize, value_size: usize },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
