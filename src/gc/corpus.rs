//! Key/value corpus replayed by the GC-overhead driver.
//!
//! ## Layout
//!
//! ```text
//!   keys    [ "key-0000000000", "key-0000000001", ... ]      N strings
//!   values  [ 0 0 .. 0 │ 0000000000 ][ 0 0 .. 0 │ 0000000001 ] ...
//!             └──────── value_size ─┘
//!             head zero-filled, tail = digit suffix of keys[i]
//! ```
//!
//! Values live in one flat buffer of exactly `N × value_size` bytes, so
//! building the corpus costs one allocation for all values instead of one
//! per entry. The value tail is copied out of the key's own bytes rather than
//! formatted a second time.
//!
//! Once built the corpus is frozen: keys are only handed out as `&str` and
//! the value buffer is an immutable `Bytes`, so [`Corpus::value`] returns
//! zero-copy slices of it.
//!
//! ## Example Usage
//!
//! ```
//! use cachebench::gc::Corpus;
//!
//! let corpus = Corpus::build(100, 16).unwrap();
//! assert_eq!(corpus.key(42), "key-0000000042");
//! assert_eq!(&corpus.value(42)[6..], b"0000000042");
//! ```

use bytes::{Bytes, BytesMut};

use crate::error::ConfigError;
use crate::keys::{KEY_DIGITS, key};

/// `N` keys plus `N` fixed-size values carved from one buffer.
#[derive(Debug, Clone)]
pub struct Corpus {
    keys: Vec<String>,
    values: Bytes,
    value_size: usize,
}

impl Corpus {
    /// Builds `entries` keys and values of `value_size` bytes each.
    pub fn build(entries: usize, value_size: usize) -> Result<Self, ConfigError> {
        let total = entries
            .checked_mul(value_size)
            .ok_or(ConfigError::CorpusTooLarge {
                entries,
                value_size,
            })?;

        let mut keys = Vec::with_capacity(entries);
        let mut values = BytesMut::zeroed(total);
        for id in 0..entries {
            let key = key(id);
            let slot = &mut values[id * value_size..(id + 1) * value_size];
            copy_key_suffix(slot, key.as_bytes());
            keys.push(key);
        }

        Ok(Self {
            keys,
            values: values.freeze(),
            value_size,
        })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn value_size(&self) -> usize {
        self.value_size
    }

    /// Size of the flat value buffer, always `len() × value_size()`.
    pub fn values_len(&self) -> usize {
        self.values.len()
    }

    /// # Panics
    ///
    /// Panics if `id >= self.len()`.
    #[inline]
    pub fn key(&self, id: usize) -> &str {
        &self.keys[id]
    }

    /// Zero-copy slice `values[id × value_size .. (id + 1) × value_size]`.
    ///
    /// # Panics
    ///
    /// Panics if `id >= self.len()`.
    #[inline]
    pub fn value(&self, id: usize) -> Bytes {
        assert!(id < self.keys.len(), "corpus id {id} out of range");
        let start = id * self.value_size;
        self.values.slice(start..start + self.value_size)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Bytes)> + '_ {
        self.keys
            .iter()
            .enumerate()
            .map(|(id, key)| (key.as_str(), self.value(id)))
    }
}

/// Copies the digit suffix of `key` into the tail of `slot`.
///
/// At most [`KEY_DIGITS`] bytes are copied; a slot shorter than that gets
/// the last `slot.len()` digits.
fn copy_key_suffix(slot: &mut [u8], key: &[u8]) {
    let n = KEY_DIGITS.min(slot.len()).min(key.len());
    let tail = slot.len() - n;
    slot[tail..].copy_from_slice(&key[key.len() - n..]);
}
