//! Byte-budgeted `quick_cache` backend.
//!
//! The engine holds `Bytes` only; typed values cross through the codec on
//! every call. Entry weight is `key.len() + value.len()` and the total weight
//! budget is `max_entries × max_entry_size`, so the cache starts evicting
//! once the payload it holds outgrows the budget.

use bytes::Bytes;
use quick_cache::Weighter;
use quick_cache::sync::Cache;

use crate::backend::traits::{Backend, CapacityHints};
use crate::codec::PayloadCodec;
use crate::error::BackendError;

#[derive(Debug, Clone, Copy, Default)]
struct EntryWeighter;

impl Weighter<String, Bytes> for EntryWeighter {
    #[inline]
    fn weight(&self, key: &String, value: &Bytes) -> u64 {
        (key.len() + value.len()) as u64
    }
}

/// `quick_cache::sync::Cache<String, Bytes>` sized in bytes.
pub struct QuickCacheBackend<C> {
    cache: Cache<String, Bytes, EntryWeighter>,
    hints: CapacityHints,
    codec: C,
}

impl<C: PayloadCodec> Backend<C::Value> for QuickCacheBackend<C> {
    const NAME: &'static str = "quickcache";

    fn with_capacity(hints: &CapacityHints) -> Self {
        Self {
            cache: Cache::with_weighter(hints.max_entries, hints.byte_budget(), EntryWeighter),
            hints: *hints,
            codec: C::default(),
        }
    }

    fn set(&self, key: &str, value: C::Value) -> Result<(), BackendError> {
        let data = self.codec.to_bytes(value)?;
        self.hints.check_entry(key, &data)?;
        self.cache.insert(key.to_owned(), data);
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<C::Value>, BackendError> {
        match self.cache.get(key) {
            Some(data) => Ok(Some(self.codec.from_bytes(data)?)),
            None => Ok(None),
        }
    }

    fn len(&self) -> usize {
        self.cache.len()
    }
}
