//! Time-windowed `moka` backend.
//!
//! The engine holds `Bytes` only; typed values cross through the codec on
//! every call. Sizing comes straight from [`CapacityHints`]: the weight
//! budget is `max_entries × max_entry_size`, entry weight is
//! `key.len() + value.len()`, and `life_window` becomes the engine's
//! time-to-live. Expiry and eviction belong to `moka`.

use bytes::Bytes;
use moka::sync::Cache;

use crate::backend::traits::{Backend, CapacityHints};
use crate::codec::PayloadCodec;
use crate::error::BackendError;

/// `moka::sync::Cache<String, Bytes>` with a retention window.
pub struct MokaBackend<C> {
    cache: Cache<String, Bytes>,
    hints: CapacityHints,
    codec: C,
}

impl<C: PayloadCodec> Backend<C::Value> for MokaBackend<C> {
    const NAME: &'static str = "moka";

    fn with_capacity(hints: &CapacityHints) -> Self {
        let cache = Cache::builder()
            .initial_capacity(hints.max_entries)
            .max_capacity(hints.byte_budget())
            .weigher(|key: &String, value: &Bytes| {
                u32::try_from(key.len() + value.len()).unwrap_or(u32::MAX)
            })
            .time_to_live(hints.life_window)
            .build();
        Self {
            cache,
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

    /// Settles the engine's deferred bookkeeping before counting.
    fn len(&self) -> usize {
        self.cache.run_pending_tasks();
        usize::try_from(self.cache.entry_count()).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::codec::{JsonCodec, RawCodec, Record};

    #[test]
    fn records_round_trip_through_the_engine() {
        let hints = CapacityHints {
            max_entries: 1_000,
            ..CapacityHints::default()
        };
        let cache: MokaBackend<JsonCodec> = MokaBackend::with_capacity(&hints);

        for i in 0..1_000 {
            cache.set(&format!("key-{i:010}"), Record::new(i)).unwrap();
        }
        assert_eq!(cache.len(), 1_000);
        assert_eq!(
            cache.get("key-0000000500").unwrap(),
            Some(Record { id: 500 })
        );
    }

    #[test]
    fn entries_past_the_life_window_read_as_misses() {
        let hints = CapacityHints {
            life_window: Duration::from_millis(1),
            ..CapacityHints::default()
        };
        let cache: MokaBackend<RawCodec> = MokaBackend::with_capacity(&hints);
        cache.set("k", Bytes::from_static(b"v")).unwrap();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get("k").unwrap(), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn oversized_entry_is_refused() {
        let hints = CapacityHints {
            max_entry_size: 8,
            ..CapacityHints::default()
        };
        let cache: MokaBackend<RawCodec> = MokaBackend::with_capacity(&hints);
        let err = cache.set("key", Bytes::from_static(b"123456")).unwrap_err();
        assert!(matches!(err, BackendError::EntryTooLarge { size: 9, limit: 8 }));
        assert!(cache.set("key", Bytes::from_static(b"12345")).is_ok());
        assert_eq!(cache.len(), 1);
    }
}
