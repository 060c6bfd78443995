//! Lock-striped concurrent map backend.

use dashmap::DashMap;

use crate::backend::traits::{Backend, CapacityHints};
use crate::error::BackendError;

/// `DashMap<String, V>`; each shard carries its own lock.
#[derive(Debug)]
pub struct DashMapBackend<V> {
    map: DashMap<String, V>,
}

impl<V: Clone> Backend<V> for DashMapBackend<V> {
    const NAME: &'static str = "dashmap";

    fn with_capacity(hints: &CapacityHints) -> Self {
        Self {
            map: DashMap::with_capacity(hints.max_entries),
        }
    }

    #[inline]
    fn set(&self, key: &str, value: V) -> Result<(), BackendError> {
        self.map.insert(key.to_owned(), value);
        Ok(())
    }

    #[inline]
    fn get(&self, key: &str) -> Result<Option<V>, BackendError> {
        Ok(self.map.get(key).map(|entry| entry.value().clone()))
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}
