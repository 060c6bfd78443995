//! `HashMap` behind a single reader-writer lock.
//!
//! Readers proceed in parallel; every write serializes on the one lock.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::backend::traits::{Backend, CapacityHints};
use crate::error::BackendError;

/// Thread-safe `HashMap<String, V>` guarded by a `parking_lot::RwLock`.
#[derive(Debug)]
pub struct LockedMapBackend<V> {
    map: RwLock<HashMap<String, V>>,
}

impl<V: Clone> Backend<V> for LockedMapBackend<V> {
    const NAME: &'static str = "lockedmap";

    fn with_capacity(hints: &CapacityHints) -> Self {
        Self {
            map: RwLock::new(HashMap::with_capacity(hints.max_entries)),
        }
    }

    #[inline]
    fn set(&self, key: &str, value: V) -> Result<(), BackendError> {
        self.map.write().insert(key.to_owned(), value);
        Ok(())
    }

    #[inline]
    fn get(&self, key: &str) -> Result<Option<V>, BackendError> {
        Ok(self.map.read().get(key).cloned())
    }

    fn len(&self) -> usize {
        self.map.read().len()
    }
}
