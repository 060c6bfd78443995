//! Plain `HashMap` backend.
//!
//! The map lives in a `RefCell`, which makes the backend `!Sync`: the
//! parallel driver rejects it at compile time, so it only ever runs under
//! the sequential driver.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::backend::traits::{Backend, CapacityHints};
use crate::error::BackendError;

/// Single-threaded `HashMap<String, V>`.
#[derive(Debug)]
pub struct StdMapBackend<V> {
    map: RefCell<HashMap<String, V>>,
}

impl<V: Clone> Backend<V> for StdMapBackend<V> {
    const NAME: &'static str = "stdmap";

    fn with_capacity(hints: &CapacityHints) -> Self {
        Self {
            map: RefCell::new(HashMap::with_capacity(hints.max_entries)),
        }
    }

    #[inline]
    fn set(&self, key: &str, value: V) -> Result<(), BackendError> {
        self.map.borrow_mut().insert(key.to_owned(), value);
        Ok(())
    }

    #[inline]
    fn get(&self, key: &str) -> Result<Option<V>, BackendError> {
        Ok(self.map.borrow().get(key).cloned())
    }

    fn len(&self) -> usize {
        self.map.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get() {
        let map: StdMapBackend<u64> = StdMapBackend::with_capacity(&CapacityHints::default());
        map.set("a", 1).unwrap();
        map.set("a", 2).unwrap();
        assert_eq!(map.get("a").unwrap(), Some(2));
        assert_eq!(map.get("b").unwrap(), None);
        assert_eq!(map.len(), 1);
    }
}
