//! Workload keys.
//!
//! Every key is derived from a dense workload identifier. Sequential runs use
//! [`key`]; parallel Set runs use [`parallel_key`], which embeds the worker id
//! so no two workers ever address the same key.
//!
//! Keys are formatted up front into a [`KeyPool`] so timed regions only
//! borrow `&str` slices.
//!
//! ```text
//!   key(42)             → "key-0000000042"
//!   parallel_key(3, 42) → "key-0003-000042"
//! ```
//!
//! ## Example Usage
//!
//! ```
//! use cachebench::keys::{KeyPool, key};
//!
//! let pool = KeyPool::sequential(4);
//! assert_eq!(pool.get(1), key(1));
//! assert_eq!(pool.get(5), key(1)); // wraps
//! ```

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Prefix shared by every generated key.
pub const KEY_PREFIX: &str = "key-";

/// Width of the zero-padded identifier in a sequential key.
pub const KEY_DIGITS: usize = 10;

/// Sequential key for identifier `id`.
#[inline]
pub fn key(id: usize) -> String {
    format!("{KEY_PREFIX}{id:010}")
}

/// Key for identifier `id` inside worker `worker`'s private namespace.
///
/// Digits never contain `-`, so the separator position makes the
/// `(worker, id)` pair recoverable even when a field outgrows its padding.
#[inline]
pub fn parallel_key(worker: usize, id: usize) -> String {
    format!("{KEY_PREFIX}{worker:04}-{id:06}")
}

/// Precomputed keys for identifiers `[0, len)`.
#[derive(Debug, Clone)]
pub struct KeyPool {
    keys: Vec<String>,
}

impl KeyPool {
    /// Pool of `key(0..len)`.
    pub fn sequential(len: usize) -> Self {
        Self {
            keys: (0..len).map(key).collect(),
        }
    }

    /// Pool of `parallel_key(worker, 0..len)`.
    pub fn for_worker(worker: usize, len: usize) -> Self {
        Self {
            keys: (0..len).map(|id| parallel_key(worker, id)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Key for identifier `id`, wrapping modulo the pool size.
    ///
    /// # Panics
    ///
    /// Panics if the pool is empty.
    #[inline]
    pub fn get(&self, id: usize) -> &str {
        &self.keys[id % self.keys.len()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

/// One private [`KeyPool`] per worker.
#[derive(Debug, Clone)]
pub struct ShardedKeys {
    pools: Vec<KeyPool>,
}

impl ShardedKeys {
    pub fn new(workers: usize, per_worker: usize) -> Self {
        Self {
            pools: (0..workers)
                .map(|worker| KeyPool::for_worker(worker, per_worker))
                .collect(),
        }
    }

    pub fn workers(&self) -> usize {
        self.pools.len()
    }

    /// Pool owned by `worker`.
    ///
    /// # Panics
    ///
    /// Panics if `worker >= self.workers()`.
    pub fn pool(&self, worker: usize) -> &KeyPool {
        &self.pools[worker]
    }
}

/// Deterministic per-run source of start offsets.
#[derive(Debug, Clone)]
pub struct OffsetSource {
    rng: SmallRng,
}

impl OffsetSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Offsets for a worker, derived from the run seed and the worker id.
    pub fn for_worker(seed: u64, worker: usize) -> Self {
        Self::new(seed ^ (worker as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }

    /// Random identifier in `[0, len)`; `0` for an empty range.
    pub fn next_offset(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.rng.random_range(0..len)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn sequential_key_format() {
        assert_eq!(key(0), "key-0000000000");
        assert_eq!(key(5000), "key-0000005000");
        assert_eq!(key(0).len(), KEY_PREFIX.len() + KEY_DIGITS);
    }

    #[test]
    fn parallel_key_format() {
        assert_eq!(parallel_key(3, 42), "key-0003-000042");
    }

    #[test]
    fn sequential_keys_are_distinct_over_tested_range() {
        let pool = KeyPool::sequential(10_000);
        let unique: HashSet<&str> = pool.iter().collect();
        assert_eq!(unique.len(), 10_000);
    }

    #[test]
    fn sequential_keys_sort_by_identifier() {
        let pool = KeyPool::sequential(1_000);
        let keys: Vec<&str> = pool.iter().collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn sharded_pools_are_disjoint() {
        let sharded = ShardedKeys::new(8, 500);
        let mut seen = HashSet::new();
        for worker in 0..sharded.workers() {
            for key in sharded.pool(worker).iter() {
                assert!(seen.insert(key.to_owned()), "duplicate key {key}");
            }
        }
        assert_eq!(seen.len(), 8 * 500);
    }

    #[test]
    fn offsets_are_deterministic_and_in_range() {
        let mut a = OffsetSource::for_worker(42, 3);
        let mut b = OffsetSource::for_worker(42, 3);
        for _ in 0..100 {
            let offset = a.next_offset(10);
            assert_eq!(offset, b.next_offset(10));
            assert!(offset < 10);
        }
        assert_eq!(a.next_offset(0), 0);
    }

    proptest! {
        #[test]
        fn worker_namespaces_never_intersect(
            worker_a in 0usize..20_000,
            worker_b in 0usize..20_000,
            i in 0usize..2_000_000,
            j in 0usize..2_000_000,
        ) {
            prop_assume!(worker_a != worker_b);
            prop_assert_ne!(parallel_key(worker_a, i), parallel_key(worker_b, j));
        }

        #[test]
        fn worker_keys_are_collision_free(
            worker in 0usize..10_000,
            i in 0usize..2_000_000,
            j in 0usize..2_000_000,
        ) {
            prop_assume!(i != j);
            prop_assert_ne!(parallel_key(worker, i), parallel_key(worker, j));
        }
    }
}
