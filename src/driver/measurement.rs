//! What a driver reports back to the benchmarking host.

use std::time::Duration;

use serde::Serialize;
use tracing::warn;

use crate::error::BackendError;

/// Counts and wall time for one timed region.
///
/// `errors` counts operations the backend refused; a Get miss is not an
/// error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Measurement {
    pub operations: u64,
    pub hits: u64,
    pub misses: u64,
    pub errors: u64,
    #[serde(rename = "elapsed_ns", serialize_with = "crate::gc::serialize_nanos")]
    pub elapsed: Duration,
}

impl Measurement {
    #[inline]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.operations as f64 / secs
        }
    }

    /// Adds `other`'s counts; elapsed becomes the longer of the two.
    pub fn merge(&mut self, other: &Measurement) {
        self.operations += other.operations;
        self.hits += other.hits;
        self.misses += other.misses;
        self.errors += other.errors;
        self.elapsed = self.elapsed.max(other.elapsed);
    }

    /// Counts a refused operation. Only the first one per region is logged.
    pub(crate) fn record_error(&mut self, key: &str, err: &BackendError) {
        if self.errors == 0 {
            warn!(key, error = %err, "backend refused operation");
        }
        self.errors += 1;
    }

    /// Counts the outcome of one Get.
    #[inline]
    pub(crate) fn record_get<V>(&mut self, key: &str, outcome: Result<Option<V>, BackendError>) {
        self.operations += 1;
        match outcome {
            Ok(Some(value)) => {
                std::hint::black_box(value);
                self.hits += 1;
            },
            Ok(None) => self.misses += 1,
            Err(err) => self.record_error(key, &err),
        }
    }

    /// Counts the outcome of one Set.
    #[inline]
    pub(crate) fn record_set(&mut self, key: &str, outcome: Result<(), BackendError>) {
        self.operations += 1;
        if let Err(err) = outcome {
            self.record_error(key, &err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_of_empty_measurement_is_zero() {
        assert_eq!(Measurement::default().hit_rate(), 0.0);
        assert_eq!(Measurement::default().ops_per_sec(), 0.0);
    }

    #[test]
    fn merge_sums_counts_and_keeps_longest_elapsed() {
        let mut a = Measurement {
            operations: 10,
            hits: 6,
            misses: 4,
            errors: 0,
            elapsed: Duration::from_millis(5),
        };
        let b = Measurement {
            operations: 3,
            hits: 3,
            misses: 0,
            errors: 1,
            elapsed: Duration::from_millis(9),
        };
        a.merge(&b);
        assert_eq!(a.operations, 13);
        assert_eq!(a.hits, 9);
        assert_eq!(a.errors, 1);
        assert_eq!(a.elapsed, Duration::from_millis(9));
    }

    #[test]
    fn get_outcomes_are_classified() {
        let mut m = Measurement::default();
        m.record_get("a", Ok(Some(1u8)));
        m.record_get::<u8>("b", Ok(None));
        m.record_get::<u8>(
            "c",
            Err(BackendError::EntryTooLarge { size: 2, limit: 1 }),
        );
        assert_eq!((m.operations, m.hits, m.misses, m.errors), (3, 1, 1, 1));
    }
}
