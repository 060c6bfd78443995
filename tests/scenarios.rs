// ==============================================
// END-TO-END SCENARIOS (integration)
// ==============================================
//
// Drive backends through the public API the way the benchmarks and the GC
// tool do.

use bytes::Bytes;

use cachebench::backend::{
    Backend, DashMapBackend, LockedMapBackend, MokaBackend, QuickCacheBackend, StdMapBackend,
};
use cachebench::codec::{BinaryCodec, JsonCodec, RawCodec, Record};
use cachebench::config::BenchConfig;
use cachebench::driver::{ParallelDriver, SequentialDriver};
use cachebench::gc::Corpus;
use cachebench::keys::{key, parallel_key};

// ==============================================
// Corpus population and readback
// ==============================================

#[test]
fn corpus_value_tail_parses_back_to_its_identifier() {
    let corpus = Corpus::build(10_000, 100).unwrap();
    let backend = StdMapBackend::<Bytes>::with_capacity(&BenchConfig::default().capacity_hints());
    for (k, v) in corpus.iter() {
        backend.set(k, v).unwrap();
    }
    assert_eq!(backend.len(), 10_000);

    let value = backend.get(&key(5_000)).unwrap().unwrap();
    assert_eq!(value.len(), 100);
    let tail = std::str::from_utf8(&value[90..]).unwrap();
    assert_eq!(tail.parse::<usize>().unwrap(), 5_000);
}

#[test]
fn byte_caches_hold_the_whole_corpus() {
    let corpus = Corpus::build(2_000, 100).unwrap();
    let hints = BenchConfig::default().with_entries(2_000).capacity_hints();

    let quick = QuickCacheBackend::<RawCodec>::with_capacity(&hints);
    let moka = MokaBackend::<RawCodec>::with_capacity(&hints);
    for (k, v) in corpus.iter() {
        quick.set(k, v.clone()).unwrap();
        moka.set(k, v).unwrap();
    }
    assert_eq!(moka.len(), 2_000);
    assert_eq!(moka.get(corpus.key(1)).unwrap(), Some(corpus.value(1)));
    assert_eq!(quick.get(corpus.key(1)).unwrap(), Some(corpus.value(1)));
}

// ==============================================
// Sequential driver
// ==============================================

mod sequential {
    use super::*;

    fn driver<C: cachebench::codec::PayloadCodec>(entries: usize) -> SequentialDriver<C> {
        SequentialDriver::new(&BenchConfig::default().with_entries(entries)).unwrap()
    }

    #[test]
    fn populated_gets_never_miss_even_past_the_universe() {
        let d = driver::<BinaryCodec>(1_000);
        let m = d.measure_get::<StdMapBackend<Record>>(2_500);
        assert_eq!(m.operations, 2_500);
        assert_eq!(m.hits, 2_500);
        assert_eq!(m.misses, 0);

        let m = d.measure_get::<MokaBackend<BinaryCodec>>(2_500);
        assert_eq!(m.misses, 0);
        assert_eq!(m.errors, 0);
    }

    #[test]
    fn json_records_survive_the_byte_caches() {
        let d = driver::<JsonCodec>(300);
        let m = d.measure_get::<QuickCacheBackend<JsonCodec>>(900);
        assert_eq!(m.hits, 900);
        assert_eq!(m.errors, 0);
    }

    #[test]
    fn oversized_values_count_as_errors() {
        let config = BenchConfig {
            max_entry_size: 64,
            ..BenchConfig::default().with_entries(50)
        };
        let d: SequentialDriver<RawCodec> = SequentialDriver::new(&config).unwrap();
        let m = d.measure_set::<MokaBackend<RawCodec>>(50);
        assert_eq!(m.operations, 50);
        assert_eq!(m.errors, 50);
    }
}

// ==============================================
// Parallel driver
// ==============================================

mod parallel {
    use super::*;

    #[test]
    fn every_worker_key_is_readable_after_parallel_sets() {
        let workers = 4;
        let per_worker = 250;
        let config = BenchConfig::default()
            .with_workers(workers)
            .with_entries(per_worker);
        let d: ParallelDriver<BinaryCodec> = ParallelDriver::new(&config).unwrap();

        let backend: DashMapBackend<Record> = d.build_for_sets();
        let m = d.run_set_workers(&backend, per_worker as u64);
        assert_eq!(m.operations, (workers * per_worker) as u64);
        assert_eq!(m.errors, 0);

        let mut hits = 0;
        for w in 0..workers {
            for i in 0..per_worker {
                if backend.get(&parallel_key(w, i)).unwrap() == Some(Record::new(i)) {
                    hits += 1;
                }
            }
        }
        assert_eq!(hits, workers * per_worker);
    }

    #[test]
    fn concurrent_gets_on_shared_keys_all_hit() {
        let config = BenchConfig::default().with_workers(8).with_entries(100);
        let d: ParallelDriver<RawCodec> = ParallelDriver::new(&config).unwrap();

        let backend: LockedMapBackend<Bytes> = d.build();
        d.populate(&backend);
        let m = d.run_get_workers(&backend, 1_000);
        assert_eq!(m.operations, 8_000);
        assert_eq!(m.hits, 8_000);
        assert!((m.hit_rate() - 1.0).abs() < f64::EPSILON);
    }
}
