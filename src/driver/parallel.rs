//! Multi-threaded Set/Get measurements.
//!
//! ## Architecture
//!
//! ```text
//!   setup (untimed)   build backend, spawn W scoped workers
//!                     every worker parks on a Barrier(W + 1)
//!   timed region      barrier releases → timer starts
//!                     worker w free-runs its own ops from a seeded offset
//!                     Set: private namespace parallel_key(w, ·)
//!                     Get: shared namespace key(·), overlaps allowed
//!   stop              last worker joined → timer stops
//! ```
//!
//! The driver holds no locks and shares nothing between workers except the
//! backend, whose own concurrency control is assumed. Only aggregate counts
//! and wall time are meaningful; there is no ordering across workers.
//!
//! Backends must be `Sync`, so the single-threaded `StdMapBackend` cannot
//! be driven here.

use std::sync::Barrier;
use std::thread;
use std::time::Instant;

use tracing::debug;

use crate::backend::{Backend, CapacityHints};
use crate::codec::PayloadCodec;
use crate::config::BenchConfig;
use crate::driver::measurement::Measurement;
use crate::error::ConfigError;
use crate::keys::{KeyPool, OffsetSource, ShardedKeys};

/// Fans a measurement out over a fixed set of worker threads.
#[derive(Debug, Clone)]
pub struct ParallelDriver<C> {
    codec: C,
    shared: KeyPool,
    sharded: ShardedKeys,
    hints: CapacityHints,
    workers: usize,
    seed: u64,
}

impl<C: PayloadCodec> ParallelDriver<C> {
    /// Fails when `config` does not pass [`BenchConfig::validate`].
    pub fn new(config: &BenchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            codec: C::default(),
            shared: KeyPool::sequential(config.entries),
            sharded: ShardedKeys::new(config.workers, config.entries),
            hints: config.capacity_hints(),
            workers: config.workers,
            seed: config.seed,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Keys read by Get workers.
    pub fn shared_keys(&self) -> &KeyPool {
        &self.shared
    }

    /// Per-worker key namespaces written by Set workers.
    pub fn worker_keys(&self) -> &ShardedKeys {
        &self.sharded
    }

    /// Builds a backend sized for the shared key universe.
    pub fn build<B: Backend<C::Value>>(&self) -> B {
        B::with_capacity(&self.hints)
    }

    /// Builds a backend sized for every worker's namespace at once.
    pub fn build_for_sets<B: Backend<C::Value>>(&self) -> B {
        let hints = CapacityHints {
            max_entries: self.hints.max_entries.saturating_mul(self.workers),
            ..self.hints
        };
        B::with_capacity(&hints)
    }

    /// Stores every shared identifier once, from the calling thread.
    pub fn populate<B: Backend<C::Value>>(&self, backend: &B) -> Measurement {
        let mut m = Measurement::default();
        for (id, key) in self.shared.iter().enumerate() {
            m.record_set(key, backend.set(key, self.codec.make_value(id)));
        }
        m
    }

    /// Every worker issues `ops_per_worker` Sets into its own namespace.
    pub fn run_set_workers<B>(&self, backend: &B, ops_per_worker: u64) -> Measurement
    where
        B: Backend<C::Value> + Sync,
    {
        self.sets(backend, |_| ops_per_worker)
    }

    /// Every worker issues `ops_per_worker` Gets against the shared keys.
    pub fn run_get_workers<B>(&self, backend: &B, ops_per_worker: u64) -> Measurement
    where
        B: Backend<C::Value> + Sync,
    {
        self.gets(backend, |_| ops_per_worker)
    }

    /// Times `iterations` Sets, split across workers, into a fresh backend.
    pub fn measure_set<B>(&self, iterations: u64) -> Measurement
    where
        B: Backend<C::Value> + Sync,
    {
        let backend = self.build_for_sets::<B>();
        self.sets(&backend, |worker| self.share(iterations, worker))
    }

    /// Times `iterations` Gets, split across workers, against a populated
    /// backend.
    pub fn measure_get<B>(&self, iterations: u64) -> Measurement
    where
        B: Backend<C::Value> + Sync,
    {
        let backend = self.build::<B>();
        self.populate(&backend);
        self.gets(&backend, |worker| self.share(iterations, worker))
    }

    fn sets<B, O>(&self, backend: &B, ops_for: O) -> Measurement
    where
        B: Backend<C::Value> + Sync,
        O: Fn(usize) -> u64,
    {
        self.fan_out(ops_for, |worker, ops| {
            let keys = self.sharded.pool(worker);
            self.worker_loop(worker, keys, ops, |key, id, m| {
                m.record_set(key, backend.set(key, self.codec.make_value(id)));
            })
        })
    }

    fn gets<B, O>(&self, backend: &B, ops_for: O) -> Measurement
    where
        B: Backend<C::Value> + Sync,
        O: Fn(usize) -> u64,
    {
        self.fan_out(ops_for, |worker, ops| {
            self.worker_loop(worker, &self.shared, ops, |key, _, m| {
                m.record_get(key, backend.get(key));
            })
        })
    }

    /// Worker `worker`'s share of `total` ops; the remainder goes to the
    /// lowest worker ids.
    fn share(&self, total: u64, worker: usize) -> u64 {
        let workers = self.workers as u64;
        let base = total / workers;
        if (worker as u64) < total % workers {
            base + 1
        } else {
            base
        }
    }

    fn worker_loop<F>(&self, worker: usize, keys: &KeyPool, ops: u64, mut op: F) -> Measurement
    where
        F: FnMut(&str, usize, &mut Measurement),
    {
        let mut m = Measurement::default();
        let n = keys.len();
        if n == 0 {
            return m;
        }
        let mut id = OffsetSource::for_worker(self.seed, worker).next_offset(n);
        let timer = Instant::now();
        for _ in 0..ops {
            op(keys.get(id), id, &mut m);
            id += 1;
            if id == n {
                id = 0;
            }
        }
        m.elapsed = timer.elapsed();
        m
    }

    fn fan_out<O, W>(&self, ops_for: O, work: W) -> Measurement
    where
        O: Fn(usize) -> u64,
        W: Fn(usize, u64) -> Measurement + Sync,
    {
        let barrier = Barrier::new(self.workers + 1);
        let (mut total, elapsed) = thread::scope(|scope| {
            let handles: Vec<_> = (0..self.workers)
                .map(|worker| {
                    let ops = ops_for(worker);
                    let barrier = &barrier;
                    let work = &work;
                    scope.spawn(move || {
                        barrier.wait();
                        work(worker, ops)
                    })
                })
                .collect();

            barrier.wait();
            let start = Instant::now();
            let mut total = Measurement::default();
            for handle in handles {
                match handle.join() {
                    Ok(m) => total.merge(&m),
                    Err(payload) => std::panic::resume_unwind(payload),
                }
            }
            (total, start.elapsed())
        });
        total.elapsed = elapsed;
        debug!(
            workers = self.workers,
            operations = total.operations,
            errors = total.errors,
            "parallel region finished"
        );
        total
    }
}
