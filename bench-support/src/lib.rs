//! Benchmark support for cachebench.
//!
//! Holds the backend registry macros so every benchmark body iterates the
//! same backend set with monomorphic types. Both macros are `#[macro_export]`
//! and are invoked as `bench_support::for_each_backend!`.

pub mod registry;
