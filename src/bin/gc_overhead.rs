//! Allocator-pause overhead of one backend under repeated full population.
//!
//! Run with: cargo run --release --bin gc_overhead -- --cache dashmap
//!
//! Logging goes to stderr (`RUST_LOG`, default `warn`); stdout carries only
//! the measurement.

#[global_allocator]
static ALLOC: TrackingAllocator = TrackingAllocator::system();

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use cachebench::backend::BackendKind;
use cachebench::gc::overhead::{
    DEFAULT_GC_ENTRIES, DEFAULT_GC_MAX_ENTRY_SIZE, DEFAULT_GC_REPEAT, DEFAULT_GC_VALUE_SIZE,
};
use cachebench::gc::{
    AllocStats, AllocatorClock, GcOverhead, GcOverheadConfig, GcReport, TrackingAllocator,
};

#[derive(Debug, Parser)]
#[command(name = "gc_overhead", about = "Allocator-pause overhead per cache backend")]
struct Args {
    /// Cache to bench: stdmap, lockedmap, dashmap, quickcache, moka.
    #[arg(long, default_value = "moka")]
    cache: String,

    /// Number of entries to test.
    #[arg(long, default_value_t = DEFAULT_GC_ENTRIES)]
    entries: usize,

    /// Number of repetitions.
    #[arg(long, default_value_t = DEFAULT_GC_REPEAT)]
    repeat: usize,

    /// Size of a single entry value in bytes.
    #[arg(long, default_value_t = DEFAULT_GC_VALUE_SIZE)]
    value_size: usize,

    /// Largest entry accepted by the byte caches, key included.
    #[arg(long, default_value_t = DEFAULT_GC_MAX_ENTRY_SIZE)]
    max_entry_size: usize,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    report: &'a GcReport,
    alloc: AllocStats,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let backend = match args.cache.parse::<BackendKind>() {
        Ok(backend) => backend,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        },
    };

    let config = GcOverheadConfig::new(backend, args.entries, args.repeat, args.value_size)
        .with_max_entry_size(args.max_entry_size);
    if let Err(err) = config.validate() {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    if !AllocatorClock::is_tracking() {
        warn!("tracking allocator not installed, pause readings will be zero");
    }

    if !args.json {
        println!("Cache:              {backend}");
        println!("Number of entries:  {}", args.entries);
        println!("Number of repeats:  {}", args.repeat);
        println!("Value size:         {}", args.value_size);
    }

    let before = AllocStats::snapshot();
    let report = match GcOverhead::new(config, AllocatorClock).run_kind() {
        Ok(report) => report,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        },
    };
    let alloc = AllocStats::snapshot().since(&before);
    debug!(?alloc, "run finished");

    if args.json {
        let output = JsonOutput {
            report: &report,
            alloc,
        };
        match serde_json::to_string_pretty(&output) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("failed to encode report: {err}");
                return ExitCode::FAILURE;
            },
        }
        return ExitCode::SUCCESS;
    }

    println!("{report}");
    println!(
        "Allocations:        {} ({} bytes), frees: {}",
        alloc.allocations, alloc.bytes_allocated, alloc.frees
    );
    if report.set_errors > 0 {
        println!("Errors in set:      {}", report.set_errors);
    }
    if report.lost_entries > 0 {
        println!("Overwritten:        {}", report.lost_entries);
    }
    if !report.first_element_ok {
        println!("Wrong first element");
    }
    ExitCode::SUCCESS
}
