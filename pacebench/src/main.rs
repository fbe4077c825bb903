//! `pacebench` binary: the built-in workload suite behind the CLI.
//!
//! Run with:
//!   cargo run --release                          # Run the whole suite
//!   cargo run --release -- list                  # List workloads
//!   cargo run --release -- --group concurrency   # Compare concurrency strategies
//!   cargo run --release -- --format json -o report.json

use pacebench::{TrackingAllocator, default_registry};
use std::process::ExitCode;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

fn main() -> anyhow::Result<ExitCode> {
    let registry = default_registry()?;
    pacebench::run(registry)
}
