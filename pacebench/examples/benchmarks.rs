//! PaceBench Custom Workloads
//!
//! This example registers a handful of workloads by hand and serves as a
//! template for building your own suite on top of the harness.
//!
//! Run with:
//!   cargo run --example benchmarks                        # Run everything
//!   cargo run --example benchmarks -- --help              # Show all options
//!   cargo run --example benchmarks -- list                # List workloads
//!   cargo run --example benchmarks -- --group sorting     # Run only sorting group
//!   cargo run --example benchmarks -- --mode fixed-count -n 20

use pacebench::prelude::*;
use pacebench::{ConcurrencyPlan, Strategy, concurrency_workload};
use std::process::ExitCode;

#[global_allocator]
static GLOBAL: TrackingAllocator = TrackingAllocator;

// ============================================================================
// Sorting
// ============================================================================

fn shuffled(len: u64) -> Vec<u64> {
    // Cheap deterministic permutation
    (0..len).map(|i| (i * 7919) % len).collect()
}

fn sorting(registry: &mut WorkloadRegistry) -> anyhow::Result<()> {
    registry.register(
        FixtureWorkload::with_setup(
            "sort_stable",
            || Ok(shuffled(10_000)),
            |data: &mut Vec<u64>| {
                let mut copy = data.clone();
                copy.sort();
                Ok(copy)
            },
        )
        .in_group("sorting")
        .with_units(10_000),
    )?;

    registry.register(
        FixtureWorkload::with_setup(
            "sort_unstable",
            || Ok(shuffled(10_000)),
            |data: &mut Vec<u64>| {
                let mut copy = data.clone();
                copy.sort_unstable();
                Ok(copy)
            },
        )
        .in_group("sorting")
        .with_units(10_000),
    )?;
    Ok(())
}

// ============================================================================
// Failure handling
// ============================================================================

fn failures(registry: &mut WorkloadRegistry) -> anyhow::Result<()> {
    // Every third action fails; the rest are measured normally
    let mut calls = 0u64;
    registry.register(
        FixtureWorkload::fallible("sometimes_fails", move || {
            calls += 1;
            anyhow::ensure!(calls % 3 != 0, "call {calls} rejected");
            Ok(calls)
        })
        .in_group("failures"),
    )?;

    // Setup never succeeds, so the workload is reported as skipped
    registry.register(
        FixtureWorkload::with_setup(
            "missing_fixture",
            || -> anyhow::Result<Vec<u8>> { anyhow::bail!("fixture file not found") },
            |data: &mut Vec<u8>| Ok(data.len()),
        )
        .in_group("failures"),
    )?;
    Ok(())
}

// ============================================================================
// Concurrency (smaller job than the built-in suite)
// ============================================================================

fn concurrency(registry: &mut WorkloadRegistry) -> anyhow::Result<()> {
    for strategy in Strategy::ALL {
        registry.register(concurrency_workload(ConcurrencyPlan::new(strategy, 100_000, 4)))?;
    }
    Ok(())
}

fn main() -> anyhow::Result<ExitCode> {
    let mut registry = WorkloadRegistry::new();
    sorting(&mut registry)?;
    failures(&mut registry)?;
    concurrency(&mut registry)?;
    pacebench::run(registry)
}
