#![warn(missing_docs)]
//! # PaceBench
//!
//! Micro-benchmark harness for comparing small workloads under identical
//! conditions.
//!
//! PaceBench provides:
//! - **Explicit Registration**: named workloads in a [`WorkloadRegistry`], reported in registration order
//! - **Warmup Isolation**: warmup iterations are executed and discarded before measurement
//! - **Fixed-Count and Time-Boxed Runs**: exact iteration counts or a wall-clock budget
//! - **Robust Statistics**: median/MAD outlier exclusion, nearest-rank percentiles, raw extremes
//! - **Allocation Accounting**: `TrackingAllocator` measures bytes and allocations per iteration
//! - **Failure Containment**: errors and panics become failed samples; setup failures skip a workload
//! - **Concurrency Drivers**: fan-out-join, task-join and pooled-barrier over the same job
//!
//! ## Quick Start
//!
//! ```ignore
//! use pacebench::prelude::*;
//!
//! #[global_allocator]
//! static GLOBAL: TrackingAllocator = TrackingAllocator;
//!
//! fn main() -> anyhow::Result<std::process::ExitCode> {
//!     let mut registry = WorkloadRegistry::new();
//!     registry.register(
//!         FixtureWorkload::with_setup(
//!             "vector_sum",
//!             || Ok((0..1000).collect::<Vec<i64>>()),
//!             |data: &mut Vec<i64>| Ok(data.iter().sum::<i64>()),
//!         )
//!         .in_group("collections"),
//!     )?;
//!     pacebench::run(registry)
//! }
//! ```

// Re-export core types
pub use pacebench_core::{
    AllocationDelta, AllocationSnapshot, Collector, FixtureWorkload, HarnessError,
    IterationMode, Measurement, Sample, SampleSet, ScheduleConfig, Scheduler, TrackingAllocator,
    Workload, WorkloadRegistry, tracking_active,
};

// Re-export stats
pub use pacebench_stats::{OutlierPolicy, Statistics, StatsError, summarize};

// Re-export reporting
pub use pacebench_report::{
    OutputFormat, Report, WorkloadReport, WorkloadStatus, generate_csv_report,
    generate_json_report, render_table,
};

// Re-export the built-in catalog
pub use pacebench_workloads::{
    ConcurrencyPlan, DriveOutcome, DriverError, Strategy, concurrency_workload,
    default_registry, register_default_suite,
};

// Re-export CLI entry points
pub use pacebench_cli::{Cli, PaceConfig, RunSettings, run_suite, run_with_cli};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        FixtureWorkload, IterationMode, ScheduleConfig, TrackingAllocator, Workload,
        WorkloadRegistry,
    };
}

/// Run the PaceBench CLI harness over `registry`.
///
/// Call this from your harness binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<std::process::ExitCode> {
///     pacebench::run(pacebench::default_registry()?)
/// }
/// ```
pub use pacebench_cli::run;
