//! Workload Executor
//!
//! Runs the selected workloads and turns their samples into a report.
//!
//! ## Pipeline Overview
//!
//! ```text
//! WorkloadRegistry (explicit registration)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  Setup, warmup, measurement, teardown (sequential)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ statistics  │  Summary statistics per workload (parallel)
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   report    │  Build Report with statuses and metadata
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Sequential workload execution with progress display
//! - [`statistics`] - Parallel statistics computation
//! - [`report`] - Report building
//! - [`metadata`] - Host and configuration metadata

mod execution;
mod metadata;
mod report;
mod statistics;

// Re-export public API
pub use execution::{ExecutionOutcome, ExecutionResult, Executor};
pub use metadata::{build_report_meta, report_config};
pub use report::build_report;
pub use statistics::compute_statistics;
