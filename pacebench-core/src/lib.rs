#![warn(missing_docs)]
//! PaceBench Core - Harness Runtime
//!
//! This crate provides the pieces that execute workloads:
//! - [`Workload`] trait and closure-backed [`FixtureWorkload`]
//! - [`WorkloadRegistry`] with explicit, ordered registration
//! - [`Collector`] for single measured executions (timer + allocation deltas)
//! - [`Scheduler`] for warmup, fixed-count and time-boxed measurement
//! - [`TrackingAllocator`] global allocator interceptor

mod allocator;
mod collector;
mod error;
mod measure;
mod registry;
mod sample;
mod scheduler;
mod workload;

pub use allocator::{AllocationDelta, AllocationSnapshot, TrackingAllocator, tracking_active};
pub use collector::{Collector, panic_message};
pub use error::HarnessError;
pub use measure::{Elapsed, HAS_CYCLE_COUNTER, Timer};
pub use registry::WorkloadRegistry;
pub use sample::{Measurement, Sample, SampleSet};
pub use scheduler::{
    DEFAULT_MEASURED_COUNT, DEFAULT_TIME_BUDGET, DEFAULT_WARMUP_COUNT, IterationMode,
    ScheduleConfig, Scheduler,
};
pub use workload::{DEFAULT_GROUP, FixtureWorkload, Workload};
