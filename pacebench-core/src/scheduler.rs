//! Iteration Scheduler
//!
//! Drives one workload through setup, a discarded warmup phase, a measured
//! phase and teardown:
//!
//! ```text
//! setup ─► warmup × N (discarded) ─► measured × M (fixed count or time box) ─► teardown
//! ```
//!
//! Workloads are never interleaved; the caller runs them one at a time.

use crate::collector::{Collector, panic_message};
use crate::error::HarnessError;
use crate::sample::{Sample, SampleSet};
use crate::workload::Workload;
use serde::{Deserialize, Serialize};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::{Duration, Instant};

/// Default discarded warmup iterations
pub const DEFAULT_WARMUP_COUNT: u64 = 10;

/// Default measured iterations
pub const DEFAULT_MEASURED_COUNT: u64 = 100;

/// Default time budget for the measured phase
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(2);

/// How the measured phase terminates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IterationMode {
    /// Exactly `measured_count` iterations
    FixedCount,
    /// `measured_count` iterations or the time budget, whichever comes first
    #[default]
    TimeBoxed,
}

impl std::str::FromStr for IterationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fixed-count" | "fixed" | "fixedcount" => Ok(IterationMode::FixedCount),
            "time-boxed" | "timeboxed" | "time" => Ok(IterationMode::TimeBoxed),
            other => Err(format!("unknown iteration mode: {other}")),
        }
    }
}

impl std::fmt::Display for IterationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IterationMode::FixedCount => f.write_str("fixed-count"),
            IterationMode::TimeBoxed => f.write_str("time-boxed"),
        }
    }
}

/// Per-run scheduling policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Iterations run and discarded before measurement
    pub warmup_count: u64,
    /// Target measured iterations
    pub measured_count: u64,
    /// Wall-clock budget for the measured phase (time-boxed mode only)
    pub time_budget: Duration,
    /// Termination policy
    pub mode: IterationMode,
    /// Action invocations per sample
    pub batch_size: u64,
    /// Record allocator activity per sample
    pub track_allocations: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            warmup_count: DEFAULT_WARMUP_COUNT,
            measured_count: DEFAULT_MEASURED_COUNT,
            time_budget: DEFAULT_TIME_BUDGET,
            mode: IterationMode::default(),
            batch_size: 1,
            track_allocations: true,
        }
    }
}

impl ScheduleConfig {
    /// Fixed-count policy
    pub fn fixed(warmup_count: u64, measured_count: u64) -> Self {
        Self {
            warmup_count,
            measured_count,
            mode: IterationMode::FixedCount,
            ..Self::default()
        }
    }

    /// Time-boxed policy
    pub fn time_boxed(warmup_count: u64, measured_count: u64, time_budget: Duration) -> Self {
        Self {
            warmup_count,
            measured_count,
            time_budget,
            mode: IterationMode::TimeBoxed,
            ..Self::default()
        }
    }
}

/// Runs workloads under a [`ScheduleConfig`].
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: ScheduleConfig,
    collector: Collector,
}

impl Scheduler {
    /// Create a scheduler for the given policy
    pub fn new(config: ScheduleConfig) -> Self {
        let collector = Collector::new(config.track_allocations).with_batch_size(config.batch_size);
        Self { config, collector }
    }

    /// Active policy
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Run one workload end to end.
    ///
    /// Returns [`HarnessError::SetupFailed`] if `setup()` errors or panics;
    /// the workload is then neither iterated nor torn down. Action failures
    /// never surface here; they are recorded in the returned set.
    pub fn run(&self, workload: &mut dyn Workload) -> Result<SampleSet, HarnessError> {
        let name = workload.name().to_string();

        match catch_unwind(AssertUnwindSafe(|| workload.setup())) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                return Err(HarnessError::SetupFailed {
                    workload: name,
                    message: format!("{err:#}"),
                });
            }
            Err(panic) => {
                return Err(HarnessError::SetupFailed {
                    workload: name,
                    message: format!("panicked: {}", panic_message(panic.as_ref())),
                });
            }
        }

        let samples = self.collect(workload);

        if let Err(panic) = catch_unwind(AssertUnwindSafe(|| workload.teardown())) {
            tracing::warn!(
                workload = %name,
                "teardown panicked: {}",
                panic_message(panic.as_ref())
            );
        }

        Ok(samples)
    }

    /// Warmup then measured phase, assuming setup already ran.
    pub fn collect(&self, workload: &mut dyn Workload) -> SampleSet {
        let cfg = &self.config;
        let mut set = SampleSet::new(workload.name()).with_units_per_action(workload.units_per_action());

        for _ in 0..cfg.warmup_count {
            let sample = self.collector.measure(workload);
            set.discard_warmup(sample);
        }
        if set.warmup_failures() > 0 {
            tracing::warn!(
                workload = workload.name(),
                failures = set.warmup_failures(),
                "warmup iterations failed"
            );
        }
        tracing::debug!(
            workload = workload.name(),
            warmup = set.warmup_discarded(),
            "warmup complete, starting measurement"
        );

        let time_boxed = cfg.mode == IterationMode::TimeBoxed;
        let start = Instant::now();

        while (set.len() as u64) < cfg.measured_count {
            if time_boxed && start.elapsed() >= cfg.time_budget {
                break;
            }

            let sample = self.collector.measure(workload);

            // An iteration that finished past the deadline did not complete
            // within the budget.
            if time_boxed && start.elapsed() > cfg.time_budget {
                tracing::debug!(
                    workload = workload.name(),
                    "iteration overran the time budget; discarded"
                );
                break;
            }

            if let Sample::Failed { message } = &sample {
                tracing::warn!(workload = workload.name(), "iteration failed: {message}");
            }
            set.push(sample);
        }

        tracing::debug!(
            workload = workload.name(),
            measured = set.len(),
            failed = set.failed_count(),
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "measurement complete"
        );
        set
    }
}
