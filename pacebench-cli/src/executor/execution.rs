//! Workload Execution
//!
//! Runs workloads one at a time through the [`Scheduler`]. Execution is
//! strictly sequential; only the concurrency workloads spawn threads of
//! their own.
//!
//! ## Data Flow
//!
//! ```text
//! WorkloadRegistry + selected indices
//!        │
//!        ▼
//! ┌──────────────────┐
//! │  Executor        │  Setup → Warmup → Measurement → Teardown
//! └────────┬─────────┘
//!          │
//!          ▼
//!  ExecutionResult (sample set or skip reason)
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use pacebench_core::{HarnessError, SampleSet, ScheduleConfig, Scheduler, WorkloadRegistry};
use std::time::Instant;

/// What happened to one workload
#[derive(Debug)]
pub enum ExecutionOutcome {
    /// Setup succeeded and the iteration loop ran (samples may still be
    /// failed or empty)
    Measured(SampleSet),
    /// Setup failed; the workload was not iterated
    Skipped {
        /// Setup error or panic message
        reason: String,
    },
}

/// Result from executing a single workload
#[derive(Debug)]
pub struct ExecutionResult {
    pub name: String,
    pub group: String,
    pub units_per_action: Option<u64>,
    pub outcome: ExecutionOutcome,
    pub duration_ns: u64,
}

/// Execute workloads and collect their samples
pub struct Executor {
    scheduler: Scheduler,
    show_progress: bool,
}

impl Executor {
    /// Executor using the given schedule.
    pub fn new(config: ScheduleConfig) -> Self {
        Self {
            scheduler: Scheduler::new(config),
            show_progress: true,
        }
    }

    /// Show or hide the progress bar.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Execute the workloads at `indices`, in that order
    pub fn execute(
        &self,
        registry: &mut WorkloadRegistry,
        indices: &[usize],
    ) -> Vec<ExecutionResult> {
        let pb = if self.show_progress {
            ProgressBar::new(indices.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let mut results = Vec::with_capacity(indices.len());
        for &index in indices {
            let Some(workload) = registry.get_mut(index) else {
                continue;
            };
            pb.set_message(workload.name().to_string());
            let result = self.execute_single(workload);
            results.push(result);
            pb.inc(1);
        }

        pb.finish_with_message("Complete");
        results
    }

    /// Execute a single workload
    fn execute_single(&self, workload: &mut dyn pacebench_core::Workload) -> ExecutionResult {
        let start = Instant::now();
        let name = workload.name().to_string();
        let group = workload.group().to_string();
        let units_per_action = workload.units_per_action();

        tracing::debug!(workload = %name, group = %group, "executing workload");

        let outcome = match self.scheduler.run(workload) {
            Ok(samples) => ExecutionOutcome::Measured(samples),
            Err(HarnessError::SetupFailed { message, .. }) => {
                tracing::warn!(workload = %name, "setup failed, skipping: {message}");
                ExecutionOutcome::Skipped { reason: message }
            }
            Err(other) => ExecutionOutcome::Skipped {
                reason: other.to_string(),
            },
        };

        ExecutionResult {
            name,
            group,
            units_per_action,
            outcome,
            duration_ns: start.elapsed().as_nanos() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacebench_core::FixtureWorkload;

    fn registry() -> WorkloadRegistry {
        let mut registry = WorkloadRegistry::new();
        registry
            .register(FixtureWorkload::simple("first", || 1u32))
            .unwrap();
        registry
            .register(FixtureWorkload::with_setup(
                "broken",
                || -> anyhow::Result<u32> { anyhow::bail!("no fixture today") },
                |_: &mut u32| Ok(()),
            ))
            .unwrap();
        registry
            .register(FixtureWorkload::fallible("flaky", || -> anyhow::Result<()> {
                anyhow::bail!("always fails")
            }))
            .unwrap();
        registry
    }

    #[test]
    fn test_setup_failure_is_skipped_and_run_continues() {
        let mut registry = registry();
        let executor = Executor::new(ScheduleConfig::fixed(1, 5)).with_progress(false);
        let results = executor.execute(&mut registry, &[0, 1, 2]);

        assert_eq!(results.len(), 3);
        assert!(matches!(&results[0].outcome, ExecutionOutcome::Measured(s) if s.len() == 5));
        match &results[1].outcome {
            ExecutionOutcome::Skipped { reason } => assert!(reason.contains("no fixture today")),
            other => panic!("expected skip, got {other:?}"),
        }
        match &results[2].outcome {
            ExecutionOutcome::Measured(set) => assert_eq!(set.failed_count(), 5),
            other => panic!("expected measured, got {other:?}"),
        }
    }

    #[test]
    fn test_only_selected_indices_run() {
        let mut registry = registry();
        let executor = Executor::new(ScheduleConfig::fixed(0, 2)).with_progress(false);
        let results = executor.execute(&mut registry, &[2, 0]);
        let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["flaky", "first"]);
    }
}
