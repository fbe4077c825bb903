//! Measurement Collector
//!
//! Wraps one execution of a workload's action. Before the timer starts the
//! collector snapshots the cumulative allocation counters; after it stops it
//! snapshots them again, so the recorded delta covers only this call. Errors
//! and panics from the action become [`Sample::Failed`] and never propagate.

use crate::allocator::AllocationSnapshot;
use crate::measure::Timer;
use crate::sample::{Measurement, Sample};
use crate::workload::Workload;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Runs single measured executions.
#[derive(Debug, Clone, Copy)]
pub struct Collector {
    track_allocations: bool,
    batch_size: u64,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Collector {
    /// Collector that invokes the action once per sample.
    pub fn new(track_allocations: bool) -> Self {
        Self {
            track_allocations,
            batch_size: 1,
        }
    }

    /// Invoke the action `batch_size` times per sample and record averages.
    /// Amortizes timer overhead for sub-microsecond actions.
    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Invocations per sample
    pub fn batch_size(&self) -> u64 {
        self.batch_size
    }

    /// Measure one execution.
    pub fn measure(&self, workload: &mut dyn Workload) -> Sample {
        let baseline = self.snapshot();
        let timer = Timer::start();

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            for _ in 0..self.batch_size {
                workload.action()?;
            }
            anyhow::Ok(())
        }));

        let elapsed = timer.stop();
        let alloc = self.snapshot().since(&baseline);

        match outcome {
            Ok(Ok(())) => {
                let batch = self.batch_size;
                // f64 division keeps sub-nanosecond precision before rounding
                let nanos = (elapsed.nanos as f64 / batch as f64).round() as u64;
                let cycles = (elapsed.cycles as f64 / batch as f64).round() as u64;
                Sample::Completed(Measurement::new(nanos, cycles, alloc.per_invocation(batch)))
            }
            Ok(Err(err)) => Sample::Failed {
                message: format!("{err:#}"),
            },
            Err(panic) => Sample::Failed {
                message: format!("panicked: {}", panic_message(panic.as_ref())),
            },
        }
    }

    fn snapshot(&self) -> AllocationSnapshot {
        if self.track_allocations {
            AllocationSnapshot::now()
        } else {
            AllocationSnapshot::default()
        }
    }
}

/// Extract a readable message from a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
