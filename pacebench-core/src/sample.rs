//! Samples and sample sets
//!
//! A [`Sample`] is one measured execution of a workload's action. A
//! [`SampleSet`] holds the measured suffix of a run together with the length
//! of the discarded warmup prefix.

use crate::allocator::AllocationDelta;
use serde::{Deserialize, Serialize};

/// Timing and allocation data for one completed execution.
///
/// When the collector batches invocations, every field is the
/// per-invocation average over the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// Elapsed wall-clock nanoseconds
    pub duration_nanos: u64,
    /// Cycle counter ticks (0 on platforms without a counter)
    pub cpu_cycles: u64,
    /// Bytes allocated during the call
    pub alloc_bytes: u64,
    /// Allocations during the call
    pub alloc_count: u64,
    /// Bytes freed during the call
    pub freed_bytes: u64,
    /// Deallocations during the call
    pub free_count: u64,
}

impl Measurement {
    /// Build a measurement from elapsed time and allocator activity.
    pub fn new(duration_nanos: u64, cpu_cycles: u64, alloc: AllocationDelta) -> Self {
        Self {
            duration_nanos,
            cpu_cycles,
            alloc_bytes: alloc.allocated_bytes,
            alloc_count: alloc.allocation_count,
            freed_bytes: alloc.freed_bytes,
            free_count: alloc.free_count,
        }
    }

    /// Timing-only measurement with no allocator activity.
    pub fn timing_only(duration_nanos: u64) -> Self {
        Self::new(duration_nanos, 0, AllocationDelta::default())
    }
}

/// Outcome of one measured execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sample {
    /// The action returned normally
    Completed(Measurement),
    /// The action returned an error or panicked; no timing is recorded
    Failed {
        /// Error or panic message
        message: String,
    },
}

impl Sample {
    /// Measurement data, if the execution completed.
    pub fn measurement(&self) -> Option<&Measurement> {
        match self {
            Sample::Completed(m) => Some(m),
            Sample::Failed { .. } => None,
        }
    }

    /// Whether the execution failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Sample::Failed { .. })
    }
}

/// Samples collected for one workload in one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleSet {
    workload: String,
    units_per_action: Option<u64>,
    warmup_discarded: u64,
    warmup_failures: u64,
    measured: Vec<Sample>,
}

impl SampleSet {
    /// Empty set for the named workload.
    pub fn new(workload: impl Into<String>) -> Self {
        Self {
            workload: workload.into(),
            units_per_action: None,
            warmup_discarded: 0,
            warmup_failures: 0,
            measured: Vec::new(),
        }
    }

    /// Build a set directly from measured samples.
    pub fn from_samples(workload: impl Into<String>, measured: Vec<Sample>) -> Self {
        Self {
            measured,
            ..Self::new(workload)
        }
    }

    /// Build a set of completed samples from raw durations in nanoseconds.
    pub fn from_durations(workload: impl Into<String>, durations: &[u64]) -> Self {
        let measured = durations
            .iter()
            .map(|&d| Sample::Completed(Measurement::timing_only(d)))
            .collect();
        Self::from_samples(workload, measured)
    }

    /// Declare units of work per action (for throughput).
    pub fn with_units_per_action(mut self, units: Option<u64>) -> Self {
        self.units_per_action = units;
        self
    }

    /// Record one discarded warmup iteration.
    pub(crate) fn discard_warmup(&mut self, sample: Sample) {
        self.warmup_discarded += 1;
        if sample.is_failed() {
            self.warmup_failures += 1;
        }
    }

    /// Append to the measured suffix.
    pub(crate) fn push(&mut self, sample: Sample) {
        self.measured.push(sample);
    }

    /// Workload name
    pub fn workload(&self) -> &str {
        &self.workload
    }

    /// Declared units of work per action
    pub fn units_per_action(&self) -> Option<u64> {
        self.units_per_action
    }

    /// Length of the discarded warmup prefix
    pub fn warmup_discarded(&self) -> u64 {
        self.warmup_discarded
    }

    /// Warmup iterations that failed
    pub fn warmup_failures(&self) -> u64 {
        self.warmup_failures
    }

    /// The measured suffix in execution order
    pub fn measured(&self) -> &[Sample] {
        &self.measured
    }

    /// Completed measurements in execution order
    pub fn completed(&self) -> impl Iterator<Item = &Measurement> + '_ {
        self.measured.iter().filter_map(Sample::measurement)
    }

    /// Failed measured iterations
    pub fn failures(&self) -> impl Iterator<Item = &str> + '_ {
        self.measured.iter().filter_map(|s| match s {
            Sample::Failed { message } => Some(message.as_str()),
            Sample::Completed(_) => None,
        })
    }

    /// Number of failed measured iterations
    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    /// Size of the measured suffix (completed and failed)
    pub fn len(&self) -> usize {
        self.measured.len()
    }

    /// Whether the measured suffix is empty
    pub fn is_empty(&self) -> bool {
        self.measured.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_of_completed_and_failed() {
        let set = SampleSet::from_samples(
            "mixed",
            vec![
                Sample::Completed(Measurement::timing_only(10)),
                Sample::Failed {
                    message: "boom".to_string(),
                },
                Sample::Completed(Measurement::timing_only(30)),
            ],
        );

        assert_eq!(set.len(), 3);
        assert_eq!(set.completed().count(), 2);
        assert_eq!(set.failed_count(), 1);
        assert_eq!(set.failures().next(), Some("boom"));
    }

    #[test]
    fn test_warmup_prefix_is_counted_not_kept() {
        let mut set = SampleSet::new("w");
        set.discard_warmup(Sample::Completed(Measurement::timing_only(5)));
        set.discard_warmup(Sample::Failed {
            message: "cold".to_string(),
        });
        set.push(Sample::Completed(Measurement::timing_only(7)));

        assert_eq!(set.warmup_discarded(), 2);
        assert_eq!(set.warmup_failures(), 1);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_from_durations() {
        let set = SampleSet::from_durations("d", &[1, 2, 3]).with_units_per_action(Some(8));
        let durations: Vec<u64> = set.completed().map(|m| m.duration_nanos).collect();
        assert_eq!(durations, vec![1, 2, 3]);
        assert_eq!(set.units_per_action(), Some(8));
        assert_eq!(set.workload(), "d");
    }
}
