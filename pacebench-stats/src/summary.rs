//! Summary Statistics
//!
//! - Mean, stddev and percentiles come from RETAINED samples (outliers removed)
//! - Min and max are RAW extremes over every completed sample
//! - Allocation means cover every completed sample

use crate::outliers::{OutlierPolicy, detect_outliers};
use crate::percentiles::compute_percentiles;
use pacebench_core::SampleSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the statistics engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// The measured suffix holds no completed sample
    #[error("workload `{workload}` produced no completed measured samples ({failed} failed)")]
    InsufficientSamples {
        /// Workload name
        workload: String,
        /// Failed iterations in the measured suffix
        failed: usize,
    },
}

/// Aggregate over one workload's measured suffix. Durations in nanoseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Retained (non-outlier) samples
    pub count: usize,
    /// Completed samples before outlier removal
    pub sample_count: usize,
    /// Failed iterations in the measured suffix
    pub failed_count: usize,
    /// Samples excluded as outliers
    pub outlier_count: usize,

    /// Mean of retained samples
    pub mean: f64,
    /// Sample standard deviation of retained samples
    pub std_dev: f64,
    /// Median of all completed samples
    pub median: f64,
    /// Median absolute deviation of all completed samples
    pub mad: f64,
    /// Samples above this bound were excluded; `None` without outlier detection
    pub outlier_threshold: Option<f64>,

    /// Raw minimum over all completed samples
    pub min: f64,
    /// Raw maximum over all completed samples
    pub max: f64,

    /// 50th percentile of retained samples
    pub p50: f64,
    /// 95th percentile of retained samples
    pub p95: f64,
    /// 99th percentile of retained samples
    pub p99: f64,

    /// Mean bytes allocated per action
    pub mean_alloc_bytes: f64,
    /// Mean allocations per action
    pub mean_alloc_count: f64,
    /// Mean bytes freed per action
    pub mean_freed_bytes: f64,
    /// Mean cycle counter ticks per action (0 without a counter)
    pub mean_cycles: f64,

    /// Units of work per second, when the workload declares units per action
    pub throughput_per_sec: Option<f64>,
}

/// Duration-only statistics over raw samples.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationSummary {
    /// Retained sample count
    pub count: usize,
    /// Outliers excluded
    pub outlier_count: usize,
    /// Mean of retained samples
    pub mean: f64,
    /// Sample standard deviation of retained samples
    pub std_dev: f64,
    /// Median of all samples
    pub median: f64,
    /// MAD of all samples
    pub mad: f64,
    /// Outlier bound, if any
    pub outlier_threshold: Option<f64>,
    /// Raw minimum
    pub min: f64,
    /// Raw maximum
    pub max: f64,
    /// p50 of retained samples
    pub p50: f64,
    /// p95 of retained samples
    pub p95: f64,
    /// p99 of retained samples
    pub p99: f64,
}

/// Summarize raw durations. Returns `None` for an empty slice.
pub fn compute_summary(samples: &[f64], policy: OutlierPolicy) -> Option<DurationSummary> {
    if samples.is_empty() {
        return None;
    }

    let analysis = detect_outliers(samples, policy);
    let retained = &analysis.retained;

    let mean = retained.iter().sum::<f64>() / retained.len() as f64;
    let std_dev = if retained.len() < 2 {
        0.0
    } else {
        let variance =
            retained.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (retained.len() - 1) as f64;
        variance.sqrt()
    };

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let percentiles = compute_percentiles(retained);

    Some(DurationSummary {
        count: retained.len(),
        outlier_count: analysis.outlier_count(),
        mean,
        std_dev,
        median: analysis.median,
        mad: analysis.mad,
        outlier_threshold: analysis.upper_bound,
        min,
        max,
        p50: percentiles.p50,
        p95: percentiles.p95,
        p99: percentiles.p99,
    })
}

/// Summarize a sample set's measured suffix.
///
/// Fails with [`StatsError::InsufficientSamples`] when no measured sample
/// completed; zeroed statistics are never produced.
pub fn summarize(set: &SampleSet, policy: OutlierPolicy) -> Result<Statistics, StatsError> {
    let durations: Vec<f64> = set.completed().map(|m| m.duration_nanos as f64).collect();
    let failed_count = set.failed_count();

    let Some(summary) = compute_summary(&durations, policy) else {
        return Err(StatsError::InsufficientSamples {
            workload: set.workload().to_string(),
            failed: failed_count,
        });
    };

    let n = durations.len() as f64;
    let mean_of = |f: fn(&pacebench_core::Measurement) -> u64| -> f64 {
        set.completed().map(|m| f(m) as f64).sum::<f64>() / n
    };

    let throughput_per_sec = set.units_per_action().and_then(|units| {
        (summary.mean > 0.0).then(|| units as f64 * 1_000_000_000.0 / summary.mean)
    });

    Ok(Statistics {
        count: summary.count,
        sample_count: durations.len(),
        failed_count,
        outlier_count: summary.outlier_count,
        mean: summary.mean,
        std_dev: summary.std_dev,
        median: summary.median,
        mad: summary.mad,
        outlier_threshold: summary.outlier_threshold,
        min: summary.min,
        max: summary.max,
        p50: summary.p50,
        p95: summary.p95,
        p99: summary.p99,
        mean_alloc_bytes: mean_of(|m| m.alloc_bytes),
        mean_alloc_count: mean_of(|m| m.alloc_count),
        mean_freed_bytes: mean_of(|m| m.freed_bytes),
        mean_cycles: mean_of(|m| m.cpu_cycles),
        throughput_per_sec,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pacebench_core::{AllocationDelta, Measurement, Sample};

    const MS: u64 = 1_000_000;

    #[test]
    fn test_identical_samples_have_zero_spread() {
        let set = SampleSet::from_durations("flat", &[250; 40]);
        let stats = summarize(&set, OutlierPolicy::default()).unwrap();

        assert_eq!(stats.mean, 250.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.count, 40);
        assert_eq!(stats.outlier_count, 0);
    }

    #[test]
    fn test_spike_is_outlier_but_stays_in_extremes() {
        let set = SampleSet::from_durations("spiky", &[MS, MS, MS, MS, 100 * MS]);
        let stats = summarize(&set, OutlierPolicy::default()).unwrap();

        assert_eq!(stats.outlier_count, 1);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.mean, MS as f64);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.min, MS as f64);
        assert_eq!(stats.max, (100 * MS) as f64);
        assert_eq!(stats.p99, MS as f64);
    }

    #[test]
    fn test_policy_none_has_no_threshold() {
        let set = SampleSet::from_durations("unbounded", &[MS, MS, MS, MS, 100 * MS]);
        let stats = summarize(&set, OutlierPolicy::None).unwrap();

        assert_eq!(stats.outlier_threshold, None);
        assert_eq!(stats.outlier_count, 0);
        assert_eq!(stats.count, 5);

        let bounded = summarize(&set, OutlierPolicy::default()).unwrap();
        assert_eq!(bounded.outlier_threshold, Some(MS as f64));
    }

    #[test]
    fn test_percentiles_are_monotonic() {
        let durations: Vec<u64> = (0..97).map(|i| 1_000 + (i * 37) % 500).collect();
        let set = SampleSet::from_durations("spread", &durations);
        let stats = summarize(&set, OutlierPolicy::default()).unwrap();

        assert!(stats.p50 <= stats.p95);
        assert!(stats.p95 <= stats.p99);
        assert!(stats.min <= stats.p50);
        assert!(stats.p99 <= stats.max);
    }

    #[test]
    fn test_empty_suffix_is_insufficient() {
        let set = SampleSet::new("nothing");
        let err = summarize(&set, OutlierPolicy::default()).unwrap_err();
        assert_eq!(
            err,
            StatsError::InsufficientSamples {
                workload: "nothing".to_string(),
                failed: 0
            }
        );
    }

    #[test]
    fn test_all_failed_is_insufficient() {
        let set = SampleSet::from_samples(
            "broken",
            vec![
                Sample::Failed {
                    message: "a".to_string()
                };
                3
            ],
        );
        let err = summarize(&set, OutlierPolicy::default()).unwrap_err();
        assert!(matches!(err, StatsError::InsufficientSamples { failed: 3, .. }));
    }

    #[test]
    fn test_failed_samples_counted_separately() {
        let set = SampleSet::from_samples(
            "partial",
            vec![
                Sample::Completed(Measurement::timing_only(10)),
                Sample::Failed {
                    message: "x".to_string(),
                },
                Sample::Completed(Measurement::timing_only(10)),
            ],
        );
        let stats = summarize(&set, OutlierPolicy::default()).unwrap();
        assert_eq!(stats.sample_count, 2);
        assert_eq!(stats.failed_count, 1);
    }

    #[test]
    fn test_allocation_means_and_throughput() {
        let alloc = AllocationDelta {
            allocated_bytes: 1024,
            allocation_count: 2,
            freed_bytes: 512,
            free_count: 1,
        };
        let samples = vec![Sample::Completed(Measurement::new(500, 0, alloc)); 4];
        let set = SampleSet::from_samples("alloc", samples).with_units_per_action(Some(1_000));
        let stats = summarize(&set, OutlierPolicy::None).unwrap();

        assert_eq!(stats.mean_alloc_bytes, 1024.0);
        assert_eq!(stats.mean_alloc_count, 2.0);
        assert_eq!(stats.mean_freed_bytes, 512.0);
        // 1000 units every 500ns
        assert_eq!(stats.throughput_per_sec, Some(2_000_000_000.0));
    }

    #[test]
    fn test_compute_summary_empty() {
        assert!(compute_summary(&[], OutlierPolicy::default()).is_none());
    }
}
