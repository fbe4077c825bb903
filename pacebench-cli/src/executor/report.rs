//! Report Building
//!
//! Joins execution results with their statistics into a [`Report`].
//!
//! ```text
//! ExecutionResult + Option<Result<Statistics, StatsError>>
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │   WorkloadReport    │  measured / failed / skipped
//!   └──────────┬──────────┘
//!              │
//!              ▼
//!   ┌─────────────────────┐
//!   │      Report         │  Ready for table/JSON/CSV output
//!   └─────────────────────┘
//! ```

use super::execution::{ExecutionOutcome, ExecutionResult};
use pacebench_report::{FailureInfo, Report, ReportMeta, WorkloadReport, WorkloadStatus};
use pacebench_stats::{Statistics, StatsError};

/// Build a complete Report from execution results and their statistics.
///
/// `stats` must be parallel to `results`, as returned by
/// [`compute_statistics`](super::compute_statistics).
pub fn build_report(
    results: &[ExecutionResult],
    stats: Vec<Option<Result<Statistics, StatsError>>>,
    meta: ReportMeta,
    total_duration_ms: f64,
) -> Report {
    let workload_reports = results
        .iter()
        .zip(stats)
        .map(|(result, stats)| workload_report(result, stats))
        .collect();
    Report::new(meta, workload_reports, total_duration_ms)
}

fn workload_report(
    result: &ExecutionResult,
    stats: Option<Result<Statistics, StatsError>>,
) -> WorkloadReport {
    let mut report = match (&result.outcome, stats) {
        (ExecutionOutcome::Measured(samples), Some(Ok(statistics))) => WorkloadReport::measured(
            &result.name,
            &result.group,
            statistics,
            samples.warmup_discarded(),
            samples.len(),
            result.units_per_action,
        ),
        (ExecutionOutcome::Measured(samples), Some(Err(err))) => {
            // Surface the first action error so a fully failing workload
            // explains itself
            let message = match samples.failures().next() {
                Some(first) => format!("{err}; first error: {first}"),
                None => err.to_string(),
            };
            let mut report = WorkloadReport::unmeasured(
                &result.name,
                &result.group,
                WorkloadStatus::Failed,
                FailureInfo::new("insufficient-samples", message),
            );
            report.warmup_iterations = samples.warmup_discarded();
            report.measured_iterations = samples.len();
            report.units_per_action = result.units_per_action;
            report
        }
        (ExecutionOutcome::Skipped { reason }, _) => WorkloadReport::unmeasured(
            &result.name,
            &result.group,
            WorkloadStatus::Skipped,
            FailureInfo::new("setup", reason.clone()),
        ),
        (ExecutionOutcome::Measured(_), None) => WorkloadReport::unmeasured(
            &result.name,
            &result.group,
            WorkloadStatus::Failed,
            FailureInfo::new("internal", "statistics missing"),
        ),
    };
    report.wall_time_ms = result.duration_ns as f64 / 1_000_000.0;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{build_report_meta, compute_statistics, report_config};
    use pacebench_core::{Sample, SampleSet, ScheduleConfig};
    use pacebench_stats::OutlierPolicy;

    fn result(name: &str, outcome: ExecutionOutcome) -> ExecutionResult {
        ExecutionResult {
            name: name.to_string(),
            group: "g".to_string(),
            units_per_action: Some(4),
            outcome,
            duration_ns: 2_500_000,
        }
    }

    #[test]
    fn test_statuses_and_order() {
        let results = vec![
            result(
                "ok",
                ExecutionOutcome::Measured(SampleSet::from_durations("ok", &[5, 5, 5])),
            ),
            result(
                "all_failed",
                ExecutionOutcome::Measured(SampleSet::from_samples(
                    "all_failed",
                    vec![Sample::Failed {
                        message: "disk on fire".to_string(),
                    }],
                )),
            ),
            result(
                "skipped",
                ExecutionOutcome::Skipped {
                    reason: "no fixture".to_string(),
                },
            ),
        ];
        let policy = OutlierPolicy::default();
        let stats = compute_statistics(&results, policy);
        let meta = build_report_meta(report_config(&ScheduleConfig::default(), policy));
        let report = build_report(&results, stats, meta, 3.0);

        let statuses: Vec<WorkloadStatus> = report.results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                WorkloadStatus::Measured,
                WorkloadStatus::Failed,
                WorkloadStatus::Skipped
            ]
        );
        assert_eq!(report.results[0].units_per_action, Some(4));
        assert!(report.results.iter().all(|r| r.wall_time_ms == 2.5));
        let failure = report.results[1].failure.as_ref().unwrap();
        assert_eq!(failure.kind, "insufficient-samples");
        assert!(failure.message.contains("disk on fire"));
        assert_eq!(report.summary.measured, 1);
        assert!(report.has_failures());
    }
}
