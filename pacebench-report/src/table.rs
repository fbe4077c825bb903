//! Human-readable table
//!
//! One row per workload in registration order. Failed and skipped workloads
//! keep their row so partial runs stay readable. Below the table, every group
//! with two or more measured workloads gets a relative comparison against
//! its fastest member.

use crate::format::{format_bytes, format_duration};
use crate::report::{Report, WorkloadReport, WorkloadStatus};

const HEADERS: [&str; 9] = [
    "name", "mean", "stddev", "min", "max", "p95", "p99", "outliers", "alloc/iter",
];

fn row_cells(result: &WorkloadReport) -> Vec<String> {
    match &result.statistics {
        Some(s) => vec![
            result.name.clone(),
            format_duration(s.mean),
            format_duration(s.std_dev),
            format_duration(s.min),
            format_duration(s.max),
            format_duration(s.p95),
            format_duration(s.p99),
            s.outlier_count.to_string(),
            format_bytes(s.mean_alloc_bytes),
        ],
        None => {
            let mut cells = vec![result.name.clone()];
            cells.extend(std::iter::repeat_n("-".to_string(), HEADERS.len() - 1));
            cells
        }
    }
}

/// Render the report as a fixed-column text table.
pub fn render_table(report: &Report) -> String {
    let rows: Vec<Vec<String>> = report.results.iter().map(row_cells).collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    output.push_str("\nPaceBench Results\n");
    output.push_str(&"=".repeat(60));
    output.push_str("\n\n");

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    push_row(&mut output, &header, &widths);
    let rule_len = widths.iter().sum::<usize>() + 2 * (widths.len() - 1);
    output.push_str(&"-".repeat(rule_len));
    output.push('\n');

    for (result, row) in report.results.iter().zip(&rows) {
        push_row(&mut output, row, &widths);
        if result.status != WorkloadStatus::Measured {
            let message = result
                .failure
                .as_ref()
                .map(|f| f.message.as_str())
                .unwrap_or("no details");
            output.push_str(&format!("  └─ {}: {}\n", result.status.label(), message));
        } else if let Some(stats) = &result.statistics {
            if stats.failed_count > 0 {
                output.push_str(&format!(
                    "  └─ {} of {} measured iterations failed\n",
                    stats.failed_count, result.measured_iterations
                ));
            }
        }
    }

    output.push_str(&render_group_comparisons(report));

    output.push_str("\nSummary\n");
    output.push_str(&"-".repeat(60));
    output.push('\n');
    output.push_str(&format!(
        "  Total: {}  Measured: {}  Failed: {}  Skipped: {}\n",
        report.summary.total_workloads,
        report.summary.measured,
        report.summary.failed,
        report.summary.skipped
    ));
    output.push_str(&format!(
        "  Duration: {:.2} ms\n",
        report.summary.total_duration_ms
    ));

    output
}

fn push_row(output: &mut String, cells: &[String], widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str("  ");
        }
        // Name column left-aligned, numbers right-aligned
        if i == 0 {
            line.push_str(&format!("{cell:<width$}"));
        } else {
            line.push_str(&format!("{cell:>width$}"));
        }
    }
    output.push_str(line.trim_end());
    output.push('\n');
}

/// Per-group comparison of mean durations relative to the group's fastest
/// workload. Groups appear in order of first registration.
pub fn render_group_comparisons(report: &Report) -> String {
    let mut groups: Vec<(&str, Vec<&WorkloadReport>)> = Vec::new();
    for result in report
        .results
        .iter()
        .filter(|r| r.status == WorkloadStatus::Measured)
    {
        match groups.iter_mut().find(|(g, _)| *g == result.group) {
            Some((_, members)) => members.push(result),
            None => groups.push((&result.group, vec![result])),
        }
    }

    let mut output = String::new();
    for (group, members) in groups.into_iter().filter(|(_, m)| m.len() >= 2) {
        let means: Vec<f64> = members
            .iter()
            .map(|r| r.statistics.as_ref().map(|s| s.mean).unwrap_or(f64::NAN))
            .collect();
        let fastest = means.iter().copied().fold(f64::INFINITY, f64::min);
        let name_width = members.iter().map(|r| r.name.len()).max().unwrap_or(8);

        output.push_str(&format!("\nGroup: {group}\n"));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!(
            "  {:<name_width$}  {:>12}  {:>9}  {:>12}\n",
            "workload", "mean", "relative", "units/iter"
        ));

        for (result, mean) in members.iter().zip(&means) {
            let relative = if fastest > 0.0 { mean / fastest } else { 1.0 };
            let units = result
                .units_per_action
                .map(|u| u.to_string())
                .unwrap_or_else(|| "-".to_string());
            let marker = if *mean == fastest { " (fastest)" } else { "" };
            output.push_str(&format!(
                "  {:<name_width$}  {:>12}  {:>8.2}x  {:>12}{}\n",
                result.name,
                format_duration(*mean),
                relative,
                units,
                marker
            ));
        }
        if members.iter().any(|r| r.units_per_action.is_some()) {
            output.push_str(
                "  units/iter is declared per action; a workload that counts its units fails the sample on a mismatch\n",
            );
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{FailureInfo, HostInfo, ReportConfig, ReportMeta, SCHEMA_VERSION};
    use pacebench_core::SampleSet;
    use pacebench_stats::{OutlierPolicy, summarize};

    fn sample_meta() -> ReportMeta {
        ReportMeta {
            schema_version: SCHEMA_VERSION,
            version: "0.0.0".to_string(),
            timestamp: chrono::Utc::now(),
            host: HostInfo {
                os: "linux".to_string(),
                arch: "x86_64".to_string(),
                cpu_model: "test cpu".to_string(),
                cpu_count: 8,
            },
            config: ReportConfig {
                warmup_count: 10,
                measured_count: 100,
                time_budget_ms: 2000,
                mode: "time-boxed".to_string(),
                batch_size: 1,
                outlier_policy: "mad(3)".to_string(),
                track_allocations: true,
            },
        }
    }

    fn measured(name: &str, group: &str, nanos: u64) -> WorkloadReport {
        let set = SampleSet::from_durations(name, &[nanos; 5]);
        let stats = summarize(&set, OutlierPolicy::default()).unwrap();
        WorkloadReport::measured(name, group, stats, 10, 5, Some(100))
    }

    fn sample_report() -> Report {
        let results = vec![
            measured("zeta_first", "math", 2_000),
            WorkloadReport::unmeasured(
                "broken_setup",
                "math",
                WorkloadStatus::Skipped,
                FailureInfo::new("setup", "fixture missing"),
            ),
            measured("alpha_second", "math", 1_000),
            WorkloadReport::unmeasured(
                "always_fails",
                "other",
                WorkloadStatus::Failed,
                FailureInfo::new("insufficient-samples", "no completed samples"),
            ),
        ];
        Report::new(sample_meta(), results, 12.5)
    }

    #[test]
    fn test_rows_follow_registration_order() {
        let output = render_table(&sample_report());
        let zeta = output.find("zeta_first").unwrap();
        let broken = output.find("broken_setup").unwrap();
        let alpha = output.find("alpha_second").unwrap();
        assert!(zeta < broken && broken < alpha);
    }

    #[test]
    fn test_header_columns_in_fixed_order() {
        let output = render_table(&sample_report());
        let header = output.lines().find(|l| l.starts_with("name")).unwrap();
        let mut last = 0;
        for column in HEADERS {
            let pos = header.find(column).unwrap();
            assert!(pos >= last, "column {column} out of order");
            last = pos;
        }
    }

    #[test]
    fn test_partial_results_are_rendered() {
        let output = render_table(&sample_report());
        assert!(output.contains("SKIPPED: fixture missing"));
        assert!(output.contains("FAILED: no completed samples"));
        assert!(output.contains("Measured: 2  Failed: 1  Skipped: 1"));
    }

    #[test]
    fn test_group_comparison_marks_fastest() {
        let output = render_group_comparisons(&sample_report());
        assert!(output.contains("Group: math"));
        assert!(!output.contains("Group: other"));
        let alpha_line = output.lines().find(|l| l.contains("alpha_second")).unwrap();
        assert!(alpha_line.contains("(fastest)"));
        let zeta_line = output.lines().find(|l| l.contains("zeta_first")).unwrap();
        assert!(zeta_line.contains("2.00x"));
        assert!(zeta_line.contains("100"));
        assert!(output.contains("units/iter is declared per action"));
    }

    #[test]
    fn test_group_comparison_without_units_has_no_note() {
        let mut report = sample_report();
        for result in &mut report.results {
            result.units_per_action = None;
        }
        let output = render_group_comparisons(&report);
        assert!(output.contains("Group: math"));
        assert!(!output.contains("units/iter is declared"));
    }
}
