//! CSV Output
//!
//! One row per workload, durations in nanoseconds. Unmeasured workloads
//! leave the numeric columns empty.

use crate::report::Report;

const COLUMNS: &[&str] = &[
    "name",
    "group",
    "status",
    "samples",
    "failed",
    "outliers",
    "mean_ns",
    "std_dev_ns",
    "median_ns",
    "min_ns",
    "max_ns",
    "p50_ns",
    "p95_ns",
    "p99_ns",
    "alloc_bytes",
    "alloc_count",
    "throughput_per_sec",
    "message",
];

/// Generate a CSV document from the report.
pub fn generate_csv_report(report: &Report) -> String {
    let mut output = COLUMNS.join(",");
    output.push('\n');

    for result in &report.results {
        let mut fields = vec![
            escape(&result.name),
            escape(&result.group),
            result.status.label().to_lowercase(),
        ];
        match &result.statistics {
            Some(s) => {
                fields.push(s.sample_count.to_string());
                fields.push(s.failed_count.to_string());
                fields.push(s.outlier_count.to_string());
                for value in [
                    s.mean,
                    s.std_dev,
                    s.median,
                    s.min,
                    s.max,
                    s.p50,
                    s.p95,
                    s.p99,
                    s.mean_alloc_bytes,
                    s.mean_alloc_count,
                ] {
                    fields.push(format!("{value:.2}"));
                }
                fields.push(
                    s.throughput_per_sec
                        .map(|t| format!("{t:.2}"))
                        .unwrap_or_default(),
                );
            }
            None => fields.extend(std::iter::repeat_n(String::new(), 14)),
        }
        fields.push(
            result
                .failure
                .as_ref()
                .map(|f| escape(&f.message))
                .unwrap_or_default(),
        );
        output.push_str(&fields.join(","));
        output.push('\n');
    }

    output
}

/// Quote a field when it contains a delimiter, quote or newline.
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{
        FailureInfo, HostInfo, ReportConfig, ReportMeta, SCHEMA_VERSION, WorkloadReport,
        WorkloadStatus,
    };
    use pacebench_core::SampleSet;
    use pacebench_stats::{OutlierPolicy, summarize};

    fn report() -> Report {
        let meta = ReportMeta {
            schema_version: SCHEMA_VERSION,
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
            host: HostInfo {
                os: "linux".to_string(),
                arch: "x86_64".to_string(),
                cpu_model: "test cpu".to_string(),
                cpu_count: 2,
            },
            config: ReportConfig {
                warmup_count: 0,
                measured_count: 3,
                time_budget_ms: 2000,
                mode: "fixed-count".to_string(),
                batch_size: 1,
                outlier_policy: "none".to_string(),
                track_allocations: false,
            },
        };
        let set = SampleSet::from_durations("fast", &[10, 20, 30]);
        let stats = summarize(&set, OutlierPolicy::None).unwrap();
        Report::new(
            meta,
            vec![
                WorkloadReport::measured("fast", "g", stats, 0, 3, None),
                WorkloadReport::unmeasured(
                    "slow",
                    "g",
                    WorkloadStatus::Failed,
                    FailureInfo::new("panic", "boom, \"loud\""),
                ),
            ],
            0.1,
        )
    }

    #[test]
    fn test_every_row_has_every_column() {
        let csv = generate_csv_report(&report());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].split(',').count(), COLUMNS.len());
        assert!(lines[1].starts_with("fast,g,ok,3,0,0,20.00,"));
    }

    #[test]
    fn test_message_is_quoted() {
        let csv = generate_csv_report(&report());
        assert!(csv.contains("\"boom, \"\"loud\"\"\""));
        assert!(csv.contains("slow,g,failed,"));
    }

    #[test]
    fn test_escape_plain_field() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a\nb"), "\"a\nb\"");
    }
}
