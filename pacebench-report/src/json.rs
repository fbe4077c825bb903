//! JSON Output

use crate::report::Report;

/// Generate a prettified JSON report.
///
/// The document carries `meta.schema_version` so consumers can detect
/// layout changes.
pub fn generate_json_report(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Parse a report previously written by [`generate_json_report`].
pub fn parse_json_report(json: &str) -> Result<Report, serde_json::Error> {
    serde_json::from_str(json)
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

    fn meta() -> ReportMeta {
        ReportMeta {
            schema_version: SCHEMA_VERSION,
            version: "0.1.0".to_string(),
            timestamp: chrono::Utc::now(),
            host: HostInfo {
                os: "linux".to_string(),
                arch: "aarch64".to_string(),
                cpu_model: "test cpu".to_string(),
                cpu_count: 4,
            },
            config: ReportConfig {
                warmup_count: 10,
                measured_count: 100,
                time_budget_ms: 2000,
                mode: "fixed-count".to_string(),
                batch_size: 1,
                outlier_policy: "mad(3)".to_string(),
                track_allocations: false,
            },
        }
    }

    #[test]
    fn test_json_contains_schema_and_status() {
        let report = Report::new(
            meta(),
            vec![WorkloadReport::unmeasured(
                "setup_breaks",
                "default",
                WorkloadStatus::Skipped,
                FailureInfo::new("setup", "no fixture"),
            )],
            1.0,
        );
        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["meta"]["schema_version"], SCHEMA_VERSION);
        assert_eq!(value["results"][0]["status"], "skipped");
        assert_eq!(value["results"][0]["failure"]["message"], "no fixture");
        assert_eq!(value["summary"]["skipped"], 1);
    }

    #[test]
    fn test_parse_preserves_results() {
        let report = Report::new(meta(), Vec::new(), 0.5);
        let json = generate_json_report(&report).unwrap();
        let parsed = parse_json_report(&json).unwrap();
        assert!(parsed.results.is_empty());
        assert_eq!(parsed.meta.config.mode, "fixed-count");
    }

    #[test]
    fn test_parse_report_without_outlier_bound() {
        let set = SampleSet::from_durations("unbounded", &[1_000, 1_200, 90_000]);
        let stats = summarize(&set, OutlierPolicy::None).unwrap();
        let report = Report::new(
            meta(),
            vec![WorkloadReport::measured("unbounded", "default", stats, 10, 3, None)],
            2.0,
        );

        let json = generate_json_report(&report).unwrap();
        let parsed = parse_json_report(&json).unwrap();
        let parsed_stats = parsed.results[0].statistics.as_ref().unwrap();
        assert_eq!(parsed_stats.outlier_threshold, None);
        assert_eq!(parsed_stats.count, 3);
        assert_eq!(parsed_stats.max, 90_000.0);
    }
}
