//! System Metadata Collection
//!
//! Collects host information and the effective configuration for the
//! report's `meta` block. Linux-specific data (CPU model) degrades to
//! "Unknown" on other platforms.

use chrono::Utc;
use pacebench_core::ScheduleConfig;
use pacebench_report::{HostInfo, ReportConfig, ReportMeta, SCHEMA_VERSION};
use pacebench_stats::OutlierPolicy;

/// Build report metadata including host info and effective configuration
pub fn build_report_meta(config: ReportConfig) -> ReportMeta {
    let host = HostInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu_model: get_cpu_model().unwrap_or_else(|| "Unknown".to_string()),
        cpu_count: num_cpus(),
    };

    ReportMeta {
        schema_version: SCHEMA_VERSION,
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        host,
        config,
    }
}

/// Effective configuration as recorded in the report
pub fn report_config(schedule: &ScheduleConfig, policy: OutlierPolicy) -> ReportConfig {
    let outlier_policy = match policy {
        OutlierPolicy::MedianAbsoluteDeviation { multiplier } => format!("mad({multiplier})"),
        OutlierPolicy::None => "none".to_string(),
    };
    ReportConfig {
        warmup_count: schedule.warmup_count,
        measured_count: schedule.measured_count,
        time_budget_ms: schedule.time_budget.as_millis() as u64,
        mode: schedule.mode.to_string(),
        batch_size: schedule.batch_size,
        outlier_policy,
        track_allocations: schedule.track_allocations,
    }
}

/// Get CPU model name from /proc/cpuinfo (Linux only)
fn get_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|l| l.starts_with("model name"))
                    .and_then(|l| l.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

/// Logical CPU count
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_config_reflects_schedule() {
        let schedule = ScheduleConfig::fixed(2, 7);
        let config = report_config(&schedule, OutlierPolicy::default());
        assert_eq!(config.warmup_count, 2);
        assert_eq!(config.measured_count, 7);
        assert_eq!(config.mode, "fixed-count");
        assert_eq!(config.outlier_policy, "mad(3)");
        assert_eq!(config.time_budget_ms, 2000);
    }

    #[test]
    fn test_meta_has_host_details() {
        let meta = build_report_meta(report_config(&ScheduleConfig::default(), OutlierPolicy::None));
        assert_eq!(meta.schema_version, SCHEMA_VERSION);
        assert!(meta.host.cpu_count >= 1);
        assert!(!meta.host.os.is_empty());
        assert_eq!(meta.config.outlier_policy, "none");
    }
}
