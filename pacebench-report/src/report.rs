//! Report Data Structures

use chrono::{DateTime, Utc};
use pacebench_stats::Statistics;
use serde::{Deserialize, Serialize};

/// Current JSON schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Complete run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub meta: ReportMeta,
    /// One entry per workload, in registration order
    pub results: Vec<WorkloadReport>,
    pub summary: ReportSummary,
}

impl Report {
    /// Assemble a report, deriving the summary from `results`.
    pub fn new(meta: ReportMeta, results: Vec<WorkloadReport>, total_duration_ms: f64) -> Self {
        let summary = ReportSummary::from_results(&results, total_duration_ms);
        Self {
            meta,
            results,
            summary,
        }
    }

    /// Whether any workload failed or was skipped
    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0 || self.summary.skipped > 0
    }
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    pub schema_version: u32,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub host: HostInfo,
    pub config: ReportConfig,
}

/// Effective configuration captured in report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub warmup_count: u64,
    pub measured_count: u64,
    pub time_budget_ms: u64,
    pub mode: String,
    pub batch_size: u64,
    pub outlier_policy: String,
    pub track_allocations: bool,
}

/// Host information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostInfo {
    pub os: String,
    pub arch: String,
    pub cpu_model: String,
    pub cpu_count: usize,
}

/// Workload outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadStatus {
    /// Statistics were derived
    Measured,
    /// Ran, but produced no usable samples
    Failed,
    /// Setup failed; never iterated
    Skipped,
}

impl WorkloadStatus {
    /// Short label for tables
    pub fn label(self) -> &'static str {
        match self {
            WorkloadStatus::Measured => "ok",
            WorkloadStatus::Failed => "FAILED",
            WorkloadStatus::Skipped => "SKIPPED",
        }
    }
}

/// One workload's entry in the report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkloadReport {
    pub name: String,
    pub group: String,
    pub status: WorkloadStatus,
    pub statistics: Option<Statistics>,
    pub failure: Option<FailureInfo>,
    /// Discarded warmup iterations
    pub warmup_iterations: u64,
    /// Size of the measured suffix (completed and failed)
    pub measured_iterations: usize,
    /// Declared units of work per action
    pub units_per_action: Option<u64>,
    /// Wall time spent on this workload, setup and warmup included
    #[serde(default)]
    pub wall_time_ms: f64,
}

impl WorkloadReport {
    /// Entry for a measured workload
    pub fn measured(
        name: impl Into<String>,
        group: impl Into<String>,
        statistics: Statistics,
        warmup_iterations: u64,
        measured_iterations: usize,
        units_per_action: Option<u64>,
    ) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            status: WorkloadStatus::Measured,
            statistics: Some(statistics),
            failure: None,
            warmup_iterations,
            measured_iterations,
            units_per_action,
            wall_time_ms: 0.0,
        }
    }

    /// Entry for a workload without statistics
    pub fn unmeasured(
        name: impl Into<String>,
        group: impl Into<String>,
        status: WorkloadStatus,
        failure: FailureInfo,
    ) -> Self {
        Self {
            name: name.into(),
            group: group.into(),
            status,
            statistics: None,
            failure: Some(failure),
            warmup_iterations: 0,
            measured_iterations: 0,
            units_per_action: None,
            wall_time_ms: 0.0,
        }
    }
}

/// Failure information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureInfo {
    /// Failure category, e.g. `setup`, `insufficient-samples`
    pub kind: String,
    pub message: String,
}

impl FailureInfo {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_workloads: usize,
    pub measured: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total_duration_ms: f64,
}

impl ReportSummary {
    /// Count outcomes
    pub fn from_results(results: &[WorkloadReport], total_duration_ms: f64) -> Self {
        let count = |status: WorkloadStatus| results.iter().filter(|r| r.status == status).count();
        Self {
            total_workloads: results.len(),
            measured: count(WorkloadStatus::Measured),
            failed: count(WorkloadStatus::Failed),
            skipped: count(WorkloadStatus::Skipped),
            total_duration_ms,
        }
    }
}
