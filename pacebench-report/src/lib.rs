#![warn(missing_docs)]
//! PaceBench Report - Result Rendering
//!
//! Generates the output formats for a finished run:
//! - Human-readable table with per-group comparisons
//! - JSON (machine-readable, versioned schema)
//! - CSV (spreadsheet-compatible)

mod csv;
mod format;
mod json;
mod report;
mod table;

pub use csv::generate_csv_report;
pub use format::{format_bytes, format_duration};
pub use json::{generate_json_report, parse_json_report};
pub use report::{
    FailureInfo, HostInfo, Report, ReportConfig, ReportMeta, ReportSummary, SCHEMA_VERSION,
    WorkloadReport, WorkloadStatus,
};
pub use table::{render_group_comparisons, render_table};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable terminal table
    #[default]
    Human,
    /// JSON with full schema
    Json,
    /// CSV for spreadsheets
    Csv,
}

impl OutputFormat {
    /// Render a report in this format.
    pub fn render(self, report: &Report) -> Result<String, serde_json::Error> {
        match self {
            OutputFormat::Human => Ok(render_table(report)),
            OutputFormat::Json => generate_json_report(report),
            OutputFormat::Csv => Ok(generate_csv_report(report)),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "human" | "text" | "table" => Ok(OutputFormat::Human),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}
