#![warn(missing_docs)]
//! PaceBench Statistical Engine
//!
//! Turns a workload's measured samples into summary statistics:
//! - Outlier detection via median absolute deviation (MAD)
//! - Nearest-rank percentiles over retained samples
//! - Raw extremes preserved alongside cleaned central tendency
//! - Per-action allocation means and optional throughput

mod outliers;
mod percentiles;
mod summary;

pub use outliers::{
    DEFAULT_MAD_MULTIPLIER, OutlierAnalysis, OutlierPolicy, detect_outliers,
    median_absolute_deviation,
};
pub use percentiles::{Percentiles, compute_percentiles, median, nearest_rank};
pub use summary::{DurationSummary, Statistics, StatsError, compute_summary, summarize};
