//! Configuration loading from pace.toml
//!
//! PaceBench configuration can be specified in a `pace.toml` file in the
//! project root. The file is discovered by walking up from the current
//! directory; every field is optional and falls back to the built-in default.

use pacebench_core::{
    DEFAULT_MEASURED_COUNT, DEFAULT_TIME_BUDGET, DEFAULT_WARMUP_COUNT, IterationMode,
    ScheduleConfig,
};
use pacebench_stats::{DEFAULT_MAD_MULTIPLIER, OutlierPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name searched for during discovery.
pub const CONFIG_FILE_NAME: &str = "pace.toml";

/// Configuration errors. All of them abort startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        /// Offending file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// File is not valid TOML for this schema
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        /// Offending file
        path: PathBuf,
        /// Underlying parse error
        source: toml::de::Error,
    },

    /// Duration string could not be parsed
    #[error("invalid duration `{input}`: {reason}")]
    Duration {
        /// Text as written
        input: String,
        /// What was wrong with it
        reason: String,
    },

    /// A value is out of range
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted field name
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },
}

/// PaceBench configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PaceConfig {
    /// Runner configuration
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Statistics configuration
    #[serde(default)]
    pub stats: StatsConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Runner configuration for workload execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Discarded iterations before measurement
    #[serde(default = "default_warmup_count")]
    pub warmup_count: u64,
    /// Measured iterations (upper bound in time-boxed mode)
    #[serde(default = "default_measured_count")]
    pub measured_count: u64,
    /// Wall-clock budget for the measured phase (e.g., "2s", "500ms")
    #[serde(default = "default_time_budget")]
    pub time_budget: String,
    /// "fixed-count" or "time-boxed"
    #[serde(default)]
    pub mode: IterationMode,
    /// Actions per timing window
    #[serde(default = "default_batch_size")]
    pub batch_size: u64,
    /// Record allocation deltas (needs the tracking allocator installed)
    #[serde(default = "default_track_allocations")]
    pub track_allocations: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            warmup_count: default_warmup_count(),
            measured_count: default_measured_count(),
            time_budget: default_time_budget(),
            mode: IterationMode::default(),
            batch_size: default_batch_size(),
            track_allocations: default_track_allocations(),
        }
    }
}

fn default_warmup_count() -> u64 {
    DEFAULT_WARMUP_COUNT
}
fn default_measured_count() -> u64 {
    DEFAULT_MEASURED_COUNT
}
fn default_time_budget() -> String {
    format!("{}ms", DEFAULT_TIME_BUDGET.as_millis())
}
fn default_batch_size() -> u64 {
    1
}
fn default_track_allocations() -> bool {
    true
}

/// Statistics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// MAD multiplier for outlier exclusion; 0 disables exclusion
    #[serde(default = "default_outlier_multiplier")]
    pub outlier_multiplier: f64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            outlier_multiplier: default_outlier_multiplier(),
        }
    }
}

fn default_outlier_multiplier() -> f64 {
    DEFAULT_MAD_MULTIPLIER
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format: "human", "json", "csv"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_format() -> String {
    "human".to_string()
}

impl PaceConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Walk up from the current directory looking for `pace.toml`.
    pub fn discover() -> Result<Option<(PathBuf, Self)>, ConfigError> {
        match std::env::current_dir() {
            Ok(dir) => Self::discover_from(&dir),
            Err(_) => Ok(None),
        }
    }

    /// Walk up from `start` looking for `pace.toml`. A file that exists but
    /// fails to load is an error, not a miss.
    pub fn discover_from(start: &Path) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.is_file() {
                let config = Self::load(&config_path)?;
                return Ok(Some((config_path, config)));
            }
            if !dir.pop() {
                return Ok(None);
            }
        }
    }

    /// Check ranges and convert into a scheduler configuration.
    pub fn schedule(&self) -> Result<ScheduleConfig, ConfigError> {
        let runner = &self.runner;
        if runner.measured_count == 0 {
            return Err(ConfigError::Invalid {
                field: "runner.measured_count",
                reason: "must be at least 1".to_string(),
            });
        }
        if runner.batch_size == 0 {
            return Err(ConfigError::Invalid {
                field: "runner.batch_size",
                reason: "must be at least 1".to_string(),
            });
        }
        let time_budget = Self::parse_duration(&runner.time_budget)?;
        if time_budget.is_zero() {
            return Err(ConfigError::Invalid {
                field: "runner.time_budget",
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(ScheduleConfig {
            warmup_count: runner.warmup_count,
            measured_count: runner.measured_count,
            time_budget,
            mode: runner.mode,
            batch_size: runner.batch_size,
            track_allocations: runner.track_allocations,
        })
    }

    /// Outlier policy from `[stats]`.
    pub fn outlier_policy(&self) -> Result<OutlierPolicy, ConfigError> {
        let multiplier = self.stats.outlier_multiplier;
        if !multiplier.is_finite() || multiplier < 0.0 {
            return Err(ConfigError::Invalid {
                field: "stats.outlier_multiplier",
                reason: format!("{multiplier} is not a non-negative number"),
            });
        }
        if multiplier == 0.0 {
            Ok(OutlierPolicy::None)
        } else {
            Ok(OutlierPolicy::MedianAbsoluteDeviation { multiplier })
        }
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# PaceBench Configuration

[runner]
# Iterations executed and discarded before measurement
warmup_count = 10
# Measured iterations (upper bound in time-boxed mode)
measured_count = 100
# Wall-clock budget for the measured phase
time_budget = "2s"
# "time-boxed" or "fixed-count"
mode = "time-boxed"
# Actions per timing window; >1 records per-action averages
batch_size = 1
# Record allocation deltas per iteration
track_allocations = true

[stats]
# Samples above median + k * MAD are excluded; 0 keeps every sample
outlier_multiplier = 3.0

[output]
# Default output format: human, json, csv
format = "human"
"#
        .to_string()
    }

    /// Parse duration string (e.g., "2s", "500ms", "1m"). A bare number is
    /// read as seconds.
    pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
        let invalid = |reason: String| ConfigError::Duration {
            input: s.to_string(),
            reason,
        };
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty duration string".to_string()));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = trimmed
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| trimmed.split_at(i))
            .unwrap_or((trimmed, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| invalid(format!("`{}` is not a number", num_part.trim())))?;
        if !value.is_finite() || value < 0.0 {
            return Err(invalid("must be a non-negative number".to_string()));
        }

        let multiplier: f64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1.0,
            "us" | "µs" => 1_000.0,
            "ms" => 1_000_000.0,
            "s" | "" => 1_000_000_000.0,
            "m" | "min" => 60_000_000_000.0,
            other => return Err(invalid(format!("unknown unit `{other}`"))),
        };

        Ok(Duration::from_nanos((value * multiplier) as u64))
    }
}
