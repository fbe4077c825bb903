//! Outlier Detection
//!
//! Median-based: a sample is an outlier when it exceeds
//! `median + k * MAD`, where MAD is the raw (unscaled) median absolute
//! deviation. Only the high side is tested.

use crate::percentiles::median;
use serde::{Deserialize, Serialize};

/// Default MAD multiplier
pub const DEFAULT_MAD_MULTIPLIER: f64 = 3.0;

/// Method for outlier detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum OutlierPolicy {
    /// Exclude samples above `median + multiplier * MAD`
    MedianAbsoluteDeviation {
        /// MAD multiplier
        multiplier: f64,
    },
    /// Keep every sample
    None,
}

impl Default for OutlierPolicy {
    fn default() -> Self {
        OutlierPolicy::MedianAbsoluteDeviation {
            multiplier: DEFAULT_MAD_MULTIPLIER,
        }
    }
}

/// Result of outlier analysis
#[derive(Debug, Clone)]
pub struct OutlierAnalysis {
    /// Samples kept for central tendency, in original order
    pub retained: Vec<f64>,
    /// Indices (into the input) of excluded samples
    pub outlier_indices: Vec<usize>,
    /// Median of the input
    pub median: f64,
    /// Median absolute deviation of the input
    pub mad: f64,
    /// Samples strictly above this value are outliers; `None` when the
    /// policy keeps everything
    pub upper_bound: Option<f64>,
    /// Policy used
    pub policy: OutlierPolicy,
}

impl OutlierAnalysis {
    /// Number of excluded samples
    pub fn outlier_count(&self) -> usize {
        self.outlier_indices.len()
    }
}

/// Median absolute deviation (raw, without the 1.4826 normal-consistency factor).
pub fn median_absolute_deviation(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let m = median(samples);
    let deviations: Vec<f64> = samples.iter().map(|x| (x - m).abs()).collect();
    median(&deviations)
}

/// Split samples into retained values and outliers.
pub fn detect_outliers(samples: &[f64], policy: OutlierPolicy) -> OutlierAnalysis {
    let med = median(samples);
    let mad = median_absolute_deviation(samples);

    let upper_bound = match policy {
        OutlierPolicy::MedianAbsoluteDeviation { multiplier } => Some(med + multiplier * mad),
        OutlierPolicy::None => None,
    };

    let mut retained = Vec::with_capacity(samples.len());
    let mut outlier_indices = Vec::new();
    for (i, &sample) in samples.iter().enumerate() {
        if upper_bound.is_some_and(|bound| sample > bound) {
            outlier_indices.push(i);
        } else {
            retained.push(sample);
        }
    }

    OutlierAnalysis {
        retained,
        outlier_indices,
        median: med,
        mad,
        upper_bound,
        policy,
    }
}
