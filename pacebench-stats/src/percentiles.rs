//! Percentile Computation
//!
//! Nearest-rank percentiles: the p-th percentile of `n` ascending samples is
//! the value at rank `ceil(p/100 * n)` (1-based). No interpolation, so every
//! reported percentile is an observed sample.

use std::cmp::Ordering;

/// Standard percentiles reported per workload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentiles {
    /// 50th percentile
    pub p50: f64,
    /// 95th percentile
    pub p95: f64,
    /// 99th percentile
    pub p99: f64,
}

/// Sort samples ascending (NaN-tolerant).
pub fn sorted(samples: &[f64]) -> Vec<f64> {
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    sorted
}

/// Nearest-rank percentile over samples already sorted ascending.
///
/// Returns 0.0 for an empty slice.
pub fn nearest_rank(sorted: &[f64], percentile: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let n = sorted.len();
    let p = percentile.clamp(0.0, 100.0) / 100.0;
    let rank = (p * n as f64).ceil() as usize;
    sorted[rank.clamp(1, n) - 1]
}

/// p50/p95/p99 over unsorted samples.
pub fn compute_percentiles(samples: &[f64]) -> Percentiles {
    let sorted = sorted(samples);
    Percentiles {
        p50: nearest_rank(&sorted, 50.0),
        p95: nearest_rank(&sorted, 95.0),
        p99: nearest_rank(&sorted, 99.0),
    }
}

/// Conventional median: middle value, or the mean of the two middle values.
pub fn median(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sorted = sorted(samples);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
