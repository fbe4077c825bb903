//! Statistics Computation
//!
//! Parallel computation of summary statistics for executed workloads.
//!
//! Measurement has finished by the time this runs, so Rayon can spread the
//! per-workload summaries across cores without disturbing any timing.

use super::execution::{ExecutionOutcome, ExecutionResult};
use pacebench_stats::{OutlierPolicy, Statistics, StatsError, summarize};
use rayon::prelude::*;

/// Compute statistics for execution results (parallelized with Rayon)
///
/// Returns one entry per result, in the same order. `None` marks a skipped
/// workload; `Some(Err(..))` a workload with no completed measured sample.
pub fn compute_statistics(
    results: &[ExecutionResult],
    policy: OutlierPolicy,
) -> Vec<Option<Result<Statistics, StatsError>>> {
    results
        .par_iter()
        .map(|r| match &r.outcome {
            ExecutionOutcome::Measured(samples) => Some(summarize(samples, policy)),
            ExecutionOutcome::Skipped { .. } => None,
        })
        .collect()
}
