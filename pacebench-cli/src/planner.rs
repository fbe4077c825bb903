//! Workload Planner
//!
//! Builds the execution plan by filtering registered workloads.
//!
//! Filtering options:
//! - Regex pattern matching on workload name
//! - Group filtering
//!
//! Ordering: registration order is preserved, since it is also report order.

use pacebench_core::WorkloadRegistry;
use regex::Regex;

/// Execution plan for workloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    /// Registry indices to run, in registration order
    pub indices: Vec<usize>,
}

impl ExecutionPlan {
    /// Number of selected workloads
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether nothing was selected
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Build execution plan from registered workloads
pub fn build_plan(
    registry: &WorkloadRegistry,
    filter: Option<&Regex>,
    group: Option<&str>,
) -> ExecutionPlan {
    let indices = registry
        .all()
        .enumerate()
        .filter(|(_, w)| {
            // Apply regex filter on workload name
            if let Some(re) = filter {
                if !re.is_match(w.name()) {
                    return false;
                }
            }

            // Apply group filter
            if let Some(g) = group {
                if w.group() != g {
                    return false;
                }
            }

            true
        })
        .map(|(i, _)| i)
        .collect();

    ExecutionPlan { indices }
}
