//! Concurrency workloads.
//!
//! The same CPU-bound job (W units split over D workers) run three ways:
//! - `fan_out_join`: one parallel iterator call on a dedicated rayon pool
//! - `task_join`: tasks on a tokio runtime, bulk-awaited through a `JoinSet`
//! - `pooled_barrier`: fire-and-forget rayon jobs and a [`Countdown`] latch
//!
//! Each action checks that the workers accounted for exactly W units.

mod countdown;
mod drivers;
mod plan;

pub use countdown::{Countdown, CountdownGuard};
pub use drivers::{ConcurrencyExecutor, DriveOutcome, DriverError, WorkFn, drive, drive_with};
pub use plan::{
    ConcurrencyPlan, DEFAULT_DEGREE, DEFAULT_TOTAL_UNITS, Strategy, WorkTally, do_work,
};

use pacebench_core::{FixtureWorkload, Workload};

/// Group shared by the concurrency workloads.
pub const GROUP: &str = "concurrency";

/// Workload that drives `plan` once per action. The executor lives from
/// setup to teardown.
pub fn concurrency_workload(plan: ConcurrencyPlan) -> FixtureWorkload<ConcurrencyExecutor> {
    FixtureWorkload::with_setup(
        plan.strategy.workload_name(),
        move || Ok(ConcurrencyExecutor::build(&plan)?),
        move |executor: &mut ConcurrencyExecutor| Ok(drive(&plan, executor)?),
    )
    .in_group(GROUP)
    .with_units(plan.total_units)
    .on_teardown(ConcurrencyExecutor::shutdown)
}

pub(crate) fn workloads() -> Vec<Box<dyn Workload>> {
    Strategy::ALL
        .into_iter()
        .map(|strategy| {
            Box::new(concurrency_workload(ConcurrencyPlan::with_defaults(strategy)))
                as Box<dyn Workload>
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workload_lifecycle() {
        let plan = ConcurrencyPlan::new(Strategy::PooledBarrier, 1000, 4);
        let mut workload = concurrency_workload(plan);
        assert_eq!(workload.name(), "pooled_barrier");
        assert_eq!(workload.group(), GROUP);
        assert_eq!(workload.units_per_action(), Some(1000));

        workload.setup().unwrap();
        for _ in 0..3 {
            workload.action().unwrap();
        }
        workload.teardown();
    }

    #[test]
    fn test_zero_degree_fails_setup() {
        let mut workload = concurrency_workload(ConcurrencyPlan::new(Strategy::FanOutJoin, 10, 0));
        let err = workload.setup().unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_default_catalog_order() {
        let names: Vec<String> = workloads().iter().map(|w| w.name().to_string()).collect();
        assert_eq!(names, vec!["fan_out_join", "task_join", "pooled_barrier"]);
    }
}
