//! The three drivers and the executors they run on.
//!
//! Executors are built once per workload (in `setup`) so a measured action
//! covers only distribution, execution and joining of the shares.

use super::countdown::Countdown;
use super::plan::{ConcurrencyPlan, Strategy, WorkTally, do_work};
use pacebench_core::panic_message;
use rayon::prelude::*;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinSet;

/// Per-share work function.
pub type WorkFn = fn(u64) -> WorkTally;

/// Errors surfaced by a concurrency driver.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// Degree of parallelism was zero
    #[error("{strategy}: degree of parallelism must be at least 1")]
    ZeroDegree {
        /// Requested strategy
        strategy: Strategy,
    },

    /// Thread pool or runtime could not be created
    #[error("{strategy}: failed to build executor: {message}")]
    Build {
        /// Requested strategy
        strategy: Strategy,
        /// Underlying error
        message: String,
    },

    /// The executor kind does not serve this strategy
    #[error("{strategy}: executor is a {found}, not usable for this strategy")]
    ExecutorMismatch {
        /// Requested strategy
        strategy: Strategy,
        /// Executor kind that was supplied
        found: &'static str,
    },

    /// One or more workers failed; every failure is listed
    #[error("{strategy}: {} of {degree} workers failed: {}", .messages.len(), .messages.join("; "))]
    WorkersFailed {
        /// Strategy that ran
        strategy: Strategy,
        /// Number of workers
        degree: usize,
        /// One message per failed worker
        messages: Vec<String>,
    },

    /// Workers completed but did not account for every unit
    #[error("{strategy}: processed {processed} units, expected {expected}")]
    UnitMismatch {
        /// Strategy that ran
        strategy: Strategy,
        /// Units reported by the workers
        processed: u64,
        /// Units in the plan
        expected: u64,
    },
}

/// Result of one driven action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveOutcome {
    /// Strategy that ran
    pub strategy: Strategy,
    /// Units counted by the workers; always equals the plan's total
    pub units_processed: u64,
    /// Sum of the workers' accumulators
    pub checksum: i64,
}

/// Thread pool or async runtime owned by a concurrency workload.
pub enum ConcurrencyExecutor {
    /// Fixed-size rayon pool (fan-out-join, pooled-barrier)
    Pool(rayon::ThreadPool),
    /// Multi-thread tokio runtime (task-join)
    Runtime(tokio::runtime::Runtime),
}

impl std::fmt::Debug for ConcurrencyExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}

impl ConcurrencyExecutor {
    /// Build the executor the plan's strategy runs on, sized to its degree.
    pub fn build(plan: &ConcurrencyPlan) -> Result<Self, DriverError> {
        let strategy = plan.strategy;
        if plan.degree == 0 {
            return Err(DriverError::ZeroDegree { strategy });
        }

        let executor = match strategy {
            Strategy::FanOutJoin | Strategy::PooledBarrier => {
                let prefix = strategy.workload_name();
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(plan.degree)
                    .thread_name(move |i| format!("{prefix}-{i}"))
                    .panic_handler(|payload| {
                        tracing::warn!("pool job panicked: {}", panic_message(&*payload));
                    })
                    .build()
                    .map_err(|e| DriverError::Build {
                        strategy,
                        message: e.to_string(),
                    })?;
                ConcurrencyExecutor::Pool(pool)
            }
            Strategy::TaskJoin => {
                let runtime = tokio::runtime::Builder::new_multi_thread()
                    .worker_threads(plan.degree)
                    .thread_name("task_join")
                    .build()
                    .map_err(|e| DriverError::Build {
                        strategy,
                        message: e.to_string(),
                    })?;
                ConcurrencyExecutor::Runtime(runtime)
            }
        };

        tracing::debug!(%strategy, degree = plan.degree, "built {}", executor.kind());
        Ok(executor)
    }

    /// Short description of the executor kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ConcurrencyExecutor::Pool(_) => "thread pool",
            ConcurrencyExecutor::Runtime(_) => "async runtime",
        }
    }

    /// Stop worker threads. The runtime gets a bounded grace period.
    pub fn shutdown(self) {
        match self {
            ConcurrencyExecutor::Pool(pool) => drop(pool),
            ConcurrencyExecutor::Runtime(runtime) => {
                runtime.shutdown_timeout(Duration::from_secs(1))
            }
        }
    }
}

/// Run one action of `plan` on `executor` using the standard unit of work.
pub fn drive(
    plan: &ConcurrencyPlan,
    executor: &ConcurrencyExecutor,
) -> Result<DriveOutcome, DriverError> {
    drive_with(plan, executor, do_work)
}

/// Run one action of `plan` with a custom per-share work function.
pub fn drive_with(
    plan: &ConcurrencyPlan,
    executor: &ConcurrencyExecutor,
    work: WorkFn,
) -> Result<DriveOutcome, DriverError> {
    let shares = plan.shares();
    let results = match (plan.strategy, executor) {
        (Strategy::FanOutJoin, ConcurrencyExecutor::Pool(pool)) => fan_out_join(pool, &shares, work),
        (Strategy::TaskJoin, ConcurrencyExecutor::Runtime(runtime)) => {
            task_join(runtime, &shares, work)
        }
        (Strategy::PooledBarrier, ConcurrencyExecutor::Pool(pool)) => {
            pooled_barrier(pool, &shares, work)
        }
        (strategy, executor) => {
            return Err(DriverError::ExecutorMismatch {
                strategy,
                found: executor.kind(),
            });
        }
    };
    settle(plan, results)
}

type ShareResult = Result<WorkTally, String>;

fn run_share(work: WorkFn, units: u64) -> ShareResult {
    catch_unwind(AssertUnwindSafe(|| work(units))).map_err(|payload| panic_message(&*payload))
}

fn fan_out_join(pool: &rayon::ThreadPool, shares: &[u64], work: WorkFn) -> Vec<ShareResult> {
    pool.install(|| {
        shares
            .par_iter()
            .map(|&units| run_share(work, units))
            .collect()
    })
}

fn task_join(
    runtime: &tokio::runtime::Runtime,
    shares: &[u64],
    work: WorkFn,
) -> Vec<ShareResult> {
    runtime.block_on(async {
        let mut set = JoinSet::new();
        for &units in shares {
            set.spawn(async move { work(units) });
        }

        // Every task is awaited, even after one fails
        let mut results = Vec::with_capacity(shares.len());
        while let Some(joined) = set.join_next().await {
            results.push(joined.map_err(|err| {
                if err.is_panic() {
                    panic_message(&*err.into_panic())
                } else {
                    err.to_string()
                }
            }));
        }
        results
    })
}

fn pooled_barrier(pool: &rayon::ThreadPool, shares: &[u64], work: WorkFn) -> Vec<ShareResult> {
    let latch = Arc::new(Countdown::new(shares.len()));
    let results = Arc::new(Mutex::new(Vec::with_capacity(shares.len())));

    for &units in shares {
        let latch = Arc::clone(&latch);
        let results = Arc::clone(&results);
        pool.spawn(move || {
            let _signal = latch.guard();
            let outcome = run_share(work, units);
            results
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(outcome);
        });
    }

    latch.wait();
    let mut results = results.lock().unwrap_or_else(PoisonError::into_inner);
    std::mem::take(&mut *results)
}

fn settle(plan: &ConcurrencyPlan, results: Vec<ShareResult>) -> Result<DriveOutcome, DriverError> {
    let mut messages = Vec::new();
    let mut units_processed = 0u64;
    let mut checksum = 0i64;
    for result in results {
        match result {
            Ok(tally) => {
                units_processed += tally.units;
                checksum += tally.checksum;
            }
            Err(message) => messages.push(message),
        }
    }

    if !messages.is_empty() {
        return Err(DriverError::WorkersFailed {
            strategy: plan.strategy,
            degree: plan.degree,
            messages,
        });
    }
    if units_processed != plan.total_units {
        return Err(DriverError::UnitMismatch {
            strategy: plan.strategy,
            processed: units_processed,
            expected: plan.total_units,
        });
    }

    Ok(DriveOutcome {
        strategy: plan.strategy,
        units_processed,
        checksum,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(strategy: Strategy, total_units: u64, degree: usize, work: WorkFn) -> Result<DriveOutcome, DriverError> {
        let plan = ConcurrencyPlan::new(strategy, total_units, degree);
        let executor = ConcurrencyExecutor::build(&plan)?;
        let outcome = drive_with(&plan, &executor, work);
        executor.shutdown();
        outcome
    }

    fn fail_on_seven(units: u64) -> WorkTally {
        if units == 7 {
            panic!("share of seven rejected");
        }
        do_work(units)
    }

    fn drop_one_unit(units: u64) -> WorkTally {
        let mut tally = do_work(units);
        tally.units = tally.units.saturating_sub(1);
        tally
    }

    #[test]
    fn test_every_strategy_processes_all_units() {
        for strategy in Strategy::ALL {
            let outcome = run(strategy, 100_000, 10, do_work).unwrap();
            assert_eq!(outcome.strategy, strategy);
            assert_eq!(outcome.units_processed, 100_000);
            assert_eq!(outcome.checksum, 0);
        }
    }

    #[test]
    fn test_uneven_split_checksum() {
        // 23 over 3 workers: 8, 8, 7 -> only the share of 7 ends at +1
        for strategy in Strategy::ALL {
            let outcome = run(strategy, 23, 3, do_work).unwrap();
            assert_eq!(outcome.units_processed, 23);
            assert_eq!(outcome.checksum, 1);
        }
    }

    #[test]
    fn test_all_worker_failures_reported_together() {
        // 22 over 3 workers: 8, 7, 7 -> two failing shares
        for strategy in Strategy::ALL {
            let err = run(strategy, 22, 3, fail_on_seven).unwrap_err();
            match err {
                DriverError::WorkersFailed {
                    strategy: s,
                    degree,
                    messages,
                } => {
                    assert_eq!(s, strategy);
                    assert_eq!(degree, 3);
                    assert_eq!(messages.len(), 2);
                    assert!(messages.iter().all(|m| m.contains("share of seven")));
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_unit_mismatch_detected() {
        let err = run(Strategy::FanOutJoin, 100, 4, drop_one_unit).unwrap_err();
        assert!(matches!(
            err,
            DriverError::UnitMismatch {
                processed: 96,
                expected: 100,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_degree_rejected() {
        let plan = ConcurrencyPlan::new(Strategy::TaskJoin, 10, 0);
        assert!(matches!(
            ConcurrencyExecutor::build(&plan),
            Err(DriverError::ZeroDegree { .. })
        ));
    }

    #[test]
    fn test_executor_mismatch() {
        let pool_plan = ConcurrencyPlan::new(Strategy::FanOutJoin, 10, 2);
        let pool = ConcurrencyExecutor::build(&pool_plan).unwrap();
        let task_plan = ConcurrencyPlan::new(Strategy::TaskJoin, 10, 2);
        let err = drive(&task_plan, &pool).unwrap_err();
        assert!(err.to_string().contains("thread pool"));
        pool.shutdown();
    }
}
