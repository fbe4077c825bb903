//! Concurrency plans and the shared unit of work.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hint::black_box;

/// Default total units of work per action.
pub const DEFAULT_TOTAL_UNITS: u64 = 1_000_000;
/// Default degree of parallelism.
pub const DEFAULT_DEGREE: usize = 10;

/// How the units of a plan are distributed and joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// One parallel-for over a dedicated thread pool.
    FanOutJoin,
    /// Tasks on an async runtime, all awaited together.
    TaskJoin,
    /// Fire-and-forget pool jobs released by a countdown latch.
    PooledBarrier,
}

impl Strategy {
    /// Every strategy, in report order.
    pub const ALL: [Strategy; 3] = [
        Strategy::FanOutJoin,
        Strategy::TaskJoin,
        Strategy::PooledBarrier,
    ];

    /// Workload name used in the registry.
    pub fn workload_name(self) -> &'static str {
        match self {
            Strategy::FanOutJoin => "fan_out_join",
            Strategy::TaskJoin => "task_join",
            Strategy::PooledBarrier => "pooled_barrier",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Strategy::FanOutJoin => "fan-out-join",
            Strategy::TaskJoin => "task-join",
            Strategy::PooledBarrier => "pooled-barrier",
        };
        f.write_str(label)
    }
}

/// `total_units` of work split across `degree` workers using `strategy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcurrencyPlan {
    /// Units of work per action (W)
    pub total_units: u64,
    /// Number of workers (D)
    pub degree: usize,
    /// Distribution strategy
    pub strategy: Strategy,
}

impl ConcurrencyPlan {
    /// Plan with explicit sizes. A degree of zero is rejected when the
    /// executor is built.
    pub fn new(strategy: Strategy, total_units: u64, degree: usize) -> Self {
        Self {
            total_units,
            degree,
            strategy,
        }
    }

    /// Plan with the default sizes (1 000 000 units over 10 workers).
    pub fn with_defaults(strategy: Strategy) -> Self {
        Self::new(strategy, DEFAULT_TOTAL_UNITS, DEFAULT_DEGREE)
    }

    /// Split `total_units` into `degree` shares that differ by at most one.
    /// Earlier shares take the remainder.
    pub fn shares(&self) -> Vec<u64> {
        if self.degree == 0 {
            return Vec::new();
        }
        let degree = self.degree as u64;
        let base = self.total_units / degree;
        let remainder = self.total_units % degree;
        (0..degree)
            .map(|i| base + u64::from(i < remainder))
            .collect()
    }
}

/// What one worker reports back after processing its share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkTally {
    /// Units the worker actually iterated over
    pub units: u64,
    /// Final value of the alternating accumulator
    pub checksum: i64,
}

/// CPU-bound inner loop: alternately add and subtract one per unit.
///
/// The accumulator goes through `black_box` every step so the loop cannot be
/// folded into a closed form.
pub fn do_work(units: u64) -> WorkTally {
    let mut acc: i64 = 0;
    let mut processed = 0u64;
    for i in 0..units {
        acc += if i % 2 == 0 { 1 } else { -1 };
        acc = black_box(acc);
        processed += 1;
    }
    WorkTally {
        units: processed,
        checksum: acc,
    }
}
