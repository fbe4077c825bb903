//! Error-path workloads.
//!
//! Recoverable errors in Rust are plain return values, while a panic unwinds
//! the stack. Both paths are measured so their cost difference shows up in
//! the report instead of being assumed.

use pacebench_core::{FixtureWorkload, Workload};
use std::hint::black_box;
use std::panic::{self, PanicHookInfo};

const GROUP: &str = "errors";

/// Failures raised per action.
pub const ITERATIONS: u32 = 1000;

/// Error produced on every call by the result path.
#[derive(Debug, thiserror::Error)]
#[error("simulated failure at iteration {iteration}")]
pub struct SimulatedFailure {
    /// Iteration that failed
    pub iteration: u32,
}

fn fail(iteration: u32) -> Result<u32, SimulatedFailure> {
    Err(SimulatedFailure { iteration })
}

/// Create and match `iterations` error values. Returns how many were caught.
pub fn error_result_path(iterations: u32) -> u32 {
    let mut caught = 0;
    for i in 0..iterations {
        if let Err(err) = fail(black_box(i)) {
            black_box(&err);
            caught += 1;
        }
    }
    caught
}

/// Raise and catch `iterations` panics. Returns how many were caught.
pub fn panic_unwind_path(iterations: u32) -> u32 {
    let mut caught = 0;
    for i in 0..iterations {
        let result = panic::catch_unwind(|| {
            if black_box(i) < u32::MAX {
                panic!("simulated failure");
            }
            i
        });
        if result.is_err() {
            caught += 1;
        }
    }
    caught
}

type PanicHook = Box<dyn Fn(&PanicHookInfo<'_>) + Sync + Send + 'static>;

/// Replaces the process panic hook with a silent one until dropped, so the
/// panic path does not flood stderr.
pub struct QuietPanics {
    previous: Option<PanicHook>,
}

impl QuietPanics {
    /// Silence panic output.
    pub fn install() -> Self {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(|_| {}));
        Self {
            previous: Some(previous),
        }
    }
}

impl Drop for QuietPanics {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            panic::set_hook(previous);
        }
    }
}

pub(crate) fn workloads() -> Vec<Box<dyn Workload>> {
    vec![
        Box::new(
            FixtureWorkload::simple("error_result_path", || error_result_path(ITERATIONS))
                .in_group(GROUP)
                .with_units(ITERATIONS as u64),
        ),
        Box::new(
            FixtureWorkload::with_setup(
                "panic_unwind_path",
                || Ok(QuietPanics::install()),
                |_: &mut QuietPanics| Ok(panic_unwind_path(ITERATIONS)),
            )
            .in_group(GROUP)
            .with_units(ITERATIONS as u64),
        ),
    ]
}
