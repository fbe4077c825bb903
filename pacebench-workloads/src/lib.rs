#![warn(missing_docs)]
//! PaceBench Workloads - Built-in Catalog
//!
//! The default suite, grouped by what it stresses:
//! - collections, hashing, compute, text, serialization
//! - error paths (result values vs. panics)
//! - allocation pressure and UUIDv7 generation
//! - concurrency drivers comparing three ways of distributing one job

pub mod collections;
pub mod compute;
pub mod concurrency;
pub mod errors;
pub mod hashing;
pub mod identifiers;
pub mod memory;
pub mod serialization;
pub mod text;

pub use concurrency::{
    ConcurrencyExecutor, ConcurrencyPlan, Countdown, DriveOutcome, DriverError, Strategy,
    concurrency_workload, do_work, drive,
};

use pacebench_core::{HarnessError, Workload, WorkloadRegistry};

type Section = fn() -> Vec<Box<dyn Workload>>;

const SECTIONS: [Section; 9] = [
    collections::workloads,
    hashing::workloads,
    compute::workloads,
    text::workloads,
    serialization::workloads,
    errors::workloads,
    memory::workloads,
    identifiers::workloads,
    concurrency::workloads,
];

/// Register the built-in suite in catalog order.
pub fn register_default_suite(registry: &mut WorkloadRegistry) -> Result<(), HarnessError> {
    for workload in SECTIONS.iter().flat_map(|section| section()) {
        registry.register_boxed(workload)?;
    }
    tracing::debug!(count = registry.len(), "registered default suite");
    Ok(())
}

/// A fresh registry holding the built-in suite.
pub fn default_registry() -> Result<WorkloadRegistry, HarnessError> {
    let mut registry = WorkloadRegistry::new();
    register_default_suite(&mut registry)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_suite_order() {
        let registry = default_registry().unwrap();
        assert_eq!(
            registry.names(),
            vec![
                "sum",
                "sorted_sum",
                "count_by",
                "aggregate_by",
                "sha256",
                "md5",
                "fibonacci",
                "count_primes",
                "reverse_string",
                "reverse_string_in_place",
                "count_vowels",
                "count_vowels_bytes",
                "json_serialize",
                "json_deserialize",
                "error_result_path",
                "panic_unwind_path",
                "allocation_pressure",
                "uuid_v7_generate",
                "fan_out_join",
                "task_join",
                "pooled_barrier",
            ]
        );
    }

    #[test]
    fn test_registering_twice_fails() {
        let mut registry = default_registry().unwrap();
        let err = register_default_suite(&mut registry).unwrap_err();
        assert!(matches!(err, HarnessError::DuplicateName { .. }));
    }

    #[test]
    fn test_cheap_workloads_run_once() {
        let mut registry = default_registry().unwrap();
        for workload in registry.iter_mut() {
            if matches!(workload.group(), "concurrency" | "errors" | "compute") {
                continue;
            }
            workload.setup().unwrap();
            workload.action().unwrap();
            workload.teardown();
        }
    }
}
