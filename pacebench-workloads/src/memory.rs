//! Allocation-heavy workload for exercising allocation accounting.

use pacebench_core::{FixtureWorkload, Workload};
use std::hint::black_box;

const GROUP: &str = "memory";

/// Blocks allocated per action.
pub const BLOCK_COUNT: usize = 10_000;
/// Size of each block in bytes.
pub const BLOCK_SIZE: usize = 1024;

/// Allocate and immediately free `count` zeroed blocks of `size` bytes.
pub fn allocation_pressure(count: usize, size: usize) -> usize {
    let mut total = 0;
    for _ in 0..count {
        let block = vec![0u8; size];
        total += black_box(&block).len();
    }
    total
}

pub(crate) fn workloads() -> Vec<Box<dyn Workload>> {
    vec![Box::new(
        FixtureWorkload::simple("allocation_pressure", || {
            allocation_pressure(BLOCK_COUNT, BLOCK_SIZE)
        })
        .in_group(GROUP)
        .with_units(BLOCK_COUNT as u64),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touches_every_block() {
        assert_eq!(allocation_pressure(10, 64), 640);
        assert_eq!(allocation_pressure(0, BLOCK_SIZE), 0);
    }
}
