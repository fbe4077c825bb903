//! CPU-bound arithmetic workloads.

use pacebench_core::{FixtureWorkload, Workload};
use std::hint::black_box;

const GROUP: &str = "compute";

/// Naive doubly-recursive Fibonacci.
pub fn fibonacci(n: u32) -> u64 {
    if n <= 1 {
        return n as u64;
    }
    fibonacci(n - 1) + fibonacci(n - 2)
}

/// Trial-division primality test.
pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    let mut i = 2u32;
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// Number of primes in `2..=max`.
pub fn count_primes(max: u32) -> usize {
    (2..=max).filter(|&n| is_prime(n)).count()
}

pub(crate) fn workloads() -> Vec<Box<dyn Workload>> {
    vec![
        Box::new(FixtureWorkload::simple("fibonacci", || fibonacci(black_box(30))).in_group(GROUP)),
        Box::new(
            FixtureWorkload::simple("count_primes", || count_primes(black_box(10_000)))
                .in_group(GROUP)
                .with_units(10_000),
        ),
    ]
}
