//! Collection workloads: summing, sorting and keyed grouping.

use pacebench_core::{FixtureWorkload, Workload};
use std::collections::HashMap;
use std::hash::Hash;

const GROUP: &str = "collections";

/// A student and the letter grade they scored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    /// Student name
    pub name: &'static str,
    /// Letter grade
    pub score: &'static str,
}

/// Fixed roster used by the grouping workloads.
pub const STUDENTS: [Student; 10] = [
    Student { name: "Alice", score: "A" },
    Student { name: "Bob", score: "B" },
    Student { name: "Charlie", score: "C" },
    Student { name: "David", score: "B" },
    Student { name: "Eve", score: "A" },
    Student { name: "Frank", score: "F" },
    Student { name: "Grace", score: "A" },
    Student { name: "Hank", score: "B" },
    Student { name: "Ivy", score: "C" },
    Student { name: "Jack", score: "A" },
];

/// Count items per key.
pub fn count_by<T, K, F>(items: &[T], mut key: F) -> HashMap<K, usize>
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut counts = HashMap::new();
    for item in items {
        *counts.entry(key(item)).or_insert(0) += 1;
    }
    counts
}

/// Fold items into one accumulator per key, each starting from `seed`.
pub fn aggregate_by<T, K, A, F, G>(items: &[T], mut key: F, seed: A, mut fold: G) -> HashMap<K, A>
where
    K: Eq + Hash,
    A: Clone,
    F: FnMut(&T) -> K,
    G: FnMut(&mut A, &T),
{
    let mut groups: HashMap<K, A> = HashMap::new();
    for item in items {
        let acc = groups.entry(key(item)).or_insert_with(|| seed.clone());
        fold(acc, item);
    }
    groups
}

/// Sum after a stable sort of a copy.
pub fn sorted_sum(numbers: &[i64]) -> i64 {
    let mut sorted = numbers.to_vec();
    sorted.sort();
    sorted.iter().sum()
}

pub(crate) fn workloads() -> Vec<Box<dyn Workload>> {
    vec![
        Box::new(
            FixtureWorkload::with_setup(
                "sum",
                || Ok((1..=1000).collect::<Vec<i64>>()),
                |numbers: &mut Vec<i64>| Ok(numbers.iter().sum::<i64>()),
            )
            .in_group(GROUP)
            .with_units(1000),
        ),
        Box::new(
            FixtureWorkload::with_setup(
                "sorted_sum",
                || Ok((1..=1000).collect::<Vec<i64>>()),
                |numbers: &mut Vec<i64>| Ok(sorted_sum(numbers)),
            )
            .in_group(GROUP)
            .with_units(1000),
        ),
        Box::new(
            FixtureWorkload::simple("count_by", || count_by(&STUDENTS, |s| s.score))
                .in_group(GROUP)
                .with_units(STUDENTS.len() as u64),
        ),
        Box::new(
            FixtureWorkload::simple("aggregate_by", || {
                aggregate_by(
                    &STUDENTS,
                    |s| s.score,
                    Vec::new(),
                    |names: &mut Vec<&str>, s| names.push(s.name),
                )
            })
            .in_group(GROUP)
            .with_units(STUDENTS.len() as u64),
        ),
    ]
}
