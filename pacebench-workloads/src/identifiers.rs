//! Time-ordered identifier generation.

use pacebench_core::{FixtureWorkload, Workload};
use uuid::Uuid;

const GROUP: &str = "identifiers";

/// Identifiers generated per action.
pub const ID_COUNT: usize = 1000;

/// Generate `count` UUIDv7 values and return them newest first.
///
/// Fails if two generated ids collide.
pub fn generate_v7_descending(count: usize) -> anyhow::Result<Vec<Uuid>> {
    let mut ids: Vec<Uuid> = (0..count).map(|_| Uuid::now_v7()).collect();
    ids.sort_unstable_by(|a, b| b.cmp(a));
    anyhow::ensure!(
        ids.windows(2).all(|pair| pair[0] != pair[1]),
        "duplicate UUIDv7 generated"
    );
    Ok(ids)
}

pub(crate) fn workloads() -> Vec<Box<dyn Workload>> {
    vec![Box::new(
        FixtureWorkload::fallible("uuid_v7_generate", || generate_v7_descending(ID_COUNT))
            .in_group(GROUP)
            .with_units(ID_COUNT as u64),
    )]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_v7_and_descending() {
        let ids = generate_v7_descending(50).unwrap();
        assert_eq!(ids.len(), 50);
        assert!(ids.iter().all(|id| id.get_version_num() == 7));
        assert!(ids.windows(2).all(|pair| pair[0] > pair[1]));
    }
}
