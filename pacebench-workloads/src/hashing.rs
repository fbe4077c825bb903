//! Digest workloads over a fixed, seeded buffer.

use pacebench_core::{FixtureWorkload, Workload};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use sha2::{Digest, Sha256};

const GROUP: &str = "hashing";

/// Input size in bytes.
pub const INPUT_LEN: usize = 10_000;
/// Seed for the input buffer, so every run hashes the same bytes.
pub const INPUT_SEED: u64 = 42;

/// Deterministic pseudo-random input buffer.
pub fn seeded_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut data = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill_bytes(&mut data);
    data
}

pub(crate) fn workloads() -> Vec<Box<dyn Workload>> {
    vec![
        Box::new(
            FixtureWorkload::with_setup(
                "sha256",
                || Ok(seeded_bytes(INPUT_LEN, INPUT_SEED)),
                |data: &mut Vec<u8>| Ok(Sha256::digest(data.as_slice())),
            )
            .in_group(GROUP)
            .with_units(INPUT_LEN as u64),
        ),
        Box::new(
            FixtureWorkload::with_setup(
                "md5",
                || Ok(seeded_bytes(INPUT_LEN, INPUT_SEED)),
                |data: &mut Vec<u8>| Ok(md5::compute(data.as_slice())),
            )
            .in_group(GROUP)
            .with_units(INPUT_LEN as u64),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_bytes_are_reproducible() {
        let a = seeded_bytes(INPUT_LEN, INPUT_SEED);
        let b = seeded_bytes(INPUT_LEN, INPUT_SEED);
        assert_eq!(a.len(), INPUT_LEN);
        assert_eq!(a, b);
        assert_ne!(a, seeded_bytes(INPUT_LEN, INPUT_SEED + 1));
    }

    #[test]
    fn test_digest_lengths() {
        let data = seeded_bytes(INPUT_LEN, INPUT_SEED);
        assert_eq!(Sha256::digest(&data).len(), 32);
        assert_eq!(md5::compute(&data).0.len(), 16);
    }
}
