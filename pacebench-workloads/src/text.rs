//! String manipulation workloads over a short pangram.

use pacebench_core::{FixtureWorkload, Workload};
use std::hint::black_box;

const GROUP: &str = "text";

/// Input for every text workload.
pub const SAMPLE_TEXT: &str = "The quick brown fox jumps over the lazy dog.";

const VOWELS: &str = "aeiouAEIOU";
const VOWEL_BYTES: &[u8] = b"aeiouAEIOU";

/// Reverse into a freshly allocated string.
pub fn reverse_string(text: &str) -> String {
    text.chars().rev().collect()
}

/// Reverse into `buf`, reusing its capacity.
pub fn reverse_into(text: &str, buf: &mut String) {
    buf.clear();
    buf.extend(text.chars().rev());
}

/// Count vowels by char.
pub fn count_vowels(text: &str) -> usize {
    text.chars().filter(|c| VOWELS.contains(*c)).count()
}

/// Count ASCII vowels by byte.
pub fn count_vowels_bytes(text: &str) -> usize {
    text.bytes().filter(|b| VOWEL_BYTES.contains(b)).count()
}

pub(crate) fn workloads() -> Vec<Box<dyn Workload>> {
    vec![
        Box::new(
            FixtureWorkload::simple("reverse_string", || reverse_string(black_box(SAMPLE_TEXT)))
                .in_group(GROUP),
        ),
        Box::new(
            FixtureWorkload::with_setup(
                "reverse_string_in_place",
                || Ok(String::with_capacity(SAMPLE_TEXT.len())),
                |buf: &mut String| {
                    reverse_into(black_box(SAMPLE_TEXT), buf);
                    Ok(buf.len())
                },
            )
            .in_group(GROUP),
        ),
        Box::new(
            FixtureWorkload::simple("count_vowels", || count_vowels(black_box(SAMPLE_TEXT)))
                .in_group(GROUP),
        ),
        Box::new(
            FixtureWorkload::simple("count_vowels_bytes", || {
                count_vowels_bytes(black_box(SAMPLE_TEXT))
            })
            .in_group(GROUP),
        ),
    ]
}
