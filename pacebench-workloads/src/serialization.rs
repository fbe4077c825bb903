//! JSON encode/decode workloads.

use pacebench_core::{FixtureWorkload, Workload};
use serde::{Deserialize, Serialize};
use std::hint::black_box;

const GROUP: &str = "serialization";

/// Document decoded by `json_deserialize`.
pub const JSON_SAMPLE: &str = r#"{"Name":"John","Age":30}"#;

/// Record encoded by `json_serialize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Person {
    /// Display name
    pub name: String,
    /// Age in years
    pub age: u32,
}

pub(crate) fn workloads() -> Vec<Box<dyn Workload>> {
    vec![
        Box::new(
            FixtureWorkload::fallible("json_serialize", || {
                let person = Person {
                    name: "John".to_string(),
                    age: 30,
                };
                Ok(serde_json::to_string(black_box(&person))?)
            })
            .in_group(GROUP),
        ),
        Box::new(
            FixtureWorkload::fallible("json_deserialize", || {
                Ok(serde_json::from_str::<serde_json::Value>(black_box(JSON_SAMPLE))?)
            })
            .in_group(GROUP),
        ),
    ]
}
