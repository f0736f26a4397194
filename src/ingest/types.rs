//! Ingest Data Types
//!
//! Batch outcome accounting and the payload helpers used at the task
//! boundary.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Fixed filename given to inline recipes staged inside a working directory.
pub const RECIPE_FILENAME: &str = "cc_recipe.json";

/// Accumulated result of processing a batch of recipe references.
///
/// Both lists preserve processing order; no sorting or deduplication. For a
/// batch of N references, `successful.len() + failures.len() == N`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// References that ingested cleanly.
    #[serde(rename = "Successful")]
    pub successful: Vec<Value>,
    /// Pairs of reference and human-readable reason.
    #[serde(rename = "Failures")]
    pub failures: Vec<(Value, String)>,
}

#[derive(Debug, Error)]
pub enum IngestError {
    /// The repository root path is not configured. Fatal to the whole batch
    /// call; no item is attempted.
    #[error("repository root path is not configured; contact your administrator")]
    Configuration,
}

/// Task payloads accept either a single recipe reference or a sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    Many(Vec<Value>),
    One(Value),
}

impl OneOrMany {
    /// A single reference is treated as a one-element batch.
    pub fn into_vec(self) -> Vec<Value> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// The PID namespace defaults to the collection name up to its first `:`.
pub fn default_namespace(collection: &str) -> String {
    match collection.split_once(':') {
        Some((namespace, _)) => namespace.to_string(),
        None => collection.to_string(),
    }
}
