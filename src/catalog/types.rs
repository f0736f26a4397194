//! Catalog Data Types

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Search envelope returned by the catalog:
/// `{"count": <int>, "results": [<record>, ...]}`.
#[derive(Debug, Deserialize)]
pub struct CatalogQueryResponse {
    pub count: u64,
    #[serde(default)]
    pub results: Vec<Value>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog could not be reached or answered with garbage.
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The catalog rejected the update.
    #[error("catalog update rejected with status {0}")]
    Status(u16),
    /// Every attempt failed; disposition belongs to the task runtime's
    /// failure channel.
    #[error("catalog update failed after {0} attempts")]
    RetriesExhausted(usize),
}
