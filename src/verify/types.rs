//! Verification Data Types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which external system answers existence queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStrategy {
    /// Search-index lookup by qualified identifier.
    #[default]
    Index,
    /// Direct read through the item-manipulation tool.
    Direct,
}

/// Outcome of polling the repository for one recipe's objects.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExistenceStatus {
    /// UUID of the book object.
    pub book: String,
    /// Presence flag per page UUID. `None` when the book itself was absent
    /// and no page was checked.
    pub page_status: Option<HashMap<String, bool>>,
    /// True iff the book and every page are present.
    pub successful_load: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Count envelope returned by the search index:
/// `{"response": {"numFound": <int>}}`.
#[derive(Debug, Deserialize)]
pub struct IndexResponse {
    pub response: IndexCounts,
}

#[derive(Debug, Deserialize)]
pub struct IndexCounts {
    #[serde(rename = "numFound")]
    pub num_found: u64,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    /// The recipe locator could not be fetched; verification cannot proceed.
    #[error("Bad recipe url: {0}")]
    Fetch(String),
    /// The fetched recipe is not a well-formed document.
    #[error("recipe at {url} is malformed: {source}")]
    Parse {
        url: String,
        source: serde_json::Error,
    },
    /// The manipulation tool could not be launched at all.
    #[error("failed to launch {tool}: {source}")]
    Launch {
        tool: String,
        source: std::io::Error,
    },
    /// The manipulation tool exited non-zero. `log_tail` carries the last
    /// lines of the worker log as diagnostic context.
    #[error("{tool} exit status {code}")]
    ToolInvocation {
        tool: String,
        code: i32,
        log_tail: Vec<String>,
    },
    /// The search index could not be queried.
    #[error("index query failed: {0}")]
    Index(#[from] reqwest::Error),
}
