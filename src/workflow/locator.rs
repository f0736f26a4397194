//! Recipe URL parsing.
//!
//! Recipe URLs follow a fixed layout:
//! `https://<host>/derivative/<bag>/<paramstring>/<file>.json`. The bag names
//! the batch in the catalog; the paramstring names the derivative that was
//! generated. A URL that does not match this shape is rejected outright.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Batch coordinates extracted from a recipe URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagLocator {
    pub bag: String,
    pub paramstring: String,
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The recipe URL does not have the expected path shape.
    #[error("cannot derive bag from recipe url: {0}")]
    Locator(String),
    /// A job payload could not be built or parsed.
    #[error("invalid job payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Extracts the bag and paramstring from a recipe URL.
pub fn parse_locator(recipe_url: &str) -> Result<BagLocator, WorkflowError> {
    let url = reqwest::Url::parse(recipe_url)
        .map_err(|_| WorkflowError::Locator(recipe_url.to_string()))?;

    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.collect())
        .unwrap_or_default();

    match segments.as_slice() {
        [_, bag, paramstring, _, ..] if !bag.is_empty() && !paramstring.is_empty() => {
            Ok(BagLocator {
                bag: (*bag).to_string(),
                paramstring: (*paramstring).to_string(),
            })
        }
        _ => Err(WorkflowError::Locator(recipe_url.to_string())),
    }
}
