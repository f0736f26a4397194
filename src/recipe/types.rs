//! Recipe Data Types
//!
//! The typed view of a recipe document plus the classification variant
//! produced by the normalizer. Recipes are immutable once read; this system
//! only dereferences them for identifiers.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Result of classifying one recipe input.
///
/// Produced once by [`classify`](super::classify); downstream code matches on
/// this instead of re-inspecting raw JSON shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    /// A locator whose content must be fetched.
    Uri(String),
    /// Recipe content already materialized as a JSON object.
    Inline(Value),
    /// Anything else; recorded as a per-item failure by callers.
    Invalid,
}

/// Top-level recipe document: `{"recipe": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeDocument {
    pub recipe: Recipe,
}

/// The book object described by a recipe. Unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Recipe {
    /// Identifier of the top-level logical object (the book).
    pub uuid: String,
    /// Ordered page descriptors.
    #[serde(default)]
    pub pages: Vec<Page>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub uuid: String,
}

#[derive(Debug, Error)]
pub enum RecipeError {
    /// The locator answered with a non-success status.
    #[error("Server status {status}")]
    Fetch { status: u16 },
    /// The locator could not be reached at all.
    #[error("could not reach recipe locator: {0}")]
    Transport(#[from] reqwest::Error),
    /// The dereferenced content is not a well-formed recipe document.
    #[error("Invalid recipe: {0}")]
    InvalidRecipe(String),
    /// The body was not valid JSON.
    #[error("recipe content is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
