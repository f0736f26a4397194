//! Recipe Normalization
//!
//! Recipe inputs arrive in heterogeneous shapes: a locator string pointing at
//! a JSON document, an already-materialized JSON object, or a JSON-encoded
//! string. This module classifies an input exactly once into a tagged variant
//! so downstream components pattern-match instead of re-inspecting raw shape.
//!
//! ## Workflow
//! 1. **Classify**: decide whether an input is a URI, an inline recipe, or
//!    invalid. Pure, deterministic, no I/O.
//! 2. **Resolve**: fetch a URI's content and re-validate it is a well-formed
//!    recipe document.
//! 3. **Extract**: read the typed book/page view out of a recipe document.

pub mod normalize;
pub mod types;

pub use normalize::{classify, resolve};
pub use types::{Classification, Page, Recipe, RecipeDocument, RecipeError};

#[cfg(test)]
mod tests;
