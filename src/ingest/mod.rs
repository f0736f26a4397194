//! Ingest Executor Module
//!
//! Drives the external ingestion tool once per recipe reference and
//! aggregates per-item outcomes across a batch.
//!
//! ## Workflow
//! 1. **Normalize**: classify the reference; invalid inputs fail per-item
//!    before any resource is allocated.
//! 2. **Stage**: acquire an isolated working directory; inline recipes are
//!    serialized into it, locators are passed through to the tool.
//! 3. **Execute**: invoke the tool as an argument vector (never a shell
//!    string) and capture its output for diagnostics.
//! 4. **Aggregate**: one recipe's failure never aborts the rest of the batch;
//!    the caller always receives the complete per-item picture.

pub mod executor;
pub mod types;

pub use executor::IngestExecutor;
pub use types::{default_namespace, BatchOutcome, IngestError, OneOrMany, RECIPE_FILENAME};
