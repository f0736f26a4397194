//! Catalog Synchronization Module
//!
//! Records ingest status in the external data catalog.
//!
//! ## Workflow
//! 1. **Lookup**: fetch the catalog record for a batch (bag) by name. The
//!    record is fetched fresh on every update call; nothing is cached.
//! 2. **Merge**: write the derivative tag, collection, ingest flag, and a UTC
//!    timestamp into the record's `application.islandora` sub-object, leaving
//!    every other field untouched.
//! 3. **Persist**: POST the full record back with the configured credential,
//!    retrying transient failures with a fixed delay and bounded attempts.
//!
//! A bag without a catalog entry is an expected outcome, not an error: the
//! update reports absence and performs no write.

pub mod client;
pub mod types;

pub use client::{merge_ingest_status, CatalogClient};
pub use types::{CatalogError, CatalogQueryResponse};

#[cfg(test)]
mod tests;
