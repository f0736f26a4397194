//! Repository Ingest Worker Library
//!
//! This library crate defines the components of a task-queue-based automation
//! layer that imports digital-object "recipes" (JSON descriptors of books and
//! their pages) into a digital-repository platform, verifies the imported
//! objects exist, and records ingest status in an external data catalog.
//!
//! ## Architecture Modules
//! The system is composed of loosely coupled subsystems:
//!
//! - **`recipe`**: Input normalization. Classifies heterogeneous recipe inputs
//!   into a tagged reference (URI vs. inline object) and resolves locators.
//! - **`workdir`**: Scoped working directories. One isolated temp directory
//!   per ingest attempt, removed on every exit path.
//! - **`ingest`**: The ingest executor. Drives the external ingestion tool
//!   once per recipe and aggregates per-item outcomes across a batch.
//! - **`verify`**: Existence verification. Confirms ingested objects are
//!   present via the search index or a direct tool query.
//! - **`catalog`**: Catalog synchronization. Merges ingest status into the
//!   external data catalog's record for a batch, with bounded retry.
//! - **`workflow`**: The ingest -> verify -> catalog-update chain, with each
//!   stage's arguments frozen at submission time.
//! - **`queue`**: The local task-queue runtime: job registry, worker pool,
//!   and the HTTP submission API.
//! - **`config`**: The explicit configuration surface passed into components.

pub mod catalog;
pub mod config;
pub mod ingest;
pub mod queue;
pub mod recipe;
pub mod verify;
pub mod workdir;
pub mod workflow;
