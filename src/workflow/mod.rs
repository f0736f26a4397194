//! Workflow Module
//!
//! Wires the automation pieces to the job queue. This is the layer a caller
//! actually talks to: it owns the handler names, the payload contracts, and
//! the three-stage ingest chain.
//!
//! ## Workflow
//! 1. **Kick-off**: `ingest_and_verify` derives the batch (bag) name and
//!    derivative parameter string from the recipe URL, freezes one payload per
//!    stage, and submits the chain. The response carries the chain id; the
//!    work itself runs in the background.
//! 2. **Stages**: ingest the recipe, verify every named object exists, record
//!    the outcome in the catalog. No stage consumes a prior stage's return
//!    value, so each can be retried or replayed from its own payload alone.
//! 3. **Ad-hoc jobs**: existence checks, index health probes, and item
//!    read/delete are exposed as standalone handlers for operators.

pub mod handlers;
pub mod locator;

pub use handlers::{register_handlers, WorkerContext};
pub use locator::{parse_locator, BagLocator, WorkflowError};
