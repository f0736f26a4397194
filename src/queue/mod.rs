//! Job Queue Module
//!
//! An in-process, pull-based job execution engine for asynchronous background
//! work. Producers submit jobs over HTTP; a pool of workers polls the queue,
//! claims jobs, and runs the registered handler for each.
//!
//! ## Architecture Overview
//! 1. **Submission**: Jobs land in the `LocalQueue` as `Pending`. A chain
//!    submission links its stages with `next` pointers and holds every stage
//!    except the first.
//! 2. **Claiming**: Workers atomically flip a job from `Pending` to `Running`
//!    so no two workers execute the same job.
//! 3. **Execution**: The `JobRegistry` maps handler names (e.g.
//!    "ingest_recipe") to async closures. Handler output is stored on the job
//!    entry as its result.
//! 4. **Chaining**: Completing a stage releases the next one. A failing stage
//!    marks every remaining stage `Skipped`.
//!
//! ## Submodules
//! - **`local`**: The queue data structure managing job state and chains.
//! - **`runner`**: The worker pool driving the claim -> run -> complete cycle.
//! - **`registry`**: Maps string identifiers to executable Rust code.
//! - **`api`**: HTTP contracts and handlers for submission and status.

pub mod api;
pub mod local;
pub mod registry;
pub mod runner;
pub mod types;

pub use local::LocalQueue;
pub use registry::{JobHandlerFn, JobRegistry};
pub use runner::JobRunner;
pub use types::{Job, JobEntry, JobId, JobStatus};
