//! Worker Pool Implementation
//!
//! Manages the lifecycle of job execution. Spawns background workers that
//! continuously poll the `LocalQueue` for claimable jobs.
//!
//! ## Responsibilities
//! - **Polling**: continuously checking for `Pending`, unheld jobs.
//! - **Execution**: invoking the appropriate handler from the `JobRegistry`.
//! - **Completion**: recording the outcome so chains advance.
//! - **Eviction**: periodically sweeping finished jobs past their retention
//!   window so the queue stays bounded.

use super::local::LocalQueue;
use super::registry::JobRegistry;

use std::sync::Arc;
use std::time::Duration;

/// How long a finished job stays queryable before the sweeper evicts it.
const TERMINAL_RETENTION: Duration = Duration::from_secs(60 * 60);
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// The engine that drives job execution.
pub struct JobRunner {
    /// Source of claimable work.
    queue: Arc<LocalQueue>,
    /// Registry containing the actual code (closures) for jobs.
    handlers: Arc<JobRegistry>,
    /// Number of concurrent workers.
    worker_count: usize,
}

impl JobRunner {
    pub fn new(
        queue: Arc<LocalQueue>,
        handlers: Arc<JobRegistry>,
        worker_count: usize,
    ) -> Arc<Self> {
        Arc::new(Self {
            queue,
            handlers,
            worker_count,
        })
    }

    /// Spawns the workers and returns immediately.
    /// Each worker runs independently in an infinite loop.
    pub async fn start(self: Arc<Self>) {
        tracing::info!("Starting {} job workers", self.worker_count);

        for worker_id in 0..self.worker_count {
            let runner = self.clone();
            tokio::spawn(async move {
                runner.worker_loop(worker_id).await;
            });
        }

        // Sweep old terminal entries so the job map stays bounded.
        let queue = self.queue.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                queue.sweep_terminal(TERMINAL_RETENTION.as_millis() as u64);
            }
        });

        tracing::info!("Job runner started with {} workers", self.worker_count);
    }

    /// The main loop for a single worker.
    ///
    /// 1. Fetches claimable jobs from the queue.
    /// 2. Attempts to "claim" one (atomic state change).
    /// 3. If claimed, executes the handler and records the outcome.
    async fn worker_loop(&self, worker_id: usize) {
        tracing::info!("Worker {} started", worker_id);

        loop {
            let jobs = self.queue.claimable();

            if jobs.is_empty() {
                // Sleep if no work to avoid busy-waiting
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            }

            tracing::trace!("Worker {} found {} claimable jobs", worker_id, jobs.len());

            let mut claimed = false;
            for (job_id, job) in jobs {
                if !self.queue.try_claim(&job_id) {
                    tracing::trace!("Job {} already claimed by another worker", job_id.0);
                    continue;
                }

                tracing::info!(
                    "Worker {} claimed job {} (handler: {})",
                    worker_id,
                    job_id.0,
                    job.handler
                );

                let result = self.handlers.execute(&job.handler, job.payload).await;

                if let Err(e) = self.queue.complete(&job_id, result) {
                    tracing::error!("Failed to complete job {}: {}", job_id.0, e);
                }

                claimed = true;
                break; // Refresh the job list before claiming again
            }

            // If we didn't successfully claim anything in the list, wait briefly
            if !claimed {
                tokio::time::sleep(Duration::from_millis(50)).await;
            }
        }
    }
}
