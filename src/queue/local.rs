//! Local Job Queue
//!
//! The in-memory data structure behind the worker pool. Jobs live in a
//! concurrent map keyed by `JobId`; chained jobs additionally carry a `next`
//! pointer and a `held` flag.
//!
//! ## Responsibilities
//! - **State**: tracking each job's lifecycle from `Pending` to a terminal
//!   status.
//! - **Claiming**: atomic `Pending` -> `Running` transitions so exactly one
//!   worker executes each job.
//! - **Chaining**: releasing the next stage on success, skipping every
//!   remaining stage on failure.

use super::types::{now_ms, Job, JobEntry, JobId, JobStatus};

use anyhow::Result;
use dashmap::DashMap;
use serde_json::Value;

/// The central component managing job state for this process.
pub struct LocalQueue {
    jobs: DashMap<JobId, JobEntry>,
}

impl LocalQueue {
    pub fn new() -> Self {
        Self {
            jobs: DashMap::new(),
        }
    }

    /// Submits a single standalone job.
    pub fn submit(&self, job: Job) -> JobId {
        let job_id = JobId::new();
        tracing::debug!("Queued job {} (handler: {})", job_id.0, job.handler);
        self.jobs.insert(
            job_id.clone(),
            JobEntry {
                job,
                status: JobStatus::Pending,
                created_at: now_ms(),
                finished_at: None,
                result: None,
                next: None,
                held: false,
            },
        );
        job_id
    }

    /// Submits a sequence of jobs to run one after another.
    ///
    /// Only the first stage is immediately claimable; each later stage stays
    /// held until its predecessor completes. Returns the id of the first
    /// stage, or `None` for an empty chain.
    pub fn submit_chain(&self, stages: Vec<Job>) -> Option<JobId> {
        let ids: Vec<JobId> = stages.iter().map(|_| JobId::new()).collect();

        for (position, job) in stages.into_iter().enumerate() {
            let next = ids.get(position + 1).cloned();
            self.jobs.insert(
                ids[position].clone(),
                JobEntry {
                    job,
                    status: JobStatus::Pending,
                    created_at: now_ms(),
                    finished_at: None,
                    result: None,
                    next,
                    held: position > 0,
                },
            );
        }

        let first = ids.into_iter().next();
        if let Some(id) = &first {
            tracing::info!("Queued job chain starting at {}", id.0);
        }
        first
    }

    /// Jobs currently eligible for execution: `Pending` and not held.
    pub fn claimable(&self) -> Vec<(JobId, Job)> {
        self.jobs
            .iter()
            .filter(|entry| entry.status == JobStatus::Pending && !entry.held)
            .map(|entry| (entry.key().clone(), entry.job.clone()))
            .collect()
    }

    /// Attempts to lock a pending job for execution by a worker.
    ///
    /// Returns `false` when another worker raced us to it.
    pub fn try_claim(&self, job_id: &JobId) -> bool {
        if let Some(mut entry) = self.jobs.get_mut(job_id) {
            if entry.status != JobStatus::Pending || entry.held {
                return false;
            }
            entry.status = JobStatus::Running;
            tracing::debug!("Claimed job {}", job_id.0);
            return true;
        }
        false
    }

    /// Marks a job as either `Completed` or `Failed` and advances its chain.
    ///
    /// On success the next stage (if any) is released for claiming. On
    /// failure every remaining stage of the chain is marked `Skipped`.
    pub fn complete(&self, job_id: &JobId, result: Result<Value>) -> Result<()> {
        let follow_up = {
            let mut entry = self
                .jobs
                .get_mut(job_id)
                .ok_or_else(|| anyhow::anyhow!("Job not found: {}", job_id.0))?;

            match result {
                Ok(value) => {
                    entry.status = JobStatus::Completed;
                    entry.result = Some(value);
                    entry.finished_at = Some(now_ms());
                    tracing::info!("Job {} completed", job_id.0);
                    FollowUp::Release(entry.next.clone())
                }
                Err(e) => {
                    entry.status = JobStatus::Failed {
                        error: e.to_string(),
                    };
                    entry.finished_at = Some(now_ms());
                    tracing::error!("Job {} failed: {}", job_id.0, e);
                    FollowUp::Skip(entry.next.clone())
                }
            }
        };
        // The entry guard is dropped here; the follow-up touches other keys.

        match follow_up {
            FollowUp::Release(Some(next)) => {
                if let Some(mut entry) = self.jobs.get_mut(&next) {
                    entry.held = false;
                    tracing::debug!("Released chained job {}", next.0);
                }
            }
            FollowUp::Skip(next) => self.skip_chain(next),
            FollowUp::Release(None) => {}
        }

        Ok(())
    }

    /// Walks the remainder of a chain, marking every stage `Skipped`.
    fn skip_chain(&self, mut cursor: Option<JobId>) {
        while let Some(job_id) = cursor {
            cursor = match self.jobs.get_mut(&job_id) {
                Some(mut entry) => {
                    entry.status = JobStatus::Skipped;
                    entry.finished_at = Some(now_ms());
                    tracing::info!("Skipped chained job {}", job_id.0);
                    entry.next.clone()
                }
                None => None,
            };
        }
    }

    /// Evicts terminal entries older than `retention_ms`, so the job map
    /// stays bounded on a long-running worker. Pending and running jobs are
    /// never touched; recently finished jobs stay queryable for the full
    /// retention window.
    pub fn sweep_terminal(&self, retention_ms: u64) -> usize {
        let cutoff = now_ms().saturating_sub(retention_ms);
        let before = self.jobs.len();
        self.jobs.retain(|_, entry| {
            !(entry.status.is_terminal()
                && entry.finished_at.is_some_and(|finished| finished <= cutoff))
        });
        let swept = before - self.jobs.len();
        if swept > 0 {
            tracing::debug!("swept {} finished jobs from the queue", swept);
        }
        swept
    }

    /// Retrieves a job's current state.
    pub fn status(&self, job_id: &JobId) -> Option<JobEntry> {
        self.jobs.get(job_id).map(|entry| entry.clone())
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }
}

impl Default for LocalQueue {
    fn default() -> Self {
        Self::new()
    }
}

enum FollowUp {
    Release(Option<JobId>),
    Skip(Option<JobId>),
}
