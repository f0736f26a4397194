use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Unique identifier for a job.
///
/// Wrapper around a UUID string so callers can poll for status after the
/// submission response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct JobId(pub String);

impl JobId {
    /// Generates a new random UUID v4-based JobId.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

/// Represents the lifecycle state of a job in the queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum JobStatus {
    /// Job has been submitted but not yet picked up by any worker.
    Pending,
    /// Job is currently being processed by a worker.
    Running,
    /// Job finished successfully.
    Completed,
    /// Job execution returned an `Err`.
    Failed { error: String },
    /// Job never ran because an earlier stage of its chain failed.
    Skipped,
}

impl JobStatus {
    /// A terminal status never changes again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending | JobStatus::Running)
    }
}

/// The definition of a unit of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// The name of the registered handler to invoke (e.g., "ingest_recipe").
    pub handler: String,
    /// Arbitrary JSON payload passed to the handler function.
    pub payload: Value,
}

/// The internal representation of a job stored within the `LocalQueue`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEntry {
    /// The actual work definition.
    pub job: Job,
    /// Current execution status.
    pub status: JobStatus,
    /// Timestamp (ms) when the job was submitted.
    pub created_at: u64,
    /// Timestamp (ms) when the job reached a terminal status. Terminal
    /// entries older than the retention window are swept from the queue.
    pub finished_at: Option<u64>,
    /// Handler output, present once the job has completed.
    pub result: Option<Value>,
    /// The next stage of this job's chain, if any.
    pub next: Option<JobId>,
    /// Held jobs are invisible to workers until their predecessor completes.
    pub held: bool,
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
