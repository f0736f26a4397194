//! HTTP API for the job queue.
//!
//! Request/response contracts plus the axum handlers for submission, status
//! polling, and health.

use super::local::LocalQueue;
use super::registry::JobRegistry;
use super::types::{Job, JobId, JobStatus};

use axum::{extract::Path, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitJobRequest {
    pub job: Job,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitJobResponse {
    pub job_id: JobId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    pub created_at: u64,
    pub result: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub job_count: usize,
    pub handlers: Vec<String>,
}

/// Accepts a job for asynchronous execution.
///
/// Submissions naming an unregistered handler are rejected up front instead
/// of being queued to fail later.
pub async fn handle_submit_job(
    Extension(queue): Extension<Arc<LocalQueue>>,
    Extension(registry): Extension<Arc<JobRegistry>>,
    Json(req): Json<SubmitJobRequest>,
) -> (StatusCode, Json<Option<SubmitJobResponse>>) {
    if !registry.has_handler(&req.job.handler) {
        tracing::warn!("Rejected job with unknown handler: {}", req.job.handler);
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(None));
    }

    let job_id = queue.submit(req.job);
    tracing::info!("Job submitted successfully: {}", job_id.0);
    (
        StatusCode::ACCEPTED,
        Json(Some(SubmitJobResponse { job_id })),
    )
}

pub async fn handle_job_status(
    Extension(queue): Extension<Arc<LocalQueue>>,
    Path(job_id_str): Path<String>,
) -> (StatusCode, Json<Option<JobStatusResponse>>) {
    let job_id = JobId(job_id_str);

    match queue.status(&job_id) {
        Some(entry) => {
            tracing::debug!("Job status query: {} -> {:?}", job_id.0, entry.status);
            (
                StatusCode::OK,
                Json(Some(JobStatusResponse {
                    job_id,
                    status: entry.status,
                    created_at: entry.created_at,
                    result: entry.result,
                })),
            )
        }
        None => {
            tracing::debug!("Job not found: {}", job_id.0);
            (StatusCode::NOT_FOUND, Json(None))
        }
    }
}

pub async fn handle_health(
    Extension(queue): Extension<Arc<LocalQueue>>,
    Extension(registry): Extension<Arc<JobRegistry>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        job_count: queue.job_count(),
        handlers: registry.list_handlers(),
    })
}
