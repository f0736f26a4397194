use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use recipeq::catalog::CatalogClient;
use recipeq::config::Config;
use recipeq::ingest::IngestExecutor;
use recipeq::queue::api::{handle_health, handle_job_status, handle_submit_job};
use recipeq::queue::{JobRegistry, JobRunner, LocalQueue};
use recipeq::verify::Verifier;
use recipeq::workflow::{register_handlers, WorkerContext};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Configuration is read from the environment exactly once, here.
    let config = Config::from_env();

    let bind_addr: SocketAddr = std::env::var("RECIPEQ_BIND")
        .unwrap_or_else(|_| "127.0.0.1:7700".to_string())
        .parse()?;
    let worker_count: usize = std::env::var("RECIPEQ_WORKERS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(4);

    tracing::info!("Starting recipe worker on {}", bind_addr);

    // 1. Queue and handler registry:
    let queue = Arc::new(LocalQueue::new());
    let registry = JobRegistry::new();

    let context = Arc::new(WorkerContext {
        executor: IngestExecutor::new(config.clone()),
        verifier: Verifier::new(config.clone()),
        catalog: CatalogClient::new(config),
        queue: queue.clone(),
    });
    register_handlers(&registry, context);
    tracing::info!("{} job handlers registered", registry.handler_count());

    // 2. Worker pool:
    let runner = JobRunner::new(queue.clone(), registry.clone(), worker_count);
    runner.start().await;

    // 3. HTTP Router:
    let app = Router::new()
        .route("/task/submit", post(handle_submit_job))
        .route("/task/status/:id", get(handle_job_status))
        .route("/health", get(handle_health))
        .layer(Extension(queue))
        .layer(Extension(registry));

    tracing::info!("HTTP server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
