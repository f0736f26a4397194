//! Job handlers and payload contracts.
//!
//! Every handler takes its full input from the job payload and returns a JSON
//! result for the status endpoint. The `WorkerContext` bundles the clients a
//! handler may need; handlers never read ambient process state.

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::catalog::CatalogClient;
use crate::ingest::{default_namespace, IngestExecutor, OneOrMany};
use crate::queue::{Job, JobRegistry, LocalQueue};
use crate::verify::{CheckStrategy, ManipOp, Verifier};

use super::locator::{parse_locator, WorkflowError};

pub const INGEST_RECIPE: &str = "ingest_recipe";
pub const INGEST_STATUS: &str = "ingest_status";
pub const UPDATE_CATALOG: &str = "update_catalog";
pub const INGEST_AND_VERIFY: &str = "ingest_and_verify";
pub const OBJECT_EXISTS: &str = "object_exists";
pub const VERIFY_INDEX_UP: &str = "verify_index_up";
pub const READ_ITEM: &str = "read_item";
pub const DELETE_ITEM: &str = "delete_item";

fn default_collection() -> String {
    "oku:hos".to_string()
}

fn default_ingested() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestRecipePayload {
    /// One recipe reference or a sequence of them.
    pub recipes: OneOrMany,
    #[serde(default = "default_collection")]
    pub collection: String,
    pub pid_namespace: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestStatusPayload {
    pub recipe_url: String,
    pub namespace: String,
    #[serde(default)]
    pub method: CheckStrategy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateCatalogPayload {
    pub bag: String,
    pub paramstring: String,
    pub collection: String,
    #[serde(default = "default_ingested")]
    pub ingested: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ObjectExistsPayload {
    pub object_id: String,
    pub namespace: String,
    #[serde(default)]
    pub method: CheckStrategy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemPayload {
    pub object_id: String,
    pub namespace: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IngestAndVerifyPayload {
    pub recipe_url: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    pub pid_namespace: Option<String>,
}

/// Builds the three-stage ingest chain for a recipe URL.
///
/// Each stage gets its own frozen payload; no stage depends on another's
/// output, so any stage can be replayed from its payload alone.
pub fn build_ingest_chain(
    recipe_url: &str,
    collection: &str,
    pid_namespace: Option<&str>,
) -> Result<Vec<Job>, WorkflowError> {
    let locator = parse_locator(recipe_url)?;
    let namespace = match pid_namespace {
        Some(namespace) => namespace.to_string(),
        None => default_namespace(collection),
    };

    Ok(vec![
        Job {
            handler: INGEST_RECIPE.to_string(),
            payload: serde_json::to_value(IngestRecipePayload {
                recipes: OneOrMany::One(json!(recipe_url)),
                collection: collection.to_string(),
                pid_namespace: Some(namespace.clone()),
            })?,
        },
        Job {
            handler: INGEST_STATUS.to_string(),
            payload: serde_json::to_value(IngestStatusPayload {
                recipe_url: recipe_url.to_string(),
                namespace,
                method: CheckStrategy::default(),
            })?,
        },
        Job {
            handler: UPDATE_CATALOG.to_string(),
            payload: serde_json::to_value(UpdateCatalogPayload {
                bag: locator.bag,
                paramstring: locator.paramstring,
                collection: collection.to_string(),
                ingested: true,
            })?,
        },
    ])
}

/// Everything a job handler may need, built once at startup.
pub struct WorkerContext {
    pub executor: IngestExecutor,
    pub verifier: Verifier,
    pub catalog: CatalogClient,
    pub queue: Arc<LocalQueue>,
}

/// Registers every automation handler on the given registry.
pub fn register_handlers(registry: &JobRegistry, context: Arc<WorkerContext>) {
    let ctx = context.clone();
    registry.register(INGEST_RECIPE, move |payload| {
        let ctx = ctx.clone();
        async move { ingest_recipe(ctx, payload).await }
    });

    let ctx = context.clone();
    registry.register(INGEST_STATUS, move |payload| {
        let ctx = ctx.clone();
        async move { ingest_status(ctx, payload).await }
    });

    let ctx = context.clone();
    registry.register(UPDATE_CATALOG, move |payload| {
        let ctx = ctx.clone();
        async move { update_catalog(ctx, payload).await }
    });

    let ctx = context.clone();
    registry.register(INGEST_AND_VERIFY, move |payload| {
        let ctx = ctx.clone();
        async move { ingest_and_verify(ctx, payload).await }
    });

    let ctx = context.clone();
    registry.register(OBJECT_EXISTS, move |payload| {
        let ctx = ctx.clone();
        async move { object_exists(ctx, payload).await }
    });

    let ctx = context.clone();
    registry.register(VERIFY_INDEX_UP, move |payload| {
        let ctx = ctx.clone();
        async move { verify_index_up(ctx, payload).await }
    });

    let ctx = context.clone();
    registry.register(READ_ITEM, move |payload| {
        let ctx = ctx.clone();
        async move { manipulate(ctx, payload, ManipOp::Read).await }
    });

    let ctx = context;
    registry.register(DELETE_ITEM, move |payload| {
        let ctx = ctx.clone();
        async move { manipulate(ctx, payload, ManipOp::Delete).await }
    });
}

async fn ingest_recipe(ctx: Arc<WorkerContext>, payload: Value) -> Result<Value> {
    let request: IngestRecipePayload = serde_json::from_value(payload)?;
    let outcome = ctx
        .executor
        .ingest_batch(
            request.recipes.into_vec(),
            &request.collection,
            request.pid_namespace.as_deref(),
        )
        .await?;
    Ok(serde_json::to_value(outcome)?)
}

async fn ingest_status(ctx: Arc<WorkerContext>, payload: Value) -> Result<Value> {
    let request: IngestStatusPayload = serde_json::from_value(payload)?;
    let status = ctx
        .verifier
        .check_ingest_status(&request.recipe_url, &request.namespace, request.method)
        .await?;
    Ok(serde_json::to_value(status)?)
}

async fn update_catalog(ctx: Arc<WorkerContext>, payload: Value) -> Result<Value> {
    let request: UpdateCatalogPayload = serde_json::from_value(payload)?;
    let updated = ctx
        .catalog
        .update_catalog(
            &request.bag,
            &request.paramstring,
            &request.collection,
            request.ingested,
        )
        .await?;
    Ok(json!({ "updated": updated }))
}

/// Kicks off the full ingest-verify-catalog chain and returns immediately.
async fn ingest_and_verify(ctx: Arc<WorkerContext>, payload: Value) -> Result<Value> {
    let request: IngestAndVerifyPayload = serde_json::from_value(payload)?;
    let stages = build_ingest_chain(
        &request.recipe_url,
        &request.collection,
        request.pid_namespace.as_deref(),
    )?;
    let chain_id = ctx
        .queue
        .submit_chain(stages)
        .ok_or_else(|| anyhow::anyhow!("empty ingest chain"))?;

    tracing::info!("submitted ingest chain {} for {}", chain_id.0, request.recipe_url);
    Ok(json!({
        "message": "Kicked off tasks to ingest recipe and verify ingest",
        "chain_id": chain_id,
    }))
}

async fn object_exists(ctx: Arc<WorkerContext>, payload: Value) -> Result<Value> {
    let request: ObjectExistsPayload = serde_json::from_value(payload)?;
    let exists = ctx
        .verifier
        .object_exists(&request.object_id, &request.namespace, request.method)
        .await?;
    Ok(json!(exists))
}

async fn verify_index_up(ctx: Arc<WorkerContext>, _payload: Value) -> Result<Value> {
    Ok(json!(ctx.verifier.index_available().await))
}

async fn manipulate(ctx: Arc<WorkerContext>, payload: Value, operation: ManipOp) -> Result<Value> {
    let request: ItemPayload = serde_json::from_value(payload)?;
    let output = ctx
        .verifier
        .manipulate_item(&request.object_id, &request.namespace, operation)
        .await?;
    Ok(json!({ "output": output }))
}
