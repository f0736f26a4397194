//! Job Handler Registry
//!
//! A dynamic registry that maps string-based job names (e.g., "ingest_recipe")
//! to executable Rust closures. This keeps the queue generic: the workflow
//! layer wires in the actual automation logic at startup.

use anyhow::Result;
use dashmap::DashMap;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a thread-safe, asynchronous job handler function.
/// It takes the job payload and returns a Future that resolves to the job's
/// JSON result.
pub type JobHandlerFn =
    Arc<dyn Fn(Value) -> Pin<Box<dyn Future<Output = Result<Value>> + Send>> + Send + Sync>;

/// Registry holding the mapping between job names and their implementation.
pub struct JobRegistry {
    handlers: DashMap<String, JobHandlerFn>,
}

impl JobRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            handlers: DashMap::new(),
        })
    }

    /// Registers a new handler function under a specific name.
    pub fn register<F, Fut>(&self, handler_name: &str, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        // Box::pin type-erases the concrete Future so different async
        // functions can live in the same map.
        let handler_fn: JobHandlerFn = Arc::new(move |payload: Value| {
            Box::pin(handler(payload)) as Pin<Box<dyn Future<Output = Result<Value>> + Send>>
        });

        self.handlers.insert(handler_name.to_string(), handler_fn);

        tracing::info!("Registered job handler: {}", handler_name);
    }

    /// Looks up a handler by name and executes it with the provided payload.
    ///
    /// # Returns
    /// * `Ok(result)` if the handler executed successfully.
    /// * `Err` if the handler failed or if no handler exists for the name.
    pub async fn execute(&self, handler: &str, payload: Value) -> Result<Value> {
        let handler_fn = match self.handlers.get(handler) {
            Some(entry) => entry.value().clone(),
            None => {
                let error = format!("Unknown job handler: {}", handler);
                tracing::error!("{}", error);
                return Err(anyhow::anyhow!(error));
            }
        };
        // The map guard is dropped before the await so registration calls
        // cannot deadlock against a long-running handler.

        tracing::debug!(
            "Executing job with handler '{}' (payload size: {} bytes)",
            handler,
            payload.to_string().len()
        );

        handler_fn(payload).await
    }

    /// Returns a list of all registered handler names.
    pub fn list_handlers(&self) -> Vec<String> {
        self.handlers
            .iter()
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Checks if a handler is registered.
    pub fn has_handler(&self, handler_name: &str) -> bool {
        self.handlers.contains_key(handler_name)
    }

    /// Returns the total number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }
}
