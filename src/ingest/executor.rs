//! Per-recipe ingest attempts and batch aggregation.

use std::path::Path;

use serde_json::Value;

use crate::config::Config;
use crate::recipe::{classify, resolve, Classification};
use crate::workdir::WorkDir;

use super::types::{default_namespace, BatchOutcome, IngestError, RECIPE_FILENAME};

/// A reference that survived classification and, for locators, validation.
enum Prepared {
    Uri(String),
    Inline(Value),
}

/// Drives the external ingest tool. One executor per worker; each attempt
/// operates on its own locals and its own working directory.
pub struct IngestExecutor {
    config: Config,
    client: reqwest::Client,
}

impl IngestExecutor {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Ingests a batch of recipe references in input order.
    ///
    /// Fails fast with [`IngestError::Configuration`] when the repository
    /// root is unset, before any item is processed. Per-item failures are
    /// aggregated into the outcome, never thrown.
    pub async fn ingest_batch(
        &self,
        items: Vec<Value>,
        collection: &str,
        pid_namespace: Option<&str>,
    ) -> Result<BatchOutcome, IngestError> {
        if self.config.drupal_root.trim().is_empty() {
            tracing::error!("missing repository root path in configuration");
            return Err(IngestError::Configuration);
        }

        let namespace = match pid_namespace {
            Some(namespace) => namespace.to_string(),
            None => default_namespace(collection),
        };

        let mut outcome = BatchOutcome::default();
        for item in items {
            tracing::debug!("ingesting: {item}");
            match self.ingest_one(&item, collection, &namespace).await {
                Ok(()) => outcome.successful.push(item),
                Err(reason) => {
                    tracing::error!("ingest failed for {item}: {reason}");
                    outcome.failures.push((item, reason));
                }
            }
        }
        Ok(outcome)
    }

    /// One idempotent ingest attempt. The returned string is the
    /// human-readable failure reason; per-item failures are data, not errors.
    async fn ingest_one(
        &self,
        item: &Value,
        collection: &str,
        namespace: &str,
    ) -> Result<(), String> {
        // Classification and locator validation happen before any resource
        // is allocated; a bad reference never creates a working directory.
        let prepared = match classify(item) {
            Classification::Uri(uri) => {
                if let Err(err) = resolve(&self.client, &uri).await {
                    return Err(err.to_string());
                }
                Prepared::Uri(uri)
            }
            Classification::Inline(body) => Prepared::Inline(body),
            Classification::Invalid => return Err("Not a valid recipe object".to_string()),
        };

        let workdir =
            WorkDir::acquire(self.config.working_group.as_deref()).map_err(|e| e.to_string())?;

        let locator = match prepared {
            Prepared::Uri(uri) => uri.trim().to_string(),
            Prepared::Inline(body) => {
                let path = workdir.path().join(RECIPE_FILENAME);
                let serialized = serde_json::to_string(&body).map_err(|e| e.to_string())?;
                std::fs::write(&path, serialized).map_err(|e| e.to_string())?;
                path.to_string_lossy().into_owned()
            }
        };

        self.run_ingest_tool(&locator, collection, namespace, workdir.path())
            .await
        // The working directory is dropped (and removed) here on every path.
    }

    async fn run_ingest_tool(
        &self,
        locator: &str,
        collection: &str,
        namespace: &str,
        tmp_dir: &Path,
    ) -> Result<(), String> {
        let tool = &self.config.ingest_tool;
        let output = tokio::process::Command::new(tool)
            .arg("-u")
            .arg("1")
            .arg(&self.config.ingest_subcommand)
            .arg(format!("--recipe_uri={locator}"))
            .arg(format!("--parent_collection={collection}"))
            .arg(format!("--pid_namespace={namespace}"))
            .arg(format!("--tmp_dir={}", tmp_dir.display()))
            .arg(format!("--root={}", self.config.drupal_root))
            .output()
            .await
            .map_err(|err| format!("failed to launch {tool}: {err}"))?;

        // Tool output is diagnostic only; the reason string carries nothing
        // beyond the exit code.
        tracing::debug!(
            stdout = %String::from_utf8_lossy(&output.stdout),
            stderr = %String::from_utf8_lossy(&output.stderr),
            "ingest tool finished"
        );

        if output.status.success() {
            Ok(())
        } else {
            let code = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            tracing::error!(
                stdout = %String::from_utf8_lossy(&output.stdout),
                stderr = %String::from_utf8_lossy(&output.stderr),
                "{tool} exited with status {code}"
            );
            Err(format!("{tool} exit status {code}"))
        }
    }
}
