//! Worker Configuration
//!
//! Every deployment-specific value is collected into an explicit [`Config`]
//! structure that is passed into components at construction time. Components
//! never read the process environment or other ambient state directly; only
//! the worker binary calls [`Config::from_env`], once, at startup.

use std::path::PathBuf;
use std::time::Duration;

/// Deployment configuration for one worker node.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root path of the repository platform installation. Required for any
    /// ingest or direct-tool operation; an empty value makes those calls
    /// fail fast before any item is processed.
    pub drupal_root: String,
    /// Fully-qualified hostname of the repository front end.
    pub repository_fqdn: String,
    /// Executable name or path of the external ingest tool.
    pub ingest_tool: String,
    /// Subcommand the ingest tool expects for recipe imports.
    pub ingest_subcommand: String,
    /// Executable name or path of the item-manipulation tool.
    pub manipulation_tool: String,
    /// Subcommand the manipulation tool expects for read/delete operations.
    pub manipulation_subcommand: String,
    /// Base URL of the search index, e.g. `http://localhost:8080/solr`.
    pub index_base: String,
    /// Endpoint of the data catalog's digital-objects collection.
    pub catalog_base: String,
    /// Credential sent as `Authorization: Token <..>` on catalog updates.
    pub catalog_token: String,
    /// Unix group that must own ingest working directories. `None` skips the
    /// ownership change (single-user deployments and tests).
    pub working_group: Option<String>,
    /// Worker log file; its last lines are attached as diagnostic context
    /// when a direct-tool invocation fails.
    pub worker_log: Option<PathBuf>,
    /// Delay between catalog update attempts.
    pub catalog_retry_delay: Duration,
    /// Retries after the first failed catalog update attempt.
    pub catalog_max_retries: usize,
}

impl Config {
    /// Builds a configuration from `RECIPEQ_*` environment variables.
    ///
    /// Unset values fall back to deployment defaults. A missing repository
    /// root is not an error here: ingest operations refuse to run without it,
    /// but verification-only workers are still usable.
    pub fn from_env() -> Self {
        fn var(name: &str) -> Option<String> {
            std::env::var(name).ok().filter(|v| !v.is_empty())
        }

        let drupal_root = var("RECIPEQ_DRUPAL_ROOT").unwrap_or_default();
        if drupal_root.is_empty() {
            tracing::warn!("RECIPEQ_DRUPAL_ROOT is not set; ingest operations will be refused");
        }

        Self {
            drupal_root,
            repository_fqdn: var("RECIPEQ_FQDN").unwrap_or_default(),
            ingest_tool: var("RECIPEQ_INGEST_TOOL").unwrap_or_else(|| "drush".to_string()),
            ingest_subcommand: var("RECIPEQ_INGEST_SUBCOMMAND")
                .unwrap_or_else(|| "oubib".to_string()),
            manipulation_tool: var("RECIPEQ_MANIPULATION_TOOL")
                .unwrap_or_else(|| "drush".to_string()),
            manipulation_subcommand: var("RECIPEQ_MANIPULATION_SUBCOMMAND")
                .unwrap_or_else(|| "iim".to_string()),
            index_base: var("RECIPEQ_INDEX_BASE")
                .unwrap_or_else(|| "http://localhost:8080/solr".to_string()),
            catalog_base: var("RECIPEQ_CATALOG_BASE").unwrap_or_else(|| {
                "https://cc.lib.ou.edu/api/catalog/data/catalog/digital_objects/.json".to_string()
            }),
            catalog_token: var("RECIPEQ_CATALOG_TOKEN").unwrap_or_default(),
            working_group: var("RECIPEQ_WORKING_GROUP"),
            worker_log: var("RECIPEQ_WORKER_LOG").map(PathBuf::from),
            catalog_retry_delay: Duration::from_secs(60),
            catalog_max_retries: 4,
        }
    }
}
