//! Catalog lookups and status updates.

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header;
use serde_json::{json, Map, Value};

use crate::config::Config;

use super::types::{CatalogError, CatalogQueryResponse};

/// Client for the external data catalog.
pub struct CatalogClient {
    config: Config,
    client: reqwest::Client,
}

impl CatalogClient {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Returns the first catalog record matching `bag`, if any.
    pub async fn search_catalog(&self, bag: &str) -> Result<Option<Value>, CatalogError> {
        let query = json!({"filter": {"bag": bag}}).to_string();
        let data: CatalogQueryResponse = self
            .client
            .get(&self.config.catalog_base)
            .query(&[("query", query.as_str())])
            .send()
            .await?
            .json()
            .await?;

        if data.count >= 1 {
            Ok(data.results.into_iter().next())
        } else {
            Ok(None)
        }
    }

    /// Merges ingest status into the bag's catalog record and persists it.
    ///
    /// Returns `Ok(false)` without mutation when the bag has no catalog
    /// entry. On transport or non-2xx failure the whole operation is retried
    /// with a fixed delay: each attempt re-fetches the record and merges into
    /// that fresh copy, so a retry never re-POSTs a stale snapshot over
    /// writes that landed in the meantime. Exhaustion surfaces as an error
    /// for the task runtime to dispose of. Bounded: one initial attempt plus
    /// `catalog_max_retries` retries.
    pub async fn update_catalog(
        &self,
        bag: &str,
        paramstring: &str,
        collection: &str,
        ingested: bool,
    ) -> Result<bool, CatalogError> {
        let attempts = self.config.catalog_max_retries + 1;

        for attempt in 1..=attempts {
            match self.try_update(bag, paramstring, collection, ingested).await {
                Ok(true) => {
                    tracing::info!("recorded ingest status for bag {bag} in catalog");
                    return Ok(true);
                }
                Ok(false) => {
                    tracing::info!("bag {bag} has no catalog entry, nothing to update");
                    return Ok(false);
                }
                Err(err) => {
                    tracing::warn!("catalog update attempt {attempt}/{attempts} failed: {err}");
                    if attempt < attempts {
                        tokio::time::sleep(self.config.catalog_retry_delay).await;
                    }
                }
            }
        }

        Err(CatalogError::RetriesExhausted(attempts))
    }

    /// One fetch-merge-POST attempt against the current catalog state.
    async fn try_update(
        &self,
        bag: &str,
        paramstring: &str,
        collection: &str,
        ingested: bool,
    ) -> Result<bool, CatalogError> {
        let Some(mut record) = self.search_catalog(bag).await? else {
            return Ok(false);
        };

        merge_ingest_status(&mut record, paramstring, collection, ingested, Utc::now());
        self.post_record(&record).await?;
        Ok(true)
    }

    async fn post_record(&self, record: &Value) -> Result<(), CatalogError> {
        let response = self
            .client
            .post(&self.config.catalog_base)
            .header(
                header::AUTHORIZATION,
                format!("Token {}", self.config.catalog_token),
            )
            .json(record)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Merges `{derivative, collection, ingested, datetime}` into the record's
/// `application.islandora` sub-object, creating intermediate containers as
/// needed. Every other field of the record is preserved. Idempotent up to the
/// timestamp.
pub fn merge_ingest_status(
    record: &mut Value,
    derivative: &str,
    collection: &str,
    ingested: bool,
    at: DateTime<Utc>,
) {
    let mut islandora = record
        .pointer("/application/islandora")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    islandora.insert("derivative".to_string(), json!(derivative));
    islandora.insert("collection".to_string(), json!(collection));
    islandora.insert("ingested".to_string(), json!(ingested));
    islandora.insert(
        "datetime".to_string(),
        json!(at.to_rfc3339_opts(SecondsFormat::Secs, true)),
    );

    let Some(top) = record.as_object_mut() else {
        return;
    };
    let application = top
        .entry("application".to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !application.is_object() {
        *application = Value::Object(Map::new());
    }
    if let Some(fields) = application.as_object_mut() {
        fields.insert("islandora".to_string(), Value::Object(islandora));
    }
}
