//! Existence checks and recipe status polling.

use std::collections::HashMap;

use crate::config::Config;
use crate::recipe::RecipeDocument;

use super::manipulate::ManipOp;
use super::types::{CheckStrategy, ExistenceStatus, IndexResponse, VerifyError};

/// Answers existence queries against the repository.
pub struct Verifier {
    pub(super) config: Config,
    pub(super) client: reqwest::Client,
}

impl Verifier {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// True iff the object identified by `namespace:object_id` is present.
    pub async fn object_exists(
        &self,
        object_id: &str,
        namespace: &str,
        strategy: CheckStrategy,
    ) -> Result<bool, VerifyError> {
        match strategy {
            CheckStrategy::Index => self.exists_in_index(object_id, namespace).await,
            CheckStrategy::Direct => {
                let output = self.manipulate_item(object_id, namespace, ManipOp::Read).await?;
                Ok(!output.trim().is_empty())
            }
        }
    }

    async fn exists_in_index(
        &self,
        object_id: &str,
        namespace: &str,
    ) -> Result<bool, VerifyError> {
        let url = format!("{}/select", self.config.index_base);
        let query = format!("PID:\"{namespace}:{object_id}\"");
        let data: IndexResponse = self
            .client
            .get(&url)
            .query(&[("q", query.as_str()), ("fl", "numFound"), ("wt", "json")])
            .send()
            .await?
            .json()
            .await?;

        Ok(data.response.num_found >= 1)
    }

    /// Health probe: the index service is up iff its base endpoint answers
    /// with a success status.
    pub async fn index_available(&self) -> bool {
        match self.client.get(&self.config.index_base).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                tracing::error!("error verifying the index is running: {err}");
                false
            }
        }
    }

    /// Polls the repository for every object named by the recipe at
    /// `recipe_url`.
    ///
    /// The book object is checked first; when it is absent the status
    /// short-circuits to a failure with no per-page detail. Otherwise every
    /// page is attempted, regardless of earlier misses, and `successful_load`
    /// is the AND over all page flags. A recipe with zero pages counts as
    /// loaded once the book exists.
    pub async fn check_ingest_status(
        &self,
        recipe_url: &str,
        namespace: &str,
        strategy: CheckStrategy,
    ) -> Result<ExistenceStatus, VerifyError> {
        let response = self
            .client
            .get(recipe_url)
            .send()
            .await
            .map_err(|_| VerifyError::Fetch(recipe_url.to_string()))?;
        let text = response
            .text()
            .await
            .map_err(|_| VerifyError::Fetch(recipe_url.to_string()))?;
        let document: RecipeDocument =
            serde_json::from_str(&text).map_err(|source| VerifyError::Parse {
                url: recipe_url.to_string(),
                source,
            })?;

        let book = document.recipe.uuid;
        if !self.object_exists(&book, namespace, strategy).await? {
            tracing::warn!("book {book} not found in repository");
            return Ok(ExistenceStatus {
                error: Some(format!("Book not loaded. Book's UUID not found: {book}")),
                book,
                page_status: None,
                successful_load: false,
            });
        }

        let mut page_status = HashMap::new();
        for page in &document.recipe.pages {
            let present = self.object_exists(&page.uuid, namespace, strategy).await?;
            page_status.insert(page.uuid.clone(), present);
        }

        let successful_load = page_status.values().all(|present| *present);
        Ok(ExistenceStatus {
            book,
            page_status: Some(page_status),
            successful_load,
            error: None,
        })
    }
}
