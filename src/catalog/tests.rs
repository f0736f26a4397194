//! Catalog Module Tests
//!
//! An in-process HTTP stub stands in for the catalog service, recording every
//! POST so merge behavior, credentials, and the retry policy can be asserted.
//!
//! ## Test Scopes
//! - **Search**: found / not-found envelope handling.
//! - **Merge**: sub-object creation, field preservation, idempotence.
//! - **Update**: absent-record no-op, credentialed persistence, bounded retry.

#[cfg(test)]
mod tests {
    use crate::catalog::{merge_ingest_status, CatalogClient, CatalogError};
    use crate::config::Config;

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn test_config(catalog_base: &str, max_retries: usize) -> Config {
        Config {
            drupal_root: "/var/www/repository".to_string(),
            repository_fqdn: "repo.example.edu".to_string(),
            ingest_tool: "true".to_string(),
            ingest_subcommand: "oubib".to_string(),
            manipulation_tool: "true".to_string(),
            manipulation_subcommand: "iim".to_string(),
            index_base: "http://127.0.0.1:1/solr".to_string(),
            catalog_base: catalog_base.to_string(),
            catalog_token: "secret".to_string(),
            working_group: None,
            worker_log: None,
            catalog_retry_delay: Duration::from_millis(5),
            catalog_max_retries: max_retries,
        }
    }

    /// A catalog record as the real service returns it, with fields this
    /// system must never touch.
    fn tyler_record() -> Value {
        json!({
            "_id": "testid",
            "bag": "Tyler_2019",
            "project": "fake_bag",
            "application": {
                "islandora": {
                    "datetime": "",
                    "derivative": "jpeg_040_antialias",
                    "ingested": false
                }
            },
            "locations": {
                "norfile": {"exists": true, "valid": true}
            }
        })
    }

    struct CatalogState {
        /// Successive search responses; the last one repeats. Empty means the
        /// bag has no catalog entry.
        records: Vec<Value>,
        searches: AtomicUsize,
        posts: Mutex<Vec<(Option<String>, Value)>>,
        reject_posts: AtomicUsize,
    }

    async fn handle_search(State(state): State<Arc<CatalogState>>) -> Json<Value> {
        let nth = state.searches.fetch_add(1, Ordering::SeqCst);
        if state.records.is_empty() {
            return Json(json!({"count": 0, "results": []}));
        }
        let record = &state.records[nth.min(state.records.len() - 1)];
        Json(json!({"count": 1, "results": [record]}))
    }

    async fn handle_post(
        State(state): State<Arc<CatalogState>>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> StatusCode {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        state.posts.lock().unwrap().push((auth, body));

        if state.reject_posts.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
            n.checked_sub(1)
        })
        .is_ok()
        {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::OK
        }
    }

    async fn spawn_catalog(records: Vec<Value>, reject_posts: usize) -> (String, Arc<CatalogState>) {
        let state = Arc::new(CatalogState {
            records,
            searches: AtomicUsize::new(0),
            posts: Mutex::new(Vec::new()),
            reject_posts: AtomicUsize::new(reject_posts),
        });
        let app = Router::new()
            .route("/catalog", get(handle_search).post(handle_post))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/catalog"), state)
    }

    // ============================================================
    // TEST 1: Search
    // ============================================================

    #[tokio::test]
    async fn search_returns_first_matching_record() {
        let (base, _state) = spawn_catalog(vec![tyler_record()], 0).await;
        let client = CatalogClient::new(test_config(&base, 0));

        let record = client.search_catalog("Tyler_2019").await.unwrap().unwrap();
        assert_eq!(record["bag"], "Tyler_2019");
        assert_eq!(record["project"], "fake_bag");
    }

    #[tokio::test]
    async fn search_returns_none_when_count_is_zero() {
        let (base, _state) = spawn_catalog(Vec::new(), 0).await;
        let client = CatalogClient::new(test_config(&base, 0));

        assert!(client.search_catalog("NoSuchBag").await.unwrap().is_none());
    }

    // ============================================================
    // TEST 2: Merge
    // ============================================================

    #[test]
    fn merge_preserves_unrelated_fields() {
        let mut record = tyler_record();
        let at = Utc.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).unwrap();
        merge_ingest_status(&mut record, "jpeg_040", "oku:hos", true, at);

        assert_eq!(record["project"], "fake_bag");
        assert_eq!(record["locations"], tyler_record()["locations"]);
        let islandora = &record["application"]["islandora"];
        assert_eq!(islandora["derivative"], "jpeg_040");
        assert_eq!(islandora["collection"], "oku:hos");
        assert_eq!(islandora["ingested"], true);
        assert_eq!(islandora["datetime"], "2023-05-01T12:00:00Z");
    }

    #[test]
    fn merge_creates_intermediate_containers() {
        let mut record = json!({"bag": "Bare_2020"});
        let at = Utc.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).unwrap();
        merge_ingest_status(&mut record, "tiff_100", "oku:hos", false, at);

        assert_eq!(record["application"]["islandora"]["ingested"], false);
        assert_eq!(record["bag"], "Bare_2020");
    }

    #[test]
    fn merge_is_idempotent_for_a_fixed_timestamp() {
        let at = Utc.with_ymd_and_hms(2023, 5, 1, 12, 0, 0).unwrap();

        let mut once = tyler_record();
        merge_ingest_status(&mut once, "jpeg_040", "oku:hos", true, at);

        let mut twice = once.clone();
        merge_ingest_status(&mut twice, "jpeg_040", "oku:hos", true, at);

        assert_eq!(once, twice);
    }

    // ============================================================
    // TEST 3: Update
    // ============================================================

    #[tokio::test]
    async fn update_is_a_no_op_without_a_catalog_entry() {
        let (base, state) = spawn_catalog(Vec::new(), 0).await;
        let client = CatalogClient::new(test_config(&base, 0));

        let updated = client
            .update_catalog("NoSuchBag", "jpeg_040", "oku:hos", true)
            .await
            .unwrap();

        assert!(!updated);
        assert!(state.posts.lock().unwrap().is_empty(), "no POST may be issued");
    }

    #[tokio::test]
    async fn update_posts_the_merged_record_with_credential() {
        let (base, state) = spawn_catalog(vec![tyler_record()], 0).await;
        let client = CatalogClient::new(test_config(&base, 0));

        let updated = client
            .update_catalog("Tyler_2019", "jpeg_040", "oku:hos", true)
            .await
            .unwrap();
        assert!(updated);

        let posts = state.posts.lock().unwrap();
        assert_eq!(posts.len(), 1);
        let (auth, body) = &posts[0];
        assert_eq!(auth.as_deref(), Some("Token secret"));
        assert_eq!(body["project"], "fake_bag");
        assert_eq!(body["application"]["islandora"]["derivative"], "jpeg_040");
        assert_eq!(body["application"]["islandora"]["ingested"], true);
    }

    #[tokio::test]
    async fn transient_post_failures_retry_the_whole_operation() {
        let (base, state) = spawn_catalog(vec![tyler_record()], 2).await;
        let client = CatalogClient::new(test_config(&base, 4));

        let updated = client
            .update_catalog("Tyler_2019", "jpeg_040", "oku:hos", true)
            .await
            .unwrap();

        assert!(updated);
        assert_eq!(state.posts.lock().unwrap().len(), 3);
        // Every attempt starts from a fresh search, not a cached record.
        assert_eq!(state.searches.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_merges_into_the_freshly_fetched_record() {
        // The record changes between attempts; the first POST is rejected.
        let mut renamed = tyler_record();
        renamed["project"] = json!("renamed_bag");
        let (base, state) = spawn_catalog(vec![tyler_record(), renamed], 1).await;
        let client = CatalogClient::new(test_config(&base, 4));

        let updated = client
            .update_catalog("Tyler_2019", "jpeg_040", "oku:hos", true)
            .await
            .unwrap();
        assert!(updated);

        // The retry must carry the record as it stood at retry time, so the
        // concurrent rename is preserved rather than clobbered.
        let posts = state.posts.lock().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].1["project"], "fake_bag");
        assert_eq!(posts[1].1["project"], "renamed_bag");
        assert_eq!(posts[1].1["application"]["islandora"]["ingested"], true);
        assert_eq!(state.searches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn retry_exhaustion_surfaces_to_the_caller() {
        let (base, state) = spawn_catalog(vec![tyler_record()], usize::MAX).await;
        let client = CatalogClient::new(test_config(&base, 1));

        let err = client
            .update_catalog("Tyler_2019", "jpeg_040", "oku:hos", true)
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::RetriesExhausted(2)));
        assert_eq!(state.posts.lock().unwrap().len(), 2);
        assert_eq!(state.searches.load(Ordering::SeqCst), 2);
    }
}
