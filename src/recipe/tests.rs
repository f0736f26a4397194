//! Recipe Module Tests
//!
//! ## Test Scopes
//! - **Classification**: pure shape dispatch over every input class.
//! - **Resolution**: locator fetch against an in-process HTTP stub, covering
//!   success, non-success status, and invalid-content paths.
//! - **Typed view**: extraction of book/page identifiers from a document.

#[cfg(test)]
mod tests {
    use crate::recipe::types::{Classification, RecipeDocument, RecipeError};
    use crate::recipe::{classify, resolve};

    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use serde_json::{json, Value};

    fn sample_recipe() -> Value {
        json!({
            "recipe": {
                "uuid": "book-uuid-1",
                "label": "Tyler 2019",
                "pages": [
                    {"uuid": "page-uuid-1", "file": "001.tif"},
                    {"uuid": "page-uuid-2", "file": "002.tif"}
                ]
            }
        })
    }

    /// Binds a stub server on an ephemeral port and returns its base URL.
    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    // ============================================================
    // Classification
    // ============================================================

    #[test]
    fn classify_url_string_is_uri() {
        let item = json!("https://bag.example.edu/derivative/Tyler_2019/jpeg_040/tyler_2019.json");
        match classify(&item) {
            Classification::Uri(uri) => assert!(uri.starts_with("https://")),
            other => panic!("expected Uri, got {other:?}"),
        }
    }

    #[test]
    fn classify_object_with_recipe_key_is_inline() {
        assert!(matches!(classify(&sample_recipe()), Classification::Inline(_)));
    }

    #[test]
    fn classify_serialized_recipe_string_is_inline() {
        let item = Value::String(sample_recipe().to_string());
        match classify(&item) {
            Classification::Inline(body) => assert_eq!(body, sample_recipe()),
            other => panic!("expected Inline, got {other:?}"),
        }
    }

    #[test]
    fn classify_rejects_falsy_recipe_key() {
        assert_eq!(classify(&json!({"recipe": null})), Classification::Invalid);
        assert_eq!(classify(&json!({"recipe": false})), Classification::Invalid);
        assert_eq!(classify(&json!({"recipe": ""})), Classification::Invalid);
        assert_eq!(classify(&json!({"recipe": {}})), Classification::Invalid);
    }

    #[test]
    fn classify_rejects_other_shapes() {
        // No host component, so not a URI; not JSON either.
        assert_eq!(classify(&json!("not a locator")), Classification::Invalid);
        // Parses as a URL but has no network location.
        assert_eq!(classify(&json!("mailto:curator@example.edu")), Classification::Invalid);
        assert_eq!(classify(&json!(42)), Classification::Invalid);
        assert_eq!(classify(&json!(["https://x.example/a.json"])), Classification::Invalid);
        assert_eq!(classify(&json!({"pages": []})), Classification::Invalid);
    }

    #[test]
    fn classify_is_deterministic() {
        let item = json!("https://bag.example.edu/derivative/a/b/c.json");
        assert_eq!(classify(&item), classify(&item));
    }

    // ============================================================
    // Resolution
    // ============================================================

    #[tokio::test]
    async fn resolve_returns_valid_recipe_body() {
        let app = Router::new().route(
            "/ok.json",
            get(|| async { axum::Json(sample_recipe()) }),
        );
        let base = serve(app).await;

        let client = reqwest::Client::new();
        let body = resolve(&client, &format!("{base}/ok.json")).await.unwrap();
        assert_eq!(body, sample_recipe());
    }

    #[tokio::test]
    async fn resolve_reports_server_status_on_missing_recipe() {
        let app = Router::new().route(
            "/gone.json",
            get(|| async { (StatusCode::NOT_FOUND, "no such recipe") }),
        );
        let base = serve(app).await;

        let client = reqwest::Client::new();
        let err = resolve(&client, &format!("{base}/gone.json")).await.unwrap_err();
        assert!(matches!(err, RecipeError::Fetch { status: 404 }));
        assert_eq!(err.to_string(), "Server status 404");
    }

    #[tokio::test]
    async fn resolve_rejects_content_without_recipe_key() {
        let app = Router::new().route(
            "/other.json",
            get(|| async { axum::Json(json!({"bag": "Tyler_2019"})) }),
        );
        let base = serve(app).await;

        let client = reqwest::Client::new();
        let err = resolve(&client, &format!("{base}/other.json")).await.unwrap_err();
        assert!(matches!(err, RecipeError::InvalidRecipe(_)));
    }

    #[tokio::test]
    async fn resolve_rejects_non_json_body() {
        let app = Router::new().route("/page.html", get(|| async { "<html></html>" }));
        let base = serve(app).await;

        let client = reqwest::Client::new();
        let err = resolve(&client, &format!("{base}/page.html")).await.unwrap_err();
        assert!(matches!(err, RecipeError::Parse(_)));
    }

    // ============================================================
    // Typed view
    // ============================================================

    #[test]
    fn document_extracts_book_and_page_uuids_in_order() {
        let document: RecipeDocument = serde_json::from_value(sample_recipe()).unwrap();
        assert_eq!(document.recipe.uuid, "book-uuid-1");
        let pages: Vec<&str> = document.recipe.pages.iter().map(|p| p.uuid.as_str()).collect();
        assert_eq!(pages, vec!["page-uuid-1", "page-uuid-2"]);
    }

    #[test]
    fn document_without_pages_parses_to_empty_list() {
        let document: RecipeDocument =
            serde_json::from_value(json!({"recipe": {"uuid": "book-uuid-2"}})).unwrap();
        assert!(document.recipe.pages.is_empty());
    }
}
