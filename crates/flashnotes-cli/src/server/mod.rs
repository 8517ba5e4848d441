//! HTTP API and static frontend.
//!
//! Routes:
//! - `POST /api/generate` turns notes into five stored flashcards
//! - `GET /api/flashcards` lists recently stored cards
//! - everything else is served from the static directory, with
//!   `index.html` as the fallback for unknown paths

pub mod error;
pub mod routes;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use flashnotes_core::traits::FlashcardStore;
use flashnotes_core::FlashcardPipeline;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: FlashcardPipeline,
    pub store: Arc<dyn FlashcardStore>,
}

/// Build the application router.
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let api = Router::new()
        .route("/generate", post(routes::generate))
        .route("/flashcards", get(routes::list))
        .with_state(state);

    let frontend =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .nest("/api", api)
        .fallback_service(frontend)
        .layer(TraceLayer::new_for_http())
}

/// Bind `addr` and serve until the process is stopped.
pub async fn run(app: Router, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "flashnotes listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use flashnotes_core::{FlashcardRow, StoreError, StoredFlashcard};
    use flashnotes_providers::mock::MockGenerator;
    use flashnotes_providers::MemoryStore;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const DECK: &str = r#"[
        {"question": "What is ATP?", "answer": "The cell's energy currency."},
        {"question": "Where is ATP made?", "answer": "In the mitochondria."},
        {"question": "What is glycolysis?", "answer": "Splitting glucose."},
        {"question": "What is the Krebs cycle?", "answer": "A series of reactions."},
        {"question": "What is NADH?", "answer": "An electron carrier."}
    ]"#;

    const NOTES: &str = "Mitochondria produce most of the cell's ATP. \
        Glycolysis happens in the cytoplasm of the cell.";

    struct FailingStore;

    #[async_trait]
    impl FlashcardStore for FailingStore {
        fn name(&self) -> &str {
            "failing"
        }

        async fn insert(&self, _rows: &[FlashcardRow]) -> Result<(), StoreError> {
            Err(StoreError::Network("connection refused".into()))
        }

        async fn recent(
            &self,
            _user_id: Option<&str>,
            _limit: usize,
        ) -> Result<Vec<StoredFlashcard>, StoreError> {
            Err(StoreError::Status {
                status: 503,
                message: "unavailable".into(),
            })
        }
    }

    fn static_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>flashnotes</h1>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log('app');").unwrap();
        dir
    }

    fn app_with(
        generator: Arc<MockGenerator>,
        store: Arc<dyn FlashcardStore>,
        dir: &TempDir,
    ) -> Router {
        let state = AppState {
            pipeline: FlashcardPipeline::new(generator),
            store,
        };
        build_router(state, dir.path())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 65536).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), 65536).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn generate_returns_stored_rows() {
        let dir = static_dir();
        let generator = Arc::new(MockGenerator::with_response(
            serde_json::json!([{ "generated_text": DECK }]),
        ));
        let store = Arc::new(MemoryStore::new());
        let app = app_with(generator.clone(), store.clone(), &dir);

        let body = serde_json::json!({"notes": NOTES, "user_id": "student-1"}).to_string();
        let response = app.oneshot(post_json("/api/generate", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let cards = json["flashcards"].as_array().unwrap();
        assert_eq!(cards.len(), 5);
        assert_eq!(cards[0]["question"], "What is ATP?");
        assert_eq!(cards[0]["user_id"], "student-1");
        assert_eq!(cards[0]["source_notes"], NOTES);

        assert_eq!(generator.call_count(), 1);
        assert_eq!(generator.last_notes().as_deref(), Some(NOTES));
        assert_eq!(store.len(), 5);
    }

    #[tokio::test]
    async fn generate_falls_back_when_models_unavailable() {
        let dir = static_dir();
        let store = Arc::new(MemoryStore::new());
        let app = app_with(Arc::new(MockGenerator::unavailable()), store.clone(), &dir);

        let body = serde_json::json!({"notes": NOTES}).to_string();
        let response = app.oneshot(post_json("/api/generate", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let cards = json["flashcards"].as_array().unwrap();
        assert_eq!(cards.len(), 5);
        assert!(cards[0]["question"]
            .as_str()
            .unwrap()
            .starts_with("What is the main idea of this statement about"));
        assert!(cards[0]["user_id"].is_null());
        assert_eq!(store.len(), 5);
    }

    #[tokio::test]
    async fn blank_notes_rejected_without_generating() {
        let dir = static_dir();
        let generator = Arc::new(MockGenerator::unavailable());
        let app = app_with(generator.clone(), Arc::new(MemoryStore::new()), &dir);

        let response = app
            .oneshot(post_json("/api/generate", r#"{"notes": "   \n "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"error": "notes is required"})
        );
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_notes_and_empty_body_rejected() {
        let dir = static_dir();
        let generator = Arc::new(MockGenerator::unavailable());
        let app = app_with(generator.clone(), Arc::new(MemoryStore::new()), &dir);

        let response = app
            .clone()
            .oneshot(post_json("/api/generate", r#"{"user_id": "u"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app.oneshot(post_json("/api/generate", "")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn malformed_json_rejected() {
        let dir = static_dir();
        let app = app_with(
            Arc::new(MockGenerator::unavailable()),
            Arc::new(MemoryStore::new()),
            &dir,
        );

        let response = app
            .oneshot(post_json("/api/generate", "{notes: oops"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().starts_with("invalid JSON body"));
    }

    #[tokio::test]
    async fn body_parsed_without_content_type() {
        let dir = static_dir();
        let app = app_with(
            Arc::new(MockGenerator::unavailable()),
            Arc::new(MemoryStore::new()),
            &dir,
        );

        let request = Request::builder()
            .method("POST")
            .uri("/api/generate")
            .body(Body::from(serde_json::json!({"notes": NOTES}).to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn store_failure_does_not_fail_generation() {
        let dir = static_dir();
        let app = app_with(
            Arc::new(MockGenerator::unavailable()),
            Arc::new(FailingStore),
            &dir,
        );

        let body = serde_json::json!({"notes": NOTES}).to_string();
        let response = app.oneshot(post_json("/api/generate", &body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["flashcards"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn list_filters_by_user() {
        let dir = static_dir();
        let store = Arc::new(MemoryStore::new());
        let rows = |user: &str| {
            vec![FlashcardRow {
                user_id: Some(user.to_string()),
                question: format!("Question for {user}"),
                answer: "answer".into(),
                source_notes: "notes".into(),
            }]
        };
        store.insert(&rows("alice")).await.unwrap();
        store.insert(&rows("bob")).await.unwrap();
        let app = app_with(Arc::new(MockGenerator::unavailable()), store, &dir);

        let response = app
            .clone()
            .oneshot(get("/api/flashcards?user_id=bob"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let cards = json["flashcards"].as_array().unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0]["question"], "Question for bob");

        let response = app.oneshot(get("/api/flashcards")).await.unwrap();
        let json = body_json(response).await;
        let cards = json["flashcards"].as_array().unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0]["question"], "Question for bob");
    }

    #[tokio::test]
    async fn list_store_failure_is_500() {
        let dir = static_dir();
        let app = app_with(
            Arc::new(MockGenerator::unavailable()),
            Arc::new(FailingStore),
            &dir,
        );

        let response = app.oneshot(get("/api/flashcards")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("HTTP 503"));
    }

    #[tokio::test]
    async fn serves_index_and_assets() {
        let dir = static_dir();
        let app = app_with(
            Arc::new(MockGenerator::unavailable()),
            Arc::new(MemoryStore::new()),
            &dir,
        );

        let response = app.clone().oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "<h1>flashnotes</h1>");

        let response = app.oneshot(get("/app.js")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "console.log('app');");
    }

    #[tokio::test]
    async fn unknown_paths_fall_back_to_index() {
        let dir = static_dir();
        let app = app_with(
            Arc::new(MockGenerator::unavailable()),
            Arc::new(MemoryStore::new()),
            &dir,
        );

        let response = app.oneshot(get("/decks/42")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "<h1>flashnotes</h1>");
    }
}
