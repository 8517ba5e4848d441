//! API endpoint handlers.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use flashnotes_core::model::truncate_chars;
use flashnotes_core::{FlashcardRow, StoredFlashcard};

use super::error::ApiError;
use super::AppState;

/// Number of stored cards returned by the listing endpoint.
pub const LIST_LIMIT: usize = 50;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub flashcards: Vec<FlashcardRow>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub flashcards: Vec<StoredFlashcard>,
}

/// `POST /api/generate`
///
/// The body is read as JSON whatever the declared content type.
pub async fn generate(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, ApiError> {
    let request: GenerateRequest = if body.iter().all(u8::is_ascii_whitespace) {
        GenerateRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))?
    };

    let notes = request.notes.unwrap_or_default();
    if notes.trim().is_empty() {
        return Err(ApiError::BadRequest("notes is required".into()));
    }

    let generation = state.pipeline.generate_detailed(&notes).await;
    info!(source = %generation.source, "flashcards generated");

    let rows = FlashcardRow::from_flashcards(
        request.user_id.as_deref(),
        &notes,
        &generation.flashcards,
    );

    if let Err(e) = state.store.insert(&rows).await {
        error!(
            store = state.store.name(),
            notes = truncate_chars(&notes, 80),
            "failed to persist flashcards: {e}"
        );
    }

    Ok(Json(GenerateResponse { flashcards: rows }))
}

/// `GET /api/flashcards?user_id=`
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse>, ApiError> {
    let user_id = params.user_id.as_deref().filter(|id| !id.is_empty());
    let flashcards = state.store.recent(user_id, LIST_LIMIT).await?;
    Ok(Json(ListResponse { flashcards }))
}
