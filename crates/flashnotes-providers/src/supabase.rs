//! Supabase (PostgREST) flashcard store.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use tracing::{debug, instrument};

use flashnotes_core::error::StoreError;
use flashnotes_core::model::{truncate_chars, FlashcardRow, StoredFlashcard};
use flashnotes_core::traits::FlashcardStore;

pub const DEFAULT_TABLE: &str = "flashcards";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Flashcard store backed by a Supabase table through its REST interface.
pub struct SupabaseStore {
    base_url: String,
    api_key: String,
    table: String,
    client: reqwest::Client,
}

impl SupabaseStore {
    pub fn new(base_url: &str, api_key: &str, table: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            table: table.unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            client,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

async fn status_error(response: reqwest::Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    StoreError::Status {
        status,
        message: truncate_chars(&body, 300).to_string(),
    }
}

fn network_error(e: reqwest::Error) -> StoreError {
    StoreError::Network(e.to_string())
}

#[async_trait]
impl FlashcardStore for SupabaseStore {
    fn name(&self) -> &str {
        "supabase"
    }

    #[instrument(skip(self, rows), fields(table = %self.table, rows = rows.len()))]
    async fn insert(&self, rows: &[FlashcardRow]) -> Result<(), StoreError> {
        if rows.is_empty() {
            return Ok(());
        }

        let response = self
            .authorized(self.client.post(self.table_url()))
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        debug!("rows inserted");
        Ok(())
    }

    #[instrument(skip(self), fields(table = %self.table))]
    async fn recent(
        &self,
        user_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<StoredFlashcard>, StoreError> {
        let limit = limit.to_string();
        let mut params = vec![
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
            ("limit", limit),
        ];
        if let Some(user_id) = user_id {
            params.push(("user_id", format!("eq.{user_id}")));
        }
        let url = reqwest::Url::parse_with_params(&self.table_url(), &params)
            .map_err(|e| StoreError::Network(format!("invalid store URL: {e}")))?;

        let response = self
            .authorized(self.client.get(url))
            .send()
            .await
            .map_err(network_error)?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        response
            .json::<Vec<StoredFlashcard>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}
