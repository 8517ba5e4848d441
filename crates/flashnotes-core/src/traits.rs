//! Collaborator traits for text generation and flashcard storage.
//!
//! The pipeline only talks to the outside world through these traits; the
//! `flashnotes-providers` crate implements them for Hugging Face, Supabase
//! and in-memory backends.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, StoreError};
use crate::model::{FlashcardRow, StoredFlashcard};

// ---------------------------------------------------------------------------
// Text generation
// ---------------------------------------------------------------------------

/// A backend that turns study notes into raw model output.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable backend name (e.g. "huggingface").
    fn name(&self) -> &str;

    /// Generate flashcard text for the notes.
    ///
    /// Implementations try their candidate models in order and fail only
    /// when none of them produced a response.
    async fn generate(&self, notes: &str) -> Result<RawGeneration, GenerationError>;
}

/// Undecoded-shape output from a generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGeneration {
    /// Model that produced the response.
    pub model: String,
    /// Decoded JSON body, shape unknown.
    pub body: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// A row store for generated flashcards.
#[async_trait]
pub trait FlashcardStore: Send + Sync {
    /// Human-readable store name (e.g. "supabase").
    fn name(&self) -> &str;

    /// Append rows.
    async fn insert(&self, rows: &[FlashcardRow]) -> Result<(), StoreError>;

    /// Most recent rows first, optionally filtered by user.
    async fn recent(
        &self,
        user_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<StoredFlashcard>, StoreError>;
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// Instruction sent ahead of the notes.
pub const SYSTEM_PROMPT: &str = "You are a study assistant. Given raw study notes, generate exactly 5 concise quiz flashcards. Return a valid JSON array. Each item must have 'question' and 'answer' fields. Keep answers 1-3 sentences.";

/// Build the full prompt for a set of notes.
pub fn build_prompt(notes: &str) -> String {
    format!(
        r#"{SYSTEM_PROMPT}

Notes:
"""{notes}"""

Return only JSON, e.g.:
[
  {{ "question": "Q1?", "answer": "A1" }},
  ...
]
"#
    )
}
