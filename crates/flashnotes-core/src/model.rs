//! Core data model types for flashnotes.
//!
//! These are the types that flow through the whole system: the flashcards
//! produced by the pipeline, the rows handed to the store, and the rows the
//! store hands back.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of flashcards produced by every generation request.
pub const FLASHCARD_COUNT: usize = 5;

/// Maximum number of characters of the source notes kept on a stored row.
pub const SOURCE_NOTES_LIMIT: usize = 4000;

/// A single question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub question: String,
    pub answer: String,
}

impl Flashcard {
    /// Build a flashcard with both fields trimmed.
    pub fn new(question: impl AsRef<str>, answer: impl AsRef<str>) -> Self {
        Self {
            question: question.as_ref().trim().to_string(),
            answer: answer.as_ref().trim().to_string(),
        }
    }
}

/// A flashcard as written to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardRow {
    /// Owner of the card. `None` is stored as null.
    pub user_id: Option<String>,
    pub question: String,
    pub answer: String,
    /// Prefix of the notes the card was generated from.
    pub source_notes: String,
}

impl FlashcardRow {
    /// Build store rows for a freshly generated deck.
    ///
    /// Questions and answers are trimmed and the notes are cut to
    /// [`SOURCE_NOTES_LIMIT`] characters.
    pub fn from_flashcards(user_id: Option<&str>, notes: &str, cards: &[Flashcard]) -> Vec<Self> {
        let source_notes = truncate_chars(notes, SOURCE_NOTES_LIMIT).to_string();
        cards
            .iter()
            .map(|card| FlashcardRow {
                user_id: user_id.map(str::to_string),
                question: card.question.trim().to_string(),
                answer: card.answer.trim().to_string(),
                source_notes: source_notes.clone(),
            })
            .collect()
    }
}

/// A flashcard row read back from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFlashcard {
    /// Store-assigned identifier (integer or UUID depending on the backend).
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub source_notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Which path produced a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationSource {
    /// A remote model answered and its output was extracted.
    Remote { model: String },
    /// The local generator substituted for the remote path.
    LocalFallback { reason: String },
}

impl fmt::Display for GenerationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationSource::Remote { model } => write!(f, "remote ({model})"),
            GenerationSource::LocalFallback { .. } => write!(f, "local fallback"),
        }
    }
}

/// A generated deck together with where it came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    pub flashcards: Vec<Flashcard>,
    pub source: GenerationSource,
}

/// Return at most the first `max` characters of `s`, on a char boundary.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
