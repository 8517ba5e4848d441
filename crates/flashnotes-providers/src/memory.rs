//! Process-local flashcard store.
//!
//! Used when no Supabase project is configured, and by tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use flashnotes_core::error::StoreError;
use flashnotes_core::model::{FlashcardRow, StoredFlashcard};
use flashnotes_core::traits::FlashcardStore;

/// An in-memory, append-only flashcard store. Contents are lost on exit.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<StoredFlashcard>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows stored.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<StoredFlashcard>> {
        self.rows.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl FlashcardStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn insert(&self, rows: &[FlashcardRow]) -> Result<(), StoreError> {
        let now = Utc::now();
        let mut stored = self.lock();
        stored.extend(rows.iter().map(|row| StoredFlashcard {
            id: Some(serde_json::Value::String(Uuid::new_v4().to_string())),
            user_id: row.user_id.clone(),
            question: row.question.clone(),
            answer: row.answer.clone(),
            source_notes: Some(row.source_notes.clone()),
            created_at: Some(now),
        }));
        Ok(())
    }

    async fn recent(
        &self,
        user_id: Option<&str>,
        limit: usize,
    ) -> Result<Vec<StoredFlashcard>, StoreError> {
        let stored = self.lock();
        Ok(stored
            .iter()
            .rev()
            .filter(|row| user_id.is_none() || row.user_id.as_deref() == user_id)
            .take(limit)
            .cloned()
            .collect())
    }
}
