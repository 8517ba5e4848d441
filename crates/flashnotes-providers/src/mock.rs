//! Mock generator for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use flashnotes_core::error::{Attempt, AttemptError, GenerationError};
use flashnotes_core::traits::{RawGeneration, TextGenerator};

/// A scripted text generator for exercising the pipeline without real API calls.
pub struct MockGenerator {
    /// Body returned on success; `None` means every call fails with exhaustion.
    response: Option<serde_json::Value>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last notes received.
    last_notes: Mutex<Option<String>>,
}

impl MockGenerator {
    /// A generator that always answers with `body`.
    pub fn with_response(body: serde_json::Value) -> Self {
        Self {
            response: Some(body),
            call_count: AtomicU32::new(0),
            last_notes: Mutex::new(None),
        }
    }

    /// A generator whose models are all unavailable.
    pub fn unavailable() -> Self {
        Self {
            response: None,
            call_count: AtomicU32::new(0),
            last_notes: Mutex::new(None),
        }
    }

    /// Get the number of calls made to this generator.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the notes from the last call.
    pub fn last_notes(&self) -> Option<String> {
        self.last_notes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, notes: &str) -> Result<RawGeneration, GenerationError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_notes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(notes.to_string());

        match &self.response {
            Some(body) => Ok(RawGeneration {
                model: "mock-model".into(),
                body: body.clone(),
            }),
            None => Err(GenerationError::Exhausted {
                attempts: vec![Attempt {
                    model: "mock-model".into(),
                    error: AttemptError::Status {
                        status: 503,
                        message: "mock model unavailable".into(),
                    },
                }],
            }),
        }
    }
}
