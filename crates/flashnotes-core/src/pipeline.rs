//! Flashcard generation pipeline.
//!
//! Composes a remote [`TextGenerator`] with response extraction and
//! substitutes the local fallback generator whenever the remote path cannot
//! produce a full deck. Callers always get exactly [`FLASHCARD_COUNT`] cards.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::GenerationError;
use crate::extract::{extract_flashcards, response_text};
use crate::fallback::fallback_flashcards;
use crate::model::{Flashcard, Generation, GenerationSource, FLASHCARD_COUNT};
use crate::traits::TextGenerator;

/// The generation entry point shared by the HTTP API and the CLI.
#[derive(Clone)]
pub struct FlashcardPipeline {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl FlashcardPipeline {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// A pipeline that never calls out and always uses the local generator.
    pub fn offline() -> Self {
        Self { generator: None }
    }

    /// Generate exactly [`FLASHCARD_COUNT`] flashcards. Never fails.
    pub async fn generate(&self, notes: &str) -> Vec<Flashcard> {
        self.generate_detailed(notes).await.flashcards
    }

    /// Generate a deck and report which path produced it.
    pub async fn generate_detailed(&self, notes: &str) -> Generation {
        let Some(generator) = &self.generator else {
            return Generation {
                flashcards: fallback_flashcards(notes),
                source: GenerationSource::LocalFallback {
                    reason: "offline".to_string(),
                },
            };
        };

        match remote_deck(generator.as_ref(), notes).await {
            Ok((model, flashcards)) => {
                info!(model = %model, "generated flashcards remotely");
                Generation {
                    flashcards,
                    source: GenerationSource::Remote { model },
                }
            }
            Err(e) => {
                warn!(
                    generator = generator.name(),
                    "remote generation failed, using local fallback: {e}"
                );
                Generation {
                    flashcards: fallback_flashcards(notes),
                    source: GenerationSource::LocalFallback {
                        reason: e.to_string(),
                    },
                }
            }
        }
    }
}

async fn remote_deck(
    generator: &dyn TextGenerator,
    notes: &str,
) -> Result<(String, Vec<Flashcard>), GenerationError> {
    let raw = generator.generate(notes).await?;
    let text = response_text(&raw.body);
    let flashcards = extract_flashcards(&text)?;
    if flashcards.len() < FLASHCARD_COUNT {
        return Err(GenerationError::IncompleteDeck {
            found: flashcards.len(),
            expected: FLASHCARD_COUNT,
        });
    }
    Ok((raw.model, flashcards))
}
