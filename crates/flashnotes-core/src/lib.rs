//! flashnotes-core — Flashcard generation pipeline.
//!
//! This crate defines the data model, error taxonomy and collaborator traits,
//! together with the pieces of the pipeline that need no I/O: note
//! normalization, the deterministic local generator, and extraction of
//! flashcards from model output.

pub mod error;
pub mod extract;
pub mod fallback;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod traits;

pub use error::{AttemptError, ExtractError, FallthroughPolicy, GenerationError, StoreError};
pub use model::{Flashcard, FlashcardRow, StoredFlashcard, FLASHCARD_COUNT};
pub use pipeline::FlashcardPipeline;
