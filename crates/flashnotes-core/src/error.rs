//! Error types for the generation pipeline and its collaborators.
//!
//! Defined in `flashnotes-core` so the pipeline can classify failures from
//! any generator or store implementation without string matching.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP statuses that mark a candidate model as unavailable rather than the
/// request as malformed.
pub const RETRYABLE_STATUSES: &[u16] = &[401, 403, 404, 429, 500, 502, 503, 504, 524];

/// A failed attempt against a single candidate model.
#[derive(Debug, Clone, Error)]
pub enum AttemptError {
    /// The endpoint answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The request did not complete within the per-attempt timeout.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// The endpoint answered 2xx but the body was not JSON.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl AttemptError {
    /// Returns `true` if the status is one of [`RETRYABLE_STATUSES`].
    ///
    /// Transport and decode failures are not HTTP errors and never count as
    /// retryable; whether they fall through is up to the fallthrough policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            AttemptError::Status { status, .. } => RETRYABLE_STATUSES.contains(status),
            AttemptError::Timeout(_) | AttemptError::Network(_) | AttemptError::Decode(_) => false,
        }
    }
}

/// Decides whether a failed candidate hands over to the next one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallthroughPolicy {
    /// Every failure moves on to the next candidate.
    #[default]
    Universal,
    /// A non-retryable HTTP status stops the chain; transport and decode
    /// failures still move on.
    RetryableOnly,
}

impl FallthroughPolicy {
    pub fn should_continue(self, error: &AttemptError) -> bool {
        match (self, error) {
            (FallthroughPolicy::Universal, _) => true,
            (FallthroughPolicy::RetryableOnly, AttemptError::Status { .. }) => error.is_retryable(),
            (
                FallthroughPolicy::RetryableOnly,
                AttemptError::Timeout(_) | AttemptError::Network(_) | AttemptError::Decode(_),
            ) => true,
        }
    }
}

/// The outcome of one candidate, kept for reporting.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub model: String,
    pub error: AttemptError,
}

/// Errors that end the remote half of the pipeline.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Every candidate model failed.
    #[error("all {} candidate models failed, last error: {}", .attempts.len(), last_error_text(.attempts))]
    Exhausted { attempts: Vec<Attempt> },

    /// A non-retryable failure stopped the candidate chain early.
    #[error("generation aborted on {model}: {error}")]
    Aborted { model: String, error: AttemptError },

    /// The model answered but no flashcards could be recovered.
    #[error(transparent)]
    Extraction(#[from] ExtractError),

    /// The model answered with fewer cards than a full deck.
    #[error("model returned {found} flashcards, expected {expected}")]
    IncompleteDeck { found: usize, expected: usize },
}

impl GenerationError {
    /// The last attempt error recorded, if this failure came from the candidate chain.
    pub fn last_error(&self) -> Option<&AttemptError> {
        match self {
            GenerationError::Exhausted { attempts } => attempts.last().map(|a| &a.error),
            GenerationError::Aborted { error, .. } => Some(error),
            GenerationError::Extraction(_) | GenerationError::IncompleteDeck { .. } => None,
        }
    }
}

fn last_error_text(attempts: &[Attempt]) -> String {
    attempts
        .last()
        .map(|a| format!("{} ({})", a.error, a.model))
        .unwrap_or_else(|| "no candidate models configured".to_string())
}

/// Failure to recover flashcards from model output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no structured flashcards found")]
    NoFlashcards,
}

/// Errors from a flashcard store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unreachable: {0}")]
    Network(String),

    #[error("store returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("failed to decode store response: {0}")]
    Decode(String),
}
