//! Deterministic, network-free flashcard generation.
//!
//! Used whenever the remote path cannot produce a full deck. The output
//! depends only on the input notes.

use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Flashcard, FLASHCARD_COUNT};
use crate::normalize::normalize_sentences;

/// Topic used when a sentence has no qualifying word.
pub const DEFAULT_TOPIC: &str = "the topic";

/// Only the first sentences contribute topics.
const MAX_TOPIC_SENTENCES: usize = 10;

/// Latin or Arabic letter runs.
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z\x{0600}-\x{06FF}]+").expect("valid word regex"));

/// First Latin/Arabic word longer than three characters, if any.
pub fn topic_of(sentence: &str) -> Option<&str> {
    WORD_RE
        .find_iter(sentence)
        .map(|m| m.as_str())
        .find(|word| word.chars().count() > 3)
}

/// Build exactly [`FLASHCARD_COUNT`] flashcards from the notes alone.
///
/// Sentences and topics are reused cyclically when the notes are short.
pub fn fallback_flashcards(notes: &str) -> Vec<Flashcard> {
    let sentences = normalize_sentences(notes);
    let topics: Vec<&str> = sentences
        .iter()
        .take(MAX_TOPIC_SENTENCES)
        .map(|s| topic_of(s).unwrap_or(DEFAULT_TOPIC))
        .collect();

    (0..FLASHCARD_COUNT)
        .map(|i| {
            let answer = &sentences[i % sentences.len()];
            let topic = if topics.is_empty() {
                DEFAULT_TOPIC
            } else {
                topics[i % topics.len()]
            };
            Flashcard::new(
                format!("What is the main idea of this statement about {topic}?"),
                answer,
            )
        })
        .collect()
}
