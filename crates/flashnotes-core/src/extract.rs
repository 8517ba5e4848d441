//! Recover flashcards from text-generation output.
//!
//! Inference endpoints answer in several shapes (a list of objects, a single
//! object, bare text) and models rarely return clean JSON. Extraction runs in
//! three stages:
//!
//! 1. [`response_text`] reduces the decoded response to one text blob.
//! 2. [`extract_flashcards`] looks for a JSON array of `{question, answer}`
//!    objects in that text, first with a greedy pattern and then with a
//!    bracket-balanced scan.
//! 3. Failing that, `Q...: value` lines are collected heuristically.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::ExtractError;
use crate::model::{Flashcard, FLASHCARD_COUNT};

/// An opening bracket, one or more brace-delimited objects, a closing bracket.
static JSON_ARRAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[\s*\{.*\}\s*\]").expect("valid array regex"));

/// Fields checked, in order, for the generated text.
const TEXT_FIELDS: &[&str] = &["generated_text", "summary_text"];

/// Reduce a decoded inference response to a single text blob.
pub fn response_text(response: &Value) -> String {
    match response {
        Value::Array(items) => match items.first() {
            Some(Value::Object(first)) => {
                text_field(first).unwrap_or_else(|| response.to_string())
            }
            _ => response.to_string(),
        },
        Value::Object(map) => text_field(map).unwrap_or_else(|| response.to_string()),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn text_field(map: &serde_json::Map<String, Value>) -> Option<String> {
    TEXT_FIELDS
        .iter()
        .filter_map(|key| map.get(*key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

/// Extract up to [`FLASHCARD_COUNT`] flashcards from model output.
pub fn extract_flashcards(text: &str) -> Result<Vec<Flashcard>, ExtractError> {
    if let Some(cards) = find_json_deck(text) {
        return Ok(cards);
    }

    let cards = parse_labelled_lines(text);
    if cards.is_empty() {
        return Err(ExtractError::NoFlashcards);
    }
    Ok(cards)
}

/// Locate and validate a JSON array of flashcard objects.
fn find_json_deck(text: &str) -> Option<Vec<Flashcard>> {
    let greedy = JSON_ARRAY_RE.find(text)?;
    if let Some(cards) = parse_deck(greedy.as_str()) {
        return Some(cards);
    }

    // The greedy match spans from the first `[{` to the last `}]`, which
    // swallows prose between two arrays. Retry with balanced brackets.
    text.match_indices('[')
        .filter_map(|(start, _)| balanced_array(&text[start..]))
        .find_map(parse_deck)
}

/// Parse a JSON array where every element is an object carrying a string
/// `question` and/or `answer`. Missing fields become empty strings.
fn parse_deck(candidate: &str) -> Option<Vec<Flashcard>> {
    let items: Vec<Value> = serde_json::from_str(candidate).ok()?;
    let mut cards = Vec::with_capacity(items.len().min(FLASHCARD_COUNT));

    for item in items.iter() {
        let Value::Object(map) = item else {
            return None;
        };
        let question = string_field(map, "question")?;
        let answer = string_field(map, "answer")?;
        if question.is_none() && answer.is_none() {
            return None;
        }
        cards.push(Flashcard::new(
            question.unwrap_or_default(),
            answer.unwrap_or_default(),
        ));
    }

    cards.truncate(FLASHCARD_COUNT);
    if cards.is_empty() {
        None
    } else {
        Some(cards)
    }
}

/// `Some(None)` when the field is absent or null, `None` when it has the wrong type.
fn string_field<'a>(
    map: &'a serde_json::Map<String, Value>,
    key: &str,
) -> Option<Option<&'a str>> {
    match map.get(key) {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(s)) => Some(Some(s.as_str())),
        Some(_) => None,
    }
}

/// Return the prefix of `text` (which must start with `[`) up to its matching
/// `]`, if it opens with an object. String literals are skipped so braces
/// inside values do not confuse the depth count.
fn balanced_array(text: &str) -> Option<&str> {
    let after_open = text.get(1..)?;
    if !after_open.trim_start().starts_with('{') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=idx]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Collect `Q...: value` lines. The question is the value (or the label when
/// the value is blank); the answer is the value.
fn parse_labelled_lines(text: &str) -> Vec<Flashcard> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.trim_matches(|c: char| matches!(c, '-' | '*' | '•' | ' ')).trim())
        .filter_map(|line| line.split_once(':'))
        .filter(|(label, _)| label.to_lowercase().starts_with('q'))
        .map(|(label, value)| {
            let value = value.trim();
            let question = if value.is_empty() { label.trim() } else { value };
            Flashcard::new(question, value)
        })
        .take(FLASHCARD_COUNT)
        .collect()
}
