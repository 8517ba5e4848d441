//! Whitespace collapsing and sentence splitting for raw notes.

/// Sentences with fewer words than this are dropped.
pub const MIN_SENTENCE_WORDS: usize = 5;

/// Used when the notes contain no text at all.
pub const PLACEHOLDER_SENTENCE: &str = "These are sample notes about a topic.";

/// Collapse every run of whitespace to a single space and trim the result.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text into sentences at whitespace that follows `.`, `!` or `?`.
///
/// Terminal punctuation stays attached to its sentence. Punctuation that is
/// not followed by whitespace (decimals, abbreviations like "e.g.x") does not
/// end a sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;
    let mut in_break = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if in_break {
                continue;
            }
            if matches!(prev, Some('.' | '!' | '?')) {
                sentences.push(std::mem::take(&mut current));
                in_break = true;
                continue;
            }
        } else {
            in_break = false;
        }
        current.push(ch);
        prev = Some(ch);
    }

    if !current.is_empty() || sentences.is_empty() {
        sentences.push(current);
    }
    sentences
}

/// Normalize notes into candidate sentences for the local generator.
///
/// Never returns an empty vector: if no sentence has at least
/// [`MIN_SENTENCE_WORDS`] words the whole collapsed text is used, and if that
/// is empty too, [`PLACEHOLDER_SENTENCE`].
pub fn normalize_sentences(notes: &str) -> Vec<String> {
    let text = collapse_whitespace(notes);
    let sentences: Vec<String> = split_sentences(&text)
        .into_iter()
        .filter(|s| s.split_whitespace().count() >= MIN_SENTENCE_WORDS)
        .collect();

    if !sentences.is_empty() {
        return sentences;
    }
    if text.is_empty() {
        vec![PLACEHOLDER_SENTENCE.to_string()]
    } else {
        vec![text]
    }
}
