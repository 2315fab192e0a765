//! Plain-text handler and the whitespace helpers shared by every extractor.

use std::sync::LazyLock;

use regex::Regex;

use crate::extraction::ExtractionError;

/// Minimum length of a plain-text or DOCX résumé.
pub const MIN_DOCUMENT_CHARS: usize = 50;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static HORIZONTAL_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]+").expect("valid regex"));
static LINE_BREAK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\n\s*").expect("valid regex"));
static READABLE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]{3,}").expect("valid regex"));

/// Length in characters, not bytes.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Collapses every whitespace run (newlines included) to one space.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Collapses horizontal whitespace to single spaces and blank-line runs to a
/// single newline, keeping the line structure.
pub fn normalize_lines(text: &str) -> String {
    let spaced = HORIZONTAL_RUN.replace_all(text, " ");
    LINE_BREAK_RUN
        .replace_all(&spaced, "\n")
        .trim()
        .to_string()
}

/// True if the text has at least one run of three or more ASCII letters.
pub fn has_readable_words(text: &str) -> bool {
    READABLE_WORD.is_match(text)
}

/// Every run of three or more ASCII letters, in order.
pub fn readable_words(text: &str) -> impl Iterator<Item = &str> {
    READABLE_WORD.find_iter(text).map(|m| m.as_str())
}

/// Decodes an uploaded `.txt` file. Invalid UTF-8 is replaced rather than
/// rejected.
pub fn extract_plain_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let text = String::from_utf8_lossy(bytes).into_owned();
    if char_len(&text) < MIN_DOCUMENT_CHARS {
        return Err(ExtractionError::TooShort);
    }
    Ok(text)
}
