//! Word-level context windows around a flagged span.
//!
//! The left window is the longest run of `n` words (each word followed by
//! its trailing separator) that ends exactly at the flagged text; the right
//! window mirrors it. Both include the flagged text itself. When `n` words
//! are not available on a side, `n` shrinks one at a time and the first
//! non-empty match is kept.
//!
//! Word characters are ASCII only (`[0-9A-Za-z_]`), so a non-ASCII letter
//! splits a word in two.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{FeatureError, Result};
use crate::extraction::span::ErrorSpan;

const WORD: &str = "[0-9A-Za-z_]";
const SEPARATOR: &str = "[^0-9A-Za-z_]";

/// Context on both sides of a flagged span.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextWindow {
    /// Words leading up to and including the flagged text.
    pub left: String,
    /// The flagged text and the words following it.
    pub right: String,
}

impl ContextWindow {
    /// Whether neither side found any context.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

/// Left context of exactly `words` words, or an empty string.
pub fn left_context(sentence: &str, span: ErrorSpan, words: usize) -> Result<String> {
    let (anchor, head, _) = split_at_span(sentence, span)?;
    let pattern = format!("(?:{WORD}+{SEPARATOR}+){{{words}}}{}$", regex::escape(anchor));
    first_match(&pattern, &sentence[..head.len() + anchor.len()])
}

/// Right context of exactly `words` words, or an empty string.
pub fn right_context(sentence: &str, span: ErrorSpan, words: usize) -> Result<String> {
    let (anchor, head, _) = split_at_span(sentence, span)?;
    let pattern = format!("^{}(?:{SEPARATOR}+{WORD}+){{{words}}}", regex::escape(anchor));
    first_match(&pattern, &sentence[head.len()..])
}

/// Widest left context of at most `max_words` words.
pub fn maximal_left_context(sentence: &str, span: ErrorSpan, max_words: usize) -> Result<String> {
    for words in (1..=max_words).rev() {
        let context = left_context(sentence, span, words)?;
        if !context.is_empty() {
            return Ok(context);
        }
    }
    Ok(String::new())
}

/// Widest right context of at most `max_words` words.
pub fn maximal_right_context(sentence: &str, span: ErrorSpan, max_words: usize) -> Result<String> {
    for words in (1..=max_words).rev() {
        let context = right_context(sentence, span, words)?;
        if !context.is_empty() {
            return Ok(context);
        }
    }
    Ok(String::new())
}

/// Left and right context windows of at most `max_words` words each.
///
/// The flagged text is taken from the sentence at `span`, not from the
/// record, so the window is anchored on what is really there.
pub fn extract_context(sentence: &str, span: ErrorSpan, max_words: usize) -> Result<ContextWindow> {
    Ok(ContextWindow {
        left: maximal_left_context(sentence, span, max_words)?,
        right: maximal_right_context(sentence, span, max_words)?,
    })
}

/// Split `sentence` into (flagged text, text before, text after).
fn split_at_span(sentence: &str, span: ErrorSpan) -> Result<(&str, &str, &str)> {
    let anchor = span.slice(sentence).ok_or_else(|| {
        FeatureError::analysis(format!(
            "span {}..{} is outside the sentence of {} bytes",
            span.start,
            span.end(),
            sentence.len()
        ))
    })?;
    Ok((anchor, &sentence[..span.start], &sentence[span.end()..]))
}

fn first_match(pattern: &str, haystack: &str) -> Result<String> {
    let regex = Regex::new(pattern)
        .map_err(|e| FeatureError::analysis(format!("Invalid context pattern: {e}")))?;
    Ok(regex
        .find(haystack)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default())
}
