//! Locating the flagged substring within the original sentence.

use serde::{Deserialize, Serialize};

/// Exact position of the flagged text in a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSpan {
    /// Byte offset of the first flagged character.
    pub start: usize,
    /// Byte length of the flagged text.
    pub len: usize,
}

impl ErrorSpan {
    /// Resolve the span of `covered` around the divergence at `diff_index`.
    pub fn resolve(sentence: &str, covered: &str, diff_index: usize) -> Option<Self> {
        resolve_error_start(sentence, covered, diff_index).map(|start| ErrorSpan {
            start,
            len: covered.len(),
        })
    }

    /// Byte offset just past the flagged text.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// The flagged text, if the span lies within `sentence`.
    pub fn slice<'a>(&self, sentence: &'a str) -> Option<&'a str> {
        sentence.get(self.start..self.end())
    }
}

/// Start offset of `covered` in `sentence`, anchored on the divergent
/// character at `diff_index`.
///
/// Every position `p` in `covered` holding the divergent character gives a
/// candidate start `diff_index - p`. Candidates are tried in order of `p`,
/// left to right, and the first one where `covered` actually occurs wins.
/// Returns `None` if no candidate validates.
pub fn resolve_error_start(sentence: &str, covered: &str, diff_index: usize) -> Option<usize> {
    let divergent = sentence.get(diff_index..)?.chars().next()?;

    covered
        .char_indices()
        .filter(|&(_, ch)| ch == divergent)
        .filter_map(|(p, _)| diff_index.checked_sub(p))
        .find(|&start| sentence.get(start..start + covered.len()) == Some(covered))
}
