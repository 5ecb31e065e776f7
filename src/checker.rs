//! Grammar-checking capability.
//!
//! The extraction pipeline never inspects how a checker finds errors; it
//! only needs the spans it flags and the ranked replacements for each.
//! [`GrammarChecker`] is that seam. [`CheckerRegistry`] maps rule identifiers
//! to checkers and is built once, then shared read-only.

pub mod registry;
pub mod spelling;

pub use registry::*;
pub use spelling::*;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One span flagged by a checker.
///
/// Positions are byte offsets into the checked sentence, `[from_pos, to_pos)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMatch {
    /// Start of the flagged span.
    pub from_pos: usize,
    /// End of the flagged span (exclusive).
    pub to_pos: usize,
    /// Identifier of the rule that fired.
    pub rule_id: String,
    /// Candidate replacements, best first.
    pub suggested_replacements: Vec<String>,
}

impl RuleMatch {
    /// Create a new rule match.
    pub fn new(
        from_pos: usize,
        to_pos: usize,
        rule_id: impl Into<String>,
        suggested_replacements: Vec<String>,
    ) -> Self {
        RuleMatch {
            from_pos,
            to_pos,
            rule_id: rule_id.into(),
            suggested_replacements,
        }
    }

    /// Whether this match spans exactly `[start, start + len)`.
    pub fn spans(&self, start: usize, len: usize) -> bool {
        self.from_pos == start && self.to_pos == start + len
    }
}

/// A grammar or spelling checker.
///
/// Implementations must be safe to call from several threads at once;
/// their models are loaded up front and read-only while checking.
pub trait GrammarChecker: Send + Sync {
    /// Check a sentence and return every flagged span.
    fn check(&self, sentence: &str) -> Result<Vec<RuleMatch>>;

    /// Get the name of this checker.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_match_spans() {
        let m = RuleMatch::new(2, 6, "R", vec!["have".to_string()]);

        assert!(m.spans(2, 4));
        assert!(!m.spans(2, 3));
        assert!(!m.spans(1, 5));
    }
}
