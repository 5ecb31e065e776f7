//! Correction records and the sources they are read from.
//!
//! A [`CorrectionRecord`] is one observed instance of a user accepting a
//! correction to a flagged error. Records come either from a tab-delimited
//! export ([`tsv`]) or from a SQLite `corrections` table ([`sql`]).

pub mod sql;
pub mod tsv;

pub use sql::*;
pub use tsv::*;

use serde::{Deserialize, Serialize};

use crate::error::{FeatureError, Result};

/// Rank value meaning "not applicable / not ranked".
pub const UNRANKED_POSITION: i32 = 99;

/// One recorded correction, immutable once read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrectionRecord {
    /// Original sentence text.
    pub sentence: String,
    /// Sentence after the user accepted the correction.
    pub correction: String,
    /// Substring the checker flagged as erroneous.
    pub covered: String,
    /// Replacement the user ultimately chose.
    pub replacement: String,
    /// Rank the user's choice held among the candidates, or [`UNRANKED_POSITION`].
    pub suggestion_pos: i32,
    /// Identifier of the rule that produced the flag.
    pub rule_id: String,
    /// Locale tag, e.g. `en-US`.
    pub language: String,
}

impl CorrectionRecord {
    /// Create a record with an empty rule id and language.
    pub fn new(
        sentence: impl Into<String>,
        correction: impl Into<String>,
        covered: impl Into<String>,
        replacement: impl Into<String>,
        suggestion_pos: i32,
    ) -> Self {
        CorrectionRecord {
            sentence: sentence.into(),
            correction: correction.into(),
            covered: covered.into(),
            replacement: replacement.into(),
            suggestion_pos,
            rule_id: String::new(),
            language: String::new(),
        }
    }

    /// Set the rule id.
    pub fn with_rule_id(mut self, rule_id: impl Into<String>) -> Self {
        self.rule_id = rule_id.into();
        self
    }

    /// Set the language tag.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Whether the user's choice carries a meaningful rank.
    pub fn is_ranked(&self) -> bool {
        self.suggestion_pos != UNRANKED_POSITION
    }
}

/// Parse a `suggestion_pos` field as an integer rank.
pub fn parse_suggestion_pos(raw: &str) -> Result<i32> {
    raw.trim().parse::<i32>().map_err(|e| {
        FeatureError::malformed_record(format!("suggestion_pos '{raw}' is not an integer: {e}"))
    })
}
