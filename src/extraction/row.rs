//! Labeled feature rows.

use serde::{Deserialize, Serialize};

use crate::extraction::context::ContextWindow;
use crate::record::{CorrectionRecord, UNRANKED_POSITION};

/// One training row: context, flagged text, one replacement candidate,
/// its rank, and whether the user picked it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub left_context: String,
    pub right_context: String,
    pub covered_string: String,
    pub replacement_string: String,
    pub replacement_position: i32,
    pub selected_by_user: bool,
}

/// Build the rows for one record.
///
/// The first row is always the primary row describing the user's own
/// choice. Each candidate that differs from that choice adds an alternative
/// row ranked by its index. A candidate equal to the choice instead moves
/// the primary row to the candidate's rank, unless the recorded rank is the
/// unranked sentinel. With no candidates at all, a ranked primary row is
/// placed at rank 0.
pub fn build_feature_rows(
    record: &CorrectionRecord,
    context: &ContextWindow,
    candidates: &[String],
) -> Vec<FeatureRow> {
    let mut primary = FeatureRow {
        left_context: context.left.clone(),
        right_context: context.right.clone(),
        covered_string: record.covered.clone(),
        replacement_string: record.replacement.clone(),
        replacement_position: record.suggestion_pos,
        selected_by_user: record.suggestion_pos != UNRANKED_POSITION,
    };

    let mut alternatives = Vec::new();
    for (rank, candidate) in candidates.iter().enumerate() {
        let rank = rank as i32;
        if *candidate == record.replacement {
            if primary.replacement_position != UNRANKED_POSITION {
                primary.replacement_position = rank;
            }
        } else {
            alternatives.push(FeatureRow {
                left_context: primary.left_context.clone(),
                right_context: primary.right_context.clone(),
                covered_string: primary.covered_string.clone(),
                replacement_string: candidate.clone(),
                replacement_position: rank,
                selected_by_user: false,
            });
        }
    }

    if candidates.is_empty() && primary.replacement_position != UNRANKED_POSITION {
        primary.replacement_position = 0;
    }

    let mut rows = Vec::with_capacity(1 + alternatives.len());
    rows.push(primary);
    rows.extend(alternatives);
    rows
}
