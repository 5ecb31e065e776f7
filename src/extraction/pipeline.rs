//! Per-record extraction pipeline.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::checker::CheckerRegistry;
use crate::error::Result;
use crate::extraction::context::{ContextWindow, extract_context};
use crate::extraction::difference::first_difference_position;
use crate::extraction::reconcile::collect_suggestions;
use crate::extraction::row::{FeatureRow, build_feature_rows};
use crate::extraction::span::ErrorSpan;
use crate::record::CorrectionRecord;

/// Default context window width in words.
pub const DEFAULT_CONTEXT_LENGTH: usize = 2;

/// Rows extracted from one record, with the span they were anchored on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFeatures {
    /// Resolved error span, `None` when the error could not be localized.
    pub span: Option<ErrorSpan>,
    /// Primary row first, then one row per alternative candidate.
    pub rows: Vec<FeatureRow>,
}

impl RecordFeatures {
    /// Whether the error span was localized.
    pub fn is_resolved(&self) -> bool {
        self.span.is_some()
    }
}

/// Turns correction records into feature rows.
///
/// Holds no per-record state; one extractor can serve many threads as long
/// as its checkers can.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    registry: CheckerRegistry,
    context_length: usize,
}

impl FeatureExtractor {
    /// Create an extractor with the default context width.
    pub fn new(registry: CheckerRegistry) -> Self {
        Self::with_context_length(registry, DEFAULT_CONTEXT_LENGTH)
    }

    /// Create an extractor with a custom context width.
    pub fn with_context_length(registry: CheckerRegistry, context_length: usize) -> Self {
        FeatureExtractor {
            registry,
            context_length,
        }
    }

    /// Get the checker registry.
    pub fn registry(&self) -> &CheckerRegistry {
        &self.registry
    }

    /// Get the maximum context width in words.
    pub fn context_length(&self) -> usize {
        self.context_length
    }

    /// Extract the feature rows for one record.
    ///
    /// A record whose error cannot be localized still yields its primary
    /// row, with empty context and the recorded rank; the checker is not
    /// consulted for it. Checker failures are returned as errors.
    pub fn process(&self, record: &CorrectionRecord) -> Result<RecordFeatures> {
        let span = self.locate(record);

        let (context, candidates) = match span {
            Some(span) => {
                let context = extract_context(&record.sentence, span, self.context_length)?;
                let checker = self.registry.checker_for(&record.rule_id);
                let candidates = collect_suggestions(checker, &record.sentence, span)?;
                (context, candidates)
            }
            None => {
                warn!("Sentence not processed: {}", record.sentence);
                (ContextWindow::default(), Vec::new())
            }
        };

        Ok(RecordFeatures {
            span,
            rows: build_feature_rows(record, &context, &candidates),
        })
    }

    /// Localize the flagged text of `record` in its sentence.
    pub fn locate(&self, record: &CorrectionRecord) -> Option<ErrorSpan> {
        let diff = first_difference_position(&record.sentence, &record.correction);
        debug!("first difference at {diff:?}: {}", record.sentence);

        let span = ErrorSpan::resolve(&record.sentence, &record.covered, diff?);
        debug!("resolved span {span:?} for '{}'", record.covered);
        span
    }
}
