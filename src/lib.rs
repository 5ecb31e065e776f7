//! # correction-features
//!
//! Turns recorded spelling corrections into labeled feature rows for
//! training a suggestion-ranking model.
//!
//! Each record holds an original sentence, its corrected form, the flagged
//! text, the replacement the user picked and that replacement's rank among
//! the checker's suggestions. For each record the extractor
//!
//! - locates the flagged span where the two sentences diverge,
//! - takes a word-bounded context window on both sides of it,
//! - asks a [`GrammarChecker`](checker::GrammarChecker) for its ranked
//!   candidates on exactly that span,
//! - and emits one row for the user's choice plus one per other candidate.
//!
//! ```
//! use std::sync::Arc;
//! use correction_features::prelude::*;
//!
//! let registry = CheckerRegistry::with_default(Arc::new(SpellingChecker::english()));
//! let extractor = FeatureExtractor::new(registry);
//!
//! let record = CorrectionRecord::new("I havv a cat.", "I have a cat.", "havv", "have", 0);
//! let features = extractor.process(&record).unwrap();
//!
//! assert_eq!(features.rows[0].left_context, "I havv");
//! assert_eq!(features.rows[0].right_context, "havv a cat");
//! assert!(features.rows[0].selected_by_user);
//! ```

pub mod batch;
pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod output;
pub mod record;
pub mod spelling;

pub mod prelude {
    pub use crate::batch::{BatchProcessor, BatchSummary};
    pub use crate::checker::{CheckerRegistry, GrammarChecker, RuleMatch, SpellingChecker};
    pub use crate::config::Config;
    pub use crate::error::{FeatureError, Result};
    pub use crate::extraction::{ContextWindow, ErrorSpan, FeatureExtractor, FeatureRow, RecordFeatures};
    pub use crate::output::FeatureWriter;
    pub use crate::record::{CorrectionRecord, SqlRecordSource, TsvRecordReader, UNRANKED_POSITION};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
