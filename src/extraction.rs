//! Feature extraction from a single correction record.
//!
//! The stages run leaves first:
//!
//! 1. [`difference`] finds where the sentence and its correction diverge.
//! 2. [`span`] resolves that position to the exact offset of the flagged text.
//! 3. [`context`] takes a bounded word window on each side of the span.
//! 4. [`reconcile`] asks the grammar checker for its candidates on that span.
//! 5. [`row`] turns the record, context and candidates into labeled rows.
//!
//! [`pipeline::FeatureExtractor`] wires the stages together. All offsets are
//! byte offsets into UTF-8 text and always fall on char boundaries.

pub mod context;
pub mod difference;
pub mod pipeline;
pub mod reconcile;
pub mod row;
pub mod span;

pub use context::*;
pub use difference::*;
pub use pipeline::*;
pub use reconcile::*;
pub use row::*;
pub use span::*;
