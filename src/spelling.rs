//! Dictionary-based spelling suggestions.
//!
//! This module backs the default grammar checker: a frequency dictionary,
//! bounded edit distance, and a suggestion engine that ranks dictionary
//! words close to a misspelled token.

pub mod dictionary;
pub mod levenshtein;
pub mod suggest;

pub use dictionary::*;
pub use levenshtein::*;
pub use suggest::*;
