//! Error types for the correction feature extractor.
//!
//! All fallible operations return [`FeatureError`] through the crate-wide
//! [`Result`] alias. Errors are split into two classes: record-level errors,
//! which spoil a single correction record and are counted and skipped by the
//! batch driver, and fatal errors, which abort the whole batch.
//!
//! # Examples
//!
//! ```
//! use correction_features::error::{FeatureError, Result};
//!
//! fn parse_rank(raw: &str) -> Result<i32> {
//!     raw.trim()
//!         .parse()
//!         .map_err(|_| FeatureError::malformed_record(format!("bad rank '{raw}'")))
//! }
//!
//! let err = parse_rank("first").unwrap_err();
//! assert!(err.is_record_level());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for feature extraction.
#[derive(Error, Debug)]
pub enum FeatureError {
    /// I/O errors (opening sources, writing the sink, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Delimited file errors raised by the csv reader or writer
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// SQLite record source errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A correction record had a missing or unparseable field
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    /// The grammar checker failed on a sentence
    #[error("Checker error: {0}")]
    Checker(String),

    /// Analysis errors (context pattern construction, tokenization)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid configuration values
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// An error with context attached along the way
    #[error("{0:#}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with FeatureError.
pub type Result<T> = std::result::Result<T, FeatureError>;

impl FeatureError {
    /// Create a new malformed record error.
    pub fn malformed_record<S: Into<String>>(msg: S) -> Self {
        FeatureError::MalformedRecord(msg.into())
    }

    /// Create a new checker error.
    pub fn checker<S: Into<String>>(msg: S) -> Self {
        FeatureError::Checker(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        FeatureError::Analysis(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        FeatureError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        FeatureError::Other(msg.into())
    }

    /// Whether this error only spoils the record being processed.
    ///
    /// Record-level errors are logged and counted; anything else aborts
    /// the batch.
    pub fn is_record_level(&self) -> bool {
        match self {
            FeatureError::MalformedRecord(_)
            | FeatureError::Checker(_)
            | FeatureError::Analysis(_) => true,
            FeatureError::Csv(e) => !matches!(e.kind(), csv::ErrorKind::Io(_)),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = FeatureError::malformed_record("suggestion_pos 'x' is not an integer");
        assert_eq!(
            error.to_string(),
            "Malformed record: suggestion_pos 'x' is not an integer"
        );

        let error = FeatureError::checker("model not loaded");
        assert_eq!(error.to_string(), "Checker error: model not loaded");

        let error = FeatureError::invalid_config("context_length must be at least 1");
        assert_eq!(
            error.to_string(),
            "Invalid configuration: context_length must be at least 1"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = FeatureError::from(io_error);

        match error {
            FeatureError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_record_level_classification() {
        assert!(FeatureError::malformed_record("x").is_record_level());
        assert!(FeatureError::checker("x").is_record_level());
        assert!(!FeatureError::invalid_config("x").is_record_level());
        assert!(!FeatureError::other("x").is_record_level());

        let io_error = io::Error::new(io::ErrorKind::BrokenPipe, "sink closed");
        assert!(!FeatureError::from(io_error).is_record_level());

        let csv_io = csv::Error::from(io::Error::new(io::ErrorKind::Other, "read failed"));
        assert!(!FeatureError::from(csv_io).is_record_level());
    }
}
