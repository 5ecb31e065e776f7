//! Extractor configuration.
//!
//! Settings are read from a TOML key/value file where every key is
//! optional:
//!
//! ```toml
//! output_csv_filename = "features.csv"
//! database_path = "corrections.sqlite"
//! language = "en-US"
//! context_length = 2
//! log_frequency = 100
//! limit = 10000
//!
//! [[checkers]]
//! rule_id = "GERMAN_SPELLER_RULE"
//! dictionary = "dictionaries/de.txt"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::checker::{CheckerRegistry, GrammarChecker, SpellingChecker, DEFAULT_SPELLING_RULE_ID};
use crate::error::{FeatureError, Result};
use crate::extraction::DEFAULT_CONTEXT_LENGTH;
use crate::record::{DEFAULT_RULE_PATTERNS, RecordQuery};
use crate::spelling::{BuiltinDictionary, SuggestionConfig};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILENAME: &str = "features-extractor.toml";

/// Binding of one rule identifier to a dictionary-backed checker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Rule identifier routed to this checker.
    pub rule_id: String,
    /// Word list file, one `word` or `word frequency` per line.
    pub dictionary: PathBuf,
    /// Maximum edit distance of suggestions.
    #[serde(default = "default_max_distance")]
    pub max_distance: usize,
    /// Maximum number of suggestions per flagged span.
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
}

fn default_max_distance() -> usize {
    SuggestionConfig::default().max_distance
}

fn default_max_suggestions() -> usize {
    SuggestionConfig::default().max_suggestions
}

impl CheckerConfig {
    fn suggestion_config(&self) -> SuggestionConfig {
        SuggestionConfig {
            max_distance: self.max_distance,
            max_suggestions: self.max_suggestions,
            ..Default::default()
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output CSV path.
    pub output_csv_filename: PathBuf,
    /// TSV record source; preferred over the database when set.
    pub input_tsv_filename: Option<PathBuf>,
    /// SQLite record source.
    pub database_path: Option<PathBuf>,
    /// SQL `LIKE` patterns selecting speller rule identifiers.
    pub rule_patterns: Vec<String>,
    /// Only read records in this language.
    pub language: Option<String>,
    /// Maximum context width in words.
    pub context_length: usize,
    /// Log progress every this many records.
    pub log_frequency: usize,
    /// Maximum number of records to process.
    pub limit: Option<usize>,
    /// Number of leading records to skip.
    pub offset: Option<usize>,
    /// Process records on a thread pool.
    pub parallel: bool,
    /// Worker threads for parallel processing.
    pub workers: usize,
    /// Records handed to the pool at once.
    pub chunk_size: usize,
    /// Write a header row to the output.
    pub write_header: bool,
    /// Word list for the fallback checker; built-in English when unset.
    pub default_dictionary: Option<PathBuf>,
    /// Per-rule checker bindings.
    pub checkers: Vec<CheckerConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output_csv_filename: PathBuf::from("features.csv"),
            input_tsv_filename: None,
            database_path: None,
            rule_patterns: DEFAULT_RULE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            language: None,
            context_length: DEFAULT_CONTEXT_LENGTH,
            log_frequency: 100,
            limit: None,
            offset: None,
            parallel: false,
            workers: num_cpus::get(),
            chunk_size: 256,
            write_header: true,
            default_dictionary: None,
            checkers: Vec::new(),
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config '{}'", path.display()))?;
        Ok(Self::from_toml(&text)
            .with_context(|| format!("loading config '{}'", path.display()))?)
    }

    /// Load a configuration file, falling back to defaults when it does not
    /// exist. A file that exists but does not parse is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => {
                let config = Self::from_toml(&text)
                    .with_context(|| format!("loading config '{}'", path.display()))?;
                info!("properties loaded from '{}'", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("can't load config '{}', using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("context_length", self.context_length),
            ("log_frequency", self.log_frequency),
            ("workers", self.workers),
            ("chunk_size", self.chunk_size),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(FeatureError::invalid_config(format!(
                    "{key} must be at least 1"
                )));
            }
        }
        Ok(())
    }

    /// SQL filters derived from this configuration.
    pub fn record_query(&self) -> RecordQuery {
        RecordQuery {
            rule_patterns: self.rule_patterns.clone(),
            language: self.language.clone(),
            limit: self.limit,
            offset: self.offset,
        }
    }

    /// Build the checker registry, loading every configured dictionary.
    pub fn build_registry(&self) -> Result<CheckerRegistry> {
        let default: Arc<dyn GrammarChecker> = match &self.default_dictionary {
            Some(path) => {
                info!("loading default dictionary '{}'", path.display());
                Arc::new(
                    SpellingChecker::from_file(
                        DEFAULT_SPELLING_RULE_ID,
                        path,
                        SuggestionConfig::default(),
                    )
                    .with_context(|| format!("default dictionary '{}'", path.display()))?,
                )
            }
            None => Arc::new(SpellingChecker::new(
                DEFAULT_SPELLING_RULE_ID,
                BuiltinDictionary::english(),
                SuggestionConfig::default(),
            )),
        };

        let mut builder = CheckerRegistry::builder();
        for binding in &self.checkers {
            info!(
                "binding rule '{}' to dictionary '{}'",
                binding.rule_id,
                binding.dictionary.display()
            );
            let checker = SpellingChecker::from_file(
                binding.rule_id.clone(),
                &binding.dictionary,
                binding.suggestion_config(),
            )
            .with_context(|| {
                format!(
                    "dictionary '{}' for rule '{}'",
                    binding.dictionary.display(),
                    binding.rule_id
                )
            })?;
            builder = builder.bind(binding.rule_id.clone(), Arc::new(checker));
        }

        Ok(builder.build(default))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::{NamedTempFile, TempDir};

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output_csv_filename, PathBuf::from("features.csv"));
        assert_eq!(config.context_length, 2);
        assert_eq!(config.log_frequency, 100);
        assert!(config.write_header);
        assert!(config.limit.is_none());
        assert_eq!(config.rule_patterns.len(), 3);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            output_csv_filename = "out.csv"
            context_length = 3
            limit = 500
            language = "en-US"
            "#,
        )
        .unwrap();

        assert_eq!(config.output_csv_filename, PathBuf::from("out.csv"));
        assert_eq!(config.context_length, 3);
        assert_eq!(config.limit, Some(500));
        assert_eq!(config.log_frequency, 100);

        let query = config.record_query();
        assert_eq!(query.language.as_deref(), Some("en-US"));
        assert_eq!(query.limit, Some(500));
    }

    #[test]
    fn test_checker_bindings() {
        let config = Config::from_toml(
            r#"
            [[checkers]]
            rule_id = "GERMAN_SPELLER_RULE"
            dictionary = "de.txt"
            max_suggestions = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.checkers.len(), 1);
        assert_eq!(config.checkers[0].rule_id, "GERMAN_SPELLER_RULE");
        assert_eq!(config.checkers[0].max_suggestions, 3);
        assert_eq!(config.checkers[0].max_distance, 2);
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_toml("context_length = 0").unwrap_err();
        assert!(matches!(err, FeatureError::Config(_)));

        let err = Config::from_toml("context_length = \"two\"").unwrap_err();
        assert!(matches!(err, FeatureError::ConfigParse(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_or_default_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "log_frequency = 7").unwrap();

        let config = Config::load_or_default(file.path()).unwrap();
        assert_eq!(config.log_frequency, 7);
    }

    #[test]
    fn test_build_registry_with_bound_dictionary() {
        let mut words = NamedTempFile::new().unwrap();
        writeln!(words, "haus 50").unwrap();
        writeln!(words, "ein 80").unwrap();

        let mut config = Config::default();
        config.checkers.push(CheckerConfig {
            rule_id: "GERMAN_SPELLER_RULE".to_string(),
            dictionary: words.path().to_path_buf(),
            max_distance: 2,
            max_suggestions: 5,
        });

        let registry = config.build_registry().unwrap();
        assert!(registry.is_bound("GERMAN_SPELLER_RULE"));

        let matches = registry
            .checker_for("GERMAN_SPELLER_RULE")
            .check("Ein Hauss")
            .unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].suggested_replacements[0], "Haus");

        assert_eq!(
            registry.checker_for("MORFOLOGIK_RULE_EN_US").name(),
            "spelling:SPELLING_RULE"
        );
    }

    #[test]
    fn test_build_registry_missing_dictionary() {
        let mut config = Config::default();
        config.default_dictionary = Some(PathBuf::from("/nonexistent/words.txt"));
        let err = config.build_registry().err().unwrap();
        assert!(matches!(err, FeatureError::Anyhow(_)));
        assert!(err.to_string().starts_with("default dictionary '/nonexistent/words.txt': "));
    }

    #[test]
    fn test_missing_binding_dictionary_names_rule() {
        let config = Config {
            checkers: vec![CheckerConfig {
                rule_id: "GERMAN_SPELLER_RULE".to_string(),
                dictionary: PathBuf::from("/nonexistent/de.txt"),
                max_distance: default_max_distance(),
                max_suggestions: default_max_suggestions(),
            }],
            ..Default::default()
        };

        let err = config.build_registry().err().unwrap();
        assert!(!err.is_record_level());
        let message = err.to_string();
        assert!(message.contains("'/nonexistent/de.txt'"));
        assert!(message.contains("'GERMAN_SPELLER_RULE'"));
    }

    #[test]
    fn test_load_names_the_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "context_length = \"two\"").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, FeatureError::Anyhow(_)));
        assert!(err.to_string().contains(&file.path().display().to_string()));

        let err = Config::load("/nonexistent/features-extractor.toml").unwrap_err();
        assert!(err.to_string().starts_with("reading config '/nonexistent/features-extractor.toml': "));
    }
}
