//! Dictionary-backed spelling checker.

use std::path::Path;

use log::debug;
use unicode_segmentation::UnicodeSegmentation;

use crate::checker::{GrammarChecker, RuleMatch};
use crate::error::Result;
use crate::spelling::{BuiltinDictionary, SpellingDictionary, SuggestionConfig, SuggestionEngine};

/// Rule id reported for matches from the built-in English dictionary.
pub const DEFAULT_SPELLING_RULE_ID: &str = "SPELLING_RULE";

/// Flags every word missing from a dictionary and offers ranked
/// replacements for it.
///
/// Tokens containing digits are never flagged. Suggestions follow the
/// capitalisation of the flagged word.
#[derive(Debug, Clone)]
pub struct SpellingChecker {
    name: String,
    rule_id: String,
    engine: SuggestionEngine,
}

impl SpellingChecker {
    /// Create a checker over `dictionary`.
    pub fn new(
        rule_id: impl Into<String>,
        dictionary: SpellingDictionary,
        config: SuggestionConfig,
    ) -> Self {
        let rule_id = rule_id.into();
        SpellingChecker {
            name: format!("spelling:{rule_id}"),
            rule_id,
            engine: SuggestionEngine::with_config(dictionary, config),
        }
    }

    /// Checker using the built-in English word list.
    pub fn english() -> Self {
        Self::new(
            DEFAULT_SPELLING_RULE_ID,
            BuiltinDictionary::english(),
            SuggestionConfig::default(),
        )
    }

    /// Checker over a word list loaded from `path`.
    pub fn from_file<P: AsRef<Path>>(
        rule_id: impl Into<String>,
        path: P,
        config: SuggestionConfig,
    ) -> Result<Self> {
        let dictionary = SpellingDictionary::load_from_file(path)?;
        Ok(Self::new(rule_id, dictionary, config))
    }

    /// Rank replacements for one flagged word.
    pub fn suggestions_for(&self, word: &str) -> Vec<String> {
        self.engine
            .suggest(word)
            .into_iter()
            .map(|s| match_case(word, &s.word))
            .collect()
    }
}

impl GrammarChecker for SpellingChecker {
    fn check(&self, sentence: &str) -> Result<Vec<RuleMatch>> {
        let matches: Vec<RuleMatch> = sentence
            .unicode_word_indices()
            .filter(|(_, word)| !word.chars().any(|c| c.is_numeric()))
            .filter(|(_, word)| !self.engine.is_correct(word))
            .map(|(start, word)| {
                RuleMatch::new(
                    start,
                    start + word.len(),
                    self.rule_id.clone(),
                    self.suggestions_for(word),
                )
            })
            .collect();

        debug!("{} flagged {} span(s)", self.name, matches.len());
        Ok(matches)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Copy the capitalisation pattern of `original` onto `suggestion`.
fn match_case(original: &str, suggestion: &str) -> String {
    let letters: Vec<char> = original.chars().filter(|c| c.is_alphabetic()).collect();

    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return suggestion.to_uppercase();
    }

    match original.chars().next() {
        Some(first) if first.is_uppercase() => {
            let mut chars = suggestion.chars();
            match chars.next() {
                Some(head) => head.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        _ => suggestion.to_string(),
    }
}
