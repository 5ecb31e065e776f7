//! Spelling suggestion generation.

use std::cmp::Ordering;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::spelling::dictionary::SpellingDictionary;
use crate::spelling::levenshtein::levenshtein_distance_threshold;

/// A spelling suggestion with a score indicating confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// The suggested word.
    pub word: String,
    /// Confidence score (higher is better, 0.0 to 1.0).
    pub score: f64,
    /// Edit distance from the original word.
    pub distance: usize,
    /// Frequency of the suggested word in the dictionary.
    pub frequency: u32,
}

impl Suggestion {
    /// Best first; equal scores fall back to the word so the order is stable.
    fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.word.cmp(&other.word))
    }
}

/// Configuration for spelling suggestion generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// Maximum edit distance to consider (1 or 2).
    pub max_distance: usize,
    /// Maximum number of suggestions to return.
    pub max_suggestions: usize,
    /// Minimum frequency threshold for suggestions.
    pub min_frequency: u32,
    /// Weight for edit distance in scoring.
    pub distance_weight: f64,
    /// Weight for word frequency in scoring.
    pub frequency_weight: f64,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        SuggestionConfig {
            max_distance: 2,
            max_suggestions: 5,
            min_frequency: 1,
            distance_weight: 0.6,
            frequency_weight: 0.4,
        }
    }
}

/// Ranks dictionary words close to a misspelled token.
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    dictionary: SpellingDictionary,
    config: SuggestionConfig,
}

impl SuggestionEngine {
    /// Create a new suggestion engine with the given dictionary.
    pub fn new(dictionary: SpellingDictionary) -> Self {
        Self::with_config(dictionary, SuggestionConfig::default())
    }

    /// Create a new suggestion engine with custom configuration.
    pub fn with_config(dictionary: SpellingDictionary, config: SuggestionConfig) -> Self {
        SuggestionEngine { dictionary, config }
    }

    /// Check if a word exists in the dictionary.
    pub fn is_correct(&self, word: &str) -> bool {
        self.dictionary.contains(word)
    }

    /// Get suggestions for a potentially misspelled word, best first.
    pub fn suggest(&self, word: &str) -> Vec<Suggestion> {
        let word = word.to_lowercase();

        if self.dictionary.contains(&word) {
            let frequency = self.dictionary.frequency(&word);
            return vec![Suggestion {
                word,
                score: 1.0,
                distance: 0,
                frequency,
            }];
        }

        let mut suggestions: Vec<Suggestion> = self
            .candidates(&word)
            .into_iter()
            .filter_map(|candidate| {
                let distance =
                    levenshtein_distance_threshold(&word, &candidate, self.config.max_distance)?;
                let frequency = self.dictionary.frequency(&candidate);
                if frequency < self.config.min_frequency {
                    return None;
                }
                let score = self.score(&word, &candidate, distance, frequency);
                Some(Suggestion {
                    word: candidate,
                    score,
                    distance,
                    frequency,
                })
            })
            .collect();

        suggestions.sort_by(Suggestion::rank_cmp);
        suggestions.truncate(self.config.max_suggestions);
        suggestions
    }

    /// Dictionary words reachable within the configured number of edits.
    fn candidates(&self, word: &str) -> AHashSet<String> {
        let first = edits(word);
        let mut candidates: AHashSet<String> = first
            .iter()
            .filter(|c| self.dictionary.contains(c))
            .cloned()
            .collect();

        if self.config.max_distance >= 2 {
            for edit in &first {
                candidates.extend(
                    edits(edit)
                        .into_iter()
                        .filter(|c| self.dictionary.contains(c)),
                );
            }
        }

        candidates
    }

    fn score(&self, original: &str, candidate: &str, distance: usize, frequency: u32) -> f64 {
        let distance_score = 1.0 / (1.0 + distance as f64);

        let total = self.dictionary.total_frequency().max(2) as f64;
        let frequency_score = if frequency == 0 {
            0.0
        } else {
            (frequency as f64).ln().max(0.0) / total.ln()
        };

        let length_factor = if original.chars().count() == candidate.chars().count() {
            1.0
        } else {
            0.9
        };

        let base = distance_score * self.config.distance_weight
            + frequency_score * self.config.frequency_weight;

        (base * length_factor * prefix_bonus(original, candidate) * keyboard_bonus(original, candidate))
            .min(1.0)
    }
}

/// All single-character edits of `word` over the lowercase latin alphabet.
fn edits(word: &str) -> AHashSet<String> {
    let chars: Vec<char> = word.chars().collect();
    let len = chars.len();
    let mut out = AHashSet::new();

    for i in 0..len {
        let mut deleted = chars.clone();
        deleted.remove(i);
        out.insert(deleted.into_iter().collect());
    }

    for i in 0..len.saturating_sub(1) {
        let mut swapped = chars.clone();
        swapped.swap(i, i + 1);
        out.insert(swapped.into_iter().collect());
    }

    for ch in 'a'..='z' {
        for i in 0..len {
            if chars[i] != ch {
                let mut replaced = chars.clone();
                replaced[i] = ch;
                out.insert(replaced.into_iter().collect());
            }
        }
        for i in 0..=len {
            let mut inserted = chars.clone();
            inserted.insert(i, ch);
            out.insert(inserted.into_iter().collect());
        }
    }

    out
}

/// 1.0 (no common prefix) up to 1.2 (one word prefixes the other).
fn prefix_bonus(original: &str, candidate: &str) -> f64 {
    let common = original
        .chars()
        .zip(candidate.chars())
        .take_while(|(a, b)| a == b)
        .count();
    let longest = original.chars().count().max(candidate.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 + (common as f64 / longest as f64) * 0.2
}

const QWERTY_ROWS: [&str; 3] = ["qwertyuiop", "asdfghjkl", "zxcvbnm"];

fn key_position(ch: char) -> Option<(i32, i32)> {
    QWERTY_ROWS.iter().enumerate().find_map(|(row, keys)| {
        keys.find(ch.to_ascii_lowercase())
            .map(|col| (row as i32, col as i32))
    })
}

/// Whether two letters sit next to each other on a QWERTY keyboard.
pub fn is_adjacent_key(a: char, b: char) -> bool {
    match (key_position(a), key_position(b)) {
        (Some((ra, ca)), Some((rb, cb))) => {
            a != b && (ra - rb).abs() <= 1 && (ca - cb).abs() <= 1
        }
        _ => false,
    }
}

/// 10% bonus when a same-length candidate differs only by slips onto
/// neighbouring keys.
fn keyboard_bonus(original: &str, candidate: &str) -> f64 {
    if original.chars().count() != candidate.chars().count() {
        return 1.0;
    }
    let mut slips = original
        .chars()
        .zip(candidate.chars())
        .filter(|(a, b)| a != b)
        .peekable();
    if slips.peek().is_none() {
        return 1.0;
    }
    if slips.all(|(a, b)| is_adjacent_key(a, b)) {
        1.1
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spelling::dictionary::BuiltinDictionary;

    fn small_dictionary() -> SpellingDictionary {
        SpellingDictionary::from_pairs([
            ("have", 500),
            ("hive", 20),
            ("hello", 300),
            ("help", 200),
            ("cat", 100),
            ("car", 100),
            ("cart", 10),
        ])
    }

    #[test]
    fn test_known_word_is_its_own_suggestion() {
        let engine = SuggestionEngine::new(small_dictionary());

        let suggestions = engine.suggest("Hello");
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].word, "hello");
        assert_eq!(suggestions[0].distance, 0);
        assert!((suggestions[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_suggest_typo() {
        let engine = SuggestionEngine::new(small_dictionary());

        let suggestions = engine.suggest("havv");
        assert!(!suggestions.is_empty());
        assert_eq!(suggestions[0].word, "have");
        assert_eq!(suggestions[0].distance, 1);
    }

    #[test]
    fn test_suggest_respects_limits() {
        let config = SuggestionConfig {
            max_distance: 1,
            max_suggestions: 2,
            ..Default::default()
        };
        let engine = SuggestionEngine::with_config(small_dictionary(), config);

        let suggestions = engine.suggest("caz");
        assert!(suggestions.len() <= 2);
        assert!(suggestions.iter().all(|s| s.distance <= 1));
    }

    #[test]
    fn test_suggest_is_deterministic() {
        let engine = SuggestionEngine::new(BuiltinDictionary::english());

        let first = engine.suggest("wnet");
        for _ in 0..5 {
            assert_eq!(engine.suggest("wnet"), first);
        }
    }

    #[test]
    fn test_equal_scores_order_by_word() {
        let dict = SpellingDictionary::from_pairs([("cat", 100), ("car", 100)]);
        let engine = SuggestionEngine::new(dict);

        let words: Vec<String> = engine.suggest("cax").into_iter().map(|s| s.word).collect();
        assert_eq!(words, vec!["car", "cat"]);
    }

    #[test]
    fn test_edits() {
        let out = edits("cat");

        assert!(out.contains("at"));
        assert!(out.contains("act"));
        assert!(out.contains("bat"));
        assert!(out.contains("cart"));
        assert!(out.len() > 50);
    }

    #[test]
    fn test_adjacent_keys() {
        assert!(is_adjacent_key('g', 'h'));
        assert!(is_adjacent_key('e', 'D'));
        assert!(!is_adjacent_key('q', 'p'));
        assert!(!is_adjacent_key('a', 'a'));
        assert!(!is_adjacent_key('1', 'a'));
    }

    #[test]
    fn test_prefix_bonus() {
        assert!(prefix_bonus("search", "searching") > prefix_bonus("search", "church"));
        assert!((prefix_bonus("", "") - 1.0).abs() < 1e-9);
    }
}
