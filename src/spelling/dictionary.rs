//! Word frequency dictionary for spelling suggestions.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ahash::AHashMap;

use crate::error::Result;

/// A case-insensitive dictionary mapping words to their frequencies.
#[derive(Debug, Clone, Default)]
pub struct SpellingDictionary {
    words: AHashMap<String, u32>,
    total_count: u64,
}

impl SpellingDictionary {
    /// Create a new empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from `(word, frequency)` pairs.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u32)>,
    {
        let mut dictionary = Self::new();
        for (word, frequency) in pairs {
            dictionary.add_word(word, frequency);
        }
        dictionary
    }

    /// Add a word, replacing any previous frequency.
    pub fn add_word(&mut self, word: &str, frequency: u32) {
        let normalized = word.to_lowercase();
        let old = self.words.insert(normalized, frequency).unwrap_or(0);
        self.total_count = self.total_count - old as u64 + frequency as u64;
    }

    /// Check if a word exists in the dictionary.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(&word.to_lowercase())
    }

    /// Get the frequency of a word, 0 if absent.
    pub fn frequency(&self, word: &str) -> u32 {
        self.words.get(&word.to_lowercase()).copied().unwrap_or(0)
    }

    /// Get the total number of unique words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Get the summed frequency of all words.
    pub fn total_frequency(&self) -> u64 {
        self.total_count
    }

    /// Iterate over the stored (lowercased) words.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.keys().map(String::as_str)
    }

    /// Load a dictionary from a text file.
    ///
    /// Each line holds either `word` or `word frequency`. Blank lines and
    /// lines starting with `#` are ignored. A bare word counts as frequency
    /// 1, and repeated bare words accumulate.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut dictionary = Self::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else { continue };
            match parts.next().and_then(|f| f.parse::<u32>().ok()) {
                Some(frequency) => dictionary.add_word(word, frequency),
                None => {
                    let current = dictionary.frequency(word);
                    dictionary.add_word(word, current + 1);
                }
            }
        }

        Ok(dictionary)
    }
}

/// Built-in word lists.
pub struct BuiltinDictionary;

impl BuiltinDictionary {
    /// Common English words with rough corpus frequencies.
    pub fn english() -> SpellingDictionary {
        SpellingDictionary::from_pairs([
            ("the", 1000000),
            ("be", 500000),
            ("to", 450000),
            ("of", 400000),
            ("and", 380000),
            ("a", 350000),
            ("in", 300000),
            ("that", 250000),
            ("have", 200000),
            ("i", 180000),
            ("it", 170000),
            ("for", 160000),
            ("not", 150000),
            ("on", 140000),
            ("with", 130000),
            ("he", 120000),
            ("as", 110000),
            ("you", 100000),
            ("do", 95000),
            ("at", 90000),
            ("this", 85000),
            ("but", 80000),
            ("his", 75000),
            ("by", 70000),
            ("from", 65000),
            ("they", 60000),
            ("we", 55000),
            ("say", 50000),
            ("her", 48000),
            ("she", 46000),
            ("or", 44000),
            ("an", 42000),
            ("will", 40000),
            ("my", 38000),
            ("one", 36000),
            ("all", 34000),
            ("would", 32000),
            ("there", 30000),
            ("their", 28000),
            ("what", 26000),
            ("so", 24000),
            ("up", 22000),
            ("out", 20000),
            ("if", 19000),
            ("about", 18000),
            ("who", 17000),
            ("get", 16000),
            ("which", 15000),
            ("go", 14000),
            ("goes", 6500),
            ("went", 6200),
            ("me", 13000),
            ("when", 12000),
            ("make", 11000),
            ("can", 10000),
            ("like", 9500),
            ("time", 9000),
            ("no", 8500),
            ("is", 8200),
            ("just", 8000),
            ("him", 7500),
            ("hello", 7200),
            ("know", 7000),
            ("world", 6800),
            ("take", 6500),
            ("people", 6000),
            ("into", 5500),
            ("year", 5000),
            ("your", 4800),
            ("good", 4600),
            ("some", 4400),
            ("could", 4200),
            ("them", 4000),
            ("see", 3800),
            ("other", 3600),
            ("than", 3400),
            ("then", 3200),
            ("now", 3000),
            ("look", 2800),
            ("only", 2600),
            ("come", 2400),
            ("its", 2200),
            ("over", 2000),
            ("think", 1900),
            ("also", 1800),
            ("back", 1700),
            ("after", 1600),
            ("use", 1500),
            ("two", 1400),
            ("how", 1300),
            ("our", 1200),
            ("work", 1100),
            ("first", 1000),
            ("well", 950),
            ("way", 900),
            ("even", 850),
            ("new", 800),
            ("want", 750),
            ("because", 700),
            ("any", 650),
            ("these", 600),
            ("give", 550),
            ("day", 500),
            ("most", 480),
            ("us", 460),
            ("was", 420),
            ("are", 400),
            ("been", 380),
            ("has", 360),
            ("had", 340),
            ("were", 320),
            ("said", 300),
            ("each", 280),
            ("during", 240),
            ("where", 220),
            ("did", 200),
            ("does", 190),
            ("doing", 180),
            ("made", 170),
            ("find", 160),
            ("home", 150),
            ("help", 140),
            ("hand", 130),
            ("right", 120),
            ("life", 100),
            ("love", 95),
            ("house", 90),
            ("water", 85),
            ("place", 80),
            ("word", 75),
            ("before", 70),
            ("through", 65),
            ("still", 60),
            ("here", 55),
            ("should", 50),
            ("never", 48),
            ("those", 44),
            ("came", 42),
            ("may", 40),
            ("part", 38),
            ("against", 36),
            ("such", 34),
            ("turn", 32),
            ("every", 30),
            ("point", 26),
            ("small", 24),
            ("end", 22),
            ("why", 20),
            ("cat", 400),
            ("car", 600),
            ("cart", 90),
            ("store", 350),
            ("school", 500),
            ("book", 450),
            ("read", 420),
            ("write", 380),
            ("friend", 300),
            ("yesterday", 200),
            ("tomorrow", 180),
            ("receive", 150),
            ("believe", 260),
            ("separate", 120),
            ("weather", 110),
            ("whether", 240),
            ("definitely", 90),
        ])
    }
}
