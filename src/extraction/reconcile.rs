//! Candidate suggestions for a resolved error span.

use log::debug;

use crate::checker::GrammarChecker;
use crate::error::Result;
use crate::extraction::span::ErrorSpan;

/// Ranked candidate replacements the checker offers for exactly `span`.
///
/// Only matches covering precisely `[span.start, span.end())` count;
/// overlapping matches are ignored. Candidate lists of several exact
/// matches are concatenated in the order the checker returned them, so a
/// candidate's index is its rank.
pub fn collect_suggestions(
    checker: &dyn GrammarChecker,
    sentence: &str,
    span: ErrorSpan,
) -> Result<Vec<String>> {
    let matches = checker.check(sentence)?;

    let candidates: Vec<String> = matches
        .into_iter()
        .filter(|m| m.spans(span.start, span.len))
        .flat_map(|m| m.suggested_replacements)
        .collect();

    debug!(
        "{} offered {} candidate(s) for span {}..{}",
        checker.name(),
        candidates.len(),
        span.start,
        span.end()
    );
    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::RuleMatch;
    use crate::error::FeatureError;

    struct Fixed(Vec<RuleMatch>);

    impl GrammarChecker for Fixed {
        fn check(&self, _sentence: &str) -> Result<Vec<RuleMatch>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct Failing;

    impl GrammarChecker for Failing {
        fn check(&self, _sentence: &str) -> Result<Vec<RuleMatch>> {
            Err(FeatureError::checker("model unavailable"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn strings(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_exact_span_only() {
        let checker = Fixed(vec![
            RuleMatch::new(0, 1, "R", strings(&["A"])),
            RuleMatch::new(2, 6, "R", strings(&["have", "hive"])),
            RuleMatch::new(2, 5, "R", strings(&["overlap"])),
            RuleMatch::new(1, 6, "R", strings(&["overlap"])),
        ]);

        let candidates =
            collect_suggestions(&checker, "I havv a cat.", ErrorSpan { start: 2, len: 4 }).unwrap();
        assert_eq!(candidates, strings(&["have", "hive"]));
    }

    #[test]
    fn test_multiple_exact_matches_concatenate() {
        let checker = Fixed(vec![
            RuleMatch::new(2, 6, "SPELLER", strings(&["have"])),
            RuleMatch::new(2, 6, "GRAMMAR", strings(&["has", "have"])),
        ]);

        let candidates =
            collect_suggestions(&checker, "I havv a cat.", ErrorSpan { start: 2, len: 4 }).unwrap();
        assert_eq!(candidates, strings(&["have", "has", "have"]));
    }

    #[test]
    fn test_no_matching_span() {
        let checker = Fixed(vec![RuleMatch::new(7, 8, "R", strings(&["an"]))]);

        let candidates =
            collect_suggestions(&checker, "I havv a cat.", ErrorSpan { start: 2, len: 4 }).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_checker_failure_propagates() {
        let err = collect_suggestions(&Failing, "x", ErrorSpan { start: 0, len: 1 }).unwrap_err();
        assert!(err.is_record_level());
    }
}
