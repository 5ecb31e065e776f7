//! Levenshtein edit distance.

use std::cmp::min;

/// Minimum number of single-character insertions, deletions or
/// substitutions turning `s1` into `s2`.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    levenshtein_distance_threshold(s1, s2, usize::MAX).unwrap_or(usize::MAX)
}

/// Edit distance bounded by `threshold`.
///
/// Returns `None` as soon as the distance is known to exceed the threshold,
/// which keeps candidate filtering cheap.
pub fn levenshtein_distance_threshold(s1: &str, s2: &str, threshold: usize) -> Option<usize> {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    if a.len().abs_diff(b.len()) > threshold {
        return None;
    }
    if a.is_empty() || b.is_empty() {
        return Some(a.len().max(b.len()));
    }

    // Two rows are enough.
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        let mut row_min = curr[0];

        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = min(min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
            row_min = min(row_min, curr[j + 1]);
        }

        if row_min > threshold {
            return None;
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    let distance = prev[b.len()];
    (distance <= threshold).then_some(distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", ""), 3);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("havv", "have"), 1);
        assert_eq!(levenshtein_distance("straße", "strasse"), 2);
    }

    #[test]
    fn test_levenshtein_distance_threshold() {
        assert_eq!(levenshtein_distance_threshold("havv", "have", 2), Some(1));
        assert_eq!(levenshtein_distance_threshold("kitten", "sitting", 2), None);
        assert_eq!(levenshtein_distance_threshold("a", "abcd", 2), None);
        assert_eq!(levenshtein_distance_threshold("same", "same", 0), Some(0));
    }
}
