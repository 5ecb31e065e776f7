//! First divergence between a sentence and its correction.

/// Byte offset in `sentence` of the first character where `correction`
/// differs or has already ended.
///
/// The scan is bounded by the length of `sentence`: when `correction` only
/// extends `sentence` past its end, no divergence is reported.
pub fn first_difference_position(sentence: &str, correction: &str) -> Option<usize> {
    let mut corrected = correction.chars();
    sentence
        .char_indices()
        .find(|&(_, ch)| corrected.next() != Some(ch))
        .map(|(offset, _)| offset)
}
