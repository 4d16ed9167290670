//! Token estimation for usage reporting.

/// Estimate the number of completion tokens in `text`.
///
/// This is not a tokenizer. Every ASCII character counts as one token and every
/// other character counts as two, which roughly matches English prose on one side
/// and CJK scripts on the other. Deployed clients compare usage numbers against
/// this exact heuristic, so it must stay as is.
///
/// Characters are counted as Unicode scalar values, never as bytes.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
}
