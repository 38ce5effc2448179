//! Word tokenizer for the expense classifier
//!
//! Descriptions are reduced to a bag of lowercase ASCII words. Anything that
//! is not a letter, digit or whitespace is deleted outright (so "mcdonald's"
//! becomes "mcdonalds"), and words of two characters or fewer are dropped.

/// Tokens must be strictly longer than this
const MIN_TOKEN_LEN: usize = 2;

/// Split text into classifier tokens, preserving order and duplicates
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| word.len() > MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}
