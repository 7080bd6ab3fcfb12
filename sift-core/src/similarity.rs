//! Free-text similarity between a reference description and a candidate bio
//!
//! Both texts are lower-cased and split into distinct word tokens. A token
//! has a partner on the other side when an equal token exists there, or one
//! whose normalized Levenshtein similarity reaches [`FUZZY_TOKEN_SIMILARITY`].
//! The score is the share of tokens, counted over both sides, that found a
//! partner. With exact partners only this is the Sørensen–Dice coefficient of
//! the two token sets.

use regex::Regex;
use std::sync::LazyLock;
use strsim::normalized_levenshtein;

use crate::{FUZZY_TOKEN_SIMILARITY, MAX_SCORE, MIN_SCORE};

static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{L}\p{N}]+").unwrap()
});

/// Distinct lower-case word tokens, in order of first appearance
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut tokens: Vec<String> = Vec::new();
    for m in TOKEN_REGEX.find_iter(&lowered) {
        if !tokens.iter().any(|t| t == m.as_str()) {
            tokens.push(m.as_str().to_string());
        }
    }
    tokens
}

/// Score how close `candidate` is to `reference`, in `[0, 1]`
///
/// Case-insensitive and symmetric. Empty text scores zero. Text without any
/// word token (emoji, punctuation) only matches an equal token-less text.
pub fn similarity(reference: &str, candidate: &str) -> f64 {
    let left = tokenize(reference);
    let right = tokenize(candidate);

    if left.is_empty() && right.is_empty() {
        return raw_similarity(reference, candidate);
    }
    if left.is_empty() || right.is_empty() {
        return MIN_SCORE;
    }

    let partnered = count_partnered(&left, &right) + count_partnered(&right, &left);
    let score = partnered as f64 / (left.len() + right.len()) as f64;
    score.clamp(MIN_SCORE, MAX_SCORE)
}

fn raw_similarity(reference: &str, candidate: &str) -> f64 {
    let left = reference.trim().to_lowercase();
    let right = candidate.trim().to_lowercase();
    if !left.is_empty() && left == right {
        MAX_SCORE
    } else {
        MIN_SCORE
    }
}

fn count_partnered(tokens: &[String], others: &[String]) -> usize {
    tokens
        .iter()
        .filter(|token| others.iter().any(|other| tokens_match(token, other)))
        .count()
}

fn tokens_match(a: &str, b: &str) -> bool {
    a == b || normalized_levenshtein(a, b) >= FUZZY_TOKEN_SIMILARITY
}
