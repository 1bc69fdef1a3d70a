//! The two tokenizers: whitespace words for the length gate, and
//! `\b\w\w+\b` runs on lowercased text for term matching and n-gram counts.

use regex::Regex;
use std::sync::OnceLock;

static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

fn token_re() -> &'static Regex {
    TOKEN_RE.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("static token regex"))
}

#[inline]
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lowercase `text` and return its word-boundary tokens (length >= 2).
pub fn tokens(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    token_re().find_iter(&lower).map(|m| m.as_str().to_string()).collect()
}

/// Call `f` for each token without collecting.
pub fn for_each_token(text: &str, mut f: impl FnMut(&str)) {
    let lower = text.to_lowercase();
    for m in token_re().find_iter(&lower) {
        f(m.as_str());
    }
}
