//! Per-record predicates for sample selection, plus the date-window lookup
//! that relies on the dataset being sorted by date.

use crate::date::Day;
use crate::query::SampleQuery;
use crate::record::Comment;
use crate::tokenize::tokens;
use ahash::AHashSet;

/// Case-insensitive lookup of one term. Terms need not be pre-normalized.
fn has_token(toks: &AHashSet<String>, term: &str) -> bool {
    let term = term.trim();
    if term.chars().any(char::is_uppercase) {
        toks.contains(term.to_lowercase().as_str())
    } else {
        toks.contains(term)
    }
}

/// Blank terms are ignored.
pub fn contains_all(toks: &AHashSet<String>, terms: &[String]) -> bool {
    terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .all(|t| has_token(toks, t))
}

pub fn contains_none(toks: &AHashSet<String>, terms: &[String]) -> bool {
    !terms.iter().any(|t| has_token(toks, t))
}

/// Length + term gates. Date bounds are handled by the caller's window scan.
pub fn qualifies(c: &Comment, q: &SampleQuery) -> bool {
    if c.word_count() < q.minimum_words {
        return false;
    }
    if !q.needs_tokens() {
        return true;
    }
    let toks: AHashSet<String> = tokens(&c.text).into_iter().collect();
    contains_all(&toks, &q.must_include) && contains_none(&toks, &q.must_exclude)
}

/// Records inside `[start, end]` of a date-sorted slice.
/// Skips to the first day >= `start`, then stops at the first day > `end`.
pub fn date_window(sorted: &[Comment], start: Day, end: Day) -> &[Comment] {
    if start > end {
        return &[];
    }
    let lo = sorted.partition_point(|c| c.date < start);
    let len = sorted[lo..].iter().take_while(|c| c.date <= end).count();
    &sorted[lo..lo + len]
}
