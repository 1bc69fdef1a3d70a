//! Small reducers used by the trend builder: term counts over a sample, with a merge helper.

use crate::record::Comment;
use crate::tokenize::for_each_token;
use ahash::AHashMap;

/// Occurrences of each tracked term plus the total token count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TermCounts {
    pub counts: AHashMap<String, u64>,
    pub total_tokens: u64,
}

impl TermCounts {
    pub fn count(&self, term: &str) -> u64 {
        self.counts.get(term).copied().unwrap_or(0)
    }

    /// `count / (total + 1e-7)`: zero-token days give 0.0 instead of NaN.
    pub fn frequency(&self, term: &str) -> f64 {
        self.count(term) as f64 / (self.total_tokens as f64 + 0.000_000_1)
    }
}

/// Count `terms` (already lowercase) across the tokenized texts of `comments`.
pub fn count_terms(comments: &[&Comment], terms: &[String]) -> TermCounts {
    let mut out = TermCounts::default();
    for t in terms {
        out.counts.insert(t.clone(), 0);
    }
    for c in comments {
        for_each_token(&c.text, |tok| {
            out.total_tokens += 1;
            if let Some(n) = out.counts.get_mut(tok) {
                *n += 1;
            }
        });
    }
    out
}

pub fn merge_counts(total: &mut TermCounts, part: TermCounts) {
    for (k, v) in part.counts {
        *total.counts.entry(k).or_insert(0) += v;
    }
    total.total_tokens += part.total_tokens;
}
