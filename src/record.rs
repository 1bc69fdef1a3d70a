use crate::date::Day;
use serde::{Deserialize, Serialize};

/// Column order of every dataset file we read or write.
pub const CSV_HEADER: [&str; 6] = ["date", "author", "subreddit", "score", "url", "text"];

/// Placeholder stored in `url` when the API returned no permalink.
pub const NO_URL: &str = "n/a";

/// One parsed comment row. Extra CSV columns are ignored by serde.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub date: Day,
    pub author: String,
    pub subreddit: String,
    pub score: i64,
    pub url: String,
    pub text: String,
}

impl Comment {
    /// Whitespace-split word count, used for the minimum-length gate.
    #[inline]
    pub fn word_count(&self) -> usize {
        crate::tokenize::word_count(&self.text)
    }
}
