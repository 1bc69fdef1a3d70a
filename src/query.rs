//! Sample selection spec and normalization helpers used by the filters.

use crate::date::Day;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use time::macros::date;

pub const DEFAULT_START: Day = Day::from_date(date!(2020 - 01 - 01));
pub const DEFAULT_END: Day = Day::from_date(date!(2020 - 04 - 04));
pub const DEFAULT_MIN_WORDS: usize = 10;

/// Reduction policy applied to the qualifying set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectBy {
    #[default]
    Random,
    Score,
}

impl FromStr for SelectBy {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "random" => Ok(SelectBy::Random),
            "score" => Ok(SelectBy::Score),
            other => Err(Error::invalid(format!(
                "select_by has to be \"random\" or \"score\" but not {other}."
            ))),
        }
    }
}

impl fmt::Display for SelectBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SelectBy::Random => "random",
            SelectBy::Score => "score",
        })
    }
}

/// Filter + reduction spec for `Dataset::sample`.
/// Term lists are matched case-insensitively, whether or not they went through
/// `normalize_terms`.
#[derive(Clone, Debug)]
pub struct SampleQuery {
    pub start: Day,               // inclusive
    pub end: Day,                 // inclusive
    pub number_of_comments: usize,
    pub minimum_words: usize,
    pub select_by: SelectBy,
    pub must_include: Vec<String>,
    pub must_exclude: Vec<String>,
    pub warn_on_shortfall: bool,
}

impl Default for SampleQuery {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            end: DEFAULT_END,
            number_of_comments: usize::MAX,
            minimum_words: DEFAULT_MIN_WORDS,
            select_by: SelectBy::Random,
            must_include: Vec::new(),
            must_exclude: Vec::new(),
            warn_on_shortfall: false,
        }
    }
}

impl SampleQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn date_range(mut self, start: Day, end: Day) -> Self {
        self.start = start;
        self.end = end;
        self
    }
    pub fn day(self, day: Day) -> Self {
        self.date_range(day, day)
    }
    pub fn number_of_comments(mut self, n: usize) -> Self {
        self.number_of_comments = n;
        self
    }
    pub fn minimum_words(mut self, n: usize) -> Self {
        self.minimum_words = n;
        self
    }
    pub fn select_by(mut self, by: SelectBy) -> Self {
        self.select_by = by;
        self
    }
    pub fn must_include<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.must_include = normalize_terms(terms);
        self
    }
    pub fn must_exclude<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.must_exclude = normalize_terms(terms);
        self
    }
    pub fn warn_on_shortfall(mut self, yes: bool) -> Self {
        self.warn_on_shortfall = yes;
        self
    }

    /// Lowercase, sort and dedup term lists after direct field edits.
    pub fn normalize(mut self) -> Self {
        self.must_include = normalize_terms(&self.must_include);
        self.must_exclude = normalize_terms(&self.must_exclude);
        self
    }

    /// Term gates only need tokens when at least one list is non-empty.
    pub fn needs_tokens(&self) -> bool {
        !self.must_include.is_empty() || !self.must_exclude.is_empty()
    }
}

/// Lowercase + trim, drop empties, then sort + dedup.
pub fn normalize_terms<I, S>(terms: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut v: Vec<String> = terms
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    v.sort();
    v.dedup();
    v
}
