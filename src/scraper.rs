//! Pushshift-style comment search: URL building, response mapping to
//! `Comment` rows, single-query and day-by-day scraping to CSV.

use crate::csv_io::write_comments_to_path;
use crate::date::Day;
use crate::error::{Error, Result};
use crate::progress::make_count_progress;
use crate::record::{Comment, NO_URL};
use crate::remote::Fetch;
use reqwest::Url;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use time::macros::date;
use time::UtcOffset;

pub const DEFAULT_ENDPOINT: &str = "https://api.pushshift.io/reddit/search/";
const DEFAULT_START: Day = Day::from_date(date!(1990 - 01 - 01));
const DEFAULT_END: Day = Day::from_date(date!(2030 - 01 - 01));

/// A validated search. Build through `SearchQuery::builder()`.
#[derive(Clone, Debug)]
pub struct SearchQuery {
    endpoint: String,
    search_term: Option<String>,
    subreddit: Option<String>,
    size: u32,
    start: Day,
    end: Day,
    min_score: u64,
    sort_by: Option<String>,
    offset: UtcOffset,
}

#[derive(Clone, Debug)]
pub struct SearchQueryBuilder {
    endpoint: String,
    search_term: Option<String>,
    subreddit: Option<String>,
    size: u32,
    start: Option<String>,
    end: Option<String>,
    min_score: u64,
    sort_by: Option<String>,
    offset: UtcOffset,
}

impl Default for SearchQueryBuilder {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            search_term: None,
            subreddit: None,
            size: 100,
            start: None,
            end: None,
            min_score: 0,
            sort_by: Some("score".to_string()),
            offset: UtcOffset::UTC,
        }
    }
}

impl SearchQueryBuilder {
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = url.into();
        self
    }
    pub fn search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = Some(term.into());
        self
    }
    pub fn subreddit(mut self, sub: impl AsRef<str>) -> Self {
        let s = sub.as_ref().trim();
        self.subreddit = Some(s.strip_prefix("r/").unwrap_or(s).to_string());
        self
    }
    pub fn size(mut self, n: u32) -> Self {
        self.size = n;
        self
    }
    /// `YYYY-MM-DD`, validated in `build()`.
    pub fn start_date(mut self, s: impl Into<String>) -> Self {
        self.start = Some(s.into());
        self
    }
    pub fn end_date(mut self, s: impl Into<String>) -> Self {
        self.end = Some(s.into());
        self
    }
    pub fn day_range(self, start: Day, end: Day) -> Self {
        self.start_date(start.to_string()).end_date(end.to_string())
    }
    pub fn min_score(mut self, n: u64) -> Self {
        self.min_score = n;
        self
    }
    pub fn sort_by(mut self, field: Option<String>) -> Self {
        self.sort_by = field.filter(|s| !s.is_empty());
        self
    }
    pub fn utc_offset(mut self, offset: UtcOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn build(self) -> Result<SearchQuery> {
        let parse = |s: Option<String>, default: Day| -> Result<Day> {
            match s {
                Some(s) => s.parse(),
                None => Ok(default),
            }
        };
        let start = parse(self.start, DEFAULT_START)?;
        let end = parse(self.end, DEFAULT_END)?;
        Url::parse(&self.endpoint)
            .map_err(|e| Error::invalid(format!("bad endpoint {:?}: {e}", self.endpoint)))?;
        Ok(SearchQuery {
            endpoint: self.endpoint,
            search_term: self.search_term.filter(|s| !s.is_empty()),
            subreddit: self.subreddit.filter(|s| !s.is_empty()),
            size: self.size,
            start,
            end,
            min_score: self.min_score,
            sort_by: self.sort_by,
            offset: self.offset,
        })
    }
}

impl SearchQuery {
    pub fn builder() -> SearchQueryBuilder {
        SearchQueryBuilder::default()
    }

    /// Request URL. Date bounds are only sent when they differ from the defaults.
    pub fn query_url(&self) -> String {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(q) = &self.search_term {
            params.push(("q", q.clone()));
        }
        if let Some(s) = &self.subreddit {
            params.push(("subreddit", s.clone()));
        }
        params.push(("size", self.size.to_string()));
        if self.start != DEFAULT_START {
            params.push(("after", self.start.unix_timestamp(self.offset).to_string()));
        }
        if self.end != DEFAULT_END {
            params.push(("before", self.end.unix_timestamp(self.offset).to_string()));
        }
        if let Some(sort) = &self.sort_by {
            params.push(("sort_type", sort.clone()));
            params.push(("sort", "desc".to_string()));
        }

        let mut url = match Url::parse_with_params(&self.endpoint, &params) {
            Ok(u) => u.to_string(),
            // endpoint was validated in build()
            Err(_) => self.endpoint.clone(),
        };
        if self.min_score > 0 {
            url.push_str(&format!("&score=>{}", self.min_score));
        }
        url
    }

    /// Default output name, e.g. `covid_rboston_minscore_2_2020-01-01to2020-01-02`.
    pub fn file_stem(&self) -> String {
        let mut parts = Vec::new();
        if let Some(q) = &self.search_term {
            parts.push(q.clone());
        }
        if let Some(s) = &self.subreddit { parts.push(format!("r{s}")); }
        if self.min_score > 0 {
            parts.push(format!("minscore_{}", self.min_score));
        }
        if self.start != DEFAULT_START || self.end != DEFAULT_END {
            parts.push(format!("{}to{}", self.start, self.end));
        }
        parts.join("_")
    }

    /// Run the search and map every result to a `Comment`.
    pub fn fetch(&self, fetch: &dyn Fetch) -> Result<Vec<Comment>> {
        let url = self.query_url();
        let body = fetch.get(&url)?;
        parse_search_response(&body, self.offset)
    }

    /// Run the search and store the rows as CSV at `out`.
    pub fn scrape_to_csv(&self, fetch: &dyn Fetch, out: &Path) -> Result<usize> {
        let docs = self.fetch(fetch)?;
        write_comments_to_path(out, &docs)?;
        tracing::info!("Found {} comments matching your search query.", docs.len());
        Ok(docs.len())
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    data: Vec<RawComment>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Epoch {
    Int(i64),
    Float(f64),
}

#[derive(Deserialize)]
struct RawComment {
    created_utc: Epoch,
    author: String,
    subreddit: String,
    score: i64,
    permalink: Option<String>,
    body: String,
}

/// Map a `{"data": [...]}` response body to comment rows.
pub fn parse_search_response(body: &[u8], offset: UtcOffset) -> Result<Vec<Comment>> {
    let resp: SearchResponse = serde_json::from_slice(body)
        .map_err(|e| Error::parse(format!("search response: {e}")))?;
    resp.data
        .into_iter()
        .map(|raw| {
            let ts = match raw.created_utc {
                Epoch::Int(t) => t,
                Epoch::Float(t) => t as i64,
            };
            Ok(Comment {
                date: Day::from_unix_timestamp(ts, offset)?,
                author: raw.author,
                subreddit: raw.subreddit,
                score: raw.score,
                url: match raw.permalink {
                    Some(p) => format!("https://www.reddit.com{p}"),
                    None => NO_URL.to_string(),
                },
                text: html_escape::decode_html_entities(&raw.body).into_owned(),
            })
        })
        .collect()
}

/// Day-by-day scrape over `[start, end)`: one query per day, all rows in one CSV.
#[derive(Clone, Debug)]
pub struct DailyScrape {
    pub endpoint: String,
    pub search_term: Option<String>,
    pub subreddit: Option<String>,
    pub start: Day,
    pub end: Day,              // exclusive
    pub per_day: u32,
    pub min_score: u64,
    pub delay: Duration,       // pause between requests
    pub offset: UtcOffset,
    pub progress: bool,
}

impl Default for DailyScrape {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            search_term: None,
            subreddit: None,
            start: Day::from_date(date!(2020 - 01 - 01)),
            end: Day::from_date(date!(2020 - 04 - 26)),
            per_day: 2000,
            min_score: 0,
            delay: Duration::from_secs(1),
            offset: UtcOffset::UTC,
            progress: true,
        }
    }
}

impl DailyScrape {
    /// Queries for each day `d` with `d + 1 <= end`.
    pub fn queries(&self) -> Result<Vec<SearchQuery>> {
        let mut out = Vec::new();
        let mut current = self.start;
        while let Some(next) = current.next() {
            if next > self.end {
                break;
            }
            let mut b = SearchQuery::builder()
                .endpoint(self.endpoint.clone())
                .size(self.per_day)
                .min_score(self.min_score)
                .day_range(current, next)
                .utc_offset(self.offset);
            if let Some(t) = &self.search_term {
                b = b.search_term(t.clone());
            }
            if let Some(s) = &self.subreddit {
                b = b.subreddit(s);
            }
            out.push(b.build()?);
            current = next;
        }
        Ok(out)
    }

    /// Fetch every day, then write a single CSV to `out`. Any failed request aborts the run.
    pub fn run(&self, fetch: &dyn Fetch, out: &Path) -> Result<Vec<Comment>> {
        let queries = self.queries()?;
        let pb = if self.progress {
            Some(make_count_progress(queries.len() as u64, "Scraping days"))
        } else {
            None
        };

        let mut docs = Vec::new();
        for (i, q) in queries.iter().enumerate() {
            if i > 0 && !self.delay.is_zero() {
                std::thread::sleep(self.delay);
            }
            let day = q.fetch(fetch)?;
            tracing::debug!(day = %q.start, rows = day.len(), total = docs.len() + day.len(), "scraped day");
            docs.extend(day);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }
        if let Some(pb) = pb {
            pb.finish_with_message("Scraping done");
        }

        write_comments_to_path(out, &docs)?;
        tracing::info!("Scraped {} comments over {} days into {}.", docs.len(), queries.len(), out.display());
        Ok(docs)
    }
}
