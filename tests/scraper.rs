#[path = "common/mod.rs"]
mod common;

use common::*;
use rtrend::{parse_search_response, DailyScrape, Dataset, Error, Result, SearchQuery};
use std::cell::RefCell;
use std::time::Duration;
use time::UtcOffset;

fn est() -> UtcOffset {
    UtcOffset::from_hms(-5, 0, 0).unwrap()
}

/// Term + subreddit, default dates: no after/before, sorted by score.
#[test]
fn query_url_basic() {
    let q = SearchQuery::builder()
        .search_term("fentanyl")
        .subreddit("r/boston")
        .build()
        .unwrap();
    assert_eq!(
        q.query_url(),
        "https://api.pushshift.io/reddit/search/?q=fentanyl&subreddit=boston&size=100&sort_type=score&sort=desc"
    );
    assert_eq!(q.file_stem(), "fentanyl_rboston");
}

/// Date bounds become local-midnight timestamps; min score is appended raw.
#[test]
fn query_url_dates_and_min_score() {
    let q = SearchQuery::builder()
        .start_date("2014-01-01")
        .end_date("2014-12-31")
        .sort_by(None)
        .utc_offset(est())
        .build()
        .unwrap();
    assert_eq!(
        q.query_url(),
        "https://api.pushshift.io/reddit/search/?size=100&after=1388552400&before=1420002000"
    );

    let q = SearchQuery::builder()
        .search_term("covid")
        .min_score(2)
        .start_date("2014-01-01")
        .end_date("2014-12-31")
        .build()
        .unwrap();
    let url = q.query_url();
    assert!(url.contains("after=1388534400"), "{url}");
    assert!(url.ends_with("&score=>2"), "{url}");
    assert_eq!(q.file_stem(), "covid_minscore_2_2014-01-01to2014-12-31");
}

#[test]
fn invalid_dates_fail_at_build() {
    let err = SearchQuery::builder().start_date("01/01/2020").build().unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)), "got {err:?}");
}

/// Response mapping: permalink → full URL or `n/a`, HTML entities decoded,
/// date taken at the configured offset.
#[test]
fn parse_response_maps_fields() {
    let body = br#"{"data": [
        {"created_utc": 1585699200, "author": "alice", "subreddit": "Coronavirus", "score": 12,
         "permalink": "/r/Coronavirus/comments/abc/x/def/", "body": "Tom &amp; Jerry &gt; you"},
        {"created_utc": 1585699300.0, "author": "bob", "subreddit": "China_Flu", "score": -1,
         "body": "no link"}
    ]}"#;

    let utc = parse_search_response(body, UtcOffset::UTC).unwrap();
    assert_eq!(utc.len(), 2);
    assert_eq!(utc[0].date, day("2020-04-01"));
    assert_eq!(utc[0].url, "https://www.reddit.com/r/Coronavirus/comments/abc/x/def/");
    assert_eq!(utc[0].text, "Tom & Jerry > you");
    assert_eq!(utc[1].url, "n/a");
    assert_eq!(utc[1].score, -1);

    let local = parse_search_response(body, est()).unwrap();
    assert_eq!(local[0].date, day("2020-03-31"));
}

#[test]
fn malformed_response_is_parse_error() {
    let err = parse_search_response(br#"{"results": []}"#, UtcOffset::UTC).unwrap_err();
    assert!(matches!(err, Error::Parse(_)), "got {err:?}");
}

/// One request per day over [start, end); output CSV loads back as a dataset.
#[test]
fn daily_scrape_writes_one_csv() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("data").join("all_subreddits.csv");
    let urls = RefCell::new(Vec::<String>::new());
    let fake = |url: &str| -> Result<Vec<u8>> {
        urls.borrow_mut().push(url.to_string());
        let ts = 1577836800 + 86_400 * (urls.borrow().len() as i64 - 1);
        Ok(format!(
            r#"{{"data": [{{"created_utc": {ts}, "author": "a", "subreddit": "s", "score": 1, "body": "{LONG_TEXT}"}}]}}"#
        )
        .into_bytes())
    };

    let job = DailyScrape {
        search_term: Some("coronavirus".to_string()),
        start: day("2020-01-01"),
        end: day("2020-01-04"),
        delay: Duration::ZERO,
        progress: false,
        ..DailyScrape::default()
    };
    let docs = job.run(&fake, &out).unwrap();
    assert_eq!(docs.len(), 3);
    assert_eq!(urls.borrow().len(), 3);
    assert!(urls.borrow()[0].contains("q=coronavirus"));
    assert!(urls.borrow()[0].contains("size=2000"));

    let ds = Dataset::from_path(&out).unwrap();
    assert_eq!(ds.len(), 3);
    assert_eq!(dates(&ds.comments().iter().collect::<Vec<_>>()), vec!["2020-01-01", "2020-01-02", "2020-01-03"]);
}

/// A failed day aborts the run and writes nothing.
#[test]
fn daily_scrape_failure_aborts() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("out.csv");
    let fake = |url: &str| -> Result<Vec<u8>> {
        Err(Error::io(format!("GET {url}"), std::io::Error::other("HTTP 503")))
    };
    let job = DailyScrape { delay: Duration::ZERO, progress: false, ..DailyScrape::default() };
    let err = job.run(&fake, &out).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
    assert!(!out.exists());
}

/// Single search stored as CSV under the generated name.
#[test]
fn scrape_to_csv_writes_rows() {
    let tmp = tempfile::tempdir().unwrap();
    let fake = |_: &str| -> Result<Vec<u8>> {
        Ok(br#"{"data": [
            {"created_utc": 1577836800, "author": "a", "subreddit": "Coronavirus", "score": 3, "body": "first"},
            {"created_utc": 1577923200, "author": "b", "subreddit": "Coronavirus", "score": 9, "body": "second"}
        ]}"#
        .to_vec())
    };
    let q = SearchQuery::builder().subreddit("coronavirus").min_score(2).build().unwrap();
    let out = tmp.path().join(format!("{}.csv", q.file_stem()));
    assert_eq!(q.scrape_to_csv(&fake, &out).unwrap(), 2);
    assert!(out.ends_with("rcoronavirus_minscore_2.csv"));

    let ds = Dataset::from_path(&out).unwrap();
    assert_eq!(ds.comments().iter().map(|c| c.score).collect::<Vec<_>>(), vec![3, 9]);
}
