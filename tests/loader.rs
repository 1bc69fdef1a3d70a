#[path = "common/mod.rs"]
mod common;

use common::*;
use rtrend::{CorpusOptions, Dataset, DatasetId, Error, Result};
use std::cell::Cell;
use std::fs;

fn opts_in(dir: &std::path::Path) -> CorpusOptions {
    CorpusOptions::default()
        .with_data_dir(dir.join("data"))
        .with_remote_template("https://mirror.test/corona/{file}")
        .with_progress(false)
}

/// Rows come back sorted by date regardless of file order, with quoting,
/// negative scores and `n/a` urls preserved.
#[test]
fn load_sorts_by_date_and_keeps_fields() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("coronavirus.csv");
    write_file(&path, &sample_csv());

    let ds = Dataset::from_path(&path).unwrap();
    let got: Vec<String> = ds.comments().iter().map(|c| c.date.to_string()).collect();
    assert_eq!(got, vec!["2020-01-15", "2020-02-01", "2020-03-02"]);
    assert!(ds.comments().windows(2).all(|w| w[0].date <= w[1].date));

    let first = &ds.comments()[0];
    assert_eq!(first.author, "alice");
    assert_eq!(first.text, "hello, world \"quoted\"\nsecond line");
    assert_eq!(ds.comments()[1].score, -3);
    assert_eq!(ds.comments()[1].url, "n/a");
    assert_eq!(ds.date_span(), Some((day("2020-01-15"), day("2020-03-02"))));
}

/// Cold cache: the fetcher is hit once and the file is written; the next load reads the cache.
#[test]
fn cache_miss_fetches_then_reuses_cache() {
    let tmp = tempfile::tempdir().unwrap();
    let opts = opts_in(tmp.path());
    let calls = Cell::new(0usize);
    let urls = std::cell::RefCell::new(Vec::<String>::new());
    let fake = |url: &str| -> Result<Vec<u8>> {
        calls.set(calls.get() + 1);
        urls.borrow_mut().push(url.to_string());
        Ok(sample_csv().into_bytes())
    };

    let ds = Dataset::load(DatasetId::Coronavirus, &opts, &fake).unwrap();
    assert_eq!(ds.len(), 3);
    assert_eq!(calls.get(), 1);
    assert_eq!(urls.borrow()[0], "https://mirror.test/corona/coronavirus.csv");

    let cached = tmp.path().join("data").join("coronavirus.csv");
    assert!(cached.is_file(), "cache file should be written at {}", cached.display());

    let again = Dataset::load_named("coronavirus", &opts, &fake).unwrap();
    assert_eq!(again.len(), 3);
    assert_eq!(calls.get(), 1, "second load must come from the cache");
}

/// Unknown identifiers fail before any I/O: no fetch, no file created.
#[test]
fn unknown_dataset_is_invalid_argument() {
    let tmp = tempfile::tempdir().unwrap();
    let opts = opts_in(tmp.path());
    let calls = Cell::new(0usize);
    let fake = |_: &str| -> Result<Vec<u8>> {
        calls.set(calls.get() + 1);
        Ok(Vec::new())
    };

    let err = Dataset::load_named("subset-z", &opts, &fake).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)), "got {err:?}");
    assert_eq!(calls.get(), 0);
    assert!(!tmp.path().join("data").exists());
    assert!("all".parse::<DatasetId>().is_ok());
    assert!("china_flu".parse::<DatasetId>().is_ok());
}

/// Network failure propagates as Io and leaves no cache file behind.
#[test]
fn fetch_failure_is_io_and_not_cached() {
    let tmp = tempfile::tempdir().unwrap();
    let opts = opts_in(tmp.path());
    let fake = |url: &str| -> Result<Vec<u8>> {
        Err(Error::io(format!("GET {url}"), std::io::Error::other("connection refused")))
    };

    let err = Dataset::load(DatasetId::All, &opts, &fake).unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "got {err:?}");
    assert!(!DatasetId::All.cache_path(&opts.data_dir).exists());
}

/// A non-integer score anywhere aborts the whole load.
#[test]
fn bad_score_is_parse_error() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("bad.csv");
    write_file(
        &path,
        "date,author,subreddit,score,url,text\n2020-01-01,a,s,1,n/a,ok\n2020-01-02,b,s,lots,n/a,bad\n",
    );
    let err = Dataset::from_path(&path).unwrap_err();
    assert!(matches!(err, Error::Parse(_)), "got {err:?}");
}

#[test]
fn missing_column_is_parse_error() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("short.csv");
    write_file(&path, "date,author,subreddit,score,text\n2020-01-01,a,s,1,hello\n");
    let err = Dataset::from_path(&path).unwrap_err();
    assert!(matches!(err, Error::Parse(_)), "got {err:?}");
}

/// Helper columns beyond the fixed header are ignored.
#[test]
fn superset_header_is_accepted() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("extra.csv");
    write_file(
        &path,
        "date,author,subreddit,score,url,text,timestamp\n2020-01-02,a,s,4,n/a,hello there,1577923200\n",
    );
    let ds = Dataset::from_path(&path).unwrap();
    assert_eq!(ds.len(), 1);
    assert_eq!(ds.comments()[0].score, 4);
}

/// Directory loads merge plain and zstd files (hidden files skipped), then sort.
#[test]
fn from_dir_merges_csv_and_zst() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("corona");
    write_file(&dir.join("a.csv"), &sample_csv());
    write_zst(
        &dir.join("b.csv.zst"),
        "date,author,subreddit,score,url,text\n2020-01-01,dan,Coronavirus,1,n/a,earliest of all\n",
    );
    write_file(&dir.join(".partial.csv.part"), "garbage");
    write_file(&dir.join("notes.txt"), "not a dataset");

    let ds = Dataset::from_dir(&dir).unwrap();
    assert_eq!(ds.len(), 4);
    assert_eq!(ds.comments()[0].author, "dan");
    assert!(ds.comments().windows(2).all(|w| w[0].date <= w[1].date));
}

/// Written files read back identically, and duplicates are preserved.
#[test]
fn write_then_load_preserves_duplicates() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("out").join("dupes.csv");
    let mut rows = three_days();
    rows.push(rows[1].clone());
    rtrend::write_comments_to_path(&path, &rows).unwrap();

    let header = fs::read_to_string(&path).unwrap();
    assert!(header.starts_with("date,author,subreddit,score,url,text\n"));

    let ds = Dataset::from_path(&path).unwrap();
    assert_eq!(ds.len(), 4);
    assert_eq!(ds.comments()[1], ds.comments()[2]);
}

/// Write failures surface as `Io`, not as a data error.
#[test]
fn write_failure_is_io_error() {
    struct Broken;
    impl std::io::Write for Broken {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    // enough rows to overflow the csv writer's internal buffer
    let rows: Vec<_> = (0..500).map(|i| comment("2020-01-01", i, LONG_TEXT)).collect();
    let err = rtrend::write_comments(Broken, &rows).unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "got {err:?}");
}
