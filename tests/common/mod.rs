#![allow(dead_code)]

use rtrend::{Comment, Day};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub const LONG_TEXT: &str = "this comment has more than ten words so it passes the default length gate";

pub fn day(s: &str) -> Day {
    s.parse().unwrap()
}

pub fn comment(date: &str, score: i64, text: &str) -> Comment {
    Comment {
        date: day(date),
        author: format!("user_{score}"),
        subreddit: "Coronavirus".to_string(),
        score,
        url: "n/a".to_string(),
        text: text.to_string(),
    }
}

/// The three-row corpus used by most selection tests:
/// 2020-01-01 (5), 2020-01-02 (30), 2020-01-03 (10), all long enough to qualify.
pub fn three_days() -> Vec<Comment> {
    vec![
        comment("2020-01-01", 5, LONG_TEXT),
        comment("2020-01-02", 30, LONG_TEXT),
        comment("2020-01-03", 10, LONG_TEXT),
    ]
}

/// A small CSV in the published layout, deliberately out of date order,
/// with an embedded comma, quote and newline in one body.
pub fn sample_csv() -> String {
    [
        "date,author,subreddit,score,url,text",
        "2020-03-02,carol,Coronavirus,7,n/a,third row but latest date",
        "2020-01-15,alice,Coronavirus,12,https://www.reddit.com/r/Coronavirus/comments/x/y/,\"hello, world \"\"quoted\"\"\nsecond line\"",
        "2020-02-01,bob,China_Flu,-3,n/a,negative score is fine",
        "",
    ]
    .join("\n")
}

pub fn write_file(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Write a compressed `.csv.zst` with the provided contents.
pub fn write_zst(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    enc.write_all(contents.as_bytes()).unwrap();
    enc.finish().unwrap();
}

pub fn dates(comments: &[&Comment]) -> Vec<String> {
    comments.iter().map(|c| c.date.to_string()).collect()
}
