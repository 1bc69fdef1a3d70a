use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

const DAY_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Calendar day in `YYYY-MM-DD` form. Ordering matches the lexicographic order
/// of the text form, so range checks behave like string comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(Date);

impl Day {
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self> {
        let month = time::Month::try_from(month)
            .map_err(|_| Error::invalid(format!("month must be 01..12, got {month}")))?;
        Date::from_calendar_date(year, month, day)
            .map(Day)
            .map_err(|e| Error::invalid(format!("invalid date {year:04}-{:02}-{day:02}: {e}", month as u8)))
    }

    pub const fn from_date(date: Date) -> Self {
        Day(date)
    }

    pub fn date(self) -> Date {
        self.0
    }

    pub fn next(self) -> Option<Self> {
        self.0.next_day().map(Day)
    }

    pub fn prev(self) -> Option<Self> {
        self.0.previous_day().map(Day)
    }

    /// Unix timestamp of local midnight at `offset`.
    pub fn unix_timestamp(self, offset: UtcOffset) -> i64 {
        PrimitiveDateTime::new(self.0, Time::MIDNIGHT)
            .assume_offset(offset)
            .unix_timestamp()
    }

    /// Local calendar day of a unix timestamp at `offset`.
    pub fn from_unix_timestamp(ts: i64, offset: UtcOffset) -> Result<Self> {
        let dt = OffsetDateTime::from_unix_timestamp(ts)
            .map_err(|e| Error::parse(format!("timestamp {ts} out of range: {e}")))?;
        Ok(Day(dt.to_offset(offset).date()))
    }

    pub fn days_until(self, later: Day) -> i64 {
        (later.0 - self.0).whole_days()
    }

    pub fn plus_days(self, n: i64) -> Option<Self> {
        self.0.checked_add(Duration::days(n)).map(Day)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.0.year(), self.0.month() as u8, self.0.day())
    }
}

impl FromStr for Day {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        // Four-digit year only, so the text form stays sortable.
        if s.len() != 10 {
            return Err(Error::invalid(format!("date has to follow the format YYYY-MM-DD, got {s:?}")));
        }
        Date::parse(s, DAY_FORMAT)
            .map(Day)
            .map_err(|_| Error::invalid(format!("date has to follow the format YYYY-MM-DD, got {s:?}")))
    }
}

impl Serialize for Day {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Day {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Inclusive iteration from `start` to `end` (if `start` <= `end`), else empty.
pub fn iter_days(start: Day, end: Day) -> impl Iterator<Item = Day> {
    let mut curr = if start <= end { Some(start) } else { None };
    std::iter::from_fn(move || {
        let ret = curr?;
        curr = ret.next().filter(|n| *n <= end);
        Some(ret)
    })
}
