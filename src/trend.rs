//! N-gram trend series: per-day term counts and frequencies over random daily
//! samples, smoothed with a centered moving average, exportable as CSV.

use crate::counting::{count_terms, merge_counts, TermCounts};
use crate::dataset::Dataset;
use crate::csv_io::csv_error;
use crate::date::{iter_days, Day};
use crate::error::{Error, Result};
use crate::progress::make_count_progress;
use crate::query::{normalize_terms, SampleQuery, SelectBy, DEFAULT_END, DEFAULT_MIN_WORDS, DEFAULT_START};
use crate::util::ensure_parent_dir;
use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Clone, Debug)]
pub struct TrendOptions {
    pub start: Day,
    pub end: Day,
    pub per_day: usize,        // random sample size drawn for each day
    pub minimum_words: usize,
    pub half_window: usize,    // days averaged on each side
    pub progress: bool,
}

impl Default for TrendOptions {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            end: DEFAULT_END,
            per_day: 1000,
            minimum_words: DEFAULT_MIN_WORDS,
            half_window: 3,
            progress: false,
        }
    }
}

impl TrendOptions {
    pub fn with_date_range(mut self, start: Day, end: Day) -> Self {
        self.start = start;
        self.end = end;
        self
    }
    pub fn with_per_day(mut self, n: usize) -> Self {
        self.per_day = n;
        self
    }
    pub fn with_minimum_words(mut self, n: usize) -> Self {
        self.minimum_words = n;
        self
    }
    pub fn with_half_window(mut self, days: usize) -> Self {
        self.half_window = days;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
}

/// Raw (unsmoothed) counts for each day in `[opts.start, opts.end]`.
///
/// Samples are drawn one day after another so the RNG stream, and with it the
/// result, is reproducible. Tokenizing and counting then run in parallel.
pub fn daily_term_counts<R: Rng + ?Sized>(
    dataset: &Dataset,
    terms: &[String],
    opts: &TrendOptions,
    rng: &mut R,
) -> Vec<(Day, TermCounts)> {
    let terms = normalize_terms(terms);
    let days: Vec<Day> = iter_days(opts.start, opts.end).collect();

    let pb = if opts.progress {
        Some(make_count_progress(days.len() as u64, "Sampling days"))
    } else {
        None
    };
    let samples: Vec<_> = days
        .iter()
        .map(|&day| {
            let q = SampleQuery::new()
                .day(day)
                .number_of_comments(opts.per_day)
                .minimum_words(opts.minimum_words)
                .select_by(SelectBy::Random);
            let s = dataset.sample(&q, &mut *rng);
            if let Some(pb) = &pb {
                pb.inc(1);
            }
            s
        })
        .collect();
    if let Some(pb) = pb {
        pb.finish_with_message("Sampling done");
    }

    let counts: Vec<TermCounts> = samples.par_iter().map(|s| count_terms(s, &terms)).collect();
    days.into_iter().zip(counts).collect()
}

/// Centered moving average over `[i - half, i + half]`, clipped at both ends.
pub fn moving_average(data: &[f64], half_window: usize) -> Vec<f64> {
    (0..data.len())
        .map(|i| {
            let lo = i.saturating_sub(half_window);
            let hi = i.saturating_add(half_window).saturating_add(1).min(data.len());
            let window = &data[lo..hi];
            window.iter().sum::<f64>() / window.len() as f64
        })
        .collect()
}

/// One output row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrendRow {
    pub date: Day,
    pub count: f64,
    pub frequency: f64,
}

/// Smoothed daily counts and frequencies of a single term.
#[derive(Clone, Debug)]
pub struct TermTrend {
    pub term: String,
    pub raw: Vec<(Day, TermCounts)>,
    pub rows: Vec<TrendRow>,
}

impl TermTrend {
    pub fn build<R: Rng + ?Sized>(dataset: &Dataset, term: &str, opts: &TrendOptions, rng: &mut R) -> Self {
        let term = term.trim().to_lowercase();
        let raw = daily_term_counts(dataset, std::slice::from_ref(&term), opts, rng);
        Self::from_raw(term, raw, opts.half_window)
    }

    pub fn from_raw(term: String, raw: Vec<(Day, TermCounts)>, half_window: usize) -> Self {
        let counts: Vec<f64> = raw.iter().map(|(_, c)| c.count(&term) as f64).collect();
        let freqs: Vec<f64> = raw.iter().map(|(_, c)| c.frequency(&term)).collect();
        let counts = moving_average(&counts, half_window);
        let freqs = moving_average(&freqs, half_window);
        let rows = raw
            .iter()
            .zip(counts.into_iter().zip(freqs))
            .map(|((date, _), (count, frequency))| TrendRow { date: *date, count, frequency })
            .collect();
        Self { term, raw, rows }
    }

    /// Counts summed over the whole range.
    pub fn totals(&self) -> TermCounts {
        let mut total = TermCounts::default();
        for (_, c) in &self.raw {
            merge_counts(&mut total, c.clone());
        }
        total
    }

    /// Write `date,count,frequency` rows. The file name has to end in `.csv`.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let ok_ext = path.to_str().map(|s| s.ends_with(".csv")).unwrap_or(false);
        if !ok_ext {
            return Err(Error::invalid(format!(
                "data will be written in csv format, so the filename has to end in '.csv' (got {})",
                path.display()
            )));
        }
        let origin = format!("write {}", path.display());
        ensure_parent_dir(path)?;
        let f = File::create(path).map_err(|e| Error::io(format!("create {}", path.display()), e))?;
        let mut w = csv::Writer::from_writer(BufWriter::new(f));
        for row in &self.rows {
            w.serialize(row).map_err(|e| csv_error(&origin, e))?;
        }
        if self.rows.is_empty() {
            w.write_record(["date", "count", "frequency"])
                .map_err(|e| csv_error(&origin, e))?;
        }
        w.flush().map_err(|e| Error::io(format!("flush {}", path.display()), e))?;
        tracing::info!(term = %self.term, days = self.rows.len(), "wrote trend to {}", path.display());
        Ok(())
    }
}
