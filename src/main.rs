use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rtrend::{
    init_tracing_once, seeded_rng, CorpusOptions, DailyScrape, Dataset, Day, HttpFetcher, SampleQuery,
    SearchQuery, SelectBy, TermTrend, TrendOptions,
};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "rtrend", version, about = "Scrape, sample and trend Reddit comment datasets")]
struct Cli {
    /// Cache directory for dataset files (overrides RTREND_DATA_DIR).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Selector RNG seed (overrides RTREND_SEED).
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Disable progress bars.
    #[arg(long, global = true)]
    no_progress: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a filtered sample of a dataset as JSON lines.
    Sample {
        #[arg(long, default_value = "all")]
        dataset: String,
        #[arg(long, default_value = "2020-01-01")]
        start: String,
        #[arg(long, default_value = "2020-04-04")]
        end: String,
        #[arg(short = 'n', long)]
        number: Option<usize>,
        #[arg(long, default_value_t = rtrend::DEFAULT_MIN_WORDS)]
        min_words: usize,
        #[arg(long, default_value = "random")]
        select_by: String,
        #[arg(long = "include")]
        include: Vec<String>,
        #[arg(long = "exclude")]
        exclude: Vec<String>,
    },
    /// Write smoothed daily counts/frequencies of a term to CSV.
    Ngram {
        #[arg(long, default_value = "all")]
        dataset: String,
        #[arg(long)]
        term: String,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "2020-01-01")]
        start: String,
        #[arg(long, default_value = "2020-04-04")]
        end: String,
        #[arg(long, default_value_t = 1000)]
        per_day: usize,
        #[arg(long, default_value_t = 3)]
        half_window: usize,
    },
    /// Run one search and store the results as CSV.
    Scrape {
        #[arg(long)]
        term: Option<String>,
        #[arg(long)]
        subreddit: Option<String>,
        #[arg(long, default_value_t = 100)]
        size: u32,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long, default_value_t = 0)]
        min_score: u64,
        /// Defaults to `<data-dir>/<generated name>.csv`.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Scrape one search per day and store everything in one CSV.
    ScrapeDaily {
        #[arg(long)]
        term: Option<String>,
        #[arg(long)]
        subreddit: Option<String>,
        #[arg(long, default_value = "2020-01-01")]
        start: String,
        #[arg(long, default_value = "2020-04-26")]
        end: String,
        #[arg(long, default_value_t = 2000)]
        per_day: u32,
        #[arg(long, default_value_t = 1000)]
        delay_ms: u64,
        #[arg(long)]
        out: PathBuf,
    },
}

fn parse_day(s: &str) -> Result<Day> {
    s.parse::<Day>().with_context(|| format!("parsing date {s:?}"))
}

fn main() -> Result<()> {
    init_tracing_once();
    let cli = Cli::parse();

    let mut opts = CorpusOptions::from_env().with_progress(!cli.no_progress);
    if let Some(dir) = &cli.data_dir {
        opts = opts.with_data_dir(dir);
    }
    if let Some(seed) = cli.seed {
        opts = opts.with_seed(seed);
    }

    let http = HttpFetcher::new(opts.fetch_timeout).context("building http client")?;

    match cli.command {
        Command::Sample { dataset, start, end, number, min_words, select_by, include, exclude } => {
            let select_by: SelectBy = select_by.parse()?;
            let (start, end) = (parse_day(&start)?, parse_day(&end)?);
            let ds = Dataset::load_named(&dataset, &opts, &http).context("loading dataset")?;
            let q = SampleQuery::new()
                .date_range(start, end)
                .number_of_comments(number.unwrap_or(usize::MAX))
                .minimum_words(min_words)
                .select_by(select_by)
                .must_include(&include)
                .must_exclude(&exclude)
                .warn_on_shortfall(number.is_some());
            let mut rng = seeded_rng(opts.seed);
            let sample = ds.sample(&q, &mut rng);

            let stdout = io::stdout();
            let mut w = BufWriter::new(stdout.lock());
            for c in &sample {
                serde_json::to_writer(&mut w, c)?;
                w.write_all(b"\n")?;
            }
            w.flush()?;
        }
        Command::Ngram { dataset, term, out, start, end, per_day, half_window } => {
            let (start, end) = (parse_day(&start)?, parse_day(&end)?);
            let ds = Dataset::load_named(&dataset, &opts, &http).context("loading dataset")?;
            let topts = TrendOptions::default()
                .with_date_range(start, end)
                .with_per_day(per_day)
                .with_half_window(half_window)
                .with_progress(opts.progress);
            let mut rng = seeded_rng(opts.seed);
            let trend = TermTrend::build(&ds, &term, &topts, &mut rng);
            trend.write_csv(&out).with_context(|| format!("writing {}", out.display()))?;
            let totals = trend.totals();
            println!(
                "{}: {} occurrences in {} tokens over {} days",
                trend.term, totals.count(&trend.term), totals.total_tokens, trend.rows.len()
            );
        }
        Command::Scrape { term, subreddit, size, start, end, min_score, out } => {
            let mut b = SearchQuery::builder().size(size).min_score(min_score);
            if let Some(t) = term {
                b = b.search_term(t);
            }
            if let Some(s) = subreddit {
                b = b.subreddit(s);
            }
            if let Some(s) = start {
                b = b.start_date(s);
            }
            if let Some(e) = end {
                b = b.end_date(e);
            }
            let q = b.build()?;
            let out = out.unwrap_or_else(|| opts.data_dir.join(format!("{}.csv", q.file_stem())));
            let n = q.scrape_to_csv(&http, &out).context("scraping")?;
            println!("Found {n} matching your search query.");
        }
        Command::ScrapeDaily { term, subreddit, start, end, per_day, delay_ms, out } => {
            let job = DailyScrape {
                search_term: term,
                subreddit,
                start: parse_day(&start)?,
                end: parse_day(&end)?,
                per_day,
                delay: Duration::from_millis(delay_ms),
                progress: opts.progress,
                ..DailyScrape::default()
            };
            let docs = job.run(&http, &out).context("daily scrape")?;
            println!("Scraped {} comments into {}", docs.len(), out.display());
        }
    }

    Ok(())
}
