mod config;
mod date;
mod error;
mod paths;
mod record;
mod tokenize;

mod csv_io;
mod dataset;
mod remote;

mod filters;
mod query;
mod sample;

mod counting;
mod progress;
mod trend;

mod scraper;
mod util;

pub use crate::config::{CorpusOptions, DEFAULT_REMOTE_TEMPLATE};
pub use crate::date::{iter_days, Day};
pub use crate::error::{Error, Result};
pub use crate::record::{Comment, CSV_HEADER, NO_URL};

pub use crate::dataset::{Dataset, DatasetId};
pub use crate::remote::{Fetch, HttpFetcher};
pub use crate::csv_io::{read_comments, read_comments_from_path, write_comments, write_comments_to_path};

pub use crate::query::{normalize_terms, SampleQuery, SelectBy, DEFAULT_END, DEFAULT_MIN_WORDS, DEFAULT_START};
pub use crate::sample::{reduce, seeded_rng, SampleRng};
pub use crate::tokenize::{tokens, word_count};

pub use crate::counting::{count_terms, TermCounts};
pub use crate::trend::{daily_term_counts, moving_average, TermTrend, TrendOptions, TrendRow};

pub use crate::scraper::{parse_search_response, DailyScrape, SearchQuery, SearchQueryBuilder, DEFAULT_ENDPOINT};

// Expose tracing setup so binaries can import from crate root.
pub use crate::util::init_tracing_once;
