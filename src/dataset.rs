//! Dataset loader: cached CSV files per dataset identifier, filled from a
//! remote source on a cache miss, always sorted by date after load.

use crate::config::CorpusOptions;
use crate::csv_io::{read_comments, read_comments_from_path};
use crate::error::{Error, Result};
use crate::paths::discover_dataset_files;
use crate::record::Comment;
use crate::remote::Fetch;
use crate::util::write_atomic;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// The fixed set of published datasets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DatasetId {
    /// "coronavirus" search term across all subreddits.
    All,
    /// r/Coronavirus.
    Coronavirus,
    /// r/China_Flu.
    ChinaFlu,
}

impl DatasetId {
    pub const ALL: [DatasetId; 3] = [DatasetId::All, DatasetId::Coronavirus, DatasetId::ChinaFlu];

    pub fn name(self) -> &'static str {
        match self {
            DatasetId::All => "all",
            DatasetId::Coronavirus => "coronavirus",
            DatasetId::ChinaFlu => "china_flu",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            DatasetId::All => "all_subreddits.csv",
            DatasetId::Coronavirus => "coronavirus.csv",
            DatasetId::ChinaFlu => "china_flu.csv",
        }
    }

    pub fn cache_path(self, data_dir: &Path) -> PathBuf {
        data_dir.join(self.file_name())
    }

    pub fn remote_url(self, template: &str) -> String {
        template.replace("{file}", self.file_name()).replace("{name}", self.name())
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatasetId {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        DatasetId::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = DatasetId::ALL.iter().map(|id| id.name()).collect();
                Error::invalid(format!("unknown dataset {s:?}; expected one of {}", known.join(", ")))
            })
    }
}

/// Loaded comment collection, sorted by date ascending.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    comments: Vec<Comment>,
}

impl Dataset {
    /// Build from rows in memory. Sorting is stable: equal dates keep input order.
    pub fn from_comments(mut comments: Vec<Comment>) -> Self {
        comments.sort_by(|a, b| a.date.cmp(&b.date));
        Self { comments }
    }

    /// Load a dataset by name. Unknown names fail before touching the disk.
    pub fn load_named(name: &str, opts: &CorpusOptions, fetch: &dyn Fetch) -> Result<Self> {
        let id: DatasetId = name.parse()?;
        Self::load(id, opts, fetch)
    }

    /// Read the cache file for `id`, fetching and caching it first on a miss.
    pub fn load(id: DatasetId, opts: &CorpusOptions, fetch: &dyn Fetch) -> Result<Self> {
        let path = id.cache_path(&opts.data_dir);
        let ds = match Self::try_load_cached(&path)? {
            Some(ds) => ds,
            None => Self::fetch_and_cache(id, opts, fetch)?,
        };
        tracing::info!("Loaded {} dataset with {} comments.", id, ds.len());
        Ok(ds)
    }

    /// `Ok(None)` when no cache file exists; parse errors are not a miss.
    pub fn try_load_cached(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "cache miss");
            return Ok(None);
        }
        Self::from_path(path).map(Some)
    }

    /// GET the remote file, write it to the cache path, then parse it.
    pub fn fetch_and_cache(id: DatasetId, opts: &CorpusOptions, fetch: &dyn Fetch) -> Result<Self> {
        let url = id.remote_url(&opts.remote_template);
        let path = id.cache_path(&opts.data_dir);
        tracing::info!(%url, path = %path.display(), "fetching dataset");
        let bytes = fetch.get(&url)?;
        write_atomic(&path, &bytes)?;
        let comments = read_comments(bytes.as_slice(), &path.display().to_string())?;
        Ok(Self::from_comments(comments))
    }

    /// One `.csv` or `.csv.zst` file.
    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self::from_comments(read_comments_from_path(path)?))
    }

    /// Every dataset file directly inside `dir`, merged and sorted.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let files = discover_dataset_files(dir)?;
        if files.is_empty() {
            tracing::warn!("No dataset files found in {}.", dir.display());
        }
        let mut all = Vec::new();
        for f in &files {
            let part = read_comments_from_path(f)?;
            tracing::debug!(path = %f.display(), rows = part.len(), "read dataset file");
            all.extend(part);
        }
        let ds = Self::from_comments(all);
        tracing::info!("Loaded {} comments from {} files in {}.", ds.len(), files.len(), dir.display());
        Ok(ds)
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// Earliest and latest day, if any rows.
    pub fn date_span(&self) -> Option<(crate::date::Day, crate::date::Day)> {
        Some((self.comments.first()?.date, self.comments.last()?.date))
    }
}
