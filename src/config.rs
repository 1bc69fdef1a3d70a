use std::path::{Path, PathBuf};
use std::time::Duration;

/// Remote location of dataset files; `{file}` expands to e.g. `coronavirus.csv`,
/// `{name}` to the dataset identifier.
pub const DEFAULT_REMOTE_TEMPLATE: &str = "https://datasets.example.org/corona-reddit/{file}";

/// User-facing options with sensible defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct CorpusOptions {
    pub data_dir: PathBuf,
    pub remote_template: String,
    pub fetch_timeout: Duration,
    pub seed: u64,         // selector RNG seed
    pub progress: bool,    // show progress bars
}

impl Default for CorpusOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            remote_template: DEFAULT_REMOTE_TEMPLATE.to_string(),
            fetch_timeout: Duration::from_secs(60),
            seed: 0,
            progress: true,
        }
    }
}

impl CorpusOptions {
    /// Defaults overlaid with `RTREND_*` environment variables.
    /// - RTREND_DATA_DIR: cache directory for dataset files
    /// - RTREND_REMOTE_TEMPLATE: URL template with `{file}` / `{name}`
    /// - RTREND_FETCH_TIMEOUT_SECS: HTTP timeout in seconds
    /// - RTREND_SEED: selector RNG seed
    /// Unparseable numbers are ignored with a warning.
    pub fn from_env() -> Self {
        let mut o = Self::default();
        if let Ok(dir) = std::env::var("RTREND_DATA_DIR") {
            if !dir.trim().is_empty() {
                o = o.with_data_dir(dir.trim());
            }
        }
        if let Ok(t) = std::env::var("RTREND_REMOTE_TEMPLATE") {
            if !t.trim().is_empty() {
                o = o.with_remote_template(t.trim());
            }
        }
        if let Ok(s) = std::env::var("RTREND_FETCH_TIMEOUT_SECS") {
            match s.trim().parse::<u64>() {
                Ok(secs) => o = o.with_fetch_timeout(Duration::from_secs(secs)),
                Err(_) => tracing::warn!("RTREND_FETCH_TIMEOUT_SECS is not a number: {}", s),
            }
        }
        if let Ok(s) = std::env::var("RTREND_SEED") {
            match s.trim().parse::<u64>() {
                Ok(seed) => o = o.with_seed(seed),
                Err(_) => tracing::warn!("RTREND_SEED is not a number: {}", s),
            }
        }
        o
    }

    pub fn with_data_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.data_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_remote_template(mut self, template: impl Into<String>) -> Self {
        self.remote_template = template.into();
        self
    }
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout.max(Duration::from_secs(1));
        self
    }
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
}
