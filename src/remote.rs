//! HTTP seam. Both the dataset cache fill and the search scraper go through
//! `Fetch`, so tests can substitute an in-memory source.

use crate::error::{Error, Result};
use std::io;
use std::time::Duration;

pub trait Fetch {
    /// GET `url` and return the full response body. Non-2xx is an error.
    fn get(&self, url: &str) -> Result<Vec<u8>>;
}

impl<F> Fetch for F
where
    F: Fn(&str) -> Result<Vec<u8>>,
{
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        self(url)
    }
}

/// Blocking reqwest client with a bounded timeout. No retries.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rtrend/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::io("build http client", io::Error::other(e)))?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> Result<Vec<u8>> {
        tracing::debug!(url, "GET");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::io(format!("GET {url}"), io::Error::other(e)))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::io(
                format!("GET {url}"),
                io::Error::other(format!("HTTP {status}")),
            ));
        }
        let body = resp
            .bytes()
            .map_err(|e| Error::io(format!("read body of {url}"), io::Error::other(e)))?;
        Ok(body.to_vec())
    }
}
