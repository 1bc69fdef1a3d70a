//! Error taxonomy shared by the loader, selector, trend builder and scraper.
//! Every failure aborts the operation that raised it; nothing is retried.

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Bad enum value, malformed date, bad output name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// File or network failure.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// A CSV row or JSON response that does not fit the comment shape.
    #[error("parse error: {0}")]
    Parse(String),
}

impl Error {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Error::Io { context: context.into(), source }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
