//! Error handling for the http-relay library.
//!
//! Every failure surfaced by this crate falls into one of two categories:
//! input that was rejected before any I/O started ([`Error::Validation`]),
//! or a failure reported by the HTTP client, the network or the filesystem
//! while a transfer was running ([`Error::Transfer`]). Neither is retried.

use std::io;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can happen when using http-relay.
#[derive(Error, Debug)]
pub enum Error {
    /// The request description is missing a field or holds a malformed one.
    ///
    /// Raised synchronously by the options normalizer, before the transport
    /// is ever called. The caller can always recover by fixing the input.
    #[error("{0}")]
    Validation(String),

    /// A failure surfaced by the transport, the network or the disk.
    ///
    /// The message is the underlying client's message, passed through
    /// verbatim. The original error, when there is one, is kept as the source.
    #[error("{message}")]
    Transfer {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub(crate) fn transfer(message: impl Into<String>) -> Self {
        Error::Transfer {
            message: message.into(),
            source: None,
        }
    }

    /// Returns `true` for errors raised before any network I/O.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Returns `true` for errors surfaced while a transfer was running.
    pub fn is_transfer(&self) -> bool {
        matches!(self, Error::Transfer { .. })
    }

    fn from_source<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Transfer {
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }
}

impl From<io::Error> for Error {
    fn from(source: io::Error) -> Self {
        Error::from_source(source)
    }
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        Error::from_source(source)
    }
}

impl From<reqwest_middleware::Error> for Error {
    fn from(source: reqwest_middleware::Error) -> Self {
        Error::from_source(source)
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::from_source(source)
    }
}

/// Result type alias for operations that can fail with an http-relay error.
pub type Result<T> = std::result::Result<T, Error>;
