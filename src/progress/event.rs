//! Progress events emitted while a download is in flight.

use serde::Serialize;
use std::fmt;

/// Kind of transfer a [`ProgressEvent`] reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Download,
}

/// Total size of a response body, as advertised by the server.
///
/// `Known(0)` is an empty body. A server that sent no usable
/// `Content-Length` header yields `Unknown`, which is serialized as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "Option<u64>")]
pub enum ContentLength {
    Known(u64),
    Unknown,
}

impl ContentLength {
    pub fn known(self) -> Option<u64> {
        match self {
            ContentLength::Known(total) => Some(total),
            ContentLength::Unknown => None,
        }
    }

    pub fn is_known(self) -> bool {
        matches!(self, ContentLength::Known(_))
    }
}

impl From<ContentLength> for Option<u64> {
    fn from(value: ContentLength) -> Self {
        value.known()
    }
}

impl From<Option<u64>> for ContentLength {
    fn from(value: Option<u64>) -> Self {
        value.map_or(ContentLength::Unknown, ContentLength::Known)
    }
}

impl fmt::Display for ContentLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentLength::Known(total) => write!(f, "{}", total),
            ContentLength::Unknown => f.write_str("unknown"),
        }
    }
}

/// Snapshot of a download's progress after one chunk was written.
///
/// Serializes to `{ "type": "DOWNLOAD", "url", "bytes", "contentLength" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    #[serde(rename = "type")]
    kind: EventKind,
    url: String,
    bytes: u64,
    content_length: ContentLength,
    #[serde(skip)]
    download_id: u64,
}

impl ProgressEvent {
    /// Creates a download progress event.
    pub fn download(url: impl Into<String>, bytes: u64, content_length: ContentLength) -> Self {
        Self {
            kind: EventKind::Download,
            url: url.into(),
            bytes,
            content_length,
            download_id: 0,
        }
    }

    pub(crate) fn with_download_id(mut self, download_id: u64) -> Self {
        self.download_id = download_id;
        self
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// The URL as supplied by the caller.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Cumulative bytes received so far.
    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    pub fn content_length(&self) -> ContentLength {
        self.content_length
    }

    /// Tells apart concurrent downloads of the same URL within this process.
    ///
    /// Not serialized. Events built by hand carry `0`.
    pub fn download_id(&self) -> u64 {
        self.download_id
    }

    /// Returns `true` once `bytes` has reached a known total.
    pub fn is_complete(&self) -> bool {
        matches!(self.content_length, ContentLength::Known(total) if self.bytes >= total)
    }
}
