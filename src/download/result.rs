//! Terminal result of a successful download.

use bytes::Bytes;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where a downloaded body ended up.
///
/// Serializes to `{ "path": "..." }` or `{ "blob": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadResult {
    /// The body was written to this file.
    Path(PathBuf),
    /// The body was kept in memory.
    Blob(Bytes),
}

impl DownloadResult {
    pub fn path(&self) -> Option<&Path> {
        match self {
            DownloadResult::Path(path) => Some(path),
            DownloadResult::Blob(_) => None,
        }
    }

    pub fn blob(&self) -> Option<&Bytes> {
        match self {
            DownloadResult::Blob(blob) => Some(blob),
            DownloadResult::Path(_) => None,
        }
    }
}
