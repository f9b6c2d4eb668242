//! Core downloader implementation with fetch logic.
//!
//! This module contains the [`Downloader`], which runs downloads through its
//! [`Transport`], writes the body chunk by chunk and relays the byte count as
//! [`ProgressEvent`](crate::progress::ProgressEvent)s.
//!
//! # Examples
//!
//! ## Basic Download
//!
//! ```rust,no_run
//! use http_relay::downloader::DownloaderBuilder;
//! use http_relay::progress::NoProgress;
//! use http_relay::DownloadOptions;
//!
//! # async fn example() -> Result<(), http_relay::Error> {
//! let downloader = DownloaderBuilder::new().build()?;
//! let options = DownloadOptions::new("https://example.com/file1.zip", "file1.zip");
//!
//! let result = downloader.download(&options, &NoProgress).await?;
//! println!("Saved to {:?}", result.path());
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrent Downloads
//!
//! ```rust,no_run
//! use http_relay::downloader::DownloaderBuilder;
//! use http_relay::progress::ProgressDisplay;
//! use http_relay::DownloadOptions;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), http_relay::Error> {
//! let downloader = DownloaderBuilder::new()
//!     .directory(PathBuf::from("./downloads"))
//!     .concurrent_downloads(4)
//!     .build()?;
//! let downloads = vec![
//!     DownloadOptions::new("https://example.com/file1.zip", "file1.zip").with_progress(true),
//!     DownloadOptions::new("https://example.com/file2.pdf", "file2.pdf").with_progress(true),
//! ];
//!
//! let display = ProgressDisplay::new(Default::default());
//! for result in downloader.download_all(&downloads, &display).await {
//!     println!("{:?}", result);
//! }
//! display.finish();
//! # Ok(())
//! # }
//! ```

use super::config::{DownloaderConfig, Storage};
use crate::download::{DownloadResult, Transfer, TransferState};
use crate::error::{Error, Result};
use crate::http::{ByteStream, ReqwestTransport, Transport};
use crate::progress::ProgressEmitter;
use crate::request::{prepare_download, DownloadOptions, PreparedRequest};
use crate::utils::content_length_from_headers;

use bytes::Bytes;
use futures::stream::{self, StreamExt};
use reqwest::header::HeaderMap;
use std::fmt;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::{
    fs,
    fs::OpenOptions,
    io::{AsyncWrite, AsyncWriteExt},
};
use tracing::{debug, warn};

/// Upper bound on the buffer reserved up front for in-memory downloads.
const MAX_PREALLOC: usize = 8 * 1024 * 1024;

/// Represents the download controller.
///
/// A downloader can be created via its builder:
///
/// ```rust
/// # fn main() -> Result<(), http_relay::Error> {
/// use http_relay::downloader::DownloaderBuilder;
///
/// let d = DownloaderBuilder::new().build()?;
/// # Ok(())
/// # }
/// ```
pub struct Downloader<T = ReqwestTransport> {
    pub(super) config: DownloaderConfig,
    pub(super) transport: Arc<T>,
}

impl<T> Clone for Downloader<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T> Debug for Downloader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Downloader<T> {
    /// Creates a new Downloader with the given configuration and transport.
    pub(crate) fn new(config: DownloaderConfig, transport: T) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
        }
    }

    /// Gets the base directory for relative file paths.
    pub fn directory(&self) -> Option<&PathBuf> {
        self.config.directory.as_ref()
    }

    /// Gets where downloaded bodies are stored.
    pub fn storage(&self) -> Storage {
        self.config.storage
    }

    /// Gets the number of concurrent downloads.
    pub fn concurrent_downloads(&self) -> usize {
        self.config.concurrent_downloads
    }

    /// Gets the custom headers.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.config.headers.as_ref()
    }

    /// Gets the transport requests are sent through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Downloads a single file.
    ///
    /// The options are validated before anything is sent. When
    /// `options.progress` is set, `on_progress` receives one event per
    /// non-empty chunk, with strictly increasing byte counts; otherwise it is
    /// never called.
    pub async fn download(
        &self,
        options: &DownloadOptions,
        on_progress: &dyn ProgressEmitter,
    ) -> Result<DownloadResult> {
        let mut transfer = Transfer::new(options.url().unwrap_or_default().trim());

        let request = match prepare_download(options) {
            Ok(request) => request,
            Err(e) => {
                transfer.fail();
                return Err(e);
            }
        };
        transfer.advance(TransferState::Validated)?;

        let on_progress = options.progress.then_some(on_progress);
        match self.fetch(&request, options, &mut transfer, on_progress).await {
            Ok(result) => {
                transfer.advance(TransferState::Completed)?;
                debug!(
                    "Downloaded {} ({} bytes)",
                    transfer.url(),
                    transfer.bytes_received()
                );
                Ok(result)
            }
            Err(e) => {
                transfer.fail();
                debug!("Download of {} failed: {}", transfer.url(), e);
                Err(e)
            }
        }
    }

    /// Runs independent downloads concurrently.
    ///
    /// At most `concurrent_downloads` run at once. Results are returned in the
    /// order of `downloads`; events from different downloads may interleave.
    pub async fn download_all(
        &self,
        downloads: &[DownloadOptions],
        on_progress: &dyn ProgressEmitter,
    ) -> Vec<Result<DownloadResult>> {
        stream::iter(downloads)
            .map(|d| self.download(d, on_progress))
            .buffered(self.config.concurrent_downloads.max(1))
            .collect::<Vec<_>>()
            .await
    }

    /// Resolves where the file for `options` is written.
    ///
    /// An absolute `file_path` is used as-is. A relative one is joined onto
    /// `file_directory`, else onto the configured base directory, else left
    /// relative to the working directory.
    pub fn destination(&self, options: &DownloadOptions) -> PathBuf {
        let file_path = PathBuf::from(options.file_path.as_deref().unwrap_or_default());
        if file_path.is_absolute() {
            return file_path;
        }
        match options.file_directory.as_ref().or(self.config.directory.as_ref()) {
            Some(base) => base.join(file_path),
            None => file_path,
        }
    }

    async fn fetch(
        &self,
        request: &PreparedRequest,
        options: &DownloadOptions,
        transfer: &mut Transfer,
        on_progress: Option<&dyn ProgressEmitter>,
    ) -> Result<DownloadResult> {
        debug!("Fetching {}", request.url);
        let response = self.transport.send(request).await?;

        if !response.status.is_success() {
            return Err(Error::transfer(format!("HTTP status {}", response.status)));
        }

        transfer.start(content_length_from_headers(&response.headers))?;

        match self.config.storage {
            Storage::Disk => {
                let output = self.destination(options);
                self.write_to_disk(&output, response.body, transfer, on_progress)
                    .await?;
                Ok(DownloadResult::Path(output))
            }
            Storage::Memory => {
                // The advertised length is only a hint from the server.
                let capacity = transfer
                    .content_length()
                    .known()
                    .and_then(|len| usize::try_from(len).ok())
                    .unwrap_or_default()
                    .min(MAX_PREALLOC);
                let mut buffer = Vec::with_capacity(capacity);
                relay_chunks(response.body, &mut buffer, transfer, on_progress).await?;
                Ok(DownloadResult::Blob(Bytes::from(buffer)))
            }
        }
    }

    async fn write_to_disk(
        &self,
        output: &Path,
        body: ByteStream,
        transfer: &mut Transfer,
        on_progress: Option<&dyn ProgressEmitter>,
    ) -> Result<()> {
        if let Some(output_dir) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            debug!("Creating destination directory {:?}", output_dir);
            fs::create_dir_all(output_dir).await?;
        }

        debug!("Creating destination file {:?}", output);
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(output)
            .await?;

        if let Err(e) = relay_chunks(body, &mut file, transfer, on_progress).await {
            drop(file);
            if let Err(cleanup) = fs::remove_file(output).await {
                warn!("Failed to remove partial file {:?}: {}", output, cleanup);
            }
            return Err(e);
        }

        Ok(())
    }
}

/// Writes every chunk of `body` to `writer`, emitting one event per chunk.
async fn relay_chunks<W>(
    mut body: ByteStream,
    writer: &mut W,
    transfer: &mut Transfer,
    on_progress: Option<&dyn ProgressEmitter>,
) -> Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    debug!("Retrieving chunks...");
    while let Some(item) = body.next().await {
        let mut chunk = item?;
        let chunk_size = chunk.len();

        writer.write_all_buf(&mut chunk).await?;

        if let Some(event) = transfer.record_chunk(chunk_size) {
            if let Some(emitter) = on_progress {
                emitter.emit(event);
            }
        }
    }
    writer.flush().await?;
    Ok(())
}
