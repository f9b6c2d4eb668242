//! Progress reporting.
//!
//! This module defines the events a download publishes while it runs and the
//! sinks that can receive them.
//!
//! # Overview
//!
//! - `event` - [`ProgressEvent`] and [`ContentLength`]
//! - `emitter` - The [`ProgressEmitter`] trait, closure sinks and [`channel`]
//! - `display` - [`ProgressDisplay`], an `indicatif` renderer
//! - `style` - Progress bar styling options
//!
//! # Examples
//!
//! ## Listening on another task
//!
//! ```rust,no_run
//! use http_relay::progress::channel;
//! use http_relay::{DownloadOptions, DownloaderBuilder};
//!
//! # async fn example() -> Result<(), http_relay::Error> {
//! let downloader = DownloaderBuilder::new().build()?;
//! let (sender, mut receiver) = channel();
//!
//! let listener = tokio::spawn(async move {
//!     while let Some(event) = receiver.recv().await {
//!         println!("{}: {}/{}", event.url(), event.bytes(), event.content_length());
//!     }
//! });
//!
//! let options = DownloadOptions::new("https://example.com/f.zip", "f.zip").with_progress(true);
//! downloader.download(&options, &sender).await?;
//! drop(sender);
//! listener.await.ok();
//! # Ok(())
//! # }
//! ```

pub(crate) mod display;
pub(crate) mod emitter;
pub(crate) mod event;
pub(crate) mod style;

pub use display::ProgressDisplay;
pub use emitter::{channel, NoProgress, ProgressChannel, ProgressEmitter, ProgressReceiver};
pub use event::{ContentLength, EventKind, ProgressEvent};
pub use style::ProgressBarOpts;
