//! Terminal rendering of progress events.
//!
//! [`ProgressDisplay`] is a [`ProgressEmitter`] that draws one `indicatif`
//! bar per download. A bar is created on the first event of its download and
//! finished once the byte count reaches a known total. Two downloads of the
//! same URL get separate bars.
//!
//! # Examples
//!
//! ```rust,no_run
//! use http_relay::progress::{ProgressBarOpts, ProgressDisplay};
//! use http_relay::{DownloadOptions, DownloaderBuilder};
//!
//! # async fn example() -> Result<(), http_relay::Error> {
//! let downloader = DownloaderBuilder::new().build()?;
//! let display = ProgressDisplay::new(ProgressBarOpts::with_pip_style());
//! let options = DownloadOptions::new("https://example.com/f.zip", "f.zip").with_progress(true);
//! downloader.download(&options, &display).await?;
//! display.finish();
//! # Ok(())
//! # }
//! ```

use super::emitter::ProgressEmitter;
use super::event::ProgressEvent;
use super::style::ProgressBarOpts;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

type BarKey = (u64, String);

/// Progress display manager that coordinates one progress bar per download.
pub struct ProgressDisplay {
    multi: MultiProgress,
    bars: Mutex<HashMap<BarKey, ProgressBar>>,
    style: ProgressBarOpts,
}

impl ProgressDisplay {
    /// Create a new progress display manager.
    pub fn new(style: ProgressBarOpts) -> Self {
        let multi = match style.is_enabled() {
            true => MultiProgress::new(),
            false => MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
        };

        Self {
            multi,
            bars: Mutex::new(HashMap::new()),
            style,
        }
    }

    /// Create a display that draws nothing.
    pub fn hidden() -> Self {
        Self::new(ProgressBarOpts::hidden())
    }

    /// Number of bars still in progress.
    pub fn active(&self) -> usize {
        self.bars().len()
    }

    /// Finish every remaining bar, e.g. spinners for bodies of unknown size.
    pub fn finish(&self) {
        for (_, pb) in self.bars().drain() {
            self.finish_bar(&pb);
        }
    }

    fn bars(&self) -> MutexGuard<'_, HashMap<BarKey, ProgressBar>> {
        self.bars.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn finish_bar(&self, pb: &ProgressBar) {
        if self.style.clear {
            pb.finish_and_clear();
        } else {
            pb.finish();
        }
    }
}

impl ProgressEmitter for ProgressDisplay {
    fn emit(&self, event: ProgressEvent) {
        let mut bars = self.bars();
        let key = (event.download_id(), event.url().to_string());
        let pb = bars.entry(key.clone()).or_insert_with(|| {
            let pb = self.multi.add(self.style.to_progress_bar(event.content_length()));
            pb.set_message(event.url().to_string());
            pb
        });
        pb.set_position(event.bytes());

        if event.is_complete() {
            if let Some(pb) = bars.remove(&key) {
                self.finish_bar(&pb);
            }
        }
    }
}
