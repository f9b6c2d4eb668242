//! Progress bar styling.
//!
//! # Examples
//!
//! ```rust
//! use http_relay::progress::ProgressBarOpts;
//!
//! let opts = ProgressBarOpts::new(
//!     Some("[{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}".to_string()),
//!     Some(ProgressBarOpts::CHARS_FINE.to_string()),
//!     true,
//!     false,
//! );
//! # let _ = opts;
//! ```

use crate::progress::ContentLength;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::warn;

/// Define the options for a progress bar.
#[derive(Debug, Clone)]
pub struct ProgressBarOpts {
    /// Progress bar template string, used when the total is known.
    template: Option<String>,
    /// Spinner template string, used when the total is unknown.
    spinner_template: Option<String>,
    /// Progression characters set.
    ///
    /// There must be at least 3 characters for the following states:
    /// "filled", "current", and "to do".
    progress_chars: Option<String>,
    /// Enable or disable the progress bar.
    pub(crate) enabled: bool,
    /// Clear the progress bar once completed.
    pub(crate) clear: bool,
}

impl Default for ProgressBarOpts {
    fn default() -> Self {
        Self::with_pip_style()
    }
}

impl ProgressBarOpts {
    /// Template which looks like the Python package installer pip.
    ///
    /// `━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━ 211.23 KiB/211.23 KiB 1008.31 KiB/s eta 0s`
    pub const TEMPLATE_PIP: &'static str =
        "{bar:40.green/black} {bytes:>11.green}/{total_bytes:<11.green} {bytes_per_sec:>13.red} eta {eta:.blue} {msg}";
    /// Spinner with the byte count, for bodies of unknown size.
    pub const TEMPLATE_SPINNER: &'static str = "{spinner:.green} {bytes:>11.green} {bytes_per_sec:>13.red} {msg}";
    /// Use fine blocks as progress characters: `"█▉▊▋▌▍▎▏  "`.
    pub const CHARS_FINE: &'static str = "█▉▊▋▌▍▎▏  ";
    /// Use a line as progress characters: `"━╾─"`.
    pub const CHARS_LINE: &'static str = "━╾╴─";
    /// Use rough blocks as progress characters: `"█  "`.
    pub const CHARS_ROUGH: &'static str = "█  ";

    /// Create a new [`ProgressBarOpts`].
    pub fn new(
        template: Option<String>,
        progress_chars: Option<String>,
        enabled: bool,
        clear: bool,
    ) -> Self {
        Self {
            template,
            spinner_template: None,
            progress_chars,
            enabled,
            clear,
        }
    }

    /// Create a new [`ProgressBarOpts`] which looks like Python pip.
    pub fn with_pip_style() -> Self {
        Self {
            template: Some(ProgressBarOpts::TEMPLATE_PIP.into()),
            spinner_template: Some(ProgressBarOpts::TEMPLATE_SPINNER.into()),
            progress_chars: Some(ProgressBarOpts::CHARS_LINE.into()),
            enabled: true,
            clear: true,
        }
    }

    /// Create a new [`ProgressBarOpts`] which hides the progress bars.
    pub fn hidden() -> Self {
        Self {
            enabled: false,
            ..ProgressBarOpts::with_pip_style()
        }
    }

    /// Set the template used when the total size is unknown.
    pub fn set_spinner_template(&mut self, template: Option<String>) {
        self.spinner_template = template;
    }

    /// Set to `true` to clear the progress bar upon completion.
    pub fn set_clear(&mut self, clear: bool) {
        self.clear = clear;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Create a [`ProgressStyle`] for a bar whose total is known.
    pub fn to_progress_style(&self) -> ProgressStyle {
        let mut style = templated(ProgressStyle::default_bar(), self.template.as_deref());
        if let Some(progress_chars) = &self.progress_chars {
            style = style.progress_chars(progress_chars);
        }
        style
    }

    /// Create a [`ProgressStyle`] for a spinner.
    pub fn to_spinner_style(&self) -> ProgressStyle {
        templated(ProgressStyle::default_spinner(), self.spinner_template.as_deref())
    }

    /// Create a [`ProgressBar`] sized for `content_length`.
    ///
    /// An unknown length yields a spinner instead of a bar.
    pub fn to_progress_bar(&self, content_length: ContentLength) -> ProgressBar {
        let pb = match content_length {
            ContentLength::Known(total) => ProgressBar::new(total).with_style(self.to_progress_style()),
            ContentLength::Unknown => ProgressBar::new_spinner().with_style(self.to_spinner_style()),
        };
        if !self.enabled {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        pb
    }
}

fn templated(style: ProgressStyle, template: Option<&str>) -> ProgressStyle {
    let Some(template) = template else {
        return style;
    };
    match style.clone().template(template) {
        Ok(styled) => styled,
        Err(e) => {
            warn!("Ignoring invalid progress template {:?}: {}", template, e);
            style
        }
    }
}
