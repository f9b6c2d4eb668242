//! Per-download bookkeeping.
//!
//! A [`Transfer`] follows one download from creation to its terminal state
//! and turns received chunks into [`ProgressEvent`]s.
//!
//! ```text
//! Created -> Validated -> InFlight -> Completed
//!    |           |            |
//!    +-----------+------------+-----> Failed
//! ```

use crate::error::{Error, Result};
use crate::progress::{ContentLength, ProgressEvent};

use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

static NEXT_DOWNLOAD_ID: AtomicU64 = AtomicU64::new(1);

/// Lifecycle state of a [`Transfer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferState {
    /// Options received, not yet validated.
    Created,
    /// Options passed validation.
    Validated,
    /// Response head received, body streaming.
    InFlight,
    /// Body fully written.
    Completed,
    /// Validation or transfer failed.
    Failed,
}

impl TransferState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TransferState::Completed | TransferState::Failed)
    }

    /// Returns `true` if moving from `self` to `next` is allowed.
    pub fn can_advance_to(self, next: TransferState) -> bool {
        use TransferState::*;
        matches!(
            (self, next),
            (Created, Validated)
                | (Validated, InFlight)
                | (InFlight, Completed)
                | (Created | Validated | InFlight, Failed)
        )
    }
}

/// Tracks a single download.
#[derive(Debug, Clone)]
pub struct Transfer {
    id: u64,
    url: String,
    state: TransferState,
    bytes_received: u64,
    content_length: ContentLength,
}

impl Transfer {
    /// Creates a transfer for `url`, as supplied by the caller.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: NEXT_DOWNLOAD_ID.fetch_add(1, Ordering::Relaxed),
            url: url.into(),
            state: TransferState::Created,
            bytes_received: 0,
            content_length: ContentLength::Unknown,
        }
    }

    /// Identifier unique to this transfer within the process.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> TransferState {
        self.state
    }

    pub fn bytes_received(&self) -> u64 {
        self.bytes_received
    }

    pub fn content_length(&self) -> ContentLength {
        self.content_length
    }

    /// Moves to `next`, rejecting transitions the lifecycle does not allow.
    pub fn advance(&mut self, next: TransferState) -> Result<()> {
        if !self.state.can_advance_to(next) {
            return Err(Error::transfer(format!(
                "Invalid transfer transition from {:?} to {:?}",
                self.state, next
            )));
        }
        trace!("{}: {:?} -> {:?}", self.url, self.state, next);
        self.state = next;
        Ok(())
    }

    /// Enters [`TransferState::InFlight`] once the response head is known.
    pub fn start(&mut self, content_length: ContentLength) -> Result<()> {
        self.advance(TransferState::InFlight)?;
        self.content_length = content_length;
        Ok(())
    }

    /// Marks the transfer as failed. Terminal transfers are left untouched.
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            trace!("{}: {:?} -> Failed", self.url, self.state);
            self.state = TransferState::Failed;
        }
    }

    /// Accounts for a chunk of `len` bytes that was just written.
    ///
    /// Returns the matching progress event, or `None` for an empty chunk or
    /// when the transfer is not in flight.
    pub fn record_chunk(&mut self, len: usize) -> Option<ProgressEvent> {
        if self.state != TransferState::InFlight || len == 0 {
            return None;
        }
        self.bytes_received += len as u64;
        Some(
            ProgressEvent::download(self.url.clone(), self.bytes_received, self.content_length)
                .with_download_id(self.id),
        )
    }
}
