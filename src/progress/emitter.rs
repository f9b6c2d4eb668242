//! Progress sinks.
//!
//! The relay reports progress through the [`ProgressEmitter`] trait. Events
//! are emitted from whichever task runs the download; [`ProgressChannel`]
//! moves them over to the task that owns the matching receiver.

use super::event::ProgressEvent;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::trace;

/// Receives progress events for in-flight downloads.
pub trait ProgressEmitter: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

impl<F> ProgressEmitter for F
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn emit(&self, event: ProgressEvent) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressEmitter for NoProgress {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Receiving half of a [`channel`].
pub type ProgressReceiver = UnboundedReceiver<ProgressEvent>;

/// Sending half of a [`channel`].
#[derive(Debug, Clone)]
pub struct ProgressChannel {
    sender: UnboundedSender<ProgressEvent>,
}

impl ProgressEmitter for ProgressChannel {
    fn emit(&self, event: ProgressEvent) {
        // A dropped receiver only means nobody is listening anymore.
        if self.sender.send(event).is_err() {
            trace!("progress receiver dropped, event discarded");
        }
    }
}

/// Creates a progress channel.
///
/// ```rust
/// use http_relay::progress::{channel, ContentLength, ProgressEmitter, ProgressEvent};
///
/// # #[tokio::main]
/// # async fn main() {
/// let (sender, mut receiver) = channel();
/// sender.emit(ProgressEvent::download("https://example.com/f.zip", 10, ContentLength::Unknown));
/// assert_eq!(receiver.recv().await.unwrap().bytes(), 10);
/// # }
/// ```
pub fn channel() -> (ProgressChannel, ProgressReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (ProgressChannel { sender }, receiver)
}
