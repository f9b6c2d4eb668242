//! Download bookkeeping and results.
//!
//! # Overview
//!
//! - [`transfer`] - The per-download lifecycle and byte accounting
//! - [`result`] - [`DownloadResult`], the terminal value of a download
//!
//! # Examples
//!
//! ```rust
//! use http_relay::download::{Transfer, TransferState};
//! use http_relay::progress::ContentLength;
//!
//! let mut transfer = Transfer::new("https://example.com/f.zip");
//! transfer.advance(TransferState::Validated)?;
//! transfer.start(ContentLength::Known(300))?;
//!
//! let event = transfer.record_chunk(100).unwrap();
//! assert_eq!(event.bytes(), 100);
//! # Ok::<(), http_relay::Error>(())
//! ```

pub mod result;
pub mod transfer;

pub use result::DownloadResult;
pub use transfer::{Transfer, TransferState};
