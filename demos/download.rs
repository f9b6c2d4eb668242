//! Download one or more URLs with terminal progress bars.
//!
//! ```text
//! cargo run --example download -- https://httpbin.org/bytes/256000 out.bin
//! ```
//!
//! Arguments are read as `<url> <file path>` pairs. Set `RUST_LOG=debug` to
//! see the transfer lifecycle.

use color_eyre::eyre::{bail, Result};
use http_relay::progress::{ProgressBarOpts, ProgressDisplay};
use http_relay::{DownloadOptions, DownloaderBuilder};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.len() % 2 != 0 {
        bail!("usage: download <url> <file path> [<url> <file path> ...]");
    }

    let downloads: Vec<DownloadOptions> = args
        .chunks(2)
        .map(|pair| DownloadOptions::new(pair[0].as_str(), pair[1].as_str()).with_progress(true))
        .collect();

    let downloader = DownloaderBuilder::new()
        .directory(PathBuf::from("downloads"))
        .concurrent_downloads(4)
        .build()?;
    let display = ProgressDisplay::new(ProgressBarOpts::with_pip_style());

    let results = downloader.download_all(&downloads, &display).await;
    display.finish();

    for (options, result) in downloads.iter().zip(results) {
        match result {
            Ok(result) => println!("{} -> {:?}", options.url().unwrap_or_default(), result),
            Err(e) => eprintln!("{} failed: {}", options.url().unwrap_or_default(), e),
        }
    }

    Ok(())
}
