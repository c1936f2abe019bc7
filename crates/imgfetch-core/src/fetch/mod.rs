//! Fetch validator: one URL in, one saved image (or a typed failure) out.
//!
//! The GET is gated on response metadata before any body byte reaches disk:
//! status, `Content-Type: image/*`, declared `Content-Length`, and the
//! filename extension. The body is then streamed with a running byte count;
//! crossing the size limit aborts the transfer and deletes the partial file.

mod gate;
mod metadata;
mod transfer;

pub use gate::{admit, check_content_type, check_declared_length, check_extension, ensure_success};
pub use metadata::{HeaderCollector, ResponseMetadata};

use std::path::Path;

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::storage::SavedFile;

/// Something that can turn a URL into a saved file under a directory.
pub trait ImageFetcher {
    fn fetch(&self, url: &str, target_dir: &Path) -> Result<SavedFile, FetchError>;
}

/// libcurl-backed fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    cfg: FetchConfig,
}

impl HttpFetcher {
    pub fn new(cfg: FetchConfig) -> Self {
        Self { cfg }
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str, target_dir: &Path) -> Result<SavedFile, FetchError> {
        check_scheme(url)?;
        std::fs::create_dir_all(target_dir)
            .map_err(|e| FetchError::filesystem(target_dir, e))?;

        tracing::debug!(url, dir = %target_dir.display(), "GET");
        let saved = transfer::get(url, target_dir, &self.cfg)?;
        tracing::info!(url, path = %saved.path.display(), size = saved.size, "saved");
        Ok(saved)
    }
}

/// Only absolute http(s) URLs are fetched; libcurl would otherwise happily read `file://`.
fn check_scheme(url: &str) -> Result<(), FetchError> {
    let parsed = url::Url::parse(url)
        .map_err(|e| FetchError::ConnectionFailed(format!("invalid URL: {}", e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(FetchError::ConnectionFailed(format!(
            "unsupported URL scheme: {}",
            other
        ))),
    }
}
