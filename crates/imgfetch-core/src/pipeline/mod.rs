//! Per-URL orchestration: fetch, hash, dedup, record.
//!
//! URLs run strictly one after another in input order. Every failure is
//! captured as an [`Outcome`] so the rest of the batch keeps going.

mod report;

pub use report::BatchSummary;

use std::path::Path;

use crate::error::FetchError;
use crate::fetch::ImageFetcher;
use crate::ledger::{hash_of, ContentHash, DedupLedger};
use crate::storage::SavedFile;

/// What happened to one URL.
#[derive(Debug)]
pub enum Outcome {
    /// New content: file kept and hash appended to the ledger.
    Saved { file: SavedFile, hash: ContentHash },
    /// Content already in the ledger: the freshly written file was removed.
    Duplicate { file_name: String, hash: ContentHash },
    Failed(FetchError),
}

impl Outcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Outcome::Saved { .. })
    }
}

/// One URL and its outcome; `Display` gives the console line.
#[derive(Debug)]
pub struct UrlReport {
    pub url: String,
    pub outcome: Outcome,
}

/// Fetches `url` into `target_dir`, then dedups the saved file against `ledger`.
pub fn process_url<F: ImageFetcher + ?Sized>(
    fetcher: &F,
    ledger: &mut DedupLedger,
    url: &str,
    target_dir: &Path,
) -> Outcome {
    let file = match fetcher.fetch(url, target_dir) {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(url, "fetch failed: {}", e);
            return Outcome::Failed(e);
        }
    };
    match dedup(ledger, file) {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!(url, "dedup failed: {}", e);
            Outcome::Failed(e)
        }
    }
}

/// Hash check and ledger append for a freshly saved file.
///
/// A hashing failure leaves the file in place (it passed every gate) and is reported.
fn dedup(ledger: &mut DedupLedger, file: SavedFile) -> Result<Outcome, FetchError> {
    let hash = hash_of(&file.path).map_err(|e| FetchError::filesystem(&file.path, e))?;
    let seen = ledger
        .is_duplicate(&hash)
        .map_err(|e| FetchError::filesystem(ledger.path(), e))?;

    if seen {
        let file_name = file.file_name();
        let path = file.path.clone();
        file.remove().map_err(|e| FetchError::filesystem(&path, e))?;
        tracing::info!(path = %path.display(), %hash, "duplicate content discarded");
        return Ok(Outcome::Duplicate { file_name, hash });
    }

    ledger
        .record(&hash)
        .map_err(|e| FetchError::filesystem(ledger.path(), e))?;
    Ok(Outcome::Saved { file, hash })
}

/// Runs every URL in order, calling `on_report` as each one finishes.
pub fn run_batch<F, R>(
    fetcher: &F,
    ledger: &mut DedupLedger,
    urls: &[String],
    target_dir: &Path,
    mut on_report: R,
) -> BatchSummary
where
    F: ImageFetcher + ?Sized,
    R: FnMut(&UrlReport),
{
    let mut summary = BatchSummary::default();
    for url in urls {
        let outcome = process_url(fetcher, ledger, url, target_dir);
        summary.count(&outcome);
        let report = UrlReport {
            url: url.clone(),
            outcome,
        };
        on_report(&report);
    }
    tracing::info!(
        saved = summary.saved,
        duplicates = summary.duplicates,
        failed = summary.failed,
        "batch finished"
    );
    summary
}

#[cfg(test)]
mod tests;
