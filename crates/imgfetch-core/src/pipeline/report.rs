//! Human-readable per-URL report lines.

use std::fmt;

use crate::error::FetchError;

use super::{Outcome, UrlReport};

impl fmt::Display for UrlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let url = &self.url;
        match &self.outcome {
            Outcome::Saved { file, .. } => write!(
                f,
                "✓ Saved: {} -> {} ({} bytes)",
                url,
                file.path.display(),
                file.size
            ),
            Outcome::Duplicate { file_name, .. } => {
                write!(f, "✓ Duplicate, discarded: {} ({})", url, file_name)
            }
            Outcome::Failed(FetchError::ConnectionFailed(msg)) => {
                write!(f, "✗ Connection error for {}: {}", url, msg)
            }
            Outcome::Failed(FetchError::Rejected(reason)) => {
                write!(f, "✗ Skipped: {} [{}] {}", url, reason.tag(), reason)
            }
            Outcome::Failed(err @ FetchError::Filesystem { .. }) => {
                write!(f, "✗ An error occurred for {}: {}", url, err)
            }
        }
    }
}

/// Totals for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub saved: usize,
    pub duplicates: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub(super) fn count(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Saved { .. } => self.saved += 1,
            Outcome::Duplicate { .. } => self.duplicates += 1,
            Outcome::Failed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.saved + self.duplicates + self.failed
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} URL(s): {} saved, {} duplicate(s) discarded, {} failed",
            self.total(),
            self.saved,
            self.duplicates,
            self.failed
        )
    }
}
