//! Local file lifecycle: candidate files while streaming, saved files after.

mod candidate;
mod unique_path;

pub use candidate::{CandidateError, CandidateFile};

use std::io;
use std::path::PathBuf;

/// A file that passed every gate and was fully written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub path: PathBuf,
    /// Size in bytes; never above the configured limit.
    pub size: u64,
}

impl SavedFile {
    /// File name component, for reporting.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Deletes the file from disk.
    pub fn remove(self) -> io::Result<()> {
        std::fs::remove_file(&self.path)
    }
}
