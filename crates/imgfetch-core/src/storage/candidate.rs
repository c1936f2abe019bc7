//! In-progress download file with a hard byte limit.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{unique_path, SavedFile};

/// Why a chunk could not be appended.
#[derive(Debug)]
pub enum CandidateError {
    /// Appending the chunk would take the file past its limit. Nothing was written.
    LimitExceeded { limit: u64 },
    Io(io::Error),
}

/// A file being streamed to disk.
///
/// Exclusively owned by one transfer. Dropping it without [`commit`](Self::commit)
/// removes the file, so every early return and error path leaves nothing behind.
pub struct CandidateFile {
    writer: Option<BufWriter<File>>,
    path: PathBuf,
    written: u64,
    limit: u64,
}

impl CandidateFile {
    /// Creates `dir/filename` (or `dir/stem-N.ext` if that name is taken) for writing.
    ///
    /// Never truncates an existing file.
    pub fn create(dir: &Path, filename: &str, limit: u64) -> io::Result<Self> {
        let (file, path) = unique_path::create_new(dir, filename)?;
        tracing::debug!(path = %path.display(), limit, "candidate file created");
        Ok(Self {
            writer: Some(BufWriter::new(file)),
            path,
            written: 0,
            limit,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes accepted so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Appends `chunk` unless the running total would exceed the limit.
    pub fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), CandidateError> {
        let total = self.written + chunk.len() as u64;
        if total > self.limit {
            return Err(CandidateError::LimitExceeded { limit: self.limit });
        }
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| CandidateError::Io(io::Error::other("candidate already closed")))?;
        writer.write_all(chunk).map_err(CandidateError::Io)?;
        self.written = total;
        Ok(())
    }

    /// Flushes and syncs the file and hands it over as a [`SavedFile`].
    ///
    /// On error the file is removed like any other abandoned candidate.
    pub fn commit(mut self) -> io::Result<SavedFile> {
        let writer = self
            .writer
            .take()
            .ok_or_else(|| io::Error::other("candidate already closed"))?;
        let file = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
        file.sync_all()?;
        drop(file);

        Ok(SavedFile {
            path: std::mem::take(&mut self.path),
            size: self.written,
        })
    }

    /// Closes and deletes the file, reporting a failed removal.
    pub fn discard(mut self) -> io::Result<()> {
        self.writer.take();
        let path = std::mem::take(&mut self.path);
        fs::remove_file(&path)
    }

    fn remove_quietly(&mut self) {
        self.writer.take();
        if self.path.as_os_str().is_empty() {
            return;
        }
        let path = std::mem::take(&mut self.path);
        match fs::remove_file(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), "removed partial file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %path.display(), "could not remove partial file: {}", e),
        }
    }
}

impl Drop for CandidateFile {
    fn drop(&mut self) {
        self.remove_quietly();
    }
}
