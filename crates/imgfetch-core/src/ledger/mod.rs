//! Dedup ledger: append-only text file of content hashes already saved.
//!
//! One lowercase hex SHA-256 per line, in discovery order. The ledger never
//! rewrites or removes entries and does not dedupe itself; callers check
//! [`DedupLedger::is_duplicate`] before [`DedupLedger::record`].

mod checksum;

pub use checksum::{hash_of, hash_reader, ContentHash};

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Handle on the ledger file. The file is created on the first `record`.
#[derive(Debug, Clone)]
pub struct DedupLedger {
    path: PathBuf,
}

impl DedupLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True iff `hash` is an exact line in the ledger. A missing ledger holds nothing.
    pub fn is_duplicate(&self, hash: &ContentHash) -> io::Result<bool> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };
        for line in BufReader::new(file).lines() {
            if line?.trim_end() == hash.as_str() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Appends `hash` as a new line, creating the ledger (and its directory) if needed.
    pub fn record(&mut self, hash: &ContentHash) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(f, "{}", hash)?;
        f.flush()?;
        tracing::debug!(ledger = %self.path.display(), %hash, "hash recorded");
        Ok(())
    }

    /// All recorded hashes in discovery order; lines that are not digests are skipped.
    pub fn entries(&self) -> io::Result<Vec<ContentHash>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut out = Vec::new();
        for line in BufReader::new(file).lines() {
            if let Some(h) = ContentHash::parse(&line?) {
                out.push(h);
            }
        }
        Ok(out)
    }
}
