//! `imgfetch checksum` – content hash of a file, checked against the ledger.

use anyhow::{Context, Result};
use imgfetch_core::ledger::{hash_of, DedupLedger};
use std::path::Path;

/// Print the SHA-256 of `path` and whether `ledger_path` already records it.
pub fn run_checksum(path: &Path, ledger_path: &Path) -> Result<()> {
    let hash = hash_of(path).with_context(|| format!("hash {}", path.display()))?;
    let seen = DedupLedger::new(ledger_path)
        .is_duplicate(&hash)
        .with_context(|| format!("read ledger {}", ledger_path.display()))?;
    println!("{}  {}", hash, path.display());
    if seen {
        println!("already recorded in {}", ledger_path.display());
    } else {
        println!("not in {}", ledger_path.display());
    }
    Ok(())
}
