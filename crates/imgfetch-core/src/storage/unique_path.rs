//! Non-clobbering file creation.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

/// Give up after this many numbered variants.
const MAX_VARIANTS: u32 = 10_000;

/// Atomically creates `dir/filename`, or `dir/stem-1.ext`, `dir/stem-2.ext`, ...
/// when the name is already taken.
pub(super) fn create_new(dir: &Path, filename: &str) -> io::Result<(File, PathBuf)> {
    let (stem, ext) = split_extension(filename);
    for n in 0..=MAX_VARIANTS {
        let path = if n == 0 {
            dir.join(filename)
        } else {
            dir.join(format!("{}-{}{}", stem, n, ext))
        };
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(f) => return Ok((f, path)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free name for {} in {}", filename, dir.display()),
    ))
}

/// `"cat.png"` → `("cat", ".png")`; `"noext"` → `("noext", "")`.
fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(i) if i > 0 => filename.split_at(i),
        _ => (filename, ""),
    }
}
