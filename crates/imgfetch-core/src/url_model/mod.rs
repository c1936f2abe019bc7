//! URL modeling and filename derivation.
//!
//! Picks the local filename for a fetched image from the `Content-Disposition`
//! hint, the URL path, or a synthesized fallback, and sanitizes it so it
//! always stays inside the download directory.

mod content_disposition;
mod path;
mod sanitize;

pub use content_disposition::filename_hint;
pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename;

/// Prefix of synthesized filenames.
const FALLBACK_PREFIX: &str = "image_";

/// Extension of synthesized filenames.
const FALLBACK_EXTENSION: &str = ".jpg";

/// Derives the filename for saving the body of `url`.
///
/// Priority: filename hint from `content_disposition`, then the last URL path
/// segment, then `image_<url-hash>.jpg`. Each candidate is sanitized before
/// it is considered; one that sanitizes to nothing is skipped.
///
/// # Examples
///
/// - `derive_filename("https://example.com/cat.png", None)` → `"cat.png"`
/// - `derive_filename("https://example.com/", Some("inline; filename=\"dog.gif\""))` → `"dog.gif"`
pub fn derive_filename(url: &str, content_disposition: Option<&str>) -> String {
    let usable = |raw: String| Some(sanitize_filename(&raw)).filter(|s| !s.is_empty());

    content_disposition
        .and_then(filename_hint)
        .and_then(usable)
        .or_else(|| filename_from_url_path(url).and_then(usable))
        .unwrap_or_else(|| fallback_filename(url))
}

/// `image_<fnv1a64(url)>.jpg`. Stable across runs and platforms; not a security hash.
pub fn fallback_filename(url: &str) -> String {
    format!("{}{:016x}{}", FALLBACK_PREFIX, fnv1a64(url.as_bytes()), FALLBACK_EXTENSION)
}

/// Lowercased extension including the leading dot (`"A.JPG"` → `".jpg"`).
///
/// Dotfiles such as `.png` have no extension, matching the usual splitext rule.
pub fn extension_of(filename: &str) -> Option<String> {
    let dot = filename.rfind('.')?;
    if filename[..dot].trim_start_matches('.').is_empty() {
        return None;
    }
    Some(filename[dot..].to_ascii_lowercase())
}

fn fnv1a64(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    bytes
        .iter()
        .fold(OFFSET, |h, b| (h ^ u64::from(*b)).wrapping_mul(PRIME))
}
