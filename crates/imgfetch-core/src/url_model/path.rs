//! Filename extraction from the URL path.

use super::content_disposition::percent_decode;

/// Last path segment of `url`, percent-decoded.
///
/// Query string and fragment are ignored. Returns `None` for unparseable URLs
/// and for paths ending in `/` (directory-like URLs have no file name).
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.last()?;
    let decoded = percent_decode(segment);
    if decoded.is_empty() || decoded == "." || decoded == ".." {
        return None;
    }
    Some(decoded)
}
