//! Accept/reject gates applied to response metadata before any body byte is stored.

use crate::config::FetchConfig;
use crate::error::{FetchError, RejectReason};
use crate::url_model::{derive_filename, extension_of};

use super::metadata::ResponseMetadata;

/// Non-2xx (or missing) status is a connection-level failure, not a policy rejection.
pub fn ensure_success(meta: &ResponseMetadata) -> Result<(), FetchError> {
    match meta.status {
        Some(code) if (200..300).contains(&code) => Ok(()),
        Some(code) => Err(FetchError::ConnectionFailed(format!("HTTP {}", code))),
        None => Err(FetchError::ConnectionFailed(
            "response had no HTTP status line".to_string(),
        )),
    }
}

pub fn check_content_type(meta: &ResponseMetadata) -> Result<(), RejectReason> {
    match meta.content_type.as_deref() {
        Some(ct) if ct.starts_with("image/") => Ok(()),
        other => Err(RejectReason::InvalidContentType {
            content_type: other.map(str::to_string),
        }),
    }
}

pub fn check_declared_length(meta: &ResponseMetadata, limit: u64) -> Result<(), RejectReason> {
    match meta.content_length {
        Some(declared) if declared > limit => {
            Err(RejectReason::TooLargeDeclared { declared, limit })
        }
        _ => Ok(()),
    }
}

pub fn check_extension(filename: &str, cfg: &FetchConfig) -> Result<(), RejectReason> {
    match extension_of(filename) {
        Some(ext) if cfg.is_extension_allowed(&ext) => Ok(()),
        _ => Err(RejectReason::BlockedExtension {
            filename: filename.to_string(),
        }),
    }
}

/// Runs every gate in order and returns the filename to save under.
///
/// Order: status, content type, declared length, filename derivation, extension.
pub fn admit(meta: &ResponseMetadata, url: &str, cfg: &FetchConfig) -> Result<String, FetchError> {
    ensure_success(meta)?;
    check_content_type(meta)?;
    check_declared_length(meta, cfg.max_file_size)?;
    let filename = derive_filename(url, meta.content_disposition.as_deref());
    check_extension(&filename, cfg)?;
    Ok(filename)
}
