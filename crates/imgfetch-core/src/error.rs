//! Per-URL failure taxonomy.
//!
//! Every way a single fetch can fail is a `FetchError` value. The batch runner
//! turns these into report lines; none of them stop the batch.

use std::path::PathBuf;

/// Policy violation that made the validator refuse a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    /// Declared `Content-Type` missing or not `image/*`.
    #[error("invalid content type: {}", .content_type.as_deref().unwrap_or("<none>"))]
    InvalidContentType { content_type: Option<String> },
    /// Declared `Content-Length` above the limit; no body byte was read.
    #[error("file too large: {declared} bytes declared (limit {limit})")]
    TooLargeDeclared { declared: u64, limit: u64 },
    /// Body exceeded the limit while streaming; the partial file was removed.
    #[error("file too large: body exceeded {limit} bytes")]
    TooLargeActual { limit: u64 },
    /// Filename extension not in the allow-list.
    #[error("blocked suspicious file type: {filename}")]
    BlockedExtension { filename: String },
}

impl RejectReason {
    /// Short stable tag (`invalid-content-type`, `too-large-declared`, ...).
    pub fn tag(&self) -> &'static str {
        match self {
            RejectReason::InvalidContentType { .. } => "invalid-content-type",
            RejectReason::TooLargeDeclared { .. } => "too-large-declared",
            RejectReason::TooLargeActual { .. } => "too-large-actual",
            RejectReason::BlockedExtension { .. } => "blocked-extension",
        }
    }
}

/// Why a single URL could not be saved.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Transport failure, timeout, bad URL, or non-2xx status.
    #[error("connection error: {0}")]
    ConnectionFailed(String),
    /// The response violated a fetch policy gate.
    #[error("rejected ({tag}): {0}", tag = .0.tag())]
    Rejected(RejectReason),
    /// Local filesystem failure (create dir, write, remove).
    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Rejection reason, if this is a policy rejection.
    pub fn reject_reason(&self) -> Option<&RejectReason> {
        match self {
            FetchError::Rejected(r) => Some(r),
            _ => None,
        }
    }
}

impl From<RejectReason> for FetchError {
    fn from(r: RejectReason) -> Self {
        FetchError::Rejected(r)
    }
}

impl From<curl::Error> for FetchError {
    fn from(e: curl::Error) -> Self {
        FetchError::ConnectionFailed(e.to_string())
    }
}
