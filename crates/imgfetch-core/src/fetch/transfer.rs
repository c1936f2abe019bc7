//! Single GET via libcurl with metadata gates and an abortable body stream.

use std::cell::RefCell;
use std::path::Path;
use std::time::Duration;

use crate::config::FetchConfig;
use crate::error::{FetchError, RejectReason};
use crate::storage::{CandidateError, CandidateFile, SavedFile};

use super::gate;
use super::metadata::HeaderCollector;

/// libcurl accepts receive buffers between 1 KiB and 512 KiB.
const MIN_BUFFER: usize = 1024;
const MAX_BUFFER: usize = 512 * 1024;

const MAX_REDIRECTS: u32 = 10;

/// Where the body goes. Decided when the final response's headers end, or at
/// the first body byte when the header block could still be a proxy reply.
enum Sink {
    Pending,
    Writing(CandidateFile),
    Failed(FetchError),
}

struct TransferState<'a> {
    url: &'a str,
    dir: &'a Path,
    cfg: &'a FetchConfig,
    headers: HeaderCollector,
    sink: Sink,
}

impl TransferState<'_> {
    /// Returns false to make libcurl abort the transfer.
    fn on_header(&mut self, data: &[u8]) -> bool {
        let line = String::from_utf8_lossy(data);
        self.headers.push_line(&line);
        if !line.trim().is_empty() || self.headers.awaits_next_response() {
            return true;
        }
        // End of the final header block: gate before any body byte is read.
        self.open_sink();
        !matches!(self.sink, Sink::Failed(_))
    }

    /// Returns false to make libcurl abort the transfer.
    fn on_body(&mut self, data: &[u8]) -> bool {
        self.open_sink();
        let result = match &mut self.sink {
            Sink::Writing(candidate) => candidate.write_chunk(data),
            _ => return false,
        };
        match result {
            Ok(()) => true,
            Err(err) => {
                if let Sink::Writing(candidate) = std::mem::replace(&mut self.sink, Sink::Pending) {
                    self.sink = Sink::Failed(abandon(candidate, err));
                }
                false
            }
        }
    }

    /// Runs the gates once; later calls (e.g. trailer blank lines) are no-ops.
    fn open_sink(&mut self) {
        if let Sink::Pending = self.sink {
            self.sink = match self.open_candidate() {
                Ok(c) => Sink::Writing(c),
                Err(e) => Sink::Failed(e),
            };
        }
    }

    fn open_candidate(&self) -> Result<CandidateFile, FetchError> {
        open_candidate(&self.headers, self.url, self.dir, self.cfg)
    }

    fn finish(self, performed: Result<(), curl::Error>) -> Result<SavedFile, FetchError> {
        let TransferState {
            url,
            dir,
            cfg,
            headers,
            sink,
        } = self;
        let candidate = match (sink, performed) {
            (Sink::Failed(e), _) => return Err(e),
            // Dropping an unfinished candidate removes it.
            (_, Err(e)) => return Err(FetchError::ConnectionFailed(e.to_string())),
            (Sink::Writing(candidate), Ok(())) => candidate,
            // No header terminator was seen; the gates still apply.
            (Sink::Pending, Ok(())) => open_candidate(&headers, url, dir, cfg)?,
        };
        let path = candidate.path().to_path_buf();
        candidate
            .commit()
            .map_err(|e| FetchError::filesystem(path, e))
    }
}

/// Runs the metadata gates, then opens the file to stream into.
fn open_candidate(
    headers: &HeaderCollector,
    url: &str,
    dir: &Path,
    cfg: &FetchConfig,
) -> Result<CandidateFile, FetchError> {
    let meta = headers.metadata();
    let filename = gate::admit(meta, url, cfg).inspect_err(|e| {
        tracing::debug!(url, ?meta, "response refused: {}", e);
    })?;
    CandidateFile::create(dir, &filename, cfg.max_file_size)
        .map_err(|e| FetchError::filesystem(dir.join(&filename), e))
}

/// Turns a failed chunk write into the error to report. The partial file is removed either way.
fn abandon(candidate: CandidateFile, err: CandidateError) -> FetchError {
    let path = candidate.path().to_path_buf();
    match err {
        CandidateError::LimitExceeded { limit } => {
            tracing::info!(
                path = %path.display(),
                written = candidate.written(),
                limit,
                "body exceeded size limit; aborting"
            );
            match candidate.discard() {
                Ok(()) => RejectReason::TooLargeActual { limit }.into(),
                Err(e) => FetchError::filesystem(path, e),
            }
        }
        CandidateError::Io(e) => {
            drop(candidate);
            FetchError::filesystem(path, e)
        }
    }
}

/// Performs the GET for `url`, streaming an accepted body into `dir`.
pub(super) fn get(url: &str, dir: &Path, cfg: &FetchConfig) -> Result<SavedFile, FetchError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(MAX_REDIRECTS)?;
    easy.useragent(concat!("imgfetch/", env!("CARGO_PKG_VERSION")))?;
    easy.buffer_size(cfg.chunk_size.clamp(MIN_BUFFER, MAX_BUFFER))?;
    // Connect timeout plus a stall timeout: under 1 byte/s for the whole window aborts.
    easy.connect_timeout(cfg.timeout())?;
    easy.low_speed_limit(1)?;
    easy.low_speed_time(cfg.timeout().max(Duration::from_secs(1)))?;

    let state = RefCell::new(TransferState {
        url,
        dir,
        cfg,
        headers: HeaderCollector::default(),
        sink: Sink::Pending,
    });

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| state.borrow_mut().on_header(data))?;
        transfer.write_function(|data| {
            if state.borrow_mut().on_body(data) {
                Ok(data.len())
            } else {
                Ok(0)
            }
        })?;
        transfer.perform()
    };

    state.into_inner().finish(performed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn state<'a>(url: &'a str, dir: &'a Path, cfg: &'a FetchConfig) -> TransferState<'a> {
        TransferState {
            url,
            dir,
            cfg,
            headers: HeaderCollector::default(),
            sink: Sink::Pending,
        }
    }

    fn feed(st: &mut TransferState<'_>, lines: &[&str]) -> bool {
        lines.iter().all(|l| st.on_header(l.as_bytes()))
    }

    #[test]
    fn tunnel_reply_then_image_is_saved() {
        let dir = tempdir().unwrap();
        let cfg = FetchConfig::default();
        let mut st = state("https://e.com/cat.png", dir.path(), &cfg);

        assert!(feed(&mut st, &["HTTP/1.1 200 Connection established\r\n", "\r\n"]));
        assert!(matches!(st.sink, Sink::Pending));
        assert!(feed(
            &mut st,
            &[
                "HTTP/1.1 200 OK\r\n",
                "Content-Type: image/png\r\n",
                "Content-Length: 4\r\n",
                "\r\n",
            ]
        ));
        assert!(matches!(st.sink, Sink::Writing(_)));
        assert!(st.on_body(b"\x89PNG"));

        let saved = st.finish(Ok(())).unwrap();
        assert_eq!(saved.path, dir.path().join("cat.png"));
        assert_eq!(saved.size, 4);
    }

    #[test]
    fn headerless_ok_is_gated_at_first_body_byte() {
        let dir = tempdir().unwrap();
        let cfg = FetchConfig::default();
        let mut st = state("https://e.com/cat.png", dir.path(), &cfg);

        assert!(feed(&mut st, &["HTTP/1.0 200 OK\r\n", "\r\n"]));
        assert!(!st.on_body(b"<html>"));

        let err = st.finish(Ok(())).unwrap_err();
        assert_eq!(
            err.reject_reason().map(|r| r.tag()),
            Some("invalid-content-type")
        );
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn gates_run_at_end_of_final_headers() {
        let dir = tempdir().unwrap();
        let cfg = FetchConfig::default();
        let mut st = state("https://e.com/page.png", dir.path(), &cfg);

        assert!(!feed(
            &mut st,
            &["HTTP/1.1 200 OK\r\n", "Content-Type: text/html\r\n", "\r\n"]
        ));
        assert!(matches!(st.sink, Sink::Failed(_)));
    }
}
