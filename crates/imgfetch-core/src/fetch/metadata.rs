//! Response metadata collected from header lines.

/// Declared metadata of the final HTTP response. All of it is untrusted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
    /// Status code from the status line, if one was seen.
    pub status: Option<u32>,
    /// `Content-Type`, trimmed and lowercased.
    pub content_type: Option<String>,
    /// `Content-Length`, if present and numeric.
    pub content_length: Option<u64>,
    /// Raw `Content-Disposition` value (filename hint source).
    pub content_disposition: Option<String>,
}

/// Accumulates header lines as libcurl delivers them.
///
/// With redirects followed, every intermediate response delivers its own
/// status line and headers; a new status line starts over so only the final
/// response is kept.
#[derive(Debug, Default)]
pub struct HeaderCollector {
    meta: ResponseMetadata,
    has_location: bool,
}

impl HeaderCollector {
    pub fn push_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if line.starts_with("HTTP/") {
            self.meta = ResponseMetadata {
                status: parse_status_line(line),
                ..ResponseMetadata::default()
            };
            self.has_location = false;
            return;
        }
        let Some((name, value)) = line.split_once(':') else {
            return;
        };
        let name = name.trim();
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-type") {
            self.meta.content_type = Some(value.to_ascii_lowercase());
        } else if name.eq_ignore_ascii_case("content-length") {
            self.meta.content_length = value.parse::<u64>().ok();
        } else if name.eq_ignore_ascii_case("content-disposition") {
            self.meta.content_disposition = Some(value.to_string());
        } else if name.eq_ignore_ascii_case("location") {
            self.has_location = true;
        }
    }

    /// True while the current response may be one libcurl will move past:
    /// an interim 1xx, a redirect it is about to follow, or a proxy's
    /// `200 Connection established` (a 2xx without entity headers).
    ///
    /// A real response that looks like a tunnel reply is still gated, once
    /// its body starts or the transfer ends.
    pub fn awaits_next_response(&self) -> bool {
        match self.meta.status {
            Some(code) if (100..200).contains(&code) => true,
            Some(code) if (200..300).contains(&code) => self.is_tunnel_reply(),
            Some(code) if (300..400).contains(&code) => self.has_location,
            _ => false,
        }
    }

    fn is_tunnel_reply(&self) -> bool {
        self.meta.content_type.is_none()
            && self.meta.content_length.is_none()
            && self.meta.content_disposition.is_none()
    }

    pub fn metadata(&self) -> &ResponseMetadata {
        &self.meta
    }
}

/// `HTTP/1.1 404 Not Found` → `Some(404)`; `HTTP/2 200` → `Some(200)`.
fn parse_status_line(line: &str) -> Option<u32> {
    line.split_whitespace().nth(1)?.parse().ok()
}
