//! Minimal HTTP/1.1 server for pipeline integration tests.
//!
//! Serves canned responses keyed by request path. Each response can declare
//! its own status, content type, content length (exact, absent, or a lie) and
//! Content-Disposition. Unknown paths get 404.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// What to put in the `Content-Length` header.
#[derive(Debug, Clone, Copy)]
pub enum DeclaredLength {
    /// The real body length.
    Exact,
    /// No header; body is delimited by connection close.
    Omitted,
    /// A specific (possibly false) value.
    Claim(u64),
}

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub content_type: Option<String>,
    pub length: DeclaredLength,
    pub disposition: Option<String>,
    pub location: Option<String>,
    pub body: Vec<u8>,
}

impl Route {
    /// `200 OK` with the given content type and body, exact length.
    pub fn ok(content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: Some(content_type.to_string()),
            length: DeclaredLength::Exact,
            disposition: None,
            location: None,
            body,
        }
    }

    pub fn redirect(to: &str) -> Self {
        Self {
            status: 302,
            content_type: Some("text/html".to_string()),
            length: DeclaredLength::Exact,
            disposition: None,
            location: Some(to.to_string()),
            body: b"moved".to_vec(),
        }
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn length(mut self, length: DeclaredLength) -> Self {
        self.length = length;
        self
    }

    pub fn disposition(mut self, value: &str) -> Self {
        self.disposition = Some(value.to_string());
        self
    }
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Runs until the process exits.
pub fn start(routes: Vec<(&str, Route)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(p, r)| (p.to_string(), r))
            .collect(),
    );
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            thread::spawn(move || handle(stream, &routes));
        }
    });
    format!("http://127.0.0.1:{}", port)
}

/// A base URL nothing listens on.
pub fn unreachable_base() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let request = String::from_utf8_lossy(&buf[..n]);
    let path = request
        .lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string();

    let not_found = Route::ok("text/plain", b"not found".to_vec()).status(404);
    let route = routes.get(&path).unwrap_or(&not_found);

    let mut head = format!("HTTP/1.1 {} {}\r\n", route.status, reason(route.status));
    if let Some(ct) = &route.content_type {
        head.push_str(&format!("Content-Type: {}\r\n", ct));
    }
    match route.length {
        DeclaredLength::Exact => head.push_str(&format!("Content-Length: {}\r\n", route.body.len())),
        DeclaredLength::Claim(n) => head.push_str(&format!("Content-Length: {}\r\n", n)),
        DeclaredLength::Omitted => {}
    }
    if let Some(d) = &route.disposition {
        head.push_str(&format!("Content-Disposition: {}\r\n", d));
    }
    if let Some(l) = &route.location {
        head.push_str(&format!("Location: {}\r\n", l));
    }
    head.push_str("Connection: close\r\n\r\n");

    if stream.write_all(head.as_bytes()).is_err() {
        return;
    }
    // The client may hang up mid-body (that is the point of some tests).
    for chunk in route.body.chunks(16 * 1024) {
        if stream.write_all(chunk).is_err() {
            return;
        }
    }
    let _ = stream.flush();
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
