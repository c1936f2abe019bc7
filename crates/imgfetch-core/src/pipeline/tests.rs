//! Orchestration tests against an in-memory fetcher (no network).

use super::*;
use crate::error::RejectReason;
use std::collections::HashMap;

/// Serves fixed bodies per URL by writing them straight into the target dir.
struct StubFetcher {
    bodies: HashMap<String, (String, Vec<u8>)>,
}

impl StubFetcher {
    fn new(entries: &[(&str, &str, &str)]) -> Self {
        let bodies = entries
            .iter()
            .map(|(u, name, body)| (u.to_string(), (name.to_string(), body.as_bytes().to_vec())))
            .collect();
        Self { bodies }
    }
}

impl ImageFetcher for StubFetcher {
    fn fetch(&self, url: &str, target_dir: &Path) -> Result<SavedFile, FetchError> {
        let (name, body) = self
            .bodies
            .get(url)
            .ok_or_else(|| FetchError::ConnectionFailed(format!("no route to {}", url)))?;
        if name.ends_with(".html") {
            return Err(RejectReason::InvalidContentType {
                content_type: Some("text/html".into()),
            }
            .into());
        }
        std::fs::create_dir_all(target_dir).unwrap();
        let mut candidate =
            crate::storage::CandidateFile::create(target_dir, name, u64::MAX).unwrap();
        candidate.write_chunk(body).unwrap();
        Ok(candidate.commit().unwrap())
    }
}

fn urls(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn saves_then_discards_duplicate() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("images");
    let mut ledger = DedupLedger::new(dir.path().join("hashes.txt"));
    let fetcher = StubFetcher::new(&[("u1", "cat.png", "meow")]);

    let mut lines = Vec::new();
    let summary = run_batch(&fetcher, &mut ledger, &urls(&["u1", "u1"]), &out, |r| {
        lines.push(r.to_string())
    });

    assert_eq!(summary, BatchSummary { saved: 1, duplicates: 1, failed: 0 });
    assert!(lines[0].starts_with("✓ Saved: u1"), "{}", lines[0]);
    assert!(lines[1].starts_with("✓ Duplicate, discarded: u1"), "{}", lines[1]);

    assert_eq!(std::fs::read(out.join("cat.png")).unwrap(), b"meow");
    assert!(!out.join("cat-1.png").exists());
    assert_eq!(ledger.entries().unwrap().len(), 1);
}

#[test]
fn same_content_under_different_names_is_duplicate() {
    let dir = tempfile::tempdir().unwrap();
    let mut ledger = DedupLedger::new(dir.path().join("hashes.txt"));
    let fetcher = StubFetcher::new(&[("a", "a.jpg", "same"), ("b", "b.jpg", "same")]);

    let first = process_url(&fetcher, &mut ledger, "a", dir.path());
    let second = process_url(&fetcher, &mut ledger, "b", dir.path());
    assert!(first.is_saved());
    match second {
        Outcome::Duplicate { file_name, .. } => assert_eq!(file_name, "b.jpg"),
        other => panic!("expected duplicate, got {:?}", other),
    }
    assert!(!dir.path().join("b.jpg").exists());
}

#[test]
fn failures_do_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let mut ledger = DedupLedger::new(dir.path().join("hashes.txt"));
    let fetcher = StubFetcher::new(&[("page", "index.html", "<html>"), ("ok", "ok.gif", "GIF89a")]);

    let mut reports = Vec::new();
    let summary = run_batch(
        &fetcher,
        &mut ledger,
        &urls(&["missing", "page", "ok"]),
        dir.path(),
        |r| reports.push(r.to_string()),
    );

    assert_eq!(summary, BatchSummary { saved: 1, duplicates: 0, failed: 2 });
    assert!(reports[0].starts_with("✗ Connection error for missing"), "{}", reports[0]);
    assert!(reports[1].contains("[invalid-content-type]"), "{}", reports[1]);
    assert!(reports[2].starts_with("✓ Saved: ok"), "{}", reports[2]);
    assert_eq!(ledger.entries().unwrap().len(), 1);
}

#[test]
fn ledger_from_earlier_run_marks_duplicate() {
    let dir = tempfile::tempdir().unwrap();
    let ledger_path = dir.path().join("hashes.txt");
    let fetcher = StubFetcher::new(&[("u", "x.png", "persisted")]);

    let mut first_run = DedupLedger::new(&ledger_path);
    assert!(process_url(&fetcher, &mut first_run, "u", dir.path()).is_saved());

    let mut second_run = DedupLedger::new(&ledger_path);
    let outcome = process_url(&fetcher, &mut second_run, "u", dir.path());
    assert!(matches!(outcome, Outcome::Duplicate { .. }));
    assert!(dir.path().join("x.png").exists());
}
