//! Tests for the fetch subcommand and bare invocation.

use super::parse;
use crate::cli::{CliCommand, FetchArgs};
use imgfetch_core::config::FetchConfig;
use std::path::{Path, PathBuf};

#[test]
fn cli_parse_bare_is_none() {
    assert!(parse(&["imgfetch"]).is_none());
}

#[test]
fn cli_parse_fetch_urls() {
    match parse(&["imgfetch", "fetch", "https://e.com/a.png", "https://e.com/b.jpg"]) {
        Some(CliCommand::Fetch(args)) => {
            assert_eq!(args.urls, vec!["https://e.com/a.png", "https://e.com/b.jpg"]);
            assert!(args.dest.is_none());
            assert!(args.ledger.is_none());
            assert!(args.max_size.is_none());
        }
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_parse_fetch_no_urls() {
    match parse(&["imgfetch", "fetch"]) {
        Some(CliCommand::Fetch(args)) => assert!(args.urls.is_empty()),
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_parse_fetch_overrides() {
    match parse(&[
        "imgfetch",
        "fetch",
        "--dest",
        "/tmp/pics",
        "--ledger",
        "/tmp/h.txt",
        "--max-size",
        "2048",
        "https://e.com/a.png",
    ]) {
        Some(CliCommand::Fetch(args)) => {
            assert_eq!(args.dest.as_deref(), Some(Path::new("/tmp/pics")));
            assert_eq!(args.ledger.as_deref(), Some(Path::new("/tmp/h.txt")));
            assert_eq!(args.max_size, Some(2048));
            assert_eq!(args.urls.len(), 1);
        }
        _ => panic!("expected Fetch with overrides"),
    }
}

#[test]
fn fetch_args_apply_overrides_config() {
    let args = FetchArgs {
        urls: vec![],
        dest: Some(PathBuf::from("out")),
        ledger: None,
        max_size: Some(5),
    };
    let cfg = args.apply(FetchConfig::default());
    assert_eq!(cfg.download_dir, PathBuf::from("out"));
    assert_eq!(cfg.ledger_path, PathBuf::from("downloaded_hashes.txt"));
    assert_eq!(cfg.max_file_size, 5);
}
