//! `imgfetch fetch` – run the validated, deduplicated fetch pipeline.

use anyhow::{Context, Result};
use imgfetch_core::config::FetchConfig;
use imgfetch_core::fetch::HttpFetcher;
use imgfetch_core::input::{parse_url_args, parse_url_list};
use imgfetch_core::ledger::DedupLedger;
use imgfetch_core::pipeline;
use std::io::{self, BufRead, Write};

/// Fetch every URL in `urls` (or the ones typed at the prompt when empty).
///
/// Per-URL failures are reported and do not fail the command.
pub fn run_fetch(cfg: FetchConfig, urls: &[String]) -> Result<()> {
    let urls = if urls.is_empty() {
        println!("Welcome to imgfetch");
        println!("A tool for mindfully collecting images from the web\n");
        let stdin = io::stdin();
        prompt_urls(&mut stdin.lock(), &mut io::stdout())?
    } else {
        parse_url_args(urls)
    };

    if urls.is_empty() {
        println!("✗ No valid URLs entered.");
        return Ok(());
    }

    println!("\nFetching {} image(s)...\n", urls.len());
    tracing::info!(
        count = urls.len(),
        dir = %cfg.download_dir.display(),
        ledger = %cfg.ledger_path.display(),
        "starting batch"
    );

    let mut ledger = DedupLedger::new(&cfg.ledger_path);
    let download_dir = cfg.download_dir.clone();
    let fetcher = HttpFetcher::new(cfg);
    let summary = pipeline::run_batch(&fetcher, &mut ledger, &urls, &download_dir, |report| {
        println!("{}", report)
    });

    println!("\n{}", summary);
    println!("✓ All done.");
    Ok(())
}

/// Prompt on `output`, read one line from `input`, split it into URLs.
pub(crate) fn prompt_urls<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Vec<String>> {
    write!(output, "Please enter image URLs (separated by spaces or commas): ")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("read URLs from stdin")?;
    Ok(parse_url_list(&line))
}
