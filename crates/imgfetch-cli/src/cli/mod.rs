//! CLI for the imgfetch image fetcher.

mod commands;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use imgfetch_core::config::{self, FetchConfig};
use std::path::PathBuf;

use commands::{run_checksum, run_completions, run_fetch};

/// Top-level CLI for imgfetch.
#[derive(Debug, Parser)]
#[command(name = "imgfetch", version)]
#[command(about = "Fetch images from URLs with safety checks and duplicate detection", long_about = None)]
pub struct Cli {
    /// Defaults to `fetch` with an interactive URL prompt.
    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

/// Options shared by the `fetch` command and the bare invocation.
#[derive(Debug, Clone, Default, Args)]
pub struct FetchArgs {
    /// Image URLs (space or comma separated). Prompts on stdin when omitted.
    pub urls: Vec<String>,

    /// Directory to save images into (overrides config `download_dir`).
    #[arg(long, value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Dedup ledger file (overrides config `ledger_path`).
    #[arg(long, value_name = "FILE")]
    pub ledger: Option<PathBuf>,

    /// Maximum image size in bytes (overrides config `max_file_size`).
    #[arg(long, value_name = "BYTES")]
    pub max_size: Option<u64>,
}

impl FetchArgs {
    /// Command-line flags win over the config file.
    pub fn apply(&self, mut cfg: FetchConfig) -> FetchConfig {
        if let Some(dest) = &self.dest {
            cfg.download_dir = dest.clone();
        }
        if let Some(ledger) = &self.ledger {
            cfg.ledger_path = ledger.clone();
        }
        if let Some(max) = self.max_size {
            cfg.max_file_size = max;
        }
        cfg
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download images, skipping unsafe responses and content already fetched.
    Fetch(FetchArgs),

    /// Print the SHA-256 of a file and whether the ledger already has it.
    Checksum {
        /// Path to the file.
        path: PathBuf,

        /// Dedup ledger file (overrides config `ledger_path`).
        #[arg(long, value_name = "FILE")]
        ledger: Option<PathBuf>,
    },

    /// Print shell completions to stdout.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let command = cli
            .command
            .unwrap_or_else(|| CliCommand::Fetch(FetchArgs::default()));

        match command {
            CliCommand::Completions { shell } => run_completions(shell, &mut Cli::command()),
            CliCommand::Fetch(args) => {
                let cfg = load_config()?;
                run_fetch(args.apply(cfg), &args.urls)
            }
            CliCommand::Checksum { path, ledger } => {
                let ledger_path = ledger.unwrap_or(load_config()?.ledger_path);
                run_checksum(&path, &ledger_path)
            }
        }
    }
}

fn load_config() -> Result<FetchConfig> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;
