//! CLI parse tests.

mod fetch;

use super::{Cli, CliCommand};
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> Option<CliCommand> {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}
