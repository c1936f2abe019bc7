//! `imgfetch completions <shell>`.

use anyhow::Result;
use clap_complete::Shell;

pub fn run_completions(shell: Shell, cmd: &mut clap::Command) -> Result<()> {
    clap_complete::generate(shell, cmd, "imgfetch", &mut std::io::stdout());
    Ok(())
}
