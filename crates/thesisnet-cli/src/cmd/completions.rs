//! `thesisnet completions` prints a shell completion script.

use clap::Args;
use clap_complete::Shell;

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate for.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the script for `shell` to stdout. Needs no config or input.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> anyhow::Result<()> {
    let bin = command.get_name().to_string();
    clap_complete::generate(shell, command, bin, &mut std::io::stdout().lock());
    Ok(())
}
