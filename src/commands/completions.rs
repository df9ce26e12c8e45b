//! Completions command implementation
//!
//! `aptlyctl completions <shell>` writes a completion script for the given
//! shell to stdout, for the user to install wherever their shell expects
//! it:
//!
//! ```bash
//! aptlyctl completions bash > ~/.local/share/bash-completion/completions/aptlyctl
//! aptlyctl completions zsh > ~/.zfunc/_aptlyctl
//! ```

use std::io;

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::Shell;

use crate::cli::Cli;

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the completions command
pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "aptlyctl", &mut io::stdout());
    Ok(())
}
