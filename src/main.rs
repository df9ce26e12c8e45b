//! # aptlyctl binary
//!
//! Thin entry point: parse the command line and hand off to
//! `cli::Cli::execute`. Planning, ordering and execution all live in the
//! aptlyctl library crate; whatever bubbles up as an error is printed by
//! the `anyhow` main signature.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
