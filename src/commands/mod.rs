//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `aptlyctl` command-line tool. Each subcommand is defined in its own file
//! to keep the logic separated and maintainable.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and
//!   options, derived using `clap`.
//! - An `execute` function that takes the parsed `Args` (and the shared
//!   [`Context`]) and performs the command's logic.
//!
//! The resource commands (`mirror`, `snapshot`, `publish`) all follow the
//! same shape — read config, read system state, plan, order, execute — so
//! the shared flow lives in [`run_operation`]; `plan` and `graph` are pure
//! and never touch the aptly binary.

pub mod completions;
pub mod graph;
pub mod mirror;
pub mod plan;
pub mod publish;
pub mod snapshot;

use std::path::PathBuf;

use anyhow::Result;
use log::info;

use aptlyctl::config::from_file;
use aptlyctl::plan::Operation;
use aptlyctl::runner::{self, AptlyRunner};
use aptlyctl::state::SystemState;

/// Shared state every subcommand receives: the resolved configuration path
/// and the aptly runner built from the global flags.
#[derive(Debug)]
pub struct Context {
    pub config_path: PathBuf,
    pub runner: AptlyRunner,
}

/// Read config and system state, plan the operation, and execute the
/// ordered sequence.
pub fn run_operation(operation: Operation, context: &Context) -> Result<()> {
    if !context.config_path.exists() {
        anyhow::bail!(
            "Configuration file not found: {}",
            context.config_path.display()
        );
    }
    let schema = from_file(&context.config_path)?;
    let state = SystemState::read(&context.runner)?;
    let ordered = aptlyctl::plan::plan(&schema, &state, operation, &context.runner)?;

    if ordered.is_empty() {
        info!("nothing to do for {:?}", operation);
        return Ok(());
    }
    let count = runner::execute(ordered, &context.runner)?;
    info!("{} command(s) completed", count);
    Ok(())
}
