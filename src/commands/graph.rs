//! Graph command implementation
//!
//! `aptlyctl graph` emits the full pipeline's provide/require graph as
//! Graphviz DOT, for rendering or for diagnosing an unresolved-dependency
//! failure by eye. Like `plan`, it works against an empty system state and
//! never invokes aptly.

use anyhow::Result;
use clap::Args;

use aptlyctl::config::from_file;
use aptlyctl::graph::DependencyIndex;
use aptlyctl::plan::{build_commands, Operation};
use aptlyctl::state::SystemState;

use super::Context;

/// Arguments for the graph command
#[derive(Args, Debug)]
pub struct GraphArgs {}

/// Execute the graph command
pub fn execute(_args: GraphArgs, context: &Context) -> Result<()> {
    if !context.config_path.exists() {
        anyhow::bail!(
            "Configuration file not found: {}",
            context.config_path.display()
        );
    }
    let schema = from_file(&context.config_path)?;
    let commands = build_commands(
        &schema,
        &SystemState::empty(),
        Operation::Full,
        &context.runner,
    );
    let index = DependencyIndex::build(&commands);
    print!("{}", index.to_dot(&commands));
    Ok(())
}
