//! Plan command implementation
//!
//! `aptlyctl plan` prints the full pipeline (mirror, snapshot and publish
//! creation) as an ordered command sequence without executing anything. It
//! plans against an empty system state, so it shows the complete dependency
//! picture and never needs the aptly binary.

use anyhow::Result;
use clap::{Args, ValueEnum};

use aptlyctl::command::CommandRecord;
use aptlyctl::config::from_file;
use aptlyctl::plan::{self, Operation};
use aptlyctl::state::SystemState;

use super::Context;

/// Output format for the plan listing
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Format {
    /// One command per line, in execution order
    Text,
    /// JSON array of command records with their tags
    Json,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

/// Execute the plan command
pub fn execute(args: PlanArgs, context: &Context) -> Result<()> {
    if !context.config_path.exists() {
        anyhow::bail!(
            "Configuration file not found: {}",
            context.config_path.display()
        );
    }
    let schema = from_file(&context.config_path)?;
    let ordered = plan::plan(
        &schema,
        &SystemState::empty(),
        Operation::Full,
        &context.runner,
    )?;

    match args.format {
        Format::Text => {
            for (i, command) in ordered.iter().enumerate() {
                println!("{:3}. {}", i + 1, command);
            }
        }
        Format::Json => {
            let records: Vec<CommandRecord> =
                ordered.iter().map(|command| command.record()).collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }
    Ok(())
}
