//! Publish command implementation
//!
//! `aptlyctl publish create` publishes the configured endpoints that are
//! not live yet; `aptlyctl publish update` switches existing endpoints to
//! the configured snapshots and creates the missing ones.

use anyhow::Result;
use clap::{Args, Subcommand};

use aptlyctl::plan::Operation;

use super::{run_operation, Context};

/// Arguments for the publish command
#[derive(Args, Debug)]
pub struct PublishArgs {
    #[command(subcommand)]
    action: PublishAction,
}

#[derive(Subcommand, Debug)]
enum PublishAction {
    /// Publish the configured endpoints that do not exist yet
    Create,
    /// Switch existing endpoints to the configured snapshots
    Update,
}

/// Execute the publish command
pub fn execute(args: PublishArgs, context: &Context) -> Result<()> {
    let operation = match args.action {
        PublishAction::Create => Operation::PublishCreate,
        PublishAction::Update => Operation::PublishUpdate,
    };
    run_operation(operation, context)
}
