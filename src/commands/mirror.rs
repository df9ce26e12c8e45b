//! Mirror command implementation
//!
//! `aptlyctl mirror create` plans creation of the mirrors missing from the
//! system; `aptlyctl mirror update` refreshes every configured mirror. Both
//! run through the shared plan-order-execute flow.

use anyhow::Result;
use clap::{Args, Subcommand};

use aptlyctl::plan::Operation;

use super::{run_operation, Context};

/// Arguments for the mirror command
#[derive(Args, Debug)]
pub struct MirrorArgs {
    #[command(subcommand)]
    action: MirrorAction,
}

#[derive(Subcommand, Debug)]
enum MirrorAction {
    /// Create the configured mirrors that do not exist yet
    Create,
    /// Update the contents of all configured mirrors
    Update,
}

/// Execute the mirror command
pub fn execute(args: MirrorArgs, context: &Context) -> Result<()> {
    let operation = match args.action {
        MirrorAction::Create => Operation::MirrorCreate,
        MirrorAction::Update => Operation::MirrorUpdate,
    };
    run_operation(operation, context)
}
