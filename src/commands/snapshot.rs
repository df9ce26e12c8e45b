//! Snapshot command implementation
//!
//! `aptlyctl snapshot create` plans creation of the snapshots missing from
//! the system; `aptlyctl snapshot update` re-creates every configured
//! snapshot, rotating existing ones aside first.

use anyhow::Result;
use clap::{Args, Subcommand};

use aptlyctl::plan::Operation;

use super::{run_operation, Context};

/// Arguments for the snapshot command
#[derive(Args, Debug)]
pub struct SnapshotArgs {
    #[command(subcommand)]
    action: SnapshotAction,
}

#[derive(Subcommand, Debug)]
enum SnapshotAction {
    /// Create the configured snapshots that do not exist yet
    Create,
    /// Re-create all configured snapshots, rotating existing ones aside
    Update,
}

/// Execute the snapshot command
pub fn execute(args: SnapshotArgs, context: &Context) -> Result<()> {
    let operation = match args.action {
        SnapshotAction::Create => Operation::SnapshotCreate,
        SnapshotAction::Update => Operation::SnapshotUpdate,
    };
    run_operation(operation, context)
}
