//! Snapshot planning: create and update commands for the `snapshot:`
//! section.
//!
//! A snapshot of a mirror requires the `(mirror, source)` tag; a merge
//! snapshot requires each `(snapshot, source)` tag. Every snapshot command
//! provides its own `(snapshot, name)` tag, which publish commands require.
//!
//! Updating an existing snapshot re-creates it under the same name, which
//! aptly refuses while the old snapshot is in place. The old snapshot is
//! therefore rotated aside first with a deferred-action command; the
//! re-create requires the rotation's tag so it always runs afterwards.

use log::debug;

use crate::command::Command;
use crate::config::{Schema, SnapshotConfig};
use crate::runner::AptlyRunner;
use crate::state::SystemState;

/// Suffix given to a snapshot rotated aside during update.
const ROTATED_SUFFIX: &str = "-prev";

/// Plan creation of the snapshots missing from the system.
pub fn plan_create(schema: &Schema, state: &SystemState) -> Vec<Command> {
    let mut commands = Vec::new();
    for (name, snapshot) in &schema.snapshot {
        if state.snapshots.contains(name) {
            debug!("snapshot '{}' already exists, not planning create", name);
            continue;
        }
        commands.push(create_command(name, snapshot));
    }
    commands
}

/// Plan re-creation of every configured snapshot.
///
/// Snapshots that already exist are rotated aside by a deferred action
/// before their replacement is created.
pub fn plan_update(schema: &Schema, state: &SystemState, runner: &AptlyRunner) -> Vec<Command> {
    let mut commands = Vec::new();
    for (name, snapshot) in &schema.snapshot {
        let existing = state.snapshots.contains(name);
        if existing {
            commands.push(rotate_command(name, runner));
        }
        let mut create = create_command(name, snapshot);
        if existing {
            create.require("snapshot-rotation", name);
        }
        commands.push(create);
    }
    commands
}

fn create_command(name: &str, snapshot: &SnapshotConfig) -> Command {
    match snapshot {
        SnapshotConfig::Mirror(source) => {
            let mut command = Command::descriptor([
                "snapshot".to_string(),
                "create".to_string(),
                name.to_string(),
                "from".to_string(),
                "mirror".to_string(),
                source.mirror.clone(),
            ]);
            command.require("mirror", &source.mirror);
            command.provide("snapshot", name);
            command
        }
        SnapshotConfig::Merge(source) => {
            let mut argv: Vec<String> =
                vec!["snapshot".into(), "merge".into(), name.to_string()];
            argv.extend(source.merge.iter().cloned());
            let mut command = Command::descriptor(argv);
            for merged in &source.merge {
                command.require("snapshot", merged);
            }
            command.provide("snapshot", name);
            command
        }
    }
}

/// Rename an existing snapshot aside so its name can be reused.
///
/// Runs as a deferred action: the rename only makes sense at execution
/// time, against whatever snapshot is actually present then.
fn rotate_command(name: &str, runner: &AptlyRunner) -> Command {
    let rotated = format!("{name}{ROTATED_SUFFIX}");
    let argv: Vec<String> = vec![
        "snapshot".into(),
        "rename".into(),
        name.to_string(),
        rotated,
    ];
    let runner = runner.clone();
    let mut command = Command::deferred(format!("rotate snapshot {name}"), move || {
        runner.run(&argv)
    });
    command.provide("snapshot-rotation", name);
    command
}
