//! Mirror planning: create and update commands for the `mirror:` section.
//!
//! Every mirror command provides its `(mirror, name)` tag; snapshot
//! commands require it. Creation is skipped for mirrors aptly already
//! knows (their tags are satisfied through the observed system state
//! instead).

use log::debug;

use crate::command::Command;
use crate::config::Schema;
use crate::state::SystemState;

/// Plan creation of the mirrors missing from the system.
pub fn plan_create(schema: &Schema, state: &SystemState) -> Vec<Command> {
    let mut commands = Vec::new();
    for (name, mirror) in &schema.mirror {
        if state.mirrors.contains(name) {
            debug!("mirror '{}' already exists, not planning create", name);
            continue;
        }
        let mut argv: Vec<String> = vec!["mirror".into(), "create".into()];
        if !mirror.architectures.is_empty() {
            argv.push(format!("-architectures={}", mirror.architectures.join(",")));
        }
        if mirror.udeb {
            argv.push("-with-udebs".into());
        }
        argv.push(name.clone());
        argv.push(mirror.archive.clone());
        argv.push(mirror.distribution.clone());
        argv.extend(mirror.components.iter().cloned());

        let mut command = Command::descriptor(argv);
        command.provide("mirror", name);
        commands.push(command);
    }
    commands
}

/// Plan an update of every configured mirror.
///
/// Updates provide the mirror tag as well: for a requirer it does not
/// matter whether the tag came from a create, an update, or the mirror
/// already existing.
pub fn plan_update(schema: &Schema) -> Vec<Command> {
    let mut commands = Vec::new();
    for name in schema.mirror.keys() {
        let mut command =
            Command::descriptor(["mirror".to_string(), "update".to_string(), name.clone()]);
        command.provide("mirror", name);
        commands.push(command);
    }
    commands
}
