//! Publish planning: create and switch commands for the `publish:` section.
//!
//! A publish endpoint requires the `(snapshot, s)` tag of every snapshot it
//! serves and provides `(publish, prefix/distribution)`. Creation is skipped
//! for endpoints aptly already publishes; `plan_update` re-points those with
//! `aptly publish switch` instead.

use log::debug;

use crate::command::Command;
use crate::config::{PublishConfig, Schema};
use crate::state::SystemState;

/// Identity of a publish endpoint, shared with [`SystemState`].
fn endpoint_id(prefix: &str, endpoint: &PublishConfig) -> String {
    format!("{}/{}", prefix, endpoint.distribution)
}

/// Plan creation of the publish endpoints missing from the system.
pub fn plan_create(schema: &Schema, state: &SystemState) -> Vec<Command> {
    let mut commands = Vec::new();
    for (prefix, endpoints) in &schema.publish {
        for endpoint in endpoints {
            let id = endpoint_id(prefix, endpoint);
            if state.publishes.contains(&id) {
                debug!("publish '{}' already exists, not planning create", id);
                continue;
            }
            commands.push(create_command(prefix, endpoint));
        }
    }
    commands
}

/// Plan an update of every configured publish endpoint.
///
/// Existing endpoints are switched to the configured snapshots; missing
/// ones are created.
pub fn plan_update(schema: &Schema, state: &SystemState) -> Vec<Command> {
    let mut commands = Vec::new();
    for (prefix, endpoints) in &schema.publish {
        for endpoint in endpoints {
            let id = endpoint_id(prefix, endpoint);
            if state.publishes.contains(&id) {
                commands.push(switch_command(prefix, endpoint));
            } else {
                commands.push(create_command(prefix, endpoint));
            }
        }
    }
    commands
}

fn create_command(prefix: &str, endpoint: &PublishConfig) -> Command {
    let mut argv: Vec<String> = vec![
        "publish".into(),
        "snapshot".into(),
        format!("-distribution={}", endpoint.distribution),
    ];
    if !endpoint.components.is_empty() {
        argv.push(format!("-component={}", endpoint.components.join(",")));
    }
    if !endpoint.architectures.is_empty() {
        argv.push(format!("-architectures={}", endpoint.architectures.join(",")));
    }
    if endpoint.skip_contents {
        argv.push("-skip-contents".into());
    }
    argv.extend(endpoint.snapshots.iter().cloned());
    argv.push(prefix.to_string());

    tag_endpoint(Command::descriptor(argv), prefix, endpoint)
}

fn switch_command(prefix: &str, endpoint: &PublishConfig) -> Command {
    let mut argv: Vec<String> = vec![
        "publish".into(),
        "switch".into(),
        endpoint.distribution.clone(),
        prefix.to_string(),
    ];
    argv.extend(endpoint.snapshots.iter().cloned());

    tag_endpoint(Command::descriptor(argv), prefix, endpoint)
}

fn tag_endpoint(mut command: Command, prefix: &str, endpoint: &PublishConfig) -> Command {
    for snapshot in &endpoint.snapshots {
        command.require("snapshot", snapshot);
    }
    command.provide("publish", endpoint_id(prefix, endpoint));
    command
}
