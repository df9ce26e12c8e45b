//! # Operation Planning
//!
//! Planners turn the declarative [`Schema`] plus the observed
//! [`SystemState`] into tagged [`Command`]s, one module per resource class:
//!
//! - [`mirror`]: `aptly mirror create` / `aptly mirror update`
//! - [`snapshot`]: `aptly snapshot create` / merge / rotation on update
//! - [`publish`]: `aptly publish snapshot` / `aptly publish switch`
//!
//! [`plan`] composes the requested planners, submits the full collection to
//! the dependency orderer together with the tags of already-existing
//! resources, and returns the ordered sequence ready for execution. The
//! planners only declare provide/require tags; all sequencing decisions
//! (and the detection of dangling references or cycles) live in
//! [`crate::graph`].

pub mod mirror;
pub mod publish;
pub mod snapshot;

use log::{debug, warn};

use crate::command::Command;
use crate::config::Schema;
use crate::error::Result;
use crate::graph::{order_commands_with, DependencyIndex};
use crate::runner::AptlyRunner;
use crate::state::SystemState;

/// Which slice of the pipeline to plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    MirrorCreate,
    MirrorUpdate,
    SnapshotCreate,
    SnapshotUpdate,
    PublishCreate,
    PublishUpdate,
    /// The whole pipeline: mirrors, snapshots and publishes, create form.
    /// Used by `plan` and `graph` to show the full dependency picture.
    Full,
}

/// Build the unordered command collection for an operation.
pub fn build_commands(
    schema: &Schema,
    state: &SystemState,
    operation: Operation,
    runner: &AptlyRunner,
) -> Vec<Command> {
    let commands = match operation {
        Operation::MirrorCreate => mirror::plan_create(schema, state),
        Operation::MirrorUpdate => mirror::plan_update(schema),
        Operation::SnapshotCreate => snapshot::plan_create(schema, state),
        Operation::SnapshotUpdate => snapshot::plan_update(schema, state, runner),
        Operation::PublishCreate => publish::plan_create(schema, state),
        Operation::PublishUpdate => publish::plan_update(schema, state),
        Operation::Full => {
            let mut commands = mirror::plan_create(schema, state);
            commands.extend(snapshot::plan_create(schema, state));
            commands.extend(publish::plan_create(schema, state));
            commands
        }
    };
    debug!(
        "planned {} command(s) for {:?}",
        commands.len(),
        operation
    );
    commands
}

/// Plan an operation: build its commands and order them.
///
/// Tags of resources that already exist on the system are satisfied before
/// ordering starts, so commands depending on them need no planned provider.
/// A tag some planned command provides is excluded from that set: the
/// existing resource is about to be replaced (an updated snapshot is even
/// renamed aside before re-creation), so requirers must wait for the fresh
/// one.
pub fn plan(
    schema: &Schema,
    state: &SystemState,
    operation: Operation,
    runner: &AptlyRunner,
) -> Result<Vec<Command>> {
    let commands = build_commands(schema, state, operation, runner);

    let mut pre_satisfied = state.pre_satisfied();
    for command in &commands {
        for tag in command.provided() {
            pre_satisfied.remove(tag);
        }
    }

    let dangling = DependencyIndex::build(&commands).unprovided_tags(&pre_satisfied);
    if !dangling.is_empty() {
        warn!(
            "required tags with no provider: {}",
            dangling
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    order_commands_with(commands, pre_satisfied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use crate::error::Error;

    const PIPELINE: &str = r#"
mirror:
  upstream:
    archive: http://deb.example.org/debian
    distribution: bookworm

snapshot:
  base:
    mirror: upstream
  combined:
    merge: [base]

publish:
  www:
    - distribution: bookworm
      snapshots: [combined]
"#;

    fn runner() -> AptlyRunner {
        AptlyRunner::new("true", true)
    }

    fn position(ordered: &[Command], needle: &str) -> usize {
        ordered
            .iter()
            .position(|c| c.to_string().contains(needle))
            .unwrap_or_else(|| panic!("no command matching '{needle}'"))
    }

    #[test]
    fn test_full_plan_orders_pipeline() {
        let schema = config::parse(PIPELINE).unwrap();
        let ordered = plan(&schema, &SystemState::empty(), Operation::Full, &runner()).unwrap();
        assert_eq!(ordered.len(), 4);

        let mirror = position(&ordered, "mirror create upstream");
        let base = position(&ordered, "snapshot create base");
        let merge = position(&ordered, "snapshot merge combined");
        let publish = position(&ordered, "publish snapshot");
        assert!(mirror < base);
        assert!(base < merge);
        assert!(merge < publish);
    }

    #[test]
    fn test_existing_resources_need_no_provider() {
        let schema = config::parse(PIPELINE).unwrap();
        let mut state = SystemState::empty();
        state.mirrors.insert("upstream".to_string());
        state.snapshots.insert("base".to_string());
        state.snapshots.insert("combined".to_string());

        // Only the publish remains, and its snapshot tags are satisfied by
        // the observed state.
        let ordered = plan(&schema, &state, Operation::Full, &runner()).unwrap();
        assert_eq!(ordered.len(), 1);
        assert!(ordered[0].to_string().starts_with("aptly publish"));
    }

    #[test]
    fn test_dangling_reference_is_unresolved_dependency() {
        let schema = config::parse(
            r#"
snapshot:
  base:
    mirror: missing
"#,
        )
        .unwrap();
        let err = plan(&schema, &SystemState::empty(), Operation::Full, &runner()).unwrap_err();
        match err {
            Error::UnresolvedDependencies { missing, .. } => {
                assert_eq!(missing, vec!["mirror/missing"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_merge_is_unresolved_dependency() {
        let schema = config::parse(
            r#"
snapshot:
  loop:
    merge: [loop]
"#,
        )
        .unwrap();
        let err = plan(&schema, &SystemState::empty(), Operation::Full, &runner()).unwrap_err();
        assert!(matches!(err, Error::UnresolvedDependencies { .. }));
    }

    #[test]
    fn test_snapshot_update_orders_rotation_before_recreate() {
        let schema = config::parse(PIPELINE).unwrap();
        let mut state = SystemState::empty();
        state.mirrors.insert("upstream".to_string());
        state.snapshots.insert("base".to_string());

        let ordered = plan(&schema, &state, Operation::SnapshotUpdate, &runner()).unwrap();
        let rotate = position(&ordered, "rotate snapshot base");
        let recreate = position(&ordered, "snapshot create base");
        assert!(rotate < recreate);
    }

    #[test]
    fn test_snapshot_update_merge_waits_for_source_recreate() {
        // The merge's name sorts before its source, so submission order
        // runs against the required order. The existing source snapshot
        // must not satisfy the merge: it is renamed aside during the
        // update, and the merge has to wait for the re-created one.
        let schema = config::parse(
            r#"
mirror:
  upstream:
    archive: http://deb.example.org/debian
    distribution: bookworm

snapshot:
  alpha:
    merge: [zbase]
  zbase:
    mirror: upstream
"#,
        )
        .unwrap();
        let mut state = SystemState::empty();
        state.mirrors.insert("upstream".to_string());
        state.snapshots.insert("alpha".to_string());
        state.snapshots.insert("zbase".to_string());

        let ordered = plan(&schema, &state, Operation::SnapshotUpdate, &runner()).unwrap();
        let recreate = position(&ordered, "snapshot create zbase");
        let merge = position(&ordered, "snapshot merge alpha");
        assert!(recreate < merge);
    }

    #[test]
    fn test_empty_schema_plans_nothing() {
        let schema = Schema::default();
        let ordered = plan(&schema, &SystemState::empty(), Operation::Full, &runner()).unwrap();
        assert!(ordered.is_empty());
    }
}
