//! # Observed System State
//!
//! Before planning, aptlyctl asks `aptly` which mirrors, snapshots and
//! publish endpoints already exist. Existing resources are not re-created;
//! instead their tags are treated as satisfied before ordering starts, so
//! commands that depend on them become eligible immediately.
//!
//! Pure planning (`aptlyctl plan`, `aptlyctl graph`) uses
//! [`SystemState::empty`] and never touches the aptly binary.

use std::collections::HashSet;

use log::debug;

use crate::command::ResourceTag;
use crate::error::Result;
use crate::runner::AptlyRunner;

/// Names of the resources currently known to aptly.
///
/// Publish endpoints are identified as `prefix/distribution`, matching the
/// tag values used by the publish planner.
#[derive(Debug, Clone, Default)]
pub struct SystemState {
    pub mirrors: HashSet<String>,
    pub snapshots: HashSet<String>,
    pub publishes: HashSet<String>,
}

impl SystemState {
    /// A state with no known resources, for pure planning.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Query aptly for the current resource listings.
    pub fn read(runner: &AptlyRunner) -> Result<Self> {
        let state = Self {
            mirrors: parse_listing(&list(runner, "mirror")?),
            snapshots: parse_listing(&list(runner, "snapshot")?),
            publishes: parse_publish_listing(&list(runner, "publish")?),
        };
        debug!(
            "system state: {} mirror(s), {} snapshot(s), {} publish(es)",
            state.mirrors.len(),
            state.snapshots.len(),
            state.publishes.len()
        );
        Ok(state)
    }

    /// Tags already satisfied by existing resources.
    pub fn pre_satisfied(&self) -> HashSet<ResourceTag> {
        let mirrors = self
            .mirrors
            .iter()
            .map(|name| ResourceTag::new("mirror", name));
        let snapshots = self
            .snapshots
            .iter()
            .map(|name| ResourceTag::new("snapshot", name));
        let publishes = self
            .publishes
            .iter()
            .map(|name| ResourceTag::new("publish", name));
        mirrors.chain(snapshots).chain(publishes).collect()
    }
}

fn list(runner: &AptlyRunner, kind: &str) -> Result<String> {
    runner.capture(&[kind.to_string(), "list".to_string(), "-raw".to_string()])
}

/// One resource name per line.
fn parse_listing(raw: &str) -> HashSet<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// `aptly publish list -raw` prints `<prefix> <distribution>` per line;
/// normalize to `prefix/distribution`.
fn parse_publish_listing(raw: &str) -> HashSet<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join("/"))
        .collect()
}
