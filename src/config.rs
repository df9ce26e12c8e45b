//! # Configuration Schema
//!
//! This module defines the schema for the `aptlyctl.yaml` configuration
//! file: the declarative description of the mirrors, snapshots and publish
//! points that aptlyctl realizes against the `aptly` tool.
//!
//! ## Structure
//!
//! ```yaml
//! mirror:
//!   upstream:
//!     archive: http://deb.example.org/debian
//!     distribution: bookworm
//!     components: [main, contrib]
//!
//! snapshot:
//!   upstream-base:
//!     mirror: upstream
//!   combined:
//!     merge: [upstream-base, internal-base]
//!
//! publish:
//!   www:
//!     - distribution: bookworm
//!       components: [main]
//!       snapshots: [combined]
//! ```
//!
//! Parsing is strict: unknown fields are rejected so typos surface
//! immediately. A snapshot names exactly one source form (`mirror:` or
//! `merge:`), which the schema enforces structurally. Semantic rules that
//! serde cannot express (non-empty snapshot lists, merge sources) are
//! checked by [`Schema::validate`], which produces configuration errors
//! with hints in the same shape as the rest of the crate.
//!
//! Cross-references between sections (a snapshot naming a mirror that does
//! not exist, for instance) are deliberately *not* checked here: the
//! dependency orderer reports them as unresolved dependencies, which keeps
//! one diagnosis path for every kind of dangling reference.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "aptlyctl.yaml";

/// Top-level configuration: the full declarative state.
///
/// Sections are `BTreeMap`s so planners iterate resources in a stable
/// order.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    /// Mirror name → mirror definition.
    #[serde(default)]
    pub mirror: BTreeMap<String, MirrorConfig>,
    /// Snapshot name → snapshot source.
    #[serde(default)]
    pub snapshot: BTreeMap<String, SnapshotConfig>,
    /// Publish name → publish endpoints (one per distribution).
    #[serde(default)]
    pub publish: BTreeMap<String, Vec<PublishConfig>>,
}

/// Definition of an apt mirror.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MirrorConfig {
    /// Upstream archive URL.
    pub archive: String,
    /// Distribution to mirror (e.g. `bookworm`).
    pub distribution: String,
    /// Components to mirror; aptly's default applies when empty.
    #[serde(default)]
    pub components: Vec<String>,
    /// Architectures to restrict the mirror to.
    #[serde(default)]
    pub architectures: Vec<String>,
    /// Also mirror udeb (installer) packages.
    #[serde(default)]
    pub udeb: bool,
}

/// Source of a snapshot: exactly one of the two forms.
///
/// The variants wrap strict structs so that a block naming both `mirror:`
/// and `merge:` matches neither form and is rejected at parse time.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SnapshotConfig {
    /// Snapshot of a mirror's current contents.
    Mirror(MirrorSnapshot),
    /// Merge of previously created snapshots.
    Merge(MergeSnapshot),
}

/// `snapshot: { mirror: <name> }`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MirrorSnapshot {
    pub mirror: String,
}

/// `snapshot: { merge: [<names>] }`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeSnapshot {
    pub merge: Vec<String>,
}

/// One publish endpoint under a publish prefix.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    /// Distribution to publish as.
    pub distribution: String,
    /// Components to publish; must line up with `snapshots` for aptly.
    #[serde(default)]
    pub components: Vec<String>,
    /// Snapshots to publish, one per component.
    pub snapshots: Vec<String>,
    /// Architectures to publish.
    #[serde(default)]
    pub architectures: Vec<String>,
    /// Skip generating the Contents indexes.
    #[serde(default)]
    pub skip_contents: bool,
}

impl Schema {
    /// Semantic validation beyond what serde enforces structurally.
    pub fn validate(&self) -> Result<()> {
        for (name, snapshot) in &self.snapshot {
            if let SnapshotConfig::Merge(MergeSnapshot { merge }) = snapshot {
                if merge.is_empty() {
                    return Err(Error::ConfigParse {
                        message: format!("snapshot '{name}' merges an empty list"),
                        hint: Some("list at least one source snapshot under 'merge:'".to_string()),
                    });
                }
            }
        }
        for (name, endpoints) in &self.publish {
            for endpoint in endpoints {
                if endpoint.snapshots.is_empty() {
                    return Err(Error::ConfigParse {
                        message: format!(
                            "publish '{name}' ({}) lists no snapshots",
                            endpoint.distribution
                        ),
                        hint: Some("list the snapshots to publish under 'snapshots:'".to_string()),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Parse a configuration document from a YAML string.
///
/// An empty document (including a comments-only one, which YAML reads as
/// null) is a valid, empty schema.
pub fn parse(contents: &str) -> Result<Schema> {
    if contents.trim().is_empty() {
        return Ok(Schema::default());
    }
    let schema = serde_yaml::from_str::<Option<Schema>>(contents)
        .map_err(|e| Error::ConfigParse {
            message: e.to_string(),
            hint: hint_for(&e.to_string()),
        })?
        .unwrap_or_default();
    schema.validate()?;
    Ok(schema)
}

/// Load and parse a configuration file.
pub fn from_file(path: &Path) -> Result<Schema> {
    let contents = fs::read_to_string(path)?;
    parse(&contents)
}

/// Resolve the configuration path: an explicit path wins, then
/// `aptlyctl.yaml` in the working directory, then the user configuration
/// directory.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return local;
    }
    dirs::config_dir()
        .map(|dir| dir.join("aptlyctl").join(DEFAULT_CONFIG_FILE))
        .unwrap_or(local)
}

/// Map well-known parse failures to actionable hints.
fn hint_for(message: &str) -> Option<String> {
    if message.contains("unknown field") {
        Some("check the field name against the aptlyctl.yaml schema".to_string())
    } else if message.contains("untagged enum SnapshotConfig") {
        Some("a snapshot needs exactly one of 'mirror:' or 'merge:'".to_string())
    } else {
        None
    }
}
