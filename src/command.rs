//! # Commands and Resource Tags
//!
//! The schedulable unit of aptlyctl is the [`Command`]: a payload (either an
//! argv descriptor for the external `aptly` tool or a deferred action) plus
//! two sets of [`ResourceTag`]s declaring what the command produces and what
//! it needs. The ordering engine in [`crate::graph`] reads only the two tag
//! sets; it never inspects or invokes the payload.
//!
//! ## Key Components
//!
//! - **`ResourceTag`**: an immutable `(namespace, value)` key. The namespace
//!   partitions tag spaces so unrelated domains never collide: mirrors,
//!   snapshots and publishes each tag in their own namespace.
//! - **`Command`**: payload + provided/required tag sets, populated through
//!   the idempotent [`Command::provide`] / [`Command::require`] calls during
//!   construction and treated as frozen once handed to the orderer.
//! - **`Payload`**: the tagged union over the two command variants. Both
//!   variants expose an identical surface to the engine; only the executor
//!   cares which case it is dispatching.
//! - **`CommandRecord`**: a serializable projection of a command, used by
//!   `aptlyctl plan --format json`.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use crate::error::Result;

/// An immutable `(namespace, value)` key marking what a command produces or
/// consumes.
///
/// Equality and hashing are by the pair. The namespace is purely a
/// collision-avoidance partition; no cross-checking is done between
/// producers and consumers beyond exact tag equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceTag {
    namespace: String,
    value: String,
}

impl ResourceTag {
    /// Create a tag from a namespace and a value.
    pub fn new(namespace: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            value: value.into(),
        }
    }

    /// The namespace partition this tag lives in.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The value within the namespace.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ResourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.value)
    }
}

/// The execution payload of a command.
///
/// A tagged union rather than an inheritance hierarchy: the two cases share
/// the graph-relevant fields through [`Command`], and downstream executors
/// match on the case to decide how to dispatch the element.
pub enum Payload {
    /// An argv vector to run against the external `aptly` binary.
    Descriptor(Vec<String>),
    /// A labeled zero-argument action invoked at execution time.
    ///
    /// The label exists purely for diagnostics; the closure is opaque to
    /// everything except the executor that finally invokes it.
    Deferred {
        label: String,
        action: Box<dyn FnOnce() -> Result<()>>,
    },
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Descriptor(argv) => f.debug_tuple("Descriptor").field(argv).finish(),
            Payload::Deferred { label, .. } => f
                .debug_struct("Deferred")
                .field("label", label)
                .finish_non_exhaustive(),
        }
    }
}

/// An atomic schedulable unit: a payload plus declared provided and required
/// tags.
///
/// Commands are mutated only during construction via `provide`/`require`;
/// once submitted to [`crate::graph::order_commands`] they are frozen. A
/// command with an empty required set is eligible from the start.
#[derive(Debug)]
pub struct Command {
    payload: Payload,
    provided: HashSet<ResourceTag>,
    required: HashSet<ResourceTag>,
}

impl Command {
    /// Create a descriptor command from an argv vector.
    pub fn descriptor<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            payload: Payload::Descriptor(argv.into_iter().map(Into::into).collect()),
            provided: HashSet::new(),
            required: HashSet::new(),
        }
    }

    /// Create a deferred-action command from a label and a closure.
    ///
    /// The engine never invokes or interprets the closure; it is dispatched
    /// by the executor once the command's position in the ordered sequence
    /// is reached.
    pub fn deferred<F>(label: impl Into<String>, action: F) -> Self
    where
        F: FnOnce() -> Result<()> + 'static,
    {
        Self {
            payload: Payload::Deferred {
                label: label.into(),
                action: Box::new(action),
            },
            provided: HashSet::new(),
            required: HashSet::new(),
        }
    }

    /// Declare that this command produces the given tag. Idempotent.
    pub fn provide(&mut self, namespace: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.provided.insert(ResourceTag::new(namespace, value));
        self
    }

    /// Declare that this command needs the given tag. Idempotent.
    pub fn require(&mut self, namespace: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.required.insert(ResourceTag::new(namespace, value));
        self
    }

    /// The set of tags this command produces.
    pub fn provided(&self) -> &HashSet<ResourceTag> {
        &self.provided
    }

    /// The set of tags this command needs before it may run.
    pub fn required(&self) -> &HashSet<ResourceTag> {
        &self.required
    }

    /// Whether the payload is the deferred-action variant.
    pub fn is_deferred(&self) -> bool {
        matches!(self.payload, Payload::Deferred { .. })
    }

    /// Consume the command, yielding its payload for execution.
    pub fn into_payload(self) -> Payload {
        self.payload
    }

    /// A serializable projection of this command for `plan` output.
    ///
    /// Tag sets are emitted sorted so the output is deterministic.
    pub fn record(&self) -> CommandRecord {
        let mut provides: Vec<String> = self.provided.iter().map(ToString::to_string).collect();
        let mut requires: Vec<String> = self.required.iter().map(ToString::to_string).collect();
        provides.sort();
        requires.sort();
        CommandRecord {
            kind: match self.payload {
                Payload::Descriptor(_) => CommandKind::Aptly,
                Payload::Deferred { .. } => CommandKind::Deferred,
            },
            command: self.to_string(),
            provides,
            requires,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            Payload::Descriptor(argv) => write!(f, "aptly {}", argv.join(" ")),
            Payload::Deferred { label, .. } => write!(f, "{}", label),
        }
    }
}

/// Which payload case a [`CommandRecord`] was projected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Aptly,
    Deferred,
}

/// Serializable view of a planned command.
#[derive(Debug, Clone, Serialize)]
pub struct CommandRecord {
    pub kind: CommandKind,
    pub command: String,
    pub provides: Vec<String>,
    pub requires: Vec<String>,
}
