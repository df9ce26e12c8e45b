//! # Dependency Graph and Topological Ordering
//!
//! This is the scheduling core of aptlyctl. Its responsibility is to take an
//! unordered collection of [`Command`]s and produce a linear sequence in
//! which every command runs only after everything it depends on has been
//! produced.
//!
//! ## Process
//!
//! 1. **Indexing**: [`DependencyIndex`] maps each tag to the commands that
//!    provide it and the commands that require it. The index does not depend
//!    on input order and also backs diagnostics and the `graph` subcommand's
//!    DOT export.
//!
//! 2. **Frontier ordering**: [`order_commands`] repeatedly moves every
//!    remaining command whose required tags are all satisfied into the
//!    output, then unions the moved commands' provided tags into the
//!    satisfied set. A round that moves nothing while commands remain is a
//!    stalled graph (missing provider or cycle) and fails as a whole with
//!    [`Error::UnresolvedDependencies`].
//!
//! Dependency semantics are ANY-of-providers: if several commands provide
//! the same tag they are interchangeable, and scheduling any one of them
//! satisfies every requirer of that tag. The relative order of commands that
//! become eligible in the same round is unspecified; correctness is defined
//! by the prefix invariant (each command's required tags are provided by
//! strictly earlier commands), not by exact sequence equality.
//!
//! The orderer is a pure function and holds no state between calls.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt::Write as _;

use log::debug;

use crate::command::{Command, ResourceTag};
use crate::error::{Error, Result};

/// Tag-level index over a command collection.
///
/// Maps each tag to the indices of the commands providing and requiring it.
/// Backed by `BTreeMap` so that iteration (diagnostics, DOT export) is
/// deterministic regardless of input order.
#[derive(Debug, Default)]
pub struct DependencyIndex {
    providers: BTreeMap<ResourceTag, Vec<usize>>,
    requirers: BTreeMap<ResourceTag, Vec<usize>>,
}

impl DependencyIndex {
    /// Build the index for a command slice.
    pub fn build(commands: &[Command]) -> Self {
        let mut index = Self::default();
        for (i, command) in commands.iter().enumerate() {
            for tag in command.provided() {
                index.providers.entry(tag.clone()).or_default().push(i);
            }
            for tag in command.required() {
                index.requirers.entry(tag.clone()).or_default().push(i);
            }
        }
        index
    }

    /// Required tags that no command provides and that are not already
    /// satisfied externally.
    ///
    /// A non-empty result guarantees ordering will fail, but an empty result
    /// does not guarantee success: cycles have providers for every tag and
    /// only surface when the frontier stalls.
    pub fn unprovided_tags(&self, pre_satisfied: &HashSet<ResourceTag>) -> Vec<ResourceTag> {
        self.requirers
            .keys()
            .filter(|tag| !self.providers.contains_key(*tag) && !pre_satisfied.contains(*tag))
            .cloned()
            .collect()
    }

    /// Render the provide/require graph as Graphviz DOT.
    ///
    /// Commands are triangle nodes, tags are box nodes; a `command -> tag`
    /// edge means "provides", `tag -> command` means "requires". Emission is
    /// fully sorted so the output is stable across runs.
    pub fn to_dot(&self, commands: &[Command]) -> String {
        let mut dot = String::new();
        dot.push_str("digraph commands {\n");
        dot.push_str("    label=\"Command graph\";\n");
        dot.push_str("    graph [splines=line];\n");

        for (i, command) in commands.iter().enumerate() {
            let _ = writeln!(
                dot,
                "    c{:03} [shape=triangle, label=\"{}\"];",
                i,
                command.to_string().replace('"', "\\\"")
            );
        }
        for tag in self
            .providers
            .keys()
            .chain(self.requirers.keys())
            .collect::<BTreeSet<_>>()
        {
            let _ = writeln!(dot, "    \"{}\" [shape=box];", tag);
        }
        for (tag, providers) in &self.providers {
            for i in providers {
                let _ = writeln!(dot, "    c{:03} -> \"{}\";", i, tag);
            }
        }
        for (tag, requirers) in &self.requirers {
            for i in requirers {
                let _ = writeln!(dot, "    \"{}\" -> c{:03};", tag, i);
            }
        }
        dot.push_str("}\n");
        dot
    }
}

/// Order a command collection so that every command appears after providers
/// of all its required tags.
///
/// Returns a permutation of the input, or [`Error::UnresolvedDependencies`]
/// when some commands can never become eligible (missing provider or
/// provide/require cycle). Failure is all-or-nothing; no partial sequence is
/// returned.
pub fn order_commands(commands: Vec<Command>) -> Result<Vec<Command>> {
    order_commands_with(commands, HashSet::new())
}

/// Like [`order_commands`], but with a set of tags treated as satisfied
/// before the first round.
///
/// Planners use this for resources that already exist on the system:
/// an existing mirror provides its tag without any command being planned
/// for it.
pub fn order_commands_with(
    commands: Vec<Command>,
    pre_satisfied: HashSet<ResourceTag>,
) -> Result<Vec<Command>> {
    let total = commands.len();
    let mut satisfied = pre_satisfied;
    let mut remaining = commands;
    let mut ordered = Vec::with_capacity(total);

    while !remaining.is_empty() {
        let (frontier, rest): (Vec<Command>, Vec<Command>) = remaining
            .into_iter()
            .partition(|command| command.required().is_subset(&satisfied));

        if frontier.is_empty() {
            // Zero progress with commands left: stalled on a missing
            // provider or a cycle. Report every stuck command and the union
            // of their unmet tags, sorted for stable messages.
            let mut stuck: Vec<String> = rest.iter().map(ToString::to_string).collect();
            stuck.sort();
            let missing: BTreeSet<String> = rest
                .iter()
                .flat_map(|command| command.required().difference(&satisfied))
                .map(ToString::to_string)
                .collect();
            return Err(Error::UnresolvedDependencies {
                commands: stuck,
                missing: missing.into_iter().collect(),
            });
        }

        debug!(
            "scheduling frontier of {} command(s), {} remaining",
            frontier.len(),
            rest.len()
        );
        for command in &frontier {
            satisfied.extend(command.provided().iter().cloned());
        }
        ordered.extend(frontier);
        remaining = rest;
    }

    debug_assert_eq!(ordered.len(), total);
    Ok(ordered)
}
