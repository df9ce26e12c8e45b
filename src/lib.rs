//! # aptlyctl Library
//!
//! This library provides the core functionality for orchestrating the
//! `aptly` repository tool from a declarative configuration. It is designed
//! to be used by the `aptlyctl` command-line tool but can also be embedded
//! in other applications that need dependency-ordered command scheduling.
//!
//! ## Quick Example
//!
//! ```
//! use aptlyctl::command::Command;
//! use aptlyctl::graph::order_commands;
//!
//! // A snapshot depends on the mirror it is taken from.
//! let mut update = Command::descriptor(["mirror", "update", "upstream"]);
//! update.provide("mirror", "upstream");
//!
//! let mut snapshot = Command::descriptor(["snapshot", "create", "base", "from", "mirror", "upstream"]);
//! snapshot.require("mirror", "upstream");
//! snapshot.provide("snapshot", "base");
//!
//! // Submission order does not matter; the orderer sequences by tags.
//! let ordered = order_commands(vec![snapshot, update]).unwrap();
//! assert_eq!(ordered[0].to_string(), "aptly mirror update upstream");
//! ```
//!
//! ## Core Concepts
//!
//! - **Commands and tags (`command`)**: the schedulable unit — an aptly
//!   argv or a deferred action — declaring what it provides and requires as
//!   `(namespace, value)` resource tags.
//! - **Dependency graph (`graph`)**: the tag index and the frontier-based
//!   topological orderer, the algorithmic core of the crate. Ordering
//!   either yields a full valid sequence or fails with a single
//!   unresolved-dependencies error; there is no partial result.
//! - **Configuration (`config`)**: the `aptlyctl.yaml` schema describing
//!   mirrors, snapshots and publish endpoints.
//! - **Planning (`plan`)**: planners that turn the schema and the observed
//!   system state into tagged commands.
//! - **Execution (`runner`, `state`)**: invoking the external `aptly`
//!   binary, reading the existing resource listings, and dispatching an
//!   ordered sequence.
//!
//! ## Execution Flow
//!
//! 1. Parse `aptlyctl.yaml` into a [`config::Schema`].
//! 2. Read the existing mirrors/snapshots/publishes into a
//!    [`state::SystemState`].
//! 3. Plan commands for the requested operation ([`plan::plan`]).
//! 4. Order them by provide/require tags ([`graph::order_commands`]).
//! 5. Execute the sequence in order ([`runner::execute`]).

pub mod command;
pub mod config;
pub mod error;
pub mod graph;
pub mod plan;
pub mod runner;
pub mod state;

#[cfg(test)]
mod graph_proptest;
