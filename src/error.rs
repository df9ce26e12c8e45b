//! # Error Handling
//!
//! This module defines the centralized error handling mechanism for
//! `aptlyctl`. It uses the `thiserror` library to create a single `Error`
//! enum covering all anticipated failure modes, providing clear and
//! descriptive error messages.
//!
//! ## Key Components
//!
//! - **`Error`**: the main enum representing all errors that can occur
//!   within the application. The ordering engine itself has exactly one
//!   failure mode, `UnresolvedDependencies`; the remaining variants cover
//!   the surrounding plumbing (configuration parsing, invoking the external
//!   `aptly` tool, serialization, I/O).
//!
//! - **`Result<T>`**: a type alias for `std::result::Result<T, Error>`,
//!   used throughout the crate to simplify function signatures.
//!
//! `UnresolvedDependencies` is raised when the orderer stalls with commands
//! still unscheduled. It deliberately does not distinguish a missing
//! provider from a provide/require cycle: both present as zero progress, and
//! the carried command identities plus unmet tags are what a caller needs to
//! diagnose the stuck subgraph. Ordering is all-or-nothing; no partial
//! sequence accompanies this error.

use thiserror::Error;

/// Main error type for aptlyctl operations
#[derive(Error, Debug)]
pub enum Error {
    /// An error occurred while parsing the `aptlyctl.yaml` configuration
    /// file.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The dependency orderer stalled: no remaining command had all of its
    /// required tags satisfied.
    ///
    /// Covers both a tag that nothing provides and a provide/require cycle.
    /// `commands` holds the display identities of every stuck command and
    /// `missing` the union of their unmet tags.
    #[error("Commands with unresolved dependencies: {} (unsatisfied tags: {})", commands.join(", "), missing.join(", "))]
    UnresolvedDependencies {
        commands: Vec<String>,
        missing: Vec<String>,
    },

    /// The external `aptly` command exited unsuccessfully.
    #[error("aptly command failed: {command} - {stderr}")]
    AptlyCommand { command: String, stderr: String },

    /// The external `aptly` binary could not be invoked at all.
    #[error("Failed to invoke aptly ({command}): {message}")]
    AptlyInvoke { command: String, message: String },

    /// A deferred action reported a failure when invoked by the executor.
    #[error("Deferred action '{label}' failed: {message}")]
    DeferredAction { label: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON serialization error, wrapped from `serde_json::Error`.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
