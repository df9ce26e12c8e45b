//! # Aptly Invocation and Command Execution
//!
//! [`AptlyRunner`] wraps invocation of the external `aptly` binary: it runs
//! an argv against the configured binary, captures stderr into a typed error
//! on non-zero exit, and supports a dry-run mode that logs the invocation
//! instead of performing it. [`execute`] walks an ordered command sequence
//! and dispatches each element: descriptor commands go to the runner,
//! deferred-action commands are invoked in place.
//!
//! State-reading invocations (`aptly <kind> list -raw`) go through
//! [`AptlyRunner::capture`], which runs even in dry-run mode since listing
//! is side-effect free.

use std::path::PathBuf;
use std::process::Command as ProcessCommand;

use log::{debug, info};

use crate::command::{Command, Payload};
use crate::error::{Error, Result};

/// Handle to the external `aptly` binary.
#[derive(Debug, Clone)]
pub struct AptlyRunner {
    binary: PathBuf,
    dry_run: bool,
}

impl AptlyRunner {
    /// Create a runner for the given binary path.
    pub fn new(binary: impl Into<PathBuf>, dry_run: bool) -> Self {
        Self {
            binary: binary.into(),
            dry_run,
        }
    }

    /// Whether this runner is in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Run an aptly invocation for its effect.
    ///
    /// In dry-run mode the invocation is logged and skipped.
    pub fn run(&self, argv: &[String]) -> Result<()> {
        if self.dry_run {
            info!("dry-run: would execute {}", self.render(argv));
            return Ok(());
        }
        debug!("executing {}", self.render(argv));
        let output = ProcessCommand::new(&self.binary)
            .args(argv)
            .output()
            .map_err(|e| Error::AptlyInvoke {
                command: self.render(argv),
                message: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(Error::AptlyCommand {
                command: self.render(argv),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    /// Run an aptly invocation and return its stdout.
    ///
    /// Used for read-only queries, so it executes even in dry-run mode.
    pub fn capture(&self, argv: &[String]) -> Result<String> {
        debug!("querying {}", self.render(argv));
        let output = ProcessCommand::new(&self.binary)
            .args(argv)
            .output()
            .map_err(|e| Error::AptlyInvoke {
                command: self.render(argv),
                message: e.to_string(),
            })?;
        if !output.status.success() {
            return Err(Error::AptlyCommand {
                command: self.render(argv),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn render(&self, argv: &[String]) -> String {
        format!("{} {}", self.binary.display(), argv.join(" "))
    }
}

/// Execute an ordered command sequence.
///
/// Descriptors are dispatched to the runner; deferred actions are invoked
/// directly (and skipped in dry-run mode, since their effects cannot be
/// previewed). Execution stops at the first failure. Returns the number of
/// commands executed.
pub fn execute(ordered: Vec<Command>, runner: &AptlyRunner) -> Result<usize> {
    let total = ordered.len();
    for command in ordered {
        info!("running: {}", command);
        match command.into_payload() {
            Payload::Descriptor(argv) => runner.run(&argv)?,
            Payload::Deferred { label, action } => {
                if runner.is_dry_run() {
                    info!("dry-run: would invoke deferred action '{}'", label);
                } else {
                    action().map_err(|e| Error::DeferredAction {
                        label,
                        message: e.to_string(),
                    })?;
                }
            }
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn args(argv: &[&str]) -> Vec<String> {
        argv.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_run_succeeds_on_zero_exit() {
        let runner = AptlyRunner::new("true", false);
        assert!(runner.run(&args(&["mirror", "list"])).is_ok());
    }

    #[test]
    fn test_run_fails_on_nonzero_exit() {
        let runner = AptlyRunner::new("false", false);
        let err = runner.run(&args(&["mirror", "list"])).unwrap_err();
        assert!(matches!(err, Error::AptlyCommand { .. }));
        assert!(format!("{}", err).contains("mirror list"));
    }

    #[test]
    fn test_run_fails_when_binary_missing() {
        let runner = AptlyRunner::new("/nonexistent/aptly", false);
        let err = runner.run(&args(&["version"])).unwrap_err();
        assert!(matches!(err, Error::AptlyInvoke { .. }));
    }

    #[test]
    fn test_dry_run_skips_execution() {
        // A missing binary is fine in dry-run mode: nothing is invoked.
        let runner = AptlyRunner::new("/nonexistent/aptly", true);
        assert!(runner.run(&args(&["mirror", "drop", "x"])).is_ok());
    }

    #[test]
    fn test_capture_returns_stdout() {
        let runner = AptlyRunner::new("echo", false);
        let out = runner.capture(&args(&["-n", "alpha"])).unwrap();
        assert_eq!(out, "alpha");
    }

    #[test]
    fn test_capture_runs_even_in_dry_run() {
        let runner = AptlyRunner::new("echo", true);
        let out = runner.capture(&args(&["-n", "beta"])).unwrap();
        assert_eq!(out, "beta");
    }

    #[test]
    fn test_execute_dispatches_both_variants() {
        let hits = Rc::new(Cell::new(0));
        let hits_in = Rc::clone(&hits);

        let descriptor = Command::descriptor(["mirror", "list"]);
        let deferred = Command::deferred("bump counter", move || {
            hits_in.set(hits_in.get() + 1);
            Ok(())
        });

        let runner = AptlyRunner::new("true", false);
        let count = execute(vec![descriptor, deferred], &runner).unwrap();
        assert_eq!(count, 2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_execute_skips_deferred_in_dry_run() {
        let hits = Rc::new(Cell::new(0));
        let hits_in = Rc::clone(&hits);
        let deferred = Command::deferred("bump counter", move || {
            hits_in.set(hits_in.get() + 1);
            Ok(())
        });

        let runner = AptlyRunner::new("/nonexistent/aptly", true);
        execute(vec![deferred], &runner).unwrap();
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_execute_stops_at_first_failure() {
        let hits = Rc::new(Cell::new(0));
        let hits_in = Rc::clone(&hits);

        let failing = Command::descriptor(["mirror", "update", "x"]);
        let never_run = Command::deferred("late action", move || {
            hits_in.set(hits_in.get() + 1);
            Ok(())
        });

        let runner = AptlyRunner::new("false", false);
        let err = execute(vec![failing, never_run], &runner).unwrap_err();
        assert!(matches!(err, Error::AptlyCommand { .. }));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_execute_wraps_deferred_failure_with_label() {
        let deferred = Command::deferred("rotate snapshot web", || {
            Err(Error::ConfigParse {
                message: "boom".to_string(),
                hint: None,
            })
        });

        let runner = AptlyRunner::new("true", false);
        let err = execute(vec![deferred], &runner).unwrap_err();
        let display = format!("{}", err);
        assert!(display.contains("rotate snapshot web"));
        assert!(display.contains("boom"));
    }
}
