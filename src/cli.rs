//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use aptlyctl::config::resolve_config_path;
use aptlyctl::runner::AptlyRunner;

use crate::commands::{self, Context};

/// aptlyctl - Declarative orchestration of aptly mirrors, snapshots and publishes
#[derive(Parser, Debug)]
#[command(name = "aptlyctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file
    #[arg(short, long, global = true, value_name = "PATH", env = "APTLYCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the aptly binary
    #[arg(long, global = true, value_name = "PATH", env = "APTLYCTL_APTLY", default_value = "aptly")]
    aptly: PathBuf,

    /// Show what would be executed without invoking aptly
    #[arg(short = 'n', long, global = true)]
    dry_run: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage aptly mirrors
    Mirror(commands::mirror::MirrorArgs),

    /// Manage aptly snapshots
    Snapshot(commands::snapshot::SnapshotArgs),

    /// Manage aptly publish endpoints
    Publish(commands::publish::PublishArgs),

    /// Print the ordered command sequence without executing it
    Plan(commands::plan::PlanArgs),

    /// Emit the provide/require graph as Graphviz DOT
    Graph(commands::graph::GraphArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::new()
            .parse_filters(&self.log_level)
            .init();

        let context = Context {
            config_path: resolve_config_path(self.config),
            runner: AptlyRunner::new(self.aptly, self.dry_run),
        };

        match self.command {
            Commands::Mirror(args) => commands::mirror::execute(args, &context),
            Commands::Snapshot(args) => commands::snapshot::execute(args, &context),
            Commands::Publish(args) => commands::publish::execute(args, &context),
            Commands::Plan(args) => commands::plan::execute(args, &context),
            Commands::Graph(args) => commands::graph::execute(args, &context),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
