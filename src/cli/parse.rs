//! CLI parse: clap types for damon. No behavior; definitions only.

use crate::render::OutputMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Damon CLI - inspect data assets across orchestrator, object store, and
/// warehouse
#[derive(Parser)]
#[command(name = "damon")]
#[command(about = "Inspect your platform's data assets")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Connectors file path (overrides ~/.config/damon/connectors.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List your platform's data assets
    Ls {
        /// List only assets under this key prefix
        #[arg(long)]
        prefix: Option<String>,

        /// Orchestrator profile to use
        #[arg(long)]
        orchestrator: Option<String>,

        /// Destination for command output
        #[arg(long, value_enum, default_value_t = OutputMode::Terminal)]
        output: OutputMode,
    },
    /// Show details for a specific asset
    Show {
        /// Asset key (segments joined with `/`)
        asset: String,

        /// Orchestrator profile to use
        #[arg(long)]
        orchestrator: Option<String>,

        /// Data warehouse profile to use
        #[arg(long)]
        data_warehouse: Option<String>,

        /// Destination for command output
        #[arg(long, value_enum, default_value_t = OutputMode::Terminal)]
        output: OutputMode,
    },
    /// Show metrics for a specific asset
    Metrics {
        /// Asset key (segments joined with `/`)
        asset: String,

        /// Orchestrator profile to use
        #[arg(long)]
        orchestrator: Option<String>,

        /// IO manager (object store) profile to use
        #[arg(long)]
        io_manager: Option<String>,

        /// Data warehouse profile to use
        #[arg(long)]
        data_warehouse: Option<String>,

        /// Destination for command output
        #[arg(long, value_enum, default_value_t = OutputMode::Terminal)]
        output: OutputMode,
    },
}
