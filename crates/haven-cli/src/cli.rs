//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{Bm10Args, CdbArgs, ClassifyArgs, ConfigArgs, HedgeArgs};

/// Haven - Hedge, safe-haven and diversification analytics CLI
#[derive(Parser)]
#[command(name = "haven")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured `default_format`)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file to use instead of the per-user default
    #[arg(long, global = true, env = "HAVEN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Conditional Diversification Benefit of one or more assets against a second asset
    Cdb(CdbArgs),

    /// Hedge ratios, hedging effectiveness and optimal weights
    Hedge(HedgeArgs),

    /// BM10 cumulative coefficient table from a mean-equation estimate
    Bm10(Bm10Args),

    /// Classify an asset as hedge and/or safe haven
    Classify(ClassifyArgs),

    /// Manage configurations
    Config(ConfigArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the value)
    Minimal,
}
