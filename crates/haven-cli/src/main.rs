//! Haven CLI - Command-line interface for hedge and safe-haven analytics.
//!
//! # Usage
//!
//! ```bash
//! # CDB grid of gold against an equity index
//! haven cdb --input returns.csv --x gold --y spx
//!
//! # Hedge ratios from returns via EWMA
//! haven hedge --input returns.csv --x spx --y gold --lambda 0.94
//!
//! # BM10 table and verdict from a fitted mean equation
//! haven bm10 --coefficients fit.json
//! haven classify --coefficients fit.json
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};
use commands::config::Settings;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = cli.config.as_deref();
    let settings = Settings::load(config_path)?;
    let format = cli.format.unwrap_or(settings.default_format);
    debug!(?format, ?settings, "loaded settings");

    // Execute command
    match cli.command {
        Commands::Cdb(args) => commands::cdb::execute(args, format, &settings)?,
        Commands::Hedge(args) => commands::hedge::execute(args, format, &settings)?,
        Commands::Bm10(args) => commands::bm10::execute(args, format, &settings)?,
        Commands::Classify(args) => commands::classify::execute(args, format, &settings)?,
        Commands::Config(args) => commands::config::execute(args, format, config_path)?,
    }

    Ok(())
}
