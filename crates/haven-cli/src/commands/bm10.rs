//! BM10 command implementation.
//!
//! Builds the cumulative coefficient table (c0, 0.10, 0.05, 0.01) from a
//! JSON mean-equation estimate.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use haven_risk::regression::{assemble_bm10, Bm10Table};

use crate::cli::OutputFormat;
use crate::commands::config::Settings;
use crate::commands::{read_estimate, resolve_terms};
use crate::output::{format_value, print_header, print_json_value, print_output, print_records};

/// Arguments for the bm10 command.
#[derive(Args, Debug)]
pub struct Bm10Args {
    /// JSON estimate: { "names": [...], "values": [...], "covariance": [[...]] }
    #[arg(short, long)]
    pub coefficients: PathBuf,

    /// Base, 10%, 5% and 1% coefficient names (default: mxreg1,mxreg2,mxreg3,mxreg4)
    #[arg(short, long, value_delimiter = ',')]
    pub terms: Option<Vec<String>>,
}

/// Table row for display.
#[derive(Debug, Serialize, Tabled)]
pub(crate) struct Bm10Display {
    #[tabled(rename = "Level")]
    level: String,
    #[tabled(rename = "Coefficient_Sum")]
    coefficient_sum: String,
    #[tabled(rename = "p_value")]
    p_value: String,
}

pub(crate) fn display_rows(table: &Bm10Table, precision: usize) -> Vec<Bm10Display> {
    table
        .rows()
        .iter()
        .map(|row| Bm10Display {
            level: row.level.clone(),
            coefficient_sum: format_value(row.coefficient_sum, precision),
            p_value: format_value(row.p_value, precision),
        })
        .collect()
}

/// Execute the bm10 command.
pub fn execute(args: Bm10Args, format: OutputFormat, settings: &Settings) -> Result<()> {
    let estimate = read_estimate(&args.coefficients)?;
    let terms = resolve_terms(args.terms.as_deref())?;
    let table = assemble_bm10(&estimate, &terms)?;

    match format {
        OutputFormat::Json => print_json_value(&table)?,
        OutputFormat::Csv | OutputFormat::Minimal => print_records(table.rows(), format)?,
        OutputFormat::Table => {
            print_header("BM10 Cumulative Coefficients");
            print_output(&display_rows(&table, settings.decimal_precision), format)?;
        }
    }
    Ok(())
}
