//! Classify command implementation.
//!
//! Turns a BM10 table, or a mean-equation estimate, into a hedge and
//! safe-haven verdict.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{ArgGroup, Args};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use haven_risk::classification::{classify, classify_batch, Classification};
use haven_risk::parallel::BatchConfig;
use haven_risk::regression::{assemble_bm10, Bm10Row, Bm10Table};

use crate::cli::OutputFormat;
use crate::commands::bm10::display_rows;
use crate::commands::config::Settings;
use crate::commands::{read_estimate, read_json, resolve_terms};
use crate::error::CliError;
use crate::output::{print_error, print_header, print_json_value, print_output};

/// Arguments for the classify command.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["coefficients", "table"])))]
pub struct ClassifyArgs {
    /// JSON mean-equation estimate to build the BM10 table from
    #[arg(short, long)]
    pub coefficients: Option<PathBuf>,

    /// BM10 table as JSON (one table, or an object of asset name to table) or CSV
    #[arg(long)]
    pub table: Option<PathBuf>,

    /// Coefficient names for --coefficients (default: mxreg1,mxreg2,mxreg3,mxreg4)
    #[arg(long, value_delimiter = ',', requires = "coefficients")]
    pub terms: Option<Vec<String>>,

    /// Zero tolerance (defaults to the configured tolerance)
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Significance threshold (defaults to the configured significance)
    #[arg(long)]
    pub significance: Option<f64>,
}

/// Table file contents: a single table or several named ones.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TableInput {
    Single(Bm10Table),
    Batch(BTreeMap<String, Bm10Table>),
}

/// Verdict row for display.
#[derive(Debug, Serialize, Tabled)]
struct VerdictRow {
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Hedge")]
    hedge: String,
    #[tabled(rename = "Safe haven")]
    safe_haven: String,
    #[tabled(skip)]
    sentence: String,
}

impl VerdictRow {
    fn new(asset: &str, verdict: &Classification) -> Self {
        Self {
            asset: asset.to_string(),
            hedge: verdict.hedge.label().to_string(),
            safe_haven: verdict.safe_haven.label().to_string(),
            sentence: verdict.sentence(),
        }
    }
}

fn read_table_input(path: &Path) -> Result<TableInput> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Ok(read_json(path)?);
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| CliError::invalid_input(path, e.to_string()))?;
    let rows = reader
        .deserialize::<Bm10Row>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CliError::invalid_input(path, e.to_string()))?;
    Ok(TableInput::Single(Bm10Table::new(rows)))
}

/// Execute the classify command.
pub fn execute(args: ClassifyArgs, format: OutputFormat, settings: &Settings) -> Result<()> {
    let config = settings.classifier_config(args.tolerance, args.significance);
    config.validate()?;

    let input = match (&args.coefficients, &args.table) {
        (Some(path), _) => {
            let estimate = read_estimate(path)?;
            let terms = resolve_terms(args.terms.as_deref())?;
            TableInput::Single(assemble_bm10(&estimate, &terms)?)
        }
        (None, Some(path)) => read_table_input(path)?,
        (None, None) => return Err(anyhow::anyhow!("use --coefficients FILE or --table FILE")),
    };

    match input {
        TableInput::Single(table) => {
            let verdict = classify(&table, &config)?;
            print_single(&table, &verdict, format, settings.decimal_precision)
        }
        TableInput::Batch(tables) => {
            let tables: Vec<(String, Bm10Table)> = tables.into_iter().collect();
            let results = classify_batch(&tables, &config, &BatchConfig::default());

            let mut rows = Vec::with_capacity(results.len());
            for entry in &results {
                match &entry.result {
                    Ok(verdict) => rows.push(VerdictRow::new(&entry.asset, verdict)),
                    Err(e) => print_error(&format!("{}: {}", entry.asset, e)),
                }
            }
            match format {
                OutputFormat::Minimal => {
                    for row in &rows {
                        println!("{}: {}", row.asset, row.sentence);
                    }
                }
                _ => print_output(&rows, format)?,
            }

            if rows.len() < results.len() {
                return Err(anyhow::anyhow!(
                    "{} of {} assets could not be classified",
                    results.len() - rows.len(),
                    results.len()
                ));
            }
            Ok(())
        }
    }
}

fn print_single(
    table: &Bm10Table,
    verdict: &Classification,
    format: OutputFormat,
    precision: usize,
) -> Result<()> {
    match format {
        OutputFormat::Minimal => println!("{}", verdict.sentence()),
        OutputFormat::Json => print_json_value(&serde_json::json!({
            "hedge": verdict.hedge.label(),
            "safe_haven": verdict.safe_haven.label(),
            "sentence": verdict.sentence(),
            "table": table,
        }))?,
        OutputFormat::Csv => print_output(&[VerdictRow::new("asset", verdict)], format)?,
        OutputFormat::Table => {
            print_header("BM10 Cumulative Coefficients");
            print_output(&display_rows(table, precision), format)?;
            println!("\n{}", verdict.sentence().bold());
        }
    }
    Ok(())
}
