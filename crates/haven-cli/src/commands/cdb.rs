//! CDB command implementation.
//!
//! Computes the Conditional Diversification Benefit of one or more candidate
//! assets (`--x`) against a second asset (`--y`).

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::info;

use haven_risk::calculator::PairRiskCalculator;
use haven_risk::diversification::{cdb_grid_batch, CdbGrid};
use haven_risk::parallel::BatchConfig;

use crate::cli::OutputFormat;
use crate::commands::config::Settings;
use crate::commands::read_columns;
use crate::output::{format_value, print_error, print_header, print_json_value, print_output, KeyValue};

/// Arguments for the cdb command.
#[derive(Args, Debug)]
pub struct CdbArgs {
    /// CSV file of returns with a header row
    #[arg(short, long)]
    pub input: PathBuf,

    /// Column of the first asset (repeat for several candidates)
    #[arg(long = "x", required = true)]
    pub x: Vec<String>,

    /// Column of the second asset
    #[arg(long = "y")]
    pub y: String,

    /// Tail probability (defaults to the configured risk_level)
    #[arg(short, long)]
    pub p: Option<f64>,

    /// Weight on the first asset; omit for the 5%/10%/20% grid
    #[arg(short, long)]
    pub weight: Option<f64>,
}

/// One row of grid output.
#[derive(Debug, Serialize, Tabled)]
struct CdbRow {
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "w05")]
    w05: String,
    #[tabled(rename = "w10")]
    w10: String,
    #[tabled(rename = "w20")]
    w20: String,
}

impl CdbRow {
    fn new(asset: &str, grid: &CdbGrid, precision: usize) -> Self {
        Self {
            asset: asset.to_string(),
            w05: format_value(grid.w05, precision),
            w10: format_value(grid.w10, precision),
            w20: format_value(grid.w20, precision),
        }
    }
}

/// Execute the cdb command.
pub fn execute(args: CdbArgs, format: OutputFormat, settings: &Settings) -> Result<()> {
    let config = settings.cdb_config(args.p);
    config.validate()?;

    let mut names = args.x.clone();
    names.push(args.y.clone());
    let mut series = read_columns(&args.input, &names)?;
    let y = series.pop().ok_or_else(|| anyhow::anyhow!("no series read"))?;

    if let [x] = series.as_slice() {
        let calc = PairRiskCalculator::new(x.clone(), y, config)?;
        return match args.weight {
            Some(w) => execute_point(&calc, &args.x[0], w, format),
            None => execute_pair(&calc, &args.x[0], &args.y, format, settings.decimal_precision),
        };
    }

    if args.weight.is_some() {
        return Err(anyhow::anyhow!(
            "--weight applies to a single --x column; omit it for the grid of several candidates"
        ));
    }

    let candidates: Vec<(String, _)> = args.x.iter().cloned().zip(series).collect();
    info!(candidates = candidates.len(), "computing CDB grid batch");
    let entries = cdb_grid_batch(&candidates, &y, config.risk_level, &BatchConfig::default());

    let mut rows = Vec::with_capacity(entries.len());
    let mut grids = Vec::with_capacity(entries.len());
    for entry in &entries {
        match &entry.result {
            Ok(grid) => {
                rows.push(CdbRow::new(&entry.asset, grid, settings.decimal_precision));
                grids.push(serde_json::json!({ "asset": entry.asset, "cdb": grid }));
            }
            Err(e) => print_error(&format!("{}: {}", entry.asset, e)),
        }
    }

    match format {
        OutputFormat::Json => print_json_value(&grids)?,
        _ => {
            if format == OutputFormat::Table {
                print_header(&format!("CDB against {} (p = {})", args.y, config.risk_level));
            }
            print_output(&rows, format)?;
        }
    }

    if rows.len() < entries.len() {
        return Err(anyhow::anyhow!(
            "{} of {} candidates failed",
            entries.len() - rows.len(),
            entries.len()
        ));
    }
    Ok(())
}

fn execute_point(calc: &PairRiskCalculator, x: &str, w: f64, format: OutputFormat) -> Result<()> {
    let value = calc.cdb(w)?;

    match format {
        OutputFormat::Minimal => println!("{}", value),
        OutputFormat::Json => print_json_value(&serde_json::json!({
            "asset": x,
            "p": calc.risk_level(),
            "weight": w,
            "cdb": value,
        }))?,
        OutputFormat::Table | OutputFormat::Csv => {
            let rows = vec![
                KeyValue::new("Asset", x),
                KeyValue::new("p", calc.risk_level().to_string()),
                KeyValue::new("Weight", w.to_string()),
                KeyValue::new("CDB", value.to_string()),
            ];
            print_output(&rows, format)?;
        }
    }
    Ok(())
}

fn execute_pair(
    calc: &PairRiskCalculator,
    x: &str,
    y: &str,
    format: OutputFormat,
    precision: usize,
) -> Result<()> {
    let metrics = calc.all_metrics()?;

    match format {
        OutputFormat::Json => print_json_value(&metrics)?,
        OutputFormat::Minimal | OutputFormat::Csv => {
            print_output(&[CdbRow::new(x, &metrics.cdb, precision)], format)?;
        }
        OutputFormat::Table => {
            print_header(&format!("Tail Risk (p = {})", calc.risk_level()));
            let risk = vec![
                KeyValue::from_f64(format!("VaR {}", x), metrics.candidate.var, precision),
                KeyValue::from_f64(format!("ES {}", x), metrics.candidate.es, precision),
                KeyValue::from_f64(format!("VaR {}", y), metrics.hedged.var, precision),
                KeyValue::from_f64(format!("ES {}", y), metrics.hedged.es, precision),
            ];
            print_output(&risk, format)?;

            print_header("Conditional Diversification Benefit");
            let grid: Vec<KeyValue> = metrics
                .cdb
                .entries()
                .into_iter()
                .map(|(key, value)| KeyValue::from_f64(key, value, precision))
                .collect();
            print_output(&grid, format)?;
        }
    }
    Ok(())
}
