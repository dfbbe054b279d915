//! Hedge command implementation.
//!
//! Extracts hedge ratios, hedging effectiveness and the optimal portfolio
//! weight from a covariance path, read directly or built from returns.

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Args, ValueEnum};

use haven_risk::hedging::{hedge_summary, HedgeSummary, SampleCovariance};
use haven_risk::model::hedge_summary_from_model;

use crate::cli::OutputFormat;
use crate::commands::config::Settings;
use crate::commands::{read_columns, read_covariance_path};
use crate::output::{print_header, print_json_value, print_output, print_records, KeyValue};

/// Covariance source for return input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum CovarianceSource {
    /// Exponentially weighted moving average
    #[default]
    Ewma,
    /// Constant unconditional sample covariance
    Sample,
}

/// Arguments for the hedge command.
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["path", "input"])))]
pub struct HedgeArgs {
    /// CSV covariance path with columns v1, c12, v2 (hedged variance, covariance, hedging variance)
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// CSV file of returns with a header row
    #[arg(short, long, requires_all = ["x", "y"])]
    pub input: Option<PathBuf>,

    /// Column of the hedged asset
    #[arg(long = "x")]
    pub x: Option<String>,

    /// Column of the hedging asset
    #[arg(long = "y")]
    pub y: Option<String>,

    /// Covariance source for return input
    #[arg(long, value_enum, default_value = "ewma")]
    pub model: CovarianceSource,

    /// EWMA decay (defaults to the configured ewma_lambda)
    #[arg(short, long)]
    pub lambda: Option<f64>,
}

/// Execute the hedge command.
pub fn execute(args: HedgeArgs, format: OutputFormat, settings: &Settings) -> Result<()> {
    let summary = match (&args.path, &args.input, &args.x, &args.y) {
        (Some(path), _, _, _) => hedge_summary(&read_covariance_path(path)?)?,
        (None, Some(input), Some(x), Some(y)) => {
            let mut series = read_columns(input, &[x, y])?.into_iter();
            let (Some(hedged), Some(hedging)) = (series.next(), series.next()) else {
                return Err(anyhow::anyhow!("expected two return columns"));
            };
            match args.model {
                CovarianceSource::Ewma => {
                    hedge_summary_from_model(&settings.ewma(args.lambda)?, &hedged, &hedging)?
                }
                CovarianceSource::Sample => {
                    hedge_summary_from_model(&SampleCovariance, &hedged, &hedging)?
                }
            }
        }
        _ => return Err(anyhow::anyhow!("use --path FILE or --input FILE --x COL --y COL")),
    };

    print_summary(&summary, format, settings.decimal_precision)
}

fn print_summary(summary: &HedgeSummary, format: OutputFormat, precision: usize) -> Result<()> {
    match format {
        OutputFormat::Json => print_json_value(summary),
        OutputFormat::Minimal => {
            println!("{}", summary.beta_mean);
            Ok(())
        }
        OutputFormat::Csv => print_records(std::slice::from_ref(summary), format),
        OutputFormat::Table => {
            print_header("Hedge Summary");
            let rows = vec![
                KeyValue::from_f64("beta_mean", summary.beta_mean, precision),
                KeyValue::from_f64("beta_min", summary.beta_min, precision),
                KeyValue::from_f64("beta_max", summary.beta_max, precision),
                KeyValue::from_f64("HE", summary.hedging_effectiveness, precision),
                KeyValue::from_f64("OPW", summary.optimal_weight, precision),
            ];
            print_output(&rows, format)
        }
    }
}
