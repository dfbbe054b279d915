//! CLI command implementations.

pub mod bm10;
pub mod cdb;
pub mod classify;
pub mod config;
pub mod hedge;

// Re-export submodules for convenience
pub use bm10::Bm10Args;
pub use cdb::CdbArgs;
pub use classify::ClassifyArgs;
pub use config::ConfigArgs;
pub use hedge::HedgeArgs;

use std::path::Path;

use serde::de::DeserializeOwned;

use haven_risk::hedging::{Covariance2, CovariancePath};
use haven_risk::regression::{Bm10Terms, CoefficientEstimate};
use haven_risk::series::ReturnSeries;

use crate::error::{CliError, CliResult};

/// Reads the named columns of a CSV file with a header row.
///
/// Empty and `NA`-style cells become missing observations; any other
/// non-numeric cell is an error naming the column and row.
pub fn read_columns<S: AsRef<str>>(path: &Path, columns: &[S]) -> CliResult<Vec<ReturnSeries>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| CliError::invalid_input(path, e.to_string()))?;
    let headers = reader
        .headers()
        .map_err(|e| CliError::invalid_input(path, e.to_string()))?
        .clone();

    let indices = columns
        .iter()
        .map(|column| {
            let column = column.as_ref();
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| CliError::MissingColumn {
                    column: column.to_string(),
                    path: path.to_path_buf(),
                    available: headers.iter().collect::<Vec<_>>().join(", "),
                })
        })
        .collect::<CliResult<Vec<usize>>>()?;

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); indices.len()];
    for record in reader.records() {
        let record = record.map_err(|e| CliError::invalid_input(path, e.to_string()))?;
        for (cells, &idx) in cells.iter_mut().zip(&indices) {
            cells.push(record.get(idx).unwrap_or("").to_string());
        }
    }

    columns
        .iter()
        .zip(cells)
        .map(|(column, tokens)| Ok(ReturnSeries::parse(column.as_ref(), &tokens)?))
        .collect()
}

/// Reads a covariance path from a CSV file with columns `v1`, `c12`, `v2`.
pub fn read_covariance_path(path: &Path) -> CliResult<CovariancePath> {
    let mut columns = read_columns(path, &["v1", "c12", "v2"])?.into_iter();
    let (Some(v1), Some(c12), Some(v2)) = (columns.next(), columns.next(), columns.next()) else {
        return Err(CliError::invalid_input(path, "expected v1, c12 and v2 columns"));
    };

    v1.values()
        .iter()
        .zip(c12.values())
        .zip(v2.values())
        .enumerate()
        .map(|(row, ((&v1, &c12), &v2))| {
            if v1.is_finite() && c12.is_finite() && v2.is_finite() {
                Ok(Covariance2::new(v1, c12, v2))
            } else {
                Err(CliError::invalid_input(
                    path,
                    format!("missing covariance entry in data row {}", row + 1),
                ))
            }
        })
        .collect()
}

/// Reads and deserializes a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> CliResult<T> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| CliError::invalid_input(path, e.to_string()))
}

/// Reads a coefficient estimate `{ "names", "values", "covariance" }`.
pub fn read_estimate(path: &Path) -> CliResult<CoefficientEstimate> {
    read_json(path)
}

/// Resolves `--terms a,b,c,d`, defaulting to `mxreg1`..`mxreg4`.
pub fn resolve_terms(terms: Option<&[String]>) -> CliResult<Bm10Terms> {
    match terms {
        Some(names) => Ok(Bm10Terms::from_slice(names)?),
        None => Ok(Bm10Terms::default()),
    }
}
