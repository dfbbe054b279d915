//! Output formatting utilities.

use colored::Colorize;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::cli::OutputFormat;

/// Formats and prints output based on the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(data),
        OutputFormat::Json => print_json(data),
        OutputFormat::Csv => print_csv(data),
        OutputFormat::Minimal => print_minimal(data),
    }
}

/// Prints rows without a table form: JSON, CSV, or CSV without a header
/// for minimal output.
pub fn print_records<T: Serialize>(data: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(data),
        OutputFormat::Minimal => {
            let mut wtr = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(std::io::stdout());
            for item in data {
                wtr.serialize(item)?;
            }
            wtr.flush()?;
            Ok(())
        }
        OutputFormat::Table | OutputFormat::Csv => print_csv(data),
    }
}

/// Prints a single serializable result as pretty JSON.
pub fn print_json_value<T: Serialize + ?Sized>(data: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints data as a formatted table.
fn print_table<T: Tabled>(data: &[T]) -> anyhow::Result<()> {
    if data.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{}", table);
    Ok(())
}

/// Prints data as JSON.
fn print_json<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    print_json_value(data)
}

/// Prints data as CSV.
fn print_csv<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for item in data {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Prints minimal output (first row only, as CSV without a header).
fn print_minimal<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    if let Some(first) = data.first() {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(std::io::stdout());
        wtr.serialize(first)?;
        wtr.flush()?;
    }
    Ok(())
}

/// Formats a value with a fixed number of decimals; non-finite values print as `NA`.
pub fn format_value(value: f64, precision: usize) -> String {
    if value.is_finite() {
        format!("{:.prec$}", value, prec = precision)
    } else {
        "NA".to_string()
    }
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Prints an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a key-value pair from a float with fixed precision.
    pub fn from_f64(key: impl Into<String>, value: f64, precision: usize) -> Self {
        Self {
            key: key.into(),
            value: format_value(value, precision),
        }
    }
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(0.123456789, 4), "0.1235");
        assert_eq!(format_value(f64::NAN, 4), "NA");
        assert_eq!(KeyValue::from_f64("HE", 0.5, 2).value, "0.50");
    }
}
