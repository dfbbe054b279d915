//! Config command implementation.
//!
//! Manages CLI configuration settings and resolves them into [`Settings`]
//! for the analysis commands. Command-line flags always win over the file.

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use haven_risk::classification::ClassifierConfig;
use haven_risk::diversification::CdbConfig;
use haven_risk::hedging::EwmaCovariance;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output::{print_header, print_info, print_success, print_warning, KeyValue};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// List available configuration keys
    List,

    /// Reset configuration to defaults
    Reset(ResetArgs),

    /// Show configuration file location
    Path,
}

/// Arguments for get subcommand.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key
    pub key: String,
}

/// Arguments for set subcommand.
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key
    pub key: String,

    /// Configuration value
    pub value: String,
}

/// Arguments for reset subcommand.
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Reset all settings (not just one)
    #[arg(long)]
    pub all: bool,

    /// Specific key to reset (optional)
    pub key: Option<String>,
}

/// CLI configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// Default output format
    DefaultFormat,
    /// Tail probability for VaR, ES and CDB
    RiskLevel,
    /// Classifier zero tolerance
    Tolerance,
    /// Classifier significance threshold
    Significance,
    /// EWMA decay factor
    EwmaLambda,
    /// Precision for decimal output
    DecimalPrecision,
}

impl ConfigKey {
    fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default_format" | "format" => Some(Self::DefaultFormat),
            "risk_level" | "p" => Some(Self::RiskLevel),
            "tolerance" | "tol" => Some(Self::Tolerance),
            "significance" => Some(Self::Significance),
            "ewma_lambda" | "lambda" => Some(Self::EwmaLambda),
            "decimal_precision" | "precision" => Some(Self::DecimalPrecision),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::DefaultFormat => "default_format",
            Self::RiskLevel => "risk_level",
            Self::Tolerance => "tolerance",
            Self::Significance => "significance",
            Self::EwmaLambda => "ewma_lambda",
            Self::DecimalPrecision => "decimal_precision",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            Self::DefaultFormat => "Default output format (table, json, csv, minimal)",
            Self::RiskLevel => "Tail probability p for VaR, ES and CDB, in (0, 1)",
            Self::Tolerance => "Coefficients within this distance of zero count as zero",
            Self::Significance => "p-values below this are significant, in (0, 1)",
            Self::EwmaLambda => "EWMA covariance decay factor, in (0, 1)",
            Self::DecimalPrecision => "Number of decimal places for table output (2-10)",
        }
    }

    fn default_value(&self) -> &'static str {
        match self {
            Self::DefaultFormat => "table",
            Self::RiskLevel => "0.05",
            Self::Tolerance => "1e-8",
            Self::Significance => "0.10",
            Self::EwmaLambda => "0.94",
            Self::DecimalPrecision => "6",
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::DefaultFormat,
            Self::RiskLevel,
            Self::Tolerance,
            Self::Significance,
            Self::EwmaLambda,
            Self::DecimalPrecision,
        ]
    }
}

/// Simple config storage.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(flatten)]
    values: HashMap<String, String>,
}

impl Config {
    fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Option<&String> {
        self.values.get(key)
    }

    /// Stored value or the key's default.
    fn value(&self, key: ConfigKey) -> &str {
        self.get(key.as_str())
            .map(String::as_str)
            .unwrap_or(key.default_value())
    }

    fn set(&mut self, key: String, value: String) {
        self.values.insert(key, value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

/// Get the config file path.
fn config_path(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }
    let home = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(home.join("haven").join("config.json"))
}

/// Effective defaults for the analysis commands.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Output format when `--format` is not given.
    pub default_format: OutputFormat,
    /// Tail probability p.
    pub risk_level: f64,
    /// Classifier zero tolerance.
    pub tolerance: f64,
    /// Classifier significance threshold.
    pub significance: f64,
    /// EWMA decay factor.
    pub ewma_lambda: f64,
    /// Decimal places in table output.
    pub decimal_precision: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_format: OutputFormat::Table,
            risk_level: 0.05,
            tolerance: 1e-8,
            significance: 0.10,
            ewma_lambda: 0.94,
            decimal_precision: 6,
        }
    }
}

impl Settings {
    /// Loads settings from the config file, falling back to defaults.
    pub fn load(override_path: Option<&Path>) -> Result<Self> {
        let config = Config::load(&config_path(override_path)?)?;
        Self::from_config(&config)
    }

    fn from_config(config: &Config) -> Result<Self> {
        for key in ConfigKey::all() {
            validate_config_value(*key, config.value(*key))?;
        }
        let float = |key: ConfigKey| -> Result<f64> { Ok(config.value(key).parse()?) };
        Ok(Self {
            default_format: OutputFormat::from_str(config.value(ConfigKey::DefaultFormat), true)
                .map_err(CliError::Config)?,
            risk_level: float(ConfigKey::RiskLevel)?,
            tolerance: float(ConfigKey::Tolerance)?,
            significance: float(ConfigKey::Significance)?,
            ewma_lambda: float(ConfigKey::EwmaLambda)?,
            decimal_precision: config.value(ConfigKey::DecimalPrecision).parse()?,
        })
    }

    /// CDB configuration, with an optional risk-level override.
    pub fn cdb_config(&self, risk_level: Option<f64>) -> CdbConfig {
        CdbConfig::default().with_risk_level(risk_level.unwrap_or(self.risk_level))
    }

    /// Classifier configuration, with optional overrides.
    pub fn classifier_config(
        &self,
        tolerance: Option<f64>,
        significance: Option<f64>,
    ) -> ClassifierConfig {
        ClassifierConfig::default()
            .with_tolerance(tolerance.unwrap_or(self.tolerance))
            .with_significance(significance.unwrap_or(self.significance))
    }

    /// EWMA covariance source, with an optional decay override.
    pub fn ewma(&self, lambda: Option<f64>) -> haven_risk::RiskResult<EwmaCovariance> {
        EwmaCovariance::new(lambda.unwrap_or(self.ewma_lambda))
    }
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, format: OutputFormat, override_path: Option<&Path>) -> Result<()> {
    let path = config_path(override_path)?;
    match args.command {
        ConfigCommand::Show => execute_show(&path, format),
        ConfigCommand::Get(get_args) => execute_get(&path, get_args, format),
        ConfigCommand::Set(set_args) => execute_set(&path, set_args),
        ConfigCommand::List => execute_list(format),
        ConfigCommand::Reset(reset_args) => execute_reset(&path, reset_args),
        ConfigCommand::Path => execute_path(&path),
    }
}

/// Show current configuration.
fn execute_show(path: &Path, format: OutputFormat) -> Result<()> {
    let config = Config::load(path)?;

    let results: Vec<KeyValue> = ConfigKey::all()
        .iter()
        .map(|key| KeyValue::new(key.as_str(), config.value(*key)))
        .collect();

    match format {
        OutputFormat::Table => {
            print_header("Current Configuration");
            crate::output::print_output(&results, format)?;
        }
        OutputFormat::Json => {
            let output: HashMap<&str, &str> = ConfigKey::all()
                .iter()
                .map(|key| (key.as_str(), config.value(*key)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Csv => {
            crate::output::print_output(&results, format)?;
        }
        OutputFormat::Minimal => {
            for key in ConfigKey::all() {
                println!("{}={}", key.as_str(), config.value(*key));
            }
        }
    }

    Ok(())
}

/// Get a configuration value.
fn execute_get(path: &Path, args: GetArgs, format: OutputFormat) -> Result<()> {
    let config = Config::load(path)?;

    let key = ConfigKey::from_str(&args.key)
        .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", args.key))?;
    let value = config.value(key);

    match format {
        OutputFormat::Table | OutputFormat::Csv => {
            println!("{}: {}", key.as_str(), value);
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "key": key.as_str(),
                "value": value
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Minimal => {
            println!("{}", value);
        }
    }

    Ok(())
}

/// Set a configuration value.
fn execute_set(path: &Path, args: SetArgs) -> Result<()> {
    let key = ConfigKey::from_str(&args.key)
        .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", args.key))?;

    validate_config_value(key, &args.value)?;

    let mut config = Config::load(path)?;
    config.set(key.as_str().to_string(), args.value.clone());
    config.save(path)?;

    print_success(&format!("Set {} = {}", key.as_str(), args.value));
    Ok(())
}

/// List available configuration keys.
fn execute_list(format: OutputFormat) -> Result<()> {
    let results: Vec<KeyValue> = ConfigKey::all()
        .iter()
        .map(|key| {
            KeyValue::new(
                key.as_str(),
                format!("{} (default: {})", key.description(), key.default_value()),
            )
        })
        .collect();

    match format {
        OutputFormat::Table => {
            print_header("Available Configuration Keys");
            crate::output::print_output(&results, format)?;
        }
        OutputFormat::Json => {
            let output: Vec<_> = ConfigKey::all()
                .iter()
                .map(|key| {
                    serde_json::json!({
                        "key": key.as_str(),
                        "description": key.description(),
                        "default": key.default_value()
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            wtr.write_record(["key", "description", "default"])?;
            for key in ConfigKey::all() {
                wtr.write_record([key.as_str(), key.description(), key.default_value()])?;
            }
            wtr.flush()?;
        }
        OutputFormat::Minimal => {
            for key in ConfigKey::all() {
                println!("{}", key.as_str());
            }
        }
    }

    Ok(())
}

/// Reset configuration.
fn execute_reset(path: &Path, args: ResetArgs) -> Result<()> {
    let mut config = Config::load(path)?;

    if args.all {
        config.clear();
        config.save(path)?;
        print_success("Reset all configuration to defaults");
    } else if let Some(key_str) = args.key {
        let key = ConfigKey::from_str(&key_str)
            .ok_or_else(|| anyhow::anyhow!("Unknown configuration key: {}", key_str))?;
        config.remove(key.as_str());
        config.save(path)?;
        print_success(&format!(
            "Reset {} to default ({})",
            key.as_str(),
            key.default_value()
        ));
    } else {
        print_warning("Use --all to reset all settings, or specify a key to reset");
    }

    Ok(())
}

/// Show configuration file path.
fn execute_path(path: &Path) -> Result<()> {
    print_info(&format!("Config file: {}", path.display()));
    if path.exists() {
        print_info("Status: exists");
    } else {
        print_info("Status: not created yet (using defaults)");
    }
    Ok(())
}

fn parse_unit_interval(name: &str, value: &str) -> Result<f64> {
    let parsed: f64 = value
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid {}: {}. Must be a number.", name, value))?;
    if !(parsed > 0.0 && parsed < 1.0) {
        return Err(anyhow::anyhow!(
            "Invalid {}: {}. Must lie strictly between 0 and 1.",
            name,
            value
        ));
    }
    Ok(parsed)
}

/// Validate a configuration value.
fn validate_config_value(key: ConfigKey, value: &str) -> Result<()> {
    match key {
        ConfigKey::DefaultFormat => {
            if OutputFormat::from_str(value, true).is_err() {
                return Err(anyhow::anyhow!(
                    "Invalid format: {}. Use table, json, csv, or minimal.",
                    value
                ));
            }
        }
        ConfigKey::RiskLevel => {
            parse_unit_interval("risk level", value)?;
        }
        ConfigKey::Significance => {
            parse_unit_interval("significance", value)?;
        }
        ConfigKey::EwmaLambda => {
            parse_unit_interval("EWMA lambda", value)?;
        }
        ConfigKey::Tolerance => {
            let tolerance: f64 = value
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid tolerance: {}. Must be a number.", value))?;
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(anyhow::anyhow!(
                    "Invalid tolerance: {}. Must be finite and non-negative.",
                    value
                ));
            }
        }
        ConfigKey::DecimalPrecision => {
            let precision: u32 = value
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid precision: {}. Must be a number.", value))?;
            if !(2..=10).contains(&precision) {
                return Err(anyhow::anyhow!(
                    "Invalid precision: {}. Must be between 2 and 10.",
                    precision
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_aliases() {
        for key in ConfigKey::all() {
            assert_eq!(ConfigKey::from_str(key.as_str()), Some(*key));
        }
        assert_eq!(ConfigKey::from_str("lambda"), Some(ConfigKey::EwmaLambda));
        assert_eq!(ConfigKey::from_str("currency"), None);
    }

    #[test]
    fn test_defaults_are_valid() {
        for key in ConfigKey::all() {
            validate_config_value(*key, key.default_value()).unwrap();
        }
        let settings = Settings::from_config(&Config::default()).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(validate_config_value(ConfigKey::RiskLevel, "1.0").is_err());
        assert!(validate_config_value(ConfigKey::RiskLevel, "abc").is_err());
        assert!(validate_config_value(ConfigKey::Significance, "0").is_err());
        assert!(validate_config_value(ConfigKey::Tolerance, "-1e-8").is_err());
        assert!(validate_config_value(ConfigKey::DefaultFormat, "xml").is_err());
        assert!(validate_config_value(ConfigKey::DecimalPrecision, "12").is_err());
        assert!(validate_config_value(ConfigKey::DefaultFormat, "JSON").is_ok());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.set("risk_level".into(), "0.01".into());
        config.set("default_format".into(), "json".into());
        config.save(&path).unwrap();

        let settings = Settings::load(Some(path.as_path())).unwrap();
        assert_eq!(settings.risk_level, 0.01);
        assert_eq!(settings.default_format, OutputFormat::Json);
        assert_eq!(settings.significance, 0.10);
    }

    #[test]
    fn test_flags_override_settings() {
        let settings = Settings::default();
        assert_eq!(settings.cdb_config(Some(0.01)).risk_level, 0.01);
        assert_eq!(settings.cdb_config(None).risk_level, 0.05);
        let classifier = settings.classifier_config(None, Some(0.05));
        assert_eq!(classifier.significance, 0.05);
        assert_eq!(classifier.tolerance, 1e-8);
        assert!(settings.ewma(Some(1.5)).is_err());
    }
}
