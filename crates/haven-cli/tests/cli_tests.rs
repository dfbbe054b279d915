//! End-to-end tests for the `haven` binary.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// TEST FIXTURES
// =============================================================================

const RETURNS: &str = "\
date,gold,spx,oil
2024-01-02,0.004,-0.015,0.010
2024-01-03,-0.002,0.021,-0.004
2024-01-04,0.011,0.008,NA
2024-01-05,-0.007,-0.031,0.020
2024-01-08,0.003,0.012,-0.012
2024-01-09,0.006,0.017,0.005
2024-01-10,-0.012,-0.009,0.001
2024-01-11,0.009,0.004,-0.008
2024-01-12,,-0.022,0.014
2024-01-16,0.002,0.019,-0.003
2024-01-17,0.005,0.001,
2024-01-18,-0.004,-0.006,-0.010
";

const STRONG_ESTIMATE: &str = r#"{
  "names": ["const", "mxreg1", "mxreg2", "mxreg3", "mxreg4"],
  "values": [0.0001, -0.5, -0.125, -0.125, -0.125],
  "covariance": [
    [0.0001, 0, 0, 0, 0],
    [0, 0.0001, 0, 0, 0],
    [0, 0, 0.0001, 0, 0],
    [0, 0, 0, 0.0001, 0],
    [0, 0, 0, 0, 0.0001]
  ]
}"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("config.json")
    }

    /// A `haven` command isolated from the user's configuration.
    fn haven(&self) -> Command {
        let mut cmd = Command::cargo_bin("haven").unwrap();
        cmd.env("HAVEN_CONFIG", self.config()).env_remove("RUST_LOG");
        cmd
    }
}

fn covariance_csv(rows: usize) -> String {
    let mut out = String::from("v1,c12,v2\n");
    for _ in 0..rows {
        out.push_str("1.0,0.5,2.0\n");
    }
    out
}

fn parse_stdout(output: &[u8]) -> serde_json::Value {
    serde_json::from_slice(output).unwrap()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

// =============================================================================
// CDB
// =============================================================================

#[test]
fn test_cdb_grid_json() {
    let fx = Fixture::new();
    let input = fx.write("returns.csv", RETURNS);

    let output = fx
        .haven()
        .args(["cdb", "--input", path_str(&input), "--x", "gold", "--y", "spx"])
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = parse_stdout(&output.stdout);
    for key in ["w05", "w10", "w20"] {
        assert!(json["cdb"][key].is_f64(), "missing {}", key);
    }
    assert!(json["candidate"]["es"].as_f64().unwrap() > json["candidate"]["var"].as_f64().unwrap());
}

#[test]
fn test_cdb_point_is_zero_at_extremes() {
    let fx = Fixture::new();
    let input = fx.write("returns.csv", RETURNS);

    for w in ["0", "1"] {
        let output = fx
            .haven()
            .args(["cdb", "--input", path_str(&input), "--x", "gold", "--y", "spx"])
            .args(["--weight", w, "--format", "minimal"])
            .output()
            .unwrap();
        assert!(output.status.success());
        let value: f64 = String::from_utf8(output.stdout).unwrap().trim().parse().unwrap();
        assert_eq!(value, 0.0);
    }
}

#[test]
fn test_cdb_batch_csv() {
    let fx = Fixture::new();
    let input = fx.write("returns.csv", RETURNS);

    fx.haven()
        .args(["cdb", "--input", path_str(&input)])
        .args(["--x", "gold", "--x", "oil", "--y", "spx", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("asset,w05,w10,w20"))
        .stdout(predicate::str::contains("gold,"))
        .stdout(predicate::str::contains("oil,"));
}

#[test]
fn test_cdb_validation_errors() {
    let fx = Fixture::new();
    let input = fx.write("returns.csv", RETURNS);

    fx.haven()
        .args(["cdb", "--input", path_str(&input), "--x", "gold", "--y", "spx"])
        .args(["--p", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("risk level"));

    fx.haven()
        .args(["cdb", "--input", path_str(&input), "--x", "gold", "--y", "spx"])
        .args(["--weight", "1.2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid weight"));

    fx.haven()
        .args(["cdb", "--input", path_str(&input), "--x", "copper", "--y", "spx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Column 'copper' not found"));
}

// =============================================================================
// HEDGE
// =============================================================================

#[test]
fn test_hedge_from_constant_path() {
    let fx = Fixture::new();
    let path = fx.write("path.csv", &covariance_csv(12));

    let output = fx
        .haven()
        .args(["hedge", "--path", path_str(&path), "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = parse_stdout(&output.stdout);
    assert_eq!(json["beta_mean"].as_f64(), Some(0.25));
    assert_eq!(json["beta_min"].as_f64(), Some(0.25));
    assert_eq!(json["beta_max"].as_f64(), Some(0.25));
    // 1 - (1 - 0.25/2) / 1
    assert!((json["HE"].as_f64().unwrap() - 0.125).abs() < 1e-12);
}

#[test]
fn test_hedge_rejects_short_path() {
    let fx = Fixture::new();
    let path = fx.write("path.csv", &covariance_csv(9));

    fx.haven()
        .args(["hedge", "--path", path_str(&path)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("need at least 10"));
}

#[test]
fn test_hedge_from_returns() {
    let fx = Fixture::new();
    let input = fx.write("returns.csv", RETURNS);

    for model in ["ewma", "sample"] {
        fx.haven()
            .args(["hedge", "--input", path_str(&input), "--x", "spx", "--y", "oil"])
            .args(["--model", model, "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"OPW\""));
    }

    // spx and oil overlap on 10 rows, gold and oil on only 9
    fx.haven()
        .args(["hedge", "--input", path_str(&input), "--x", "gold", "--y", "oil"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("insufficient data"));
}

// =============================================================================
// BM10 AND CLASSIFY
// =============================================================================

#[test]
fn test_bm10_table_csv() {
    let fx = Fixture::new();
    let estimate = fx.write("fit.json", STRONG_ESTIMATE);

    fx.haven()
        .args(["bm10", "--coefficients", path_str(&estimate), "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("level,Coefficient_Sum,p_value"))
        .stdout(predicate::str::contains("c0,-0.5,"))
        .stdout(predicate::str::contains("0.01,-0.875,"));
}

#[test]
fn test_bm10_unknown_terms() {
    let fx = Fixture::new();
    let estimate = fx.write("fit.json", STRONG_ESTIMATE);

    fx.haven()
        .args(["bm10", "--coefficients", path_str(&estimate)])
        .args(["--terms", "mxreg1,mxreg2,tail5,tail1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown term(s): tail5, tail1"));
}

#[test]
fn test_classify_from_coefficients() {
    let fx = Fixture::new();
    let estimate = fx.write("fit.json", STRONG_ESTIMATE);

    fx.haven()
        .args(["classify", "--coefficients", path_str(&estimate), "--format", "minimal"])
        .assert()
        .success()
        .stdout("Selected asset is a strong hedge - strong safe haven .\n");
}

#[test]
fn test_classify_weak_from_table() {
    let fx = Fixture::new();
    let table = fx.write(
        "table.json",
        r#"[
            {"level": "c0", "Coefficient_Sum": 1e-10, "p_value": 0.5},
            {"level": "0.10", "Coefficient_Sum": 0.0, "p_value": 0.6},
            {"level": "0.05", "Coefficient_Sum": -1e-10, "p_value": 0.7},
            {"level": "0.01", "Coefficient_Sum": 0.0, "p_value": 0.8}
        ]"#,
    );

    fx.haven()
        .args(["classify", "--table", path_str(&table), "--format", "minimal"])
        .assert()
        .success()
        .stdout("Selected asset is a weak hedge - weak safe haven .\n");
}

#[test]
fn test_classify_csv_table_and_significance_flag() {
    let fx = Fixture::new();
    let table = fx.write(
        "table.csv",
        "level,Coefficient_Sum,p_value\nc0,-0.5,0.07\n0.10,-0.6,0.07\n0.05,-0.7,0.07\n0.01,-0.8,0.07\n",
    );

    fx.haven()
        .args(["classify", "--table", path_str(&table), "--format", "minimal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("strong hedge - strong safe haven"));

    fx.haven()
        .args(["classify", "--table", path_str(&table), "--format", "minimal"])
        .args(["--significance", "0.05"])
        .assert()
        .success()
        .stdout(predicate::str::contains("weak hedge - weak safe haven"));
}

#[test]
fn test_classify_missing_level() {
    let fx = Fixture::new();
    let table = fx.write(
        "table.json",
        r#"[
            {"level": "c0", "Coefficient_Sum": -0.5, "p_value": 0.01},
            {"level": "0.10", "Coefficient_Sum": -0.6, "p_value": 0.01},
            {"level": "0.05", "Coefficient_Sum": -0.7, "p_value": 0.01}
        ]"#,
    );

    fx.haven()
        .args(["classify", "--table", path_str(&table)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing level(s): 0.01"));
}

#[test]
fn test_classify_na_cell_names_level() {
    let fx = Fixture::new();
    let table = fx.write(
        "table.csv",
        "level,Coefficient_Sum,p_value\nc0,-0.5,0.01\n0.10,-0.6,0.01\n0.05,-0.7,0.01\n0.01,NA,0.01\n",
    );

    fx.haven()
        .args(["classify", "--table", path_str(&table)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing level(s): 0.01"));

    let json = fx.write(
        "table.json",
        r#"[
            {"level": "c0", "Coefficient_Sum": -0.5, "p_value": 0.01},
            {"level": "0.10", "Coefficient_Sum": -0.6, "p_value": 0.01},
            {"level": "0.05", "Coefficient_Sum": -0.7, "p_value": null},
            {"level": "0.01", "Coefficient_Sum": null, "p_value": 0.01}
        ]"#,
    );

    fx.haven()
        .args(["classify", "--table", path_str(&json)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing level(s): 0.05, 0.01"));
}

#[test]
fn test_classify_batch_reports_each_asset() {
    let fx = Fixture::new();
    let tables = fx.write(
        "tables.json",
        r#"{
            "GOLD": [
                {"level": "c0", "Coefficient_Sum": -0.5, "p_value": 0.01},
                {"level": "0.10", "Coefficient_Sum": -0.6, "p_value": 0.01},
                {"level": "0.05", "Coefficient_Sum": -0.7, "p_value": 0.01},
                {"level": "0.01", "Coefficient_Sum": -0.8, "p_value": 0.01}
            ],
            "OIL": [
                {"level": "c0", "Coefficient_Sum": 0.3, "p_value": 0.01},
                {"level": "0.10", "Coefficient_Sum": 0.4, "p_value": 0.01},
                {"level": "0.05", "Coefficient_Sum": 0.5, "p_value": 0.01},
                {"level": "0.01", "Coefficient_Sum": 0.6, "p_value": 0.01}
            ]
        }"#,
    );

    fx.haven()
        .args(["classify", "--table", path_str(&tables), "--format", "minimal"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "GOLD: Selected asset is a strong hedge - strong safe haven .",
        ))
        .stdout(predicate::str::contains(
            "OIL: Selected asset is a not a hedge - not a safe haven .",
        ));
}

// =============================================================================
// CONFIG
// =============================================================================

#[test]
fn test_config_set_get_reset() {
    let fx = Fixture::new();

    fx.haven()
        .args(["config", "set", "risk_level", "0.01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set risk_level = 0.01"));

    fx.haven()
        .args(["config", "get", "risk_level", "--format", "minimal"])
        .assert()
        .success()
        .stdout("0.01\n");

    fx.haven()
        .args(["config", "reset", "risk_level"])
        .assert()
        .success();

    fx.haven()
        .args(["config", "get", "p", "--format", "minimal"])
        .assert()
        .success()
        .stdout("0.05\n");
}

#[test]
fn test_config_rejects_invalid_values() {
    let fx = Fixture::new();

    fx.haven()
        .args(["config", "set", "significance", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid significance"));

    fx.haven()
        .args(["config", "set", "currency", "USD"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));

    assert!(!fx.config().exists());
}

#[test]
fn test_config_default_format_applies() {
    let fx = Fixture::new();
    let path = fx.write("path.csv", &covariance_csv(10));

    fx.haven()
        .args(["config", "set", "default_format", "json"])
        .assert()
        .success();

    let output = fx
        .haven()
        .args(["hedge", "--path", path_str(&path)])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(parse_stdout(&output.stdout)["OPW"].as_f64().is_some());
}
