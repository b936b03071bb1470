//! CLI argument validation tests.
//!
//! These tests verify that the CLI properly validates arguments and provides
//! helpful error messages.

use predicates::prelude::*;

use super::helpers::ema_rate_cmd;

#[test]
fn test_help_output() {
    ema_rate_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ema-rate"))
        .stdout(predicate::str::contains("params"))
        .stdout(predicate::str::contains("curve"))
        .stdout(predicate::str::contains("simulate"));
}

#[test]
fn test_curve_help_output() {
    ema_rate_cmd()
        .args(["curve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--ema-apr"))
        .stdout(predicate::str::contains("--target-utilization"))
        .stdout(predicate::str::contains("EMA_RATE_TARGET_U"));
}

#[test]
fn test_invalid_command() {
    ema_rate_cmd()
        .arg("invalid_command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_simulate_missing_scenario() {
    ema_rate_cmd()
        .arg("simulate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_invalid_format() {
    ema_rate_cmd()
        .args(["--format", "xml", "params"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_non_numeric_ratio() {
    ema_rate_cmd()
        .args(["params", "--high-ratio", "lots"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
