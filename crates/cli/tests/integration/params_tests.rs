//! Params command tests.

use predicates::prelude::*;

use super::helpers::{ema_rate_cmd, json_output};

#[test]
fn test_params_table_output() {
    ema_rate_cmd()
        .arg("params")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration"))
        .stdout(predicate::str::contains("Curve Parameters"))
        .stdout(predicate::str::contains("85.00%"))
        .stdout(predicate::str::contains("102.33%"));
}

#[test]
fn test_params_json_output() {
    let json = json_output(ema_rate_cmd().args(["--format", "json", "params"]));

    assert!((json["target_utilization"].as_f64().unwrap() - 85.0).abs() < 1e-9);
    assert!((json["low_ratio"].as_f64().unwrap() - 0.2).abs() < 1e-9);
    assert!((json["high_ratio"].as_f64().unwrap() - 7.2).abs() < 1e-9);
    assert_eq!(json["ema_time"].as_u64().unwrap(), 200_000);
    assert!((json["u_inf"].as_f64().unwrap() - 102.330_097).abs() < 1e-4);
    assert!((json["a"].as_f64().unwrap() - 0.166_907).abs() < 1e-5);
    assert!(json["r_minf"].as_f64().unwrap() > 0.0);
}

#[test]
fn test_params_custom_flags() {
    let json = json_output(ema_rate_cmd().args([
        "--format",
        "json",
        "params",
        "--target-utilization",
        "50",
        "--low-ratio",
        "0.1",
        "--high-ratio",
        "3",
        "--ema-time",
        "86400",
    ]));

    assert!((json["target_utilization"].as_f64().unwrap() - 50.0).abs() < 1e-9);
    assert_eq!(json["ema_time"].as_u64().unwrap(), 86_400);
}

#[test]
fn test_params_read_from_environment() {
    let json = json_output(
        ema_rate_cmd()
            .env("EMA_RATE_TARGET_U", "80")
            .env("EMA_RATE_EMA_TIME", "3600")
            .args(["--format", "json", "params"]),
    );

    assert!((json["target_utilization"].as_f64().unwrap() - 80.0).abs() < 1e-9);
    assert_eq!(json["ema_time"].as_u64().unwrap(), 3_600);
}

#[test]
fn test_params_rejects_invalid_ratios() {
    ema_rate_cmd()
        .args(["params", "--low-ratio", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid curve parameters"));
}
