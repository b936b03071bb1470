//! Curve command tests.

use predicates::prelude::*;

use super::helpers::{ema_rate_cmd, json_output};

#[test]
fn test_curve_table_output() {
    ema_rate_cmd()
        .args(["curve", "--ema-apr", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Utilization"))
        .stdout(predicate::str::contains("Borrow APR"))
        .stdout(predicate::str::contains("100.00%"));
}

#[test]
fn test_curve_json_is_increasing() {
    let json = json_output(ema_rate_cmd().args([
        "--format", "json", "curve", "--ema-apr", "5", "--from", "0", "--to", "95", "--step",
        "5",
    ]));

    let points = json.as_array().unwrap();
    assert_eq!(points.len(), 20);
    let aprs: Vec<f64> = points
        .iter()
        .map(|p| p["borrow_apr"].as_f64().unwrap())
        .collect();
    assert!(aprs.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_curve_at_floor() {
    let json = json_output(ema_rate_cmd().args([
        "--format", "json", "curve", "--ema-apr", "1", "--from", "72", "--to", "85", "--step",
        "13",
    ]));

    let points = json.as_array().unwrap();
    let at_72 = points[0]["borrow_apr"].as_f64().unwrap();
    let at_85 = points[1]["borrow_apr"].as_f64().unwrap();
    assert!((at_72 - 0.6).abs() <= 0.2, "apr {at_72}");
    assert!((at_85 - 1.0).abs() <= 0.2, "apr {at_85}");
}

#[test]
fn test_curve_rejects_zero_step() {
    ema_rate_cmd()
        .args(["curve", "--step", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--step must be positive"));
}

#[test]
fn test_curve_rejects_tiny_step() {
    ema_rate_cmd()
        .args(["curve", "--step", "1e-300"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too small"));
}
