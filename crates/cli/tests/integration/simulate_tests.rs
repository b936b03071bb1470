//! Simulate command tests.

use predicates::prelude::*;

use super::helpers::{ema_rate_cmd, fixture_path, json_output};

#[test]
fn test_simulate_table_output() {
    ema_rate_cmd()
        .args(["simulate", "--scenario"])
        .arg(fixture_path("source_outage"))
        .assert()
        .success()
        .stdout(predicate::str::contains("EMA APR"))
        .stdout(predicate::str::contains("failing"));
}

#[test]
fn test_simulate_source_outage_holds_rate() {
    let json = json_output(
        ema_rate_cmd()
            .args(["--format", "json", "simulate", "--scenario"])
            .arg(fixture_path("source_outage")),
    );

    let steps = json["steps"].as_array().unwrap();
    assert_eq!(steps.len(), 4);
    assert!(steps[1]["source_failing"].as_bool().unwrap());

    let ema: Vec<f64> = steps
        .iter()
        .map(|s| s["ema_apr"].as_f64().unwrap())
        .collect();
    assert_eq!(ema[0], ema[1]);
    assert_eq!(ema[1], ema[2]);
    assert!(steps
        .iter()
        .all(|s| s["borrow_apr"].as_f64().unwrap() > 0.0));
}

#[test]
fn test_simulate_dried_up_source_hits_floor() {
    let json = json_output(
        ema_rate_cmd()
            .args(["--format", "json", "simulate", "--scenario"])
            .arg(fixture_path("dried_up_source")),
    );

    let steps = json["steps"].as_array().unwrap();
    let ema: Vec<f64> = steps
        .iter()
        .map(|s| s["ema_apr"].as_f64().unwrap())
        .collect();
    assert!(ema.windows(2).all(|pair| pair[1] <= pair[0]));
    assert!(ema.iter().all(|apr| *apr >= 0.999_999));

    let last = steps.last().unwrap();
    assert!((last["ema_apr"].as_f64().unwrap() - 1.0).abs() < 1e-6);
    assert!((last["borrow_apr"].as_f64().unwrap() - 0.6).abs() <= 0.2);
}

#[test]
fn test_simulate_rising_source_is_smoothed() {
    let json = json_output(
        ema_rate_cmd()
            .args(["--format", "json", "simulate", "--scenario"])
            .arg(fixture_path("rising_source")),
    );

    let steps = json["steps"].as_array().unwrap();
    let ema: Vec<f64> = steps
        .iter()
        .map(|s| s["ema_apr"].as_f64().unwrap())
        .collect();
    assert!(ema.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(ema.iter().all(|apr| *apr < 20.0));
}

#[test]
fn test_simulate_missing_file() {
    ema_rate_cmd()
        .args(["simulate", "--scenario", "does/not/exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read scenario file"));
}

#[test]
fn test_simulate_invalid_scenario() {
    ema_rate_cmd()
        .args(["simulate", "--scenario"])
        .arg(fixture_path("invalid_scenario"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid scenario file"));
}

#[test]
fn test_simulate_rejects_timestamp_overflow() {
    ema_rate_cmd()
        .args(["simulate", "--scenario"])
        .arg(fixture_path("end_of_time"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("largest timestamp"));
}
