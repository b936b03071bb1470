//! Test helper utilities for CLI integration tests.

#![allow(deprecated)] // Command::cargo_bin deprecation

use std::path::PathBuf;

use assert_cmd::Command;

/// Create a CLI command with no policy overrides from the environment.
pub fn ema_rate_cmd() -> Command {
    let mut cmd = Command::cargo_bin("ema-rate").unwrap();
    for var in [
        "EMA_RATE_TARGET_U",
        "EMA_RATE_LOW_RATIO",
        "EMA_RATE_HIGH_RATIO",
        "EMA_RATE_SHIFT",
        "EMA_RATE_EMA_TIME",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Path of a fixture file.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(format!(
        "{}/tests/fixtures/{}.json",
        env!("CARGO_MANIFEST_DIR"),
        name
    ))
}

/// Run a command and parse its stdout as JSON.
pub fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}
