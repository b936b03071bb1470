//! Integration tests for the ema-rate CLI.
//!
//! These tests run the compiled binary end to end against scenario fixtures.
//!
//! # Test Categories
//!
//! - **Params/curve tests**: derived parameters and utilization sweeps
//! - **Simulate tests**: scenario replay from `tests/fixtures/*.json`
//! - **CLI validation tests**: Argument parsing, help text, error handling
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ema-rate-cli --test integration
//! ```

mod integration {
    pub mod helpers;
    pub mod params_tests;
    pub mod curve_tests;
    pub mod simulate_tests;
    pub mod cli_validation_tests;
}
