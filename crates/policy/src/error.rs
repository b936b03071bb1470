//! Error types for the rate policy library.

use alloy_primitives::U256;
use thiserror::Error;

/// Errors raised while reading the upstream yield source.
///
/// These never reach the market during normal operation: the safe reader
/// masks them with the last known good rate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The upstream call failed (reverted, unreachable, ...)
    #[error("Rate source unavailable: {0}")]
    Unavailable(String),

    /// The upstream returned a rate outside the accepted range
    #[error("Rate source returned implausible rate {rate} (max {max})")]
    ImplausibleRate { rate: U256, max: U256 },
}

/// Errors surfaced by the policy to its host market.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The first read failed, so there is no value to seed the average with
    #[error("Cannot seed moving average: {0}")]
    SeedUnavailable(#[source] SourceError),

    /// Curve configuration rejected at construction
    #[error("Invalid curve parameters: {0}")]
    InvalidParameters(String),

    /// A thread panicked while holding a policy lock
    #[error("Policy lock poisoned: {0}")]
    LockPoisoned(&'static str),
}

/// Result type alias for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;
