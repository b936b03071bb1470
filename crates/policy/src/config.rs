//! Construction-time configuration of a rate policy.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::curve::CurveParameters;
use crate::ema::DEFAULT_EMA_TIME;
use crate::error::{PolicyError, Result};
use crate::math::WAD;

/// Lowest accepted target utilization (1%)
pub const MIN_TARGET_UTILIZATION: U256 = U256::from_limbs([10_000_000_000_000_000, 0, 0, 0]);

/// Highest accepted target utilization (99%)
pub const MAX_TARGET_UTILIZATION: U256 = U256::from_limbs([990_000_000_000_000_000, 0, 0, 0]);

/// Lowest accepted low ratio (1%)
pub const MIN_LOW_RATIO: U256 = U256::from_limbs([10_000_000_000_000_000, 0, 0, 0]);

/// Highest accepted high ratio (100x)
pub const MAX_HIGH_RATIO: U256 = U256::from_limbs([7_766_279_631_452_241_920, 5, 0, 0]);

/// Highest accepted rate shift (100e18)
pub const MAX_RATE_SHIFT: U256 = U256::from_limbs([7_766_279_631_452_241_920, 5, 0, 0]);

/// Default target utilization (85%)
pub const DEFAULT_TARGET_UTILIZATION: U256 = U256::from_limbs([850_000_000_000_000_000, 0, 0, 0]);

/// Default low ratio (20%)
pub const DEFAULT_LOW_RATIO: U256 = U256::from_limbs([200_000_000_000_000_000, 0, 0, 0]);

/// Default high ratio (720%)
pub const DEFAULT_HIGH_RATIO: U256 = U256::from_limbs([7_200_000_000_000_000_000, 0, 0, 0]);

/// Immutable inputs of an [`crate::EmaMonetaryPolicy`].
///
/// All ratios are WAD-scaled. Changing any of them means building a new
/// policy, never mutating an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Utilization at which the borrow rate equals the smoothed rate
    pub target_utilization: U256,
    /// Borrow rate / smoothed rate at 0% utilization
    pub low_ratio: U256,
    /// Borrow rate / smoothed rate at 100% utilization
    pub high_ratio: U256,
    /// Per-second offset added to every rate
    pub rate_shift: U256,
    /// Smoothing constant of the moving average, in seconds
    pub ema_time: u64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            target_utilization: DEFAULT_TARGET_UTILIZATION,
            low_ratio: DEFAULT_LOW_RATIO,
            high_ratio: DEFAULT_HIGH_RATIO,
            rate_shift: U256::ZERO,
            ema_time: DEFAULT_EMA_TIME,
        }
    }
}

impl PolicyConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target_utilization(mut self, target_utilization: U256) -> Self {
        self.target_utilization = target_utilization;
        self
    }

    pub fn with_low_ratio(mut self, low_ratio: U256) -> Self {
        self.low_ratio = low_ratio;
        self
    }

    pub fn with_high_ratio(mut self, high_ratio: U256) -> Self {
        self.high_ratio = high_ratio;
        self
    }

    pub fn with_rate_shift(mut self, rate_shift: U256) -> Self {
        self.rate_shift = rate_shift;
        self
    }

    pub fn with_ema_time(mut self, ema_time: u64) -> Self {
        self.ema_time = ema_time;
        self
    }

    /// Checks bounds and derives the curve coefficients.
    ///
    /// # Errors
    ///
    /// - [`PolicyError::InvalidParameters`] for any value out of range or a
    ///   combination of ratios without a valid pole
    pub fn curve_parameters(&self) -> Result<CurveParameters> {
        if self.target_utilization < MIN_TARGET_UTILIZATION
            || self.target_utilization > MAX_TARGET_UTILIZATION
        {
            return Err(PolicyError::InvalidParameters(format!(
                "target_utilization {} outside [{MIN_TARGET_UTILIZATION}, {MAX_TARGET_UTILIZATION}]",
                self.target_utilization
            )));
        }
        if self.low_ratio < MIN_LOW_RATIO || self.low_ratio >= WAD {
            return Err(PolicyError::InvalidParameters(format!(
                "low_ratio {} outside [{MIN_LOW_RATIO}, {WAD})",
                self.low_ratio
            )));
        }
        if self.high_ratio <= WAD || self.high_ratio > MAX_HIGH_RATIO {
            return Err(PolicyError::InvalidParameters(format!(
                "high_ratio {} outside ({WAD}, {MAX_HIGH_RATIO}]",
                self.high_ratio
            )));
        }
        if self.rate_shift > MAX_RATE_SHIFT {
            return Err(PolicyError::InvalidParameters(format!(
                "rate_shift {} above {MAX_RATE_SHIFT}",
                self.rate_shift
            )));
        }
        if self.ema_time == 0 {
            return Err(PolicyError::InvalidParameters(
                "ema_time must be positive".to_string(),
            ));
        }

        CurveParameters::derive(
            self.target_utilization,
            self.low_ratio,
            self.high_ratio,
            self.rate_shift,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_constants() {
        assert_eq!(MAX_HIGH_RATIO, U256::from(100u64) * WAD);
        assert_eq!(MAX_RATE_SHIFT, U256::from(100u64) * WAD);
        assert_eq!(MIN_TARGET_UTILIZATION, WAD / U256::from(100));
        assert_eq!(DEFAULT_HIGH_RATIO, U256::from(72u64) * WAD / U256::from(10));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = PolicyConfig::new();
        assert_eq!(config.ema_time, DEFAULT_EMA_TIME);
        assert!(config.curve_parameters().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = PolicyConfig::new()
            .with_target_utilization(WAD / U256::from(2))
            .with_low_ratio(WAD / U256::from(10))
            .with_high_ratio(U256::from(3) * WAD)
            .with_rate_shift(U256::from(7))
            .with_ema_time(86_400);

        assert_eq!(config.target_utilization, WAD / U256::from(2));
        assert_eq!(config.low_ratio, WAD / U256::from(10));
        assert_eq!(config.high_ratio, U256::from(3) * WAD);
        assert_eq!(config.rate_shift, U256::from(7));
        assert_eq!(config.ema_time, 86_400);
        assert!(config.curve_parameters().is_ok());
    }

    #[test]
    fn test_rejects_target_utilization_out_of_range() {
        let too_low = PolicyConfig::new().with_target_utilization(U256::from(1));
        let too_high = PolicyConfig::new().with_target_utilization(WAD);
        assert!(too_low.curve_parameters().is_err());
        assert!(too_high.curve_parameters().is_err());
    }

    #[test]
    fn test_rejects_ratios_out_of_range() {
        assert!(PolicyConfig::new()
            .with_low_ratio(U256::ZERO)
            .curve_parameters()
            .is_err());
        assert!(PolicyConfig::new()
            .with_high_ratio(MAX_HIGH_RATIO + U256::from(1))
            .curve_parameters()
            .is_err());
        assert!(PolicyConfig::new()
            .with_rate_shift(MAX_RATE_SHIFT + U256::from(1))
            .curve_parameters()
            .is_err());
    }

    #[test]
    fn test_rejects_zero_ema_time() {
        let result = PolicyConfig::new().with_ema_time(0).curve_parameters();
        assert!(matches!(result, Err(PolicyError::InvalidParameters(_))));
    }

    #[test]
    fn test_json_round_trip_keeps_values() {
        let config = PolicyConfig::new().with_rate_shift(U256::from(12_345u64));
        let json = serde_json::to_string(&config).unwrap();
        let parsed: PolicyConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
