//! Utilization-sensitive rate curve.
//!
//! The curve multiplies the smoothed upstream rate `r0` by a hyperbolic
//! function of utilization:
//!
//! ```text
//! rate(r0, u) = r0 * r_minf + A * r0 / (u_inf - u) + shift
//! ```
//!
//! `u_inf`, `A` and `r_minf` are derived from three intuitive ratios so that
//! the multiplier on `r0` is `low_ratio` at 0% utilization, exactly 1 at
//! `target_utilization` and `high_ratio` at 100% utilization:
//!
//! ```text
//! u_inf  = (high - 1) * u0 / ((high - 1) * u0 - (1 - u0) * (1 - low))
//! A      = (1 - low) * u_inf * (u_inf - u0) / u0
//! r_minf = low - A / u_inf
//! ```
//!
//! The pole `u_inf` always lies above 100%. Utilization at or past it is
//! clamped to `u_inf - 1`, so the rate saturates at a large finite value
//! instead of dividing by zero.

use alloy_primitives::{I256, U256};
use serde::Serialize;

use crate::error::{PolicyError, Result};
use crate::math::{to_signed, to_unsigned, WAD};

/// Coefficients of the curve, derived once at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CurveParameters {
    /// Utilization of the pole (WAD-scaled, above 100%)
    pub u_inf: U256,
    /// Scale of the hyperbolic term (WAD-scaled)
    pub a: U256,
    /// Multiplier of `r0` far below the pole; may be negative (WAD-scaled)
    pub r_minf: I256,
    /// Additive per-second offset (WAD-scaled)
    pub shift: U256,
}

impl CurveParameters {
    /// Derives the curve coefficients from the construction ratios.
    ///
    /// # Errors
    ///
    /// - [`PolicyError::InvalidParameters`] if the ratios place the pole at
    ///   or below the target utilization
    pub fn derive(
        target_utilization: U256,
        low_ratio: U256,
        high_ratio: U256,
        rate_shift: U256,
    ) -> Result<Self> {
        if target_utilization.is_zero() || target_utilization >= WAD {
            return Err(PolicyError::InvalidParameters(format!(
                "target_utilization {target_utilization} must be strictly between 0 and {WAD}"
            )));
        }
        if low_ratio >= WAD || high_ratio <= WAD {
            return Err(PolicyError::InvalidParameters(format!(
                "need low_ratio < {WAD} < high_ratio, got {low_ratio} and {high_ratio}"
            )));
        }

        let numerator = (high_ratio - WAD) * target_utilization;
        let subtrahend = (WAD - target_utilization) * (WAD - low_ratio);
        let denominator = numerator.saturating_sub(subtrahend) / WAD;
        if denominator.is_zero() {
            return Err(PolicyError::InvalidParameters(format!(
                "high_ratio {high_ratio} too small for target_utilization {target_utilization} \
                 and low_ratio {low_ratio}"
            )));
        }

        let u_inf = numerator / denominator;
        let a = (WAD - low_ratio) * u_inf / WAD * (u_inf - target_utilization) / target_utilization;
        let r_minf = to_signed(low_ratio) - to_signed(a * WAD / u_inf);

        Ok(Self {
            u_inf,
            a,
            r_minf,
            shift: rate_shift,
        })
    }

    /// Per-second borrow rate for a smoothed rate `ema_rate` at `utilization`.
    pub fn rate(&self, ema_rate: U256, utilization: U256) -> U256 {
        let utilization = if utilization >= self.u_inf {
            self.u_inf - U256::from(1)
        } else {
            utilization
        };

        let base = to_signed(ema_rate) * self.r_minf / to_signed(WAD);
        let hyperbolic = self.a * ema_rate / (self.u_inf - utilization);

        to_unsigned(base + to_signed(hyperbolic) + to_signed(self.shift))
    }
}
