//! Market state read by the policy on every rate computation.

use alloy_primitives::{I256, U256};
use serde::{Deserialize, Serialize};

use crate::math::{to_signed, to_unsigned, w_div_down};

/// Debt and supplied assets of the lending market at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Total outstanding debt
    pub total_debt: U256,
    /// Total assets supplied to the market
    pub total_assets: U256,
}

impl MarketSnapshot {
    pub fn new(total_debt: U256, total_assets: U256) -> Self {
        Self {
            total_debt,
            total_assets,
        }
    }

    /// Returns the market's utilization (WAD-scaled)
    ///
    /// Utilization = total_debt / total_assets
    pub fn utilization(&self) -> U256 {
        get_utilization(self.total_assets, self.total_debt)
    }

    /// Snapshot after a hypothetical change of reserves and debt.
    ///
    /// Negative deltas larger than the current amounts floor at zero.
    pub fn with_deltas(&self, d_reserves: I256, d_debt: I256) -> Self {
        Self {
            total_debt: to_unsigned(to_signed(self.total_debt) + d_debt),
            total_assets: to_unsigned(to_signed(self.total_assets) + d_reserves),
        }
    }
}

/// Calculate the utilization rate (WAD-scaled)
///
/// An empty market has zero utilization.
pub fn get_utilization(total_assets: U256, total_debt: U256) -> U256 {
    if total_assets.is_zero() {
        return U256::ZERO;
    }
    w_div_down(total_debt, total_assets)
}
