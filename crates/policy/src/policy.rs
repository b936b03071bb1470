//! The monetary policy a lending market queries for its borrow rate.
//!
//! [`EmaMonetaryPolicy`] owns the curve coefficients, the moving average and
//! the safe reader. The market calls [`EmaMonetaryPolicy::current_rate`]
//! whenever it checkpoints its rate; everything else is read-only.

use alloy_primitives::{I256, U256};
use tracing::info;

use crate::config::PolicyConfig;
use crate::curve::CurveParameters;
use crate::ema::{EmaEngine, EmaState};
use crate::error::Result;
use crate::market::MarketSnapshot;
use crate::reader::SafeRateReader;
use crate::source::RateCalculator;

#[derive(Debug)]
pub struct EmaMonetaryPolicy {
    config: PolicyConfig,
    curve: CurveParameters,
    engine: EmaEngine,
}

impl EmaMonetaryPolicy {
    /// Validates `config`, derives the curve and seeds the moving average
    /// from a first read of `calculator` at `now`.
    ///
    /// # Errors
    ///
    /// - [`crate::PolicyError::InvalidParameters`] if `config` is rejected
    /// - [`crate::PolicyError::SeedUnavailable`] if the first read fails
    pub fn new(
        config: PolicyConfig,
        calculator: Box<dyn RateCalculator>,
        now: u64,
    ) -> Result<Self> {
        let curve = config.curve_parameters()?;
        let engine = EmaEngine::new(SafeRateReader::new(calculator), config.ema_time, now)?;
        info!(
            u_inf = %curve.u_inf,
            a = %curve.a,
            r_minf = %curve.r_minf,
            shift = %curve.shift,
            ma_rate = %engine.value(),
            "monetary policy initialized"
        );
        Ok(Self {
            config,
            curve,
            engine,
        })
    }

    /// Refreshes the moving average and returns the borrow rate for `market`.
    ///
    /// Idempotent within one timestamp.
    pub fn current_rate(&mut self, market: &MarketSnapshot, now: u64) -> U256 {
        let ma_rate = self.engine.current_rate(now);
        self.curve.rate(ma_rate, market.utilization())
    }

    /// Borrow rate [`EmaMonetaryPolicy::current_rate`] would return, without
    /// committing the moving average.
    pub fn rate(&self, market: &MarketSnapshot, now: u64) -> U256 {
        self.curve.rate(self.engine.preview(now), market.utilization())
    }

    /// Borrow rate after `market` gains `d_reserves` assets and `d_debt` debt.
    pub fn future_rate(
        &self,
        market: &MarketSnapshot,
        d_reserves: I256,
        d_debt: I256,
        now: u64,
    ) -> U256 {
        self.rate(&market.with_deltas(d_reserves, d_debt), now)
    }

    /// Committed moving average (WAD-scaled per second)
    pub fn ma_rate(&self) -> U256 {
        self.engine.value()
    }

    pub fn ema_state(&self) -> EmaState {
        self.engine.state()
    }

    /// Last upstream rate that passed validation
    pub fn last_good_rate(&self) -> Option<U256> {
        self.engine.reader().last_good()
    }

    pub fn parameters(&self) -> CurveParameters {
        self.curve
    }

    pub fn config(&self) -> PolicyConfig {
        self.config
    }

    /// Re-points the policy at a new rate calculator.
    ///
    /// The moving average is kept and drifts toward the new source's readings.
    /// Authorization is up to the caller.
    pub fn set_rate_calculator(&mut self, calculator: Box<dyn RateCalculator>) {
        self.engine.replace_calculator(calculator);
        info!(ma_rate = %self.engine.value(), "rate calculator replaced");
    }
}
