//! Thread-safe policy handle.
//!
//! [`SharedPolicy`] splits its state over two locks so an upstream read never
//! happens while the moving average is locked:
//!
//! ```text
//! 1. lock ema    -> return early if no time elapsed
//! 2. lock reader -> read upstream (or the cached rate)
//! 3. lock ema    -> commit, unless another caller already advanced it
//! ```
//!
//! Two callers racing at the same timestamp both end up returning the value
//! committed by the first one, so the update stays idempotent per timestamp.

use std::sync::{Mutex, MutexGuard, PoisonError};

use alloy_primitives::{I256, U256};
use tracing::info;

use crate::config::PolicyConfig;
use crate::curve::CurveParameters;
use crate::ema::EmaState;
use crate::error::{PolicyError, Result};
use crate::market::MarketSnapshot;
use crate::reader::SafeRateReader;
use crate::source::RateCalculator;

#[derive(Debug)]
pub struct SharedPolicy {
    config: PolicyConfig,
    curve: CurveParameters,
    ema: Mutex<EmaState>,
    reader: Mutex<SafeRateReader>,
}

fn lock<'a, T>(mutex: &'a Mutex<T>, name: &'static str) -> Result<MutexGuard<'a, T>> {
    mutex
        .lock()
        .map_err(|_: PoisonError<_>| PolicyError::LockPoisoned(name))
}

impl SharedPolicy {
    /// Same contract as [`crate::EmaMonetaryPolicy::new`].
    ///
    /// # Errors
    ///
    /// - [`PolicyError::InvalidParameters`] if `config` is rejected
    /// - [`PolicyError::SeedUnavailable`] if the first read fails
    pub fn new(
        config: PolicyConfig,
        calculator: Box<dyn RateCalculator>,
        now: u64,
    ) -> Result<Self> {
        let curve = config.curve_parameters()?;
        let mut reader = SafeRateReader::new(calculator);
        let raw = reader.read().map_err(PolicyError::SeedUnavailable)?.rate();
        let ema = EmaState::seed(raw, now);
        info!(ma_rate = %ema.value, "shared monetary policy initialized");
        Ok(Self {
            config,
            curve,
            ema: Mutex::new(ema),
            reader: Mutex::new(reader),
        })
    }

    /// Refreshes the moving average and returns the borrow rate for `market`.
    ///
    /// # Errors
    ///
    /// - [`PolicyError::LockPoisoned`] if another thread panicked while
    ///   holding one of the locks
    pub fn current_rate(&self, market: &MarketSnapshot, now: u64) -> Result<U256> {
        let ma_rate = self.refresh(now)?;
        Ok(self.curve.rate(ma_rate, market.utilization()))
    }

    fn refresh(&self, now: u64) -> Result<U256> {
        {
            let ema = lock(&self.ema, "ema")?;
            if !ema.is_stale(now) {
                return Ok(ema.value);
            }
        }

        let raw = {
            let mut reader = lock(&self.reader, "reader")?;
            reader.read().ok().map(|read| read.rate())
        };

        // Another caller may have committed this timestamp meanwhile, in which
        // case the refresh is a no-op.
        let mut ema = lock(&self.ema, "ema")?;
        *ema = ema.refresh(now, self.config.ema_time, || raw);
        Ok(ema.value)
    }

    /// Borrow rate at `now` without committing the moving average.
    ///
    /// # Errors
    ///
    /// - [`PolicyError::LockPoisoned`] as for [`SharedPolicy::current_rate`]
    pub fn rate(&self, market: &MarketSnapshot, now: u64) -> Result<U256> {
        let ema = *lock(&self.ema, "ema")?;
        if ema.elapsed(now) == 0 {
            return Ok(self.curve.rate(ema.value, market.utilization()));
        }
        let raw = {
            let reader = lock(&self.reader, "reader")?;
            reader.try_read().ok().or_else(|| reader.last_good())
        };
        let ma_rate = ema
            .next(raw.unwrap_or(ema.value), now, self.config.ema_time)
            .value;
        Ok(self.curve.rate(ma_rate, market.utilization()))
    }

    /// # Errors
    ///
    /// - [`PolicyError::LockPoisoned`] as for [`SharedPolicy::current_rate`]
    pub fn future_rate(
        &self,
        market: &MarketSnapshot,
        d_reserves: I256,
        d_debt: I256,
        now: u64,
    ) -> Result<U256> {
        self.rate(&market.with_deltas(d_reserves, d_debt), now)
    }

    /// # Errors
    ///
    /// - [`PolicyError::LockPoisoned`] if the moving average lock is poisoned
    pub fn ema_state(&self) -> Result<EmaState> {
        Ok(*lock(&self.ema, "ema")?)
    }

    pub fn parameters(&self) -> CurveParameters {
        self.curve
    }

    pub fn config(&self) -> PolicyConfig {
        self.config
    }

    /// # Errors
    ///
    /// - [`PolicyError::LockPoisoned`] if the reader lock is poisoned
    pub fn set_rate_calculator(&self, calculator: Box<dyn RateCalculator>) -> Result<()> {
        lock(&self.reader, "reader")?.replace_calculator(calculator);
        info!("rate calculator replaced");
        Ok(())
    }
}
