//! Time-weighted exponential moving average of the upstream rate.
//!
//! The average is refreshed lazily: nothing happens between calls, and each
//! call that observes new elapsed time blends the latest raw rate in with a
//! weight that grows with the time since the previous update.
//!
//! ```text
//! alpha     = exp(-elapsed / ema_time)
//! new_value = raw * (1 - alpha) + value * alpha
//! value     = max(new_value, MIN_EMA_RATE)
//! ```
//!
//! `alpha` is 1 for zero elapsed time (no change) and tends to 0 as elapsed
//! time grows (the raw rate takes over), so the blend is always convex.

use alloy_primitives::U256;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{PolicyError, Result};
use crate::math::{max, w_exp, WAD};
use crate::reader::SafeRateReader;
use crate::source::RateCalculator;

/// Floor of the moving average: 1% APR per second (WAD-scaled)
pub const MIN_EMA_RATE: U256 = U256::from_limbs([317_097_920, 0, 0, 0]);

/// Default smoothing constant in seconds (~2.3 days)
pub const DEFAULT_EMA_TIME: u64 = 200_000;

/// Weight kept by the previous average after `elapsed` seconds (WAD-scaled).
///
/// A zero `ema_time` disables smoothing: the raw rate replaces the average.
pub fn decay_factor(elapsed: u64, ema_time: u64) -> U256 {
    if elapsed == 0 {
        return WAD;
    }
    if ema_time == 0 {
        return U256::ZERO;
    }
    let x = U256::from(elapsed) * WAD / U256::from(ema_time);
    w_exp(-x.saturating_to::<i128>())
}

/// Convex combination `raw * (1 - alpha) + value * alpha`, all WAD-scaled.
pub fn blend(value: U256, raw: U256, alpha: U256) -> U256 {
    let alpha = alpha.min(WAD);
    (raw * (WAD - alpha) + value * alpha) / WAD
}

/// The persistent part of the moving average
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmaState {
    /// Smoothed per-second rate (WAD-scaled), never below [`MIN_EMA_RATE`]
    pub value: U256,
    /// Timestamp of the last recomputation
    pub last_update: u64,
}

impl EmaState {
    /// Initial state from the first raw reading
    pub fn seed(raw: U256, now: u64) -> Self {
        Self {
            value: max(raw, MIN_EMA_RATE),
            last_update: now,
        }
    }

    /// Seconds since the last update; zero if `now` is in the past
    pub fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.last_update)
    }

    /// State after observing `raw` at `now`.
    ///
    /// Returns `self` unchanged when no time has elapsed.
    pub fn next(&self, raw: U256, now: u64, ema_time: u64) -> Self {
        let elapsed = self.elapsed(now);
        if elapsed == 0 {
            return *self;
        }
        let blended = blend(self.value, raw, decay_factor(elapsed, ema_time));
        Self {
            value: max(blended, MIN_EMA_RATE),
            last_update: now,
        }
    }

    /// Whether a refresh at `now` would observe new elapsed time.
    ///
    /// A timestamp before the last update is logged and treated as no elapsed
    /// time.
    pub fn is_stale(&self, now: u64) -> bool {
        if now < self.last_update {
            warn!(
                now,
                last_update = self.last_update,
                "timestamp before last update, keeping moving average"
            );
            return false;
        }
        now > self.last_update
    }

    /// State after refreshing at `now`.
    ///
    /// `read` is only called when time has elapsed. A `None` from it blends
    /// the current value into itself, which keeps the value and moves
    /// `last_update` forward.
    pub fn refresh(&self, now: u64, ema_time: u64, read: impl FnOnce() -> Option<U256>) -> Self {
        if !self.is_stale(now) {
            return *self;
        }
        let raw = read().unwrap_or(self.value);
        let next = self.next(raw, now, ema_time);
        debug!(value = %next.value, raw = %raw, now, "updated moving average");
        next
    }
}

/// Moving average fed through a [`SafeRateReader`]
#[derive(Debug)]
pub struct EmaEngine {
    state: EmaState,
    ema_time: u64,
    reader: SafeRateReader,
}

impl EmaEngine {
    /// Seeds the average from a first read of `reader`.
    ///
    /// # Errors
    ///
    /// - [`PolicyError::SeedUnavailable`] if that first read fails
    pub fn new(mut reader: SafeRateReader, ema_time: u64, now: u64) -> Result<Self> {
        let raw = reader.read().map_err(PolicyError::SeedUnavailable)?.rate();
        let state = EmaState::seed(raw, now);
        debug!(value = %state.value, raw = %raw, now, "seeded moving average");
        Ok(Self {
            state,
            ema_time,
            reader,
        })
    }

    pub fn state(&self) -> EmaState {
        self.state
    }

    pub fn value(&self) -> U256 {
        self.state.value
    }

    pub fn ema_time(&self) -> u64 {
        self.ema_time
    }

    pub fn reader(&self) -> &SafeRateReader {
        &self.reader
    }

    /// Refreshes the average at `now` and returns it.
    ///
    /// Repeated calls at the same timestamp neither read upstream nor mutate
    /// state.
    pub fn current_rate(&mut self, now: u64) -> U256 {
        // The reader only errors before its first success, which seeding guarantees.
        let reader = &mut self.reader;
        let read = || reader.read().ok().map(|read| read.rate());
        self.state = self.state.refresh(now, self.ema_time, read);
        self.state.value
    }

    /// What [`EmaEngine::current_rate`] would return at `now`, without
    /// committing anything.
    pub fn preview(&self, now: u64) -> U256 {
        if self.state.elapsed(now) == 0 {
            return self.state.value;
        }
        let raw = self
            .reader
            .try_read()
            .ok()
            .or_else(|| self.reader.last_good())
            .unwrap_or(self.state.value);
        self.state.next(raw, now, self.ema_time).value
    }

    /// Re-points the upstream source; the average carries on from its
    /// current value.
    pub fn replace_calculator(
        &mut self,
        calculator: Box<dyn RateCalculator>,
    ) -> Box<dyn RateCalculator> {
        self.reader.replace_calculator(calculator)
    }
}
