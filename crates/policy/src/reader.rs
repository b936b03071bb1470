//! Fault-isolating reader over a [`RateCalculator`].
//!
//! A failed or implausible read is replaced by the last value that passed,
//! so a misbehaving upstream can never stall rate updates. The only read that
//! can fail is the very first one, when nothing is cached yet.

use std::fmt;

use alloy_primitives::U256;
use tracing::warn;

use crate::error::SourceError;
use crate::source::RateCalculator;

/// Largest raw rate accepted from upstream: 1000% APR per second (WAD-scaled)
pub const MAX_RAW_RATE: U256 = U256::from_limbs([317_097_919_837, 0, 0, 0]);

/// Outcome of a [`SafeRateReader::read`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateRead {
    /// Upstream answered with a plausible rate, now cached
    Fresh(U256),
    /// Upstream failed; the cached rate is returned instead
    Cached { rate: U256, cause: SourceError },
}

impl RateRead {
    /// The rate to use, whichever way it was obtained
    pub fn rate(&self) -> U256 {
        match self {
            Self::Fresh(rate) | Self::Cached { rate, .. } => *rate,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }
}

pub struct SafeRateReader {
    calculator: Box<dyn RateCalculator>,
    last_good: Option<U256>,
}

impl fmt::Debug for SafeRateReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SafeRateReader")
            .field("last_good", &self.last_good)
            .finish_non_exhaustive()
    }
}

impl SafeRateReader {
    /// Creates a reader with an empty cache.
    pub fn new(calculator: Box<dyn RateCalculator>) -> Self {
        Self {
            calculator,
            last_good: None,
        }
    }

    /// Last rate that passed validation, if any
    pub fn last_good(&self) -> Option<U256> {
        self.last_good
    }

    /// Reads upstream once and validates the answer, without touching the cache.
    pub fn try_read(&self) -> Result<U256, SourceError> {
        let rate = self.calculator.rate()?;
        if rate > MAX_RAW_RATE {
            return Err(SourceError::ImplausibleRate {
                rate,
                max: MAX_RAW_RATE,
            });
        }
        Ok(rate)
    }

    /// Reads upstream, falling back to the cached rate on failure.
    ///
    /// Errors only when upstream fails and nothing has been cached yet.
    pub fn read(&mut self) -> Result<RateRead, SourceError> {
        match self.try_read() {
            Ok(rate) => {
                self.last_good = Some(rate);
                Ok(RateRead::Fresh(rate))
            }
            Err(cause) => match self.last_good {
                Some(rate) => {
                    warn!(%cause, %rate, "rate source read failed, using last known good rate");
                    Ok(RateRead::Cached { rate, cause })
                }
                None => Err(cause),
            },
        }
    }

    /// Points the reader at a different calculator, returning the old one.
    ///
    /// The cache is kept so a failing replacement still falls back to the
    /// previous source's last good rate.
    pub fn replace_calculator(
        &mut self,
        calculator: Box<dyn RateCalculator>,
    ) -> Box<dyn RateCalculator> {
        std::mem::replace(&mut self.calculator, calculator)
    }
}
