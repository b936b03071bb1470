//! EMA-smoothed, utilization-sensitive borrow rate policy
//!
//! This crate computes the borrow rate of a lending market from two inputs:
//! the yield of an upstream source (for example a staking vault) and the
//! market's own utilization.
//!
//! # Overview
//!
//! - [`SafeRateReader`] reads the upstream rate and masks failures with the
//!   last known good value
//! - [`EmaEngine`] keeps a time-weighted moving average of that rate, floored
//!   at 1% APR
//! - [`CurveParameters`] maps the average and the utilization to a borrow rate
//! - [`EmaMonetaryPolicy`] ties them together behind the interface a market
//!   calls; [`SharedPolicy`] is the same thing behind locks
//!
//! # Example
//!
//! ```rust,ignore
//! use ema_rate_policy::{
//!     CycleRateCalculator, EmaMonetaryPolicy, MarketSnapshot, MemoryFeed, PolicyConfig,
//!     math::{apr_to_rate, rate_to_apr, WAD},
//! };
//! use alloy_primitives::U256;
//!
//! let feed = MemoryFeed::with_rate(apr_to_rate(0.05), now);
//! let mut policy = EmaMonetaryPolicy::new(
//!     PolicyConfig::new(),
//!     Box::new(CycleRateCalculator::new(feed.clone())),
//!     now,
//! )?;
//!
//! let market = MarketSnapshot::new(U256::from(720_000) * WAD, U256::from(1_000_000) * WAD);
//! let rate = policy.current_rate(&market, now + 3_600);
//! println!("Borrow APR: {:.2}%", rate_to_apr(rate) * 100.0);
//! ```

pub mod config;
pub mod curve;
pub mod ema;
pub mod error;
pub mod market;
pub mod math;
pub mod policy;
pub mod reader;
pub mod shared;
pub mod source;

// Re-export commonly used types
pub use error::{PolicyError, Result, SourceError};

pub use config::{
    PolicyConfig, DEFAULT_HIGH_RATIO, DEFAULT_LOW_RATIO, DEFAULT_TARGET_UTILIZATION,
    MAX_HIGH_RATIO, MAX_RATE_SHIFT, MAX_TARGET_UTILIZATION, MIN_LOW_RATIO,
    MIN_TARGET_UTILIZATION,
};
pub use curve::CurveParameters;
pub use ema::{EmaEngine, EmaState, DEFAULT_EMA_TIME, MIN_EMA_RATE};
pub use market::{get_utilization, MarketSnapshot};
pub use math::{SECONDS_PER_YEAR, WAD};
pub use policy::EmaMonetaryPolicy;
pub use reader::{RateRead, SafeRateReader, MAX_RAW_RATE};
pub use shared::SharedPolicy;
pub use source::{
    raw_rate, CycleRateCalculator, DistributionSnapshot, MemoryFeed, RateCalculator, RewardsFeed,
    REWARDS_CYCLE_LENGTH,
};
