//! Upstream yield sources.
//!
//! A yield-bearing vault distributes rewards in cycles: `reward_cycle_amount`
//! is streamed to depositors between `last_sync` and `cycle_end`, capped by a
//! per-second-per-asset maximum. [`CycleRateCalculator`] turns one such
//! snapshot into a per-second WAD rate.
//!
//! ```text
//! rate = min(reward / (cycle_end - last_sync) * WAD / stored_total_assets,
//!            max_distribution_per_second_per_asset)
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use alloy_primitives::U256;
use serde::Serialize;

use crate::error::SourceError;
use crate::math::{min, mul_div_down, WAD};

/// Length of a reward cycle started by [`MemoryFeed::set_rate`] (one week)
pub const REWARDS_CYCLE_LENGTH: u64 = 7 * 86_400;

/// Reward distribution state exposed by the yield-bearing vault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DistributionSnapshot {
    /// End of the current reward cycle (unix seconds)
    pub cycle_end: u64,
    /// Last time rewards were synced (unix seconds)
    pub last_sync: u64,
    /// Rewards distributed over the current cycle
    pub reward_cycle_amount: U256,
    /// Assets held by the vault as of the last sync
    pub stored_total_assets: U256,
    /// Upper bound on the distribution rate (WAD-scaled per second)
    pub max_distribution_per_second_per_asset: U256,
}

/// A vault exposing its reward cycle.
pub trait RewardsFeed: Send + Sync {
    /// Reads the current distribution state.
    fn snapshot(&self) -> Result<DistributionSnapshot, SourceError>;
}

/// Anything that can produce a raw per-second rate (WAD-scaled).
///
/// The policy reads through one of these and can be re-pointed to another
/// implementation at runtime.
pub trait RateCalculator: Send + Sync {
    fn rate(&self) -> Result<U256, SourceError>;
}

/// Derives the raw per-second rate from a reward cycle.
///
/// Returns zero when no cycle is active. An empty vault is treated as holding
/// one wei so the division stays defined.
pub fn raw_rate(snapshot: &DistributionSnapshot) -> U256 {
    if snapshot.cycle_end <= snapshot.last_sync {
        return U256::ZERO;
    }

    let assets = if snapshot.stored_total_assets.is_zero() {
        U256::from(1)
    } else {
        snapshot.stored_total_assets
    };

    let duration = U256::from(snapshot.cycle_end - snapshot.last_sync);
    let rewards_per_second = snapshot.reward_cycle_amount / duration;
    let rate = mul_div_down(rewards_per_second, WAD, assets);

    min(rate, snapshot.max_distribution_per_second_per_asset)
}

/// [`RateCalculator`] over a [`RewardsFeed`]
#[derive(Debug, Clone)]
pub struct CycleRateCalculator<F> {
    feed: F,
}

impl<F: RewardsFeed> CycleRateCalculator<F> {
    pub fn new(feed: F) -> Self {
        Self { feed }
    }

    /// The feed this calculator reads from
    pub fn feed(&self) -> &F {
        &self.feed
    }
}

impl<F: RewardsFeed> RateCalculator for CycleRateCalculator<F> {
    fn rate(&self) -> Result<U256, SourceError> {
        let snapshot = self.feed.snapshot()?;
        Ok(raw_rate(&snapshot))
    }
}

#[derive(Debug, Default)]
struct MemoryFeedState {
    snapshot: DistributionSnapshot,
    failure: Option<String>,
}

/// In-process [`RewardsFeed`] whose state can be changed from outside.
///
/// Clones share state, so a test or simulator can keep a handle while the
/// policy owns the calculator built on top of it.
#[derive(Debug, Clone, Default)]
pub struct MemoryFeed {
    state: Arc<RwLock<MemoryFeedState>>,
}

impl MemoryFeed {
    pub fn new(snapshot: DistributionSnapshot) -> Self {
        Self {
            state: Arc::new(RwLock::new(MemoryFeedState {
                snapshot,
                failure: None,
            })),
        }
    }

    /// Feed with a single active cycle paying `rate` per second per asset,
    /// uncapped.
    pub fn with_rate(rate: U256, now: u64) -> Self {
        let feed = Self::new(DistributionSnapshot {
            stored_total_assets: U256::from(1_000_000u64) * WAD,
            max_distribution_per_second_per_asset: U256::MAX,
            ..Default::default()
        });
        feed.set_rate(rate, now);
        feed
    }

    /// Starts a new cycle at `now` sized so that it pays `rate` per second
    /// per stored asset.
    ///
    /// The cycle is cut short at `u64::MAX` rather than wrapping.
    pub fn set_rate(&self, rate: U256, now: u64) {
        self.update(|state| {
            let snapshot = &mut state.snapshot;
            snapshot.last_sync = now;
            snapshot.cycle_end = now.saturating_add(REWARDS_CYCLE_LENGTH);
            let duration = U256::from(snapshot.cycle_end - now);
            snapshot.reward_cycle_amount =
                mul_div_down(rate, snapshot.stored_total_assets, WAD) * duration;
        });
    }

    fn update(&self, f: impl FnOnce(&mut MemoryFeedState)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }

    /// Replaces the whole snapshot
    pub fn set_snapshot(&self, snapshot: DistributionSnapshot) {
        self.update(|state| state.snapshot = snapshot);
    }

    /// Starts a new reward cycle
    pub fn sync_rewards(&self, last_sync: u64, cycle_end: u64, reward_cycle_amount: U256) {
        self.update(|state| {
            state.snapshot.last_sync = last_sync;
            state.snapshot.cycle_end = cycle_end;
            state.snapshot.reward_cycle_amount = reward_cycle_amount;
        });
    }

    pub fn set_stored_total_assets(&self, assets: U256) {
        self.update(|state| state.snapshot.stored_total_assets = assets);
    }

    pub fn set_max_distribution_per_second_per_asset(&self, max: U256) {
        self.update(|state| state.snapshot.max_distribution_per_second_per_asset = max);
    }

    /// Makes every following read fail with `reason`
    pub fn fail_with(&self, reason: impl Into<String>) {
        let reason = reason.into();
        self.update(|state| state.failure = Some(reason));
    }

    /// Clears a failure set by [`MemoryFeed::fail_with`]
    pub fn recover(&self) {
        self.update(|state| state.failure = None);
    }
}

impl RewardsFeed for MemoryFeed {
    fn snapshot(&self) -> Result<DistributionSnapshot, SourceError> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        match &state.failure {
            Some(reason) => Err(SourceError::Unavailable(reason.clone())),
            None => Ok(state.snapshot),
        }
    }
}
