//! Scenario files for the `simulate` command.
//!
//! A scenario seeds a policy from an upstream APR and then advances time
//! step by step, optionally changing the market utilization and the
//! upstream feed at each step:
//!
//! ```json
//! {
//!   "initial_source_apr": 5.0,
//!   "initial_utilization": 72.0,
//!   "steps": [
//!     { "elapsed": 86400 },
//!     { "elapsed": 86400, "source_apr": 0.0 },
//!     { "elapsed": 3600, "utilization": 90.0, "source_fails": true }
//!   ]
//! }
//! ```
//!
//! APRs and utilizations are percentages.

use std::path::Path;

use alloy_primitives::U256;
use anyhow::{bail, Context, Result};
use ema_rate_policy::math::{apr_to_rate, fraction_to_wad, rate_to_apr};
use ema_rate_policy::{
    CycleRateCalculator, EmaMonetaryPolicy, MarketSnapshot, MemoryFeed, PolicyConfig, WAD,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default scenario start (2023-11-14T22:13:20Z)
const DEFAULT_START: u64 = 1_700_000_000;

/// Market size used to turn utilizations into debt amounts
const MARKET_ASSETS: u64 = 1_000_000;

fn default_start() -> u64 {
    DEFAULT_START
}

fn default_elapsed() -> u64 {
    86_400
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Unix timestamp of the seed read
    #[serde(default = "default_start")]
    pub start: u64,
    /// Upstream APR (%) at the seed read
    pub initial_source_apr: f64,
    /// Market utilization (%) before the first step
    #[serde(default)]
    pub initial_utilization: f64,
    pub steps: Vec<ScenarioStep>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioStep {
    /// Seconds since the previous step
    #[serde(default = "default_elapsed")]
    pub elapsed: u64,
    /// New market utilization (%)
    pub utilization: Option<f64>,
    /// Upstream APR (%) of a reward cycle starting at this step
    pub source_apr: Option<f64>,
    /// `true` makes upstream reads fail from this step on, `false` restores them
    pub source_fails: Option<bool>,
}

/// One row of simulation output
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub timestamp: u64,
    /// Days since the scenario start
    pub day: f64,
    pub utilization: f64,
    /// Upstream APR (%) currently offered by the feed
    pub source_apr: f64,
    pub source_failing: bool,
    /// Smoothed APR (%) after this step
    pub ema_apr: f64,
    /// Borrow APR (%) returned to the market
    pub borrow_apr: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub config: PolicyConfig,
    pub steps: Vec<StepReport>,
}

impl Scenario {
    /// Parses a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid scenario file {}", path.display()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            bail!("Scenario has no steps");
        }
        check_percent("initial_source_apr", self.initial_source_apr)?;
        check_percent("initial_utilization", self.initial_utilization)?;
        self.steps
            .iter()
            .try_fold(self.start, |now, step| now.checked_add(step.elapsed))
            .with_context(|| {
                format!(
                    "Scenario runs past the largest timestamp (start {})",
                    self.start
                )
            })?;
        for (index, step) in self.steps.iter().enumerate() {
            if let Some(utilization) = step.utilization {
                check_percent(&format!("steps[{index}].utilization"), utilization)?;
            }
            if let Some(apr) = step.source_apr {
                check_percent(&format!("steps[{index}].source_apr"), apr)?;
            }
        }
        Ok(())
    }

    /// Runs the scenario against a fresh policy built from `config`.
    pub fn run(&self, config: PolicyConfig) -> Result<SimulationReport> {
        let feed = MemoryFeed::with_rate(percent_to_rate(self.initial_source_apr), self.start);
        let mut policy = EmaMonetaryPolicy::new(
            config,
            Box::new(CycleRateCalculator::new(feed.clone())),
            self.start,
        )?;

        let mut now = self.start;
        let mut utilization = self.initial_utilization;
        let mut source_apr = self.initial_source_apr;
        let mut source_failing = false;
        let mut steps = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            now = now.saturating_add(step.elapsed);

            if let Some(value) = step.utilization {
                utilization = value;
            }
            if let Some(apr) = step.source_apr {
                feed.set_rate(percent_to_rate(apr), now);
                source_apr = apr;
            }
            match step.source_fails {
                Some(true) => {
                    feed.fail_with("scenario source failure");
                    source_failing = true;
                }
                Some(false) => {
                    feed.recover();
                    source_failing = false;
                }
                None => {}
            }

            let borrow_rate = policy.current_rate(&market_at(utilization), now);
            debug!(step = index, now, borrow_rate = %borrow_rate, "scenario step");

            steps.push(StepReport {
                step: index + 1,
                timestamp: now,
                day: (now - self.start) as f64 / 86_400.0,
                utilization,
                source_apr,
                source_failing,
                ema_apr: rate_to_apr(policy.ma_rate()) * 100.0,
                borrow_apr: rate_to_apr(borrow_rate) * 100.0,
            });
        }

        Ok(SimulationReport { config, steps })
    }
}

fn check_percent(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        bail!("{field} must be a non-negative percentage, got {value}");
    }
    Ok(())
}

fn percent_to_rate(apr: f64) -> U256 {
    apr_to_rate(apr / 100.0)
}

fn market_at(utilization: f64) -> MarketSnapshot {
    let assets = U256::from(MARKET_ASSETS) * WAD;
    let debt = fraction_to_wad(utilization / 100.0) * U256::from(MARKET_ASSETS);
    MarketSnapshot::new(debt, assets)
}
