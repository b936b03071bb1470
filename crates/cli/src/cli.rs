//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ema_rate_policy::math::{apr_to_rate, fraction_to_wad};
use ema_rate_policy::{PolicyConfig, DEFAULT_EMA_TIME};

/// ema-rate CLI - Inspect and simulate an EMA-smoothed borrow rate policy
#[derive(Parser, Debug)]
#[command(name = "ema-rate")]
#[command(about = "CLI tool for inspecting and simulating EMA borrow rate policies", long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the configuration and the derived curve coefficients
    Params(ParamsArgs),
    /// Sweep utilization for a fixed smoothed rate
    Curve(CurveArgs),
    /// Replay a step-by-step scenario file
    Simulate(SimulateArgs),
}

/// Policy construction parameters shared by every command
#[derive(Args, Debug, Clone)]
pub struct PolicyArgs {
    /// Utilization (%) at which the borrow rate equals the smoothed rate
    #[arg(long, env = "EMA_RATE_TARGET_U", default_value = "85")]
    pub target_utilization: f64,

    /// Borrow rate / smoothed rate at 0% utilization
    #[arg(long, env = "EMA_RATE_LOW_RATIO", default_value = "0.2")]
    pub low_ratio: f64,

    /// Borrow rate / smoothed rate at 100% utilization
    #[arg(long, env = "EMA_RATE_HIGH_RATIO", default_value = "7.2")]
    pub high_ratio: f64,

    /// APR (%) added on top of every computed rate
    #[arg(long, env = "EMA_RATE_SHIFT", default_value = "0")]
    pub rate_shift: f64,

    /// Smoothing constant of the moving average, in seconds
    #[arg(long, env = "EMA_RATE_EMA_TIME", default_value_t = DEFAULT_EMA_TIME)]
    pub ema_time: u64,
}

impl PolicyArgs {
    pub fn to_config(&self) -> PolicyConfig {
        PolicyConfig::new()
            .with_target_utilization(fraction_to_wad(self.target_utilization / 100.0))
            .with_low_ratio(fraction_to_wad(self.low_ratio))
            .with_high_ratio(fraction_to_wad(self.high_ratio))
            .with_rate_shift(apr_to_rate(self.rate_shift / 100.0))
            .with_ema_time(self.ema_time)
    }
}

#[derive(Parser, Debug)]
pub struct ParamsArgs {
    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(Parser, Debug)]
pub struct CurveArgs {
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Smoothed upstream APR (%); values below the 1% floor are raised to it
    #[arg(long, default_value = "1")]
    pub ema_apr: f64,

    /// First utilization (%) of the sweep
    #[arg(long, default_value = "0")]
    pub from: f64,

    /// Last utilization (%) of the sweep
    #[arg(long, default_value = "100")]
    pub to: f64,

    /// Utilization increment (%)
    #[arg(long, default_value = "5")]
    pub step: f64,
}

#[derive(Parser, Debug)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub policy: PolicyArgs,

    /// Path to a JSON scenario file
    #[arg(long)]
    pub scenario: PathBuf,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
