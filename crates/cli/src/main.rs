//! ema-rate CLI - Inspect and simulate an EMA-smoothed borrow rate policy.

mod cli;
mod commands;
mod output;
mod scenario;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{run_curve, run_params, run_simulate};

/// Logs go to stderr so that table and JSON output on stdout stay clean.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Params(args) => {
            run_params(&args, cli.format)?;
        }
        Commands::Curve(args) => {
            run_curve(&args, cli.format)?;
        }
        Commands::Simulate(args) => {
            run_simulate(&args, cli.format)?;
        }
    }

    Ok(())
}
