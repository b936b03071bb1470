//! Curve command implementation.

use anyhow::{bail, Result};
use ema_rate_policy::math::{apr_to_rate, fraction_to_wad, max, rate_to_apr, rate_to_f64};
use ema_rate_policy::{CurveParameters, MIN_EMA_RATE};
use serde::Serialize;

use crate::cli::{CurveArgs, OutputFormat};
use crate::output::format_curve_table;

/// Most points a single sweep may produce
const MAX_POINTS: usize = 10_000;

/// Borrow rate at one utilization of the sweep
#[derive(Debug, Clone, Serialize)]
pub struct CurvePoint {
    /// Utilization (%)
    pub utilization: f64,
    /// Borrow rate / smoothed rate
    pub multiplier: f64,
    /// Borrow APR (%)
    pub borrow_apr: f64,
}

/// Evaluates the curve at `from, from + step, ...` up to and including `to`.
pub fn sweep(
    parameters: &CurveParameters,
    ema_apr: f64,
    from: f64,
    to: f64,
    step: f64,
) -> Result<Vec<CurvePoint>> {
    if !(step.is_finite() && step > 0.0) {
        bail!("--step must be positive, got {step}");
    }
    if !(from.is_finite() && to.is_finite()) || from < 0.0 || from > to {
        bail!("Invalid utilization range {from}..{to}");
    }

    let ema_rate = max(apr_to_rate(ema_apr / 100.0), MIN_EMA_RATE);
    let ema = rate_to_f64(ema_rate);
    let intervals = ((to - from) / step + 1e-9).floor();
    let count = Some(intervals)
        .filter(|intervals| *intervals < MAX_POINTS as f64)
        .and_then(|intervals| (intervals as usize).checked_add(1));
    let Some(count) = count else {
        bail!("--step {step} is too small for {from}..{to} (at most {MAX_POINTS} points)");
    };

    Ok((0..count)
        .map(|i| {
            let utilization = from + step * i as f64;
            let rate = parameters.rate(ema_rate, fraction_to_wad(utilization / 100.0));
            CurvePoint {
                utilization,
                multiplier: rate_to_f64(rate) / ema,
                borrow_apr: rate_to_apr(rate) * 100.0,
            }
        })
        .collect())
}

pub fn run_curve(args: &CurveArgs, format: OutputFormat) -> Result<()> {
    let parameters = args.policy.to_config().curve_parameters()?;
    let points = sweep(&parameters, args.ema_apr, args.from, args.to, args.step)?;

    match format {
        OutputFormat::Table => {
            println!("{}", format_curve_table(&points));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&points)?;
            println!("{}", json);
        }
    }

    Ok(())
}
