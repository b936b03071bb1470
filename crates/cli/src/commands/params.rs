//! Params command implementation.

use anyhow::Result;
use ema_rate_policy::math::{rate_to_apr, rate_to_f64};
use ema_rate_policy::{CurveParameters, PolicyConfig};
use serde::Serialize;

use crate::cli::{OutputFormat, ParamsArgs};
use crate::output::{format_params_detail, signed_to_f64};

/// Human-readable view of a configuration and its derived curve
#[derive(Debug, Serialize)]
pub struct ParamsReport {
    pub target_utilization: f64,
    pub low_ratio: f64,
    pub high_ratio: f64,
    pub rate_shift_apr: f64,
    pub ema_time: u64,
    pub u_inf: f64,
    pub a: f64,
    pub r_minf: f64,
    pub config: PolicyConfig,
    pub parameters: CurveParameters,
}

impl ParamsReport {
    pub fn new(config: PolicyConfig, parameters: CurveParameters) -> Self {
        Self {
            target_utilization: rate_to_f64(config.target_utilization) * 100.0,
            low_ratio: rate_to_f64(config.low_ratio),
            high_ratio: rate_to_f64(config.high_ratio),
            rate_shift_apr: rate_to_apr(config.rate_shift) * 100.0,
            ema_time: config.ema_time,
            u_inf: rate_to_f64(parameters.u_inf) * 100.0,
            a: rate_to_f64(parameters.a),
            r_minf: signed_to_f64(parameters.r_minf),
            config,
            parameters,
        }
    }
}

pub fn run_params(args: &ParamsArgs, format: OutputFormat) -> Result<()> {
    let config = args.policy.to_config();
    let parameters = config.curve_parameters()?;
    let report = ParamsReport::new(config, parameters);

    match format {
        OutputFormat::Table => {
            println!("{}", format_params_detail(&report));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
    }

    Ok(())
}
