//! Detailed output formatting for policy parameters.

use alloy_primitives::I256;
use colored::Colorize;
use ema_rate_policy::math::rate_to_f64;

use crate::commands::params::ParamsReport;

/// Signed WAD value as a float
pub fn signed_to_f64(value: I256) -> f64 {
    let magnitude = rate_to_f64(value.unsigned_abs());
    if value.is_negative() {
        -magnitude
    } else {
        magnitude
    }
}

fn format_pct(value: f64) -> String {
    format!("{:.2}%", value)
}

fn format_duration(seconds: u64) -> String {
    format!("{} seconds ({:.2} days)", seconds, seconds as f64 / 86_400.0)
}

pub fn format_params_detail(report: &ParamsReport) -> String {
    let mut output = String::new();

    // Header
    output.push_str(&format!("{}\n", "=".repeat(60)));
    output.push_str(&format!("{}\n", "EMA Rate Policy".bold()));
    output.push_str(&format!("{}\n\n", "=".repeat(60)));

    // Inputs
    output.push_str(&format!("{}\n", "Configuration".cyan().bold()));
    output.push_str(&format!(
        "  Target Utilization: {}\n",
        format_pct(report.target_utilization)
    ));
    output.push_str(&format!("  Low Ratio:          {:.4}\n", report.low_ratio));
    output.push_str(&format!("  High Ratio:         {:.4}\n", report.high_ratio));
    output.push_str(&format!(
        "  Rate Shift:         {} APR\n",
        format_pct(report.rate_shift_apr)
    ));
    output.push_str(&format!(
        "  EMA Time:           {}\n\n",
        format_duration(report.ema_time)
    ));

    // Derived
    output.push_str(&format!("{}\n", "Curve Parameters".cyan().bold()));
    output.push_str(&format!("  Pole (u_inf):       {}\n", format_pct(report.u_inf)));
    output.push_str(&format!("  A:                  {:.6}\n", report.a));
    output.push_str(&format!("  r_minf:             {:.6}\n", report.r_minf));
    output.push_str(&format!("  Raw u_inf:          {}\n", report.parameters.u_inf));
    output.push_str(&format!("  Raw A:              {}\n", report.parameters.a));
    output.push_str(&format!("  Raw r_minf:         {}\n", report.parameters.r_minf));
    output.push_str(&format!("  Raw shift:          {}\n", report.parameters.shift));

    output
}
