//! Table formatting for curve sweeps and simulations.

use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::commands::curve::CurvePoint;
use crate::scenario::StepReport;

#[derive(Tabled)]
struct CurveRow {
    #[tabled(rename = "Utilization")]
    utilization: String,
    #[tabled(rename = "Multiplier")]
    multiplier: String,
    #[tabled(rename = "Borrow APR")]
    borrow_apr: String,
}

#[derive(Tabled)]
struct StepRow {
    #[tabled(rename = "Step")]
    step: usize,
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "Utilization")]
    utilization: String,
    #[tabled(rename = "Source APR")]
    source_apr: String,
    #[tabled(rename = "EMA APR")]
    ema_apr: String,
    #[tabled(rename = "Borrow APR")]
    borrow_apr: String,
}

fn format_pct(value: f64) -> String {
    format!("{:.2}%", value)
}

/// More decimals for rates, which sit close to the 1% floor
fn format_apr(value: f64) -> String {
    format!("{:.4}%", value)
}

pub fn format_curve_table(points: &[CurvePoint]) -> String {
    if points.is_empty() {
        return "No points.".to_string();
    }

    let rows: Vec<CurveRow> = points
        .iter()
        .map(|p| CurveRow {
            utilization: format_pct(p.utilization),
            multiplier: format!("{:.4}x", p.multiplier),
            borrow_apr: format_apr(p.borrow_apr),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()));

    table.to_string()
}

pub fn format_simulation_table(steps: &[StepReport]) -> String {
    if steps.is_empty() {
        return "No steps.".to_string();
    }

    let rows: Vec<StepRow> = steps
        .iter()
        .map(|s| StepRow {
            step: s.step,
            day: format!("{:.2}", s.day),
            utilization: format_pct(s.utilization),
            source_apr: if s.source_failing {
                "failing".to_string()
            } else {
                format_apr(s.source_apr)
            },
            ema_apr: format_apr(s.ema_apr),
            borrow_apr: format_apr(s.borrow_apr),
        })
        .collect();

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()));

    table.to_string()
}
