//! Simulate command implementation.

use anyhow::Result;

use crate::cli::{OutputFormat, SimulateArgs};
use crate::output::format_simulation_table;
use crate::scenario::Scenario;

pub fn run_simulate(args: &SimulateArgs, format: OutputFormat) -> Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    let report = scenario.run(args.policy.to_config())?;

    match format {
        OutputFormat::Table => {
            println!("{}", format_simulation_table(&report.steps));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)?;
            println!("{}", json);
        }
    }

    Ok(())
}
