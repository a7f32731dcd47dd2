use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::projection::tenure_curve::{
    self, ProjectionInput, DEFAULT_MAX_MONTHS, DEFAULT_MIN_MONTHS, DEFAULT_STEP_MONTHS,
};

use crate::input;

/// Arguments for the duration trade-off curve
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, short)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, short)]
    pub rate: Option<Decimal>,

    /// Shortest duration sampled
    #[arg(long, default_value_t = DEFAULT_MIN_MONTHS)]
    pub min_months: u32,

    /// Longest duration sampled (inclusive)
    #[arg(long, default_value_t = DEFAULT_MAX_MONTHS)]
    pub max_months: u32,

    /// Spacing between samples
    #[arg(long, default_value_t = DEFAULT_STEP_MONTHS)]
    pub step_months: u32,
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let proj_input: ProjectionInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin::<ProjectionInput>()? {
        data
    } else {
        ProjectionInput {
            principal: args.principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate
                .ok_or("--rate is required (or provide --input)")?,
            min_months: args.min_months,
            max_months: args.max_months,
            step_months: args.step_months,
        }
    };

    let result = tenure_curve::tenure_projection(&proj_input)?;
    Ok(serde_json::to_value(result)?)
}
