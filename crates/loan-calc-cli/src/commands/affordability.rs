use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::affordability::budget;
use loan_calc_core::affordability::solvers::{self, MaxLoanInput, MinDurationInput};
use loan_calc_core::LoanParameters;

use crate::input;

/// Arguments for borrowing power
#[derive(Args)]
pub struct MaxLoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly budget available for the installment
    #[arg(long, short)]
    pub budget: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, short)]
    pub rate: Option<Decimal>,

    /// Duration in months
    #[arg(long, short = 'n')]
    pub months: Option<u32>,
}

/// Arguments for the budget-fitting duration search
#[derive(Args)]
pub struct MinDurationArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, short)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, short)]
    pub rate: Option<Decimal>,

    /// Monthly budget available for the installment
    #[arg(long, short)]
    pub budget: Option<Decimal>,
}

/// Arguments for the budget check
#[derive(Args)]
pub struct BudgetArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, short)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, short)]
    pub rate: Option<Decimal>,

    /// Duration in months
    #[arg(long, short = 'n')]
    pub months: Option<u32>,

    /// Monthly budget available for the installment
    #[arg(long, short)]
    pub budget: Option<Decimal>,
}

pub fn run_max_loan(args: MaxLoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ml_input: MaxLoanInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin::<MaxLoanInput>()? {
        data
    } else {
        MaxLoanInput {
            monthly_budget: args.budget
                .ok_or("--budget is required (or provide --input)")?,
            annual_rate_percent: args.rate
                .ok_or("--rate is required (or provide --input)")?,
            duration_months: args.months
                .ok_or("--months is required (or provide --input)")?,
        }
    };

    let result = solvers::max_loan(&ml_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_min_duration(args: MinDurationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let md_input: MinDurationInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin::<MinDurationInput>()? {
        data
    } else {
        MinDurationInput {
            principal: args.principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate
                .ok_or("--rate is required (or provide --input)")?,
            monthly_budget: args.budget
                .ok_or("--budget is required (or provide --input)")?,
        }
    };

    let result = solvers::min_duration(&md_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_budget(args: BudgetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params: LoanParameters = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin::<LoanParameters>()? {
        data
    } else {
        LoanParameters {
            principal: args.principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate
                .ok_or("--rate is required (or provide --input)")?,
            duration_months: args.months
                .ok_or("--months is required (or provide --input)")?,
            extra_payment: Decimal::ZERO,
            monthly_budget: args.budget
                .ok_or("--budget is required (or provide --input)")?,
        }
    };

    let result = budget::budget_check(&params)?;
    Ok(serde_json::to_value(result)?)
}
