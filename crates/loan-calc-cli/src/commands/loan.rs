use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_calc_core::amortization::prepayment::{self, PrepaymentInput};
use loan_calc_core::amortization::schedule::{self, ScheduleInput};
use loan_calc_core::analysis::loan_report::{self, LoanInput};
use loan_calc_core::installment;
use loan_calc_core::LoanParameters;

use crate::input;

/// Arguments for the installment calculation
#[derive(Args)]
pub struct InstallmentArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, short)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 22 for 22%)
    #[arg(long, short)]
    pub rate: Option<Decimal>,

    /// Duration in months
    #[arg(long, short = 'n')]
    pub months: Option<u32>,

    /// Monthly budget to compare the installment against
    #[arg(long)]
    pub budget: Option<Decimal>,
}

/// Arguments for the amortization schedule
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, short)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, short)]
    pub rate: Option<Decimal>,

    /// Scheduled duration in months
    #[arg(long, short = 'n')]
    pub months: Option<u32>,

    /// Extra amount paid every month
    #[arg(long, default_value = "0")]
    pub extra: Decimal,

    /// Proportional fee on extra payments (e.g. 0.04 = 4%)
    #[arg(long, default_value = "0")]
    pub fee_rate: Decimal,
}

/// Arguments for prepayment strategies
#[derive(Args)]
pub struct StrategiesArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, short)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, short)]
    pub rate: Option<Decimal>,

    /// Scheduled duration in months
    #[arg(long, short = 'n')]
    pub months: Option<u32>,

    /// Proportional fee on extra payments
    #[arg(long, default_value = "0")]
    pub fee_rate: Decimal,
}

/// Arguments for the full loan analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, short)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, short)]
    pub rate: Option<Decimal>,

    /// Scheduled duration in months
    #[arg(long, short = 'n')]
    pub months: Option<u32>,

    /// Extra amount paid every month
    #[arg(long, default_value = "0")]
    pub extra: Decimal,

    /// Monthly budget (0 = none)
    #[arg(long, default_value = "0")]
    pub budget: Decimal,

    /// Proportional fee on extra payments
    #[arg(long, default_value = "0")]
    pub fee_rate: Decimal,

    /// Longest duration on the trade-off curve
    #[arg(long)]
    pub projection_max: Option<u32>,
}

pub fn run_installment(args: InstallmentArgs) -> Result<Value, Box<dyn std::error::Error>> {
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
            monthly_budget: args.budget.unwrap_or(Decimal::ZERO),
        }
    };

    let result = installment::calculate_installment(&params)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: ScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let schedule_input: ScheduleInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin::<ScheduleInput>()? {
        data
    } else {
        ScheduleInput {
            principal: args.principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate
                .ok_or("--rate is required (or provide --input)")?,
            duration_months: args.months
                .ok_or("--months is required (or provide --input)")?,
            extra_payment: args.extra,
            fee_rate: args.fee_rate,
        }
    };

    let result = schedule::amortization_schedule(&schedule_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_strategies(args: StrategiesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let pp_input: PrepaymentInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin::<PrepaymentInput>()? {
        data
    } else {
        PrepaymentInput {
            principal: args.principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args.rate
                .ok_or("--rate is required (or provide --input)")?,
            duration_months: args.months
                .ok_or("--months is required (or provide --input)")?,
            fee_rate: args.fee_rate,
        }
    };

    let result = prepayment::prepayment_scenarios(&pp_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanInput = if let Some(ref path) = args.input {
        input::read_json(path)?
    } else if let Some(data) = input::read_stdin::<LoanInput>()? {
        data
    } else {
        LoanInput {
            params: LoanParameters {
                principal: args.principal
                    .ok_or("--principal is required (or provide --input)")?,
                annual_rate_percent: args.rate
                    .ok_or("--rate is required (or provide --input)")?,
                duration_months: args.months
                    .ok_or("--months is required (or provide --input)")?,
                extra_payment: args.extra,
                monthly_budget: args.budget,
            },
            extra_payment_fee_rate: args.fee_rate,
            projection_max_months: args.projection_max,
        }
    };

    let result = loan_report::analyze_loan(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}
