//! One-shot loan analysis: everything a calculator screen shows for one
//! parameter snapshot, computed together and validated once.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::affordability::budget::{assess_budget, BudgetAssessment};
use crate::amortization::prepayment::{rank_scenarios_with_fee, PrepaymentScenario};
use crate::amortization::schedule::{simulate, summarize, validate_extra, AmortizationRow};
use crate::error::LoanCalcError;
use crate::installment::{installment, validate_terms, MAX_DURATION_MONTHS};
use crate::projection::equilibrium::{find_equilibrium, Equilibrium};
use crate::projection::tenure_curve::{
    project, ProjectionPoint, BUDGET_MAX_MONTHS, DEFAULT_MAX_MONTHS, DEFAULT_MIN_MONTHS,
    DEFAULT_STEP_MONTHS,
};
use crate::types::{format_duration, with_metadata, ComputationOutput, LoanParameters, Money, Rate};
use crate::LoanCalcResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    #[serde(flatten)]
    pub params: LoanParameters,
    /// Proportional fee on extra payments, in [0, 1).
    #[serde(default)]
    pub extra_payment_fee_rate: Rate,
    /// Longest duration on the trade-off curve. Defaults to 240 months when a
    /// budget is set, 120 otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection_max_months: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummary {
    pub actual_duration_months: u32,
    pub actual_duration_display: String,
    pub total_interest: Money,
    pub total_payment: Money,
    pub total_fees: Money,
    /// Scheduled duration minus actual duration.
    pub months_saved: u32,
    /// Interest saved against the same loan with no extra payment.
    pub interest_saved_vs_baseline: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanReport {
    pub installment: Money,
    pub summary: LoanSummary,
    pub schedule: Vec<AmortizationRow>,
    pub scenarios: Vec<PrepaymentScenario>,
    pub projection: Vec<ProjectionPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equilibrium: Option<Equilibrium>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<BudgetAssessment>,
}

/// Analyse a loan: installment, actual schedule with extra payments,
/// prepayment tiers, duration trade-off curve and budget fit.
pub fn analyze_loan(input: &LoanInput) -> LoanCalcResult<ComputationOutput<LoanReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let p = &input.params;

    validate_loan_input(input)?;

    let emi = installment(p.principal, p.annual_rate_percent, p.duration_months);

    let schedule = simulate(
        p.principal,
        p.annual_rate_percent,
        p.duration_months,
        p.extra_payment,
        input.extra_payment_fee_rate,
    );
    let actual = summarize(&schedule);
    let baseline = if p.extra_payment.is_zero() {
        actual.clone()
    } else {
        summarize(&simulate(
            p.principal,
            p.annual_rate_percent,
            p.duration_months,
            Decimal::ZERO,
            Decimal::ZERO,
        ))
    };

    if actual.final_balance > Decimal::ZERO {
        warnings.push(format!(
            "Schedule stopped at the safety horizon with {} outstanding",
            actual.final_balance
        ));
    }
    if input.extra_payment_fee_rate > Decimal::ZERO && p.extra_payment > Decimal::ZERO {
        warnings.push(format!(
            "Extra payments carry a {}% fee ({} in total)",
            input.extra_payment_fee_rate * dec!(100),
            actual.total_fees.round_dp(2)
        ));
    }

    let months_saved = p.duration_months.saturating_sub(actual.actual_duration_months);
    let summary = LoanSummary {
        actual_duration_months: actual.actual_duration_months,
        actual_duration_display: format_duration(actual.actual_duration_months),
        total_interest: actual.total_interest,
        total_payment: actual.total_payment,
        total_fees: actual.total_fees,
        months_saved,
        interest_saved_vs_baseline: baseline.total_interest - actual.total_interest,
    };

    let scenarios = rank_scenarios_with_fee(
        p.principal,
        p.annual_rate_percent,
        p.duration_months,
        input.extra_payment_fee_rate,
    );

    let projection_max = input.projection_max_months.unwrap_or(if p.monthly_budget > Decimal::ZERO {
        BUDGET_MAX_MONTHS
    } else {
        DEFAULT_MAX_MONTHS
    });
    let projection = project(
        p.principal,
        p.annual_rate_percent,
        DEFAULT_MIN_MONTHS,
        projection_max,
        DEFAULT_STEP_MONTHS,
    );
    let equilibrium = find_equilibrium(&projection);

    let budget = assess_budget(p.principal, p.annual_rate_percent, p.duration_months, p.monthly_budget);
    if let Some(b) = &budget {
        if b.over_budget {
            warnings.push(format!(
                "Installment {} exceeds the monthly budget {}",
                b.installment.round_dp(2),
                b.monthly_budget
            ));
        }
        if b.min_duration_months.is_none() {
            warnings.push(format!(
                "Budget cannot carry this loan within {MAX_DURATION_MONTHS} months"
            ));
        }
    }

    let report = LoanReport {
        installment: emi,
        summary,
        schedule,
        scenarios,
        projection,
        equilibrium,
        budget,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Reducing-balance loan analysis with prepayment tiers and budget fit",
        input,
        warnings,
        elapsed,
        report,
    ))
}

fn validate_loan_input(input: &LoanInput) -> LoanCalcResult<()> {
    let p = &input.params;
    validate_terms(p.principal, p.annual_rate_percent, p.duration_months)?;
    validate_extra(p.extra_payment, input.extra_payment_fee_rate)?;
    if p.monthly_budget < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "monthly_budget".into(),
            reason: "Monthly budget cannot be negative".into(),
        });
    }
    if let Some(max) = input.projection_max_months {
        if max < DEFAULT_MIN_MONTHS || max > MAX_DURATION_MONTHS {
            return Err(LoanCalcError::InvalidInput {
                field: "projection_max_months".into(),
                reason: format!(
                    "Projection range must end between {DEFAULT_MIN_MONTHS} and {MAX_DURATION_MONTHS} months"
                ),
            });
        }
    }
    Ok(())
}
