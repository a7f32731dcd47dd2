//! Inverse problems on the installment formula: how much can be borrowed for
//! a given budget, and how long a loan must run to fit a budget.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanCalcError;
use crate::installment::{compound_factor, installment, periodic_rate, validate_terms, MAX_DURATION_MONTHS};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::LoanCalcResult;

/// Largest principal whose installment over `duration_months` equals `budget`.
///
/// Returns 0 when the budget or duration is non-positive; callers treat 0 as
/// "no meaningful result".
pub fn max_borrowable_principal(budget: Money, annual_rate_percent: Rate, duration_months: u32) -> Money {
    if budget <= Decimal::ZERO || duration_months == 0 {
        return Decimal::ZERO;
    }
    if annual_rate_percent.is_zero() {
        return budget * Decimal::from(duration_months);
    }

    let r = periodic_rate(annual_rate_percent);
    match compound_factor(r, duration_months) {
        // Perpetuity limit: the budget only ever covers interest.
        None => budget / r,
        Some(factor) if factor.is_zero() => Decimal::ZERO,
        Some(factor) if factor == Decimal::ONE => budget * Decimal::from(duration_months),
        Some(factor) => budget * (Decimal::ONE - Decimal::ONE / factor) / r,
    }
}

/// Shortest whole-month duration in `1..=360` whose installment fits `budget`.
///
/// `None` means the budget cannot carry the loan even over 30 years, which is
/// a normal outcome rather than an error.
pub fn min_duration_for_budget(principal: Money, annual_rate_percent: Rate, budget: Money) -> Option<u32> {
    if budget <= Decimal::ZERO {
        return None;
    }

    let found = (1..=MAX_DURATION_MONTHS).find(|&n| installment(principal, annual_rate_percent, n) <= budget);
    match found {
        Some(n) => log::debug!("budget {budget} fits principal {principal} at {n} months"),
        None => log::debug!(
            "budget {budget} cannot carry principal {principal} within {MAX_DURATION_MONTHS} months"
        ),
    }
    found
}

// ---------------------------------------------------------------------------
// Validated entry points
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxLoanInput {
    pub monthly_budget: Money,
    pub annual_rate_percent: Rate,
    pub duration_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxLoanOutput {
    pub max_principal: Money,
    /// Installment on `max_principal`; equals the budget up to rounding.
    pub installment: Money,
    pub total_interest: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinDurationInput {
    pub principal: Money,
    pub annual_rate_percent: Rate,
    pub monthly_budget: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinDurationOutput {
    /// `None` when no duration up to 360 months fits the budget.
    pub duration_months: Option<u32>,
    pub installment: Option<Money>,
    pub total_interest: Option<Money>,
    pub feasible: bool,
}

/// Borrowing power for a monthly budget.
pub fn max_loan(input: &MaxLoanInput) -> LoanCalcResult<ComputationOutput<MaxLoanOutput>> {
    let start = Instant::now();

    validate_budget(input.monthly_budget)?;
    validate_terms(Decimal::ONE, input.annual_rate_percent, input.duration_months)?;

    let max_principal =
        max_borrowable_principal(input.monthly_budget, input.annual_rate_percent, input.duration_months);
    let emi = installment(max_principal, input.annual_rate_percent, input.duration_months);
    let total_interest = emi * Decimal::from(input.duration_months) - max_principal;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Inverse annuity: P = B * ((1+r)^n - 1) / (r * (1+r)^n)",
        input,
        Vec::new(),
        elapsed,
        MaxLoanOutput {
            max_principal,
            installment: emi,
            total_interest,
        },
    ))
}

/// Shortest duration fitting a monthly budget.
pub fn min_duration(input: &MinDurationInput) -> LoanCalcResult<ComputationOutput<MinDurationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_budget(input.monthly_budget)?;
    validate_terms(input.principal, input.annual_rate_percent, 1)?;

    let duration_months =
        min_duration_for_budget(input.principal, input.annual_rate_percent, input.monthly_budget);
    let installment_at = duration_months.map(|n| installment(input.principal, input.annual_rate_percent, n));
    let total_interest = duration_months
        .zip(installment_at)
        .map(|(n, emi)| emi * Decimal::from(n) - input.principal);

    if duration_months.is_none() {
        warnings.push(format!(
            "Budget {} cannot repay {} within {} months",
            input.monthly_budget, input.principal, MAX_DURATION_MONTHS
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Linear scan over 1..=360 months for the first installment within budget",
        input,
        warnings,
        elapsed,
        MinDurationOutput {
            duration_months,
            installment: installment_at,
            total_interest,
            feasible: duration_months.is_some(),
        },
    ))
}

fn validate_budget(budget: Money) -> LoanCalcResult<()> {
    if budget <= Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "monthly_budget".into(),
            reason: "Monthly budget must be positive".into(),
        });
    }
    Ok(())
}
