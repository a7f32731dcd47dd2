//! Budget fit for a loan already on the table: does the installment fit,
//! how much could the budget carry instead, and how long would the loan need
//! to run to fit.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::affordability::solvers::{max_borrowable_principal, min_duration_for_budget};
use crate::installment::{installment, validate_terms};
use crate::types::{with_metadata, ComputationOutput, LoanParameters, Money, Rate};
use crate::LoanCalcResult;

/// Suggested loan amounts are floored to a multiple of this.
const SUGGESTION_UNIT: Decimal = dec!(10_000);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAssessment {
    pub installment: Money,
    pub monthly_budget: Money,
    pub over_budget: bool,
    /// budget - installment; negative when over budget.
    pub headroom: Money,
    /// Principal the budget carries over the same duration.
    pub max_borrowable: Money,
    /// `max_borrowable` floored to the nearest 10,000.
    pub suggested_principal: Money,
    /// Shortest duration fitting the budget, `None` if even 360 months is too short.
    pub min_duration_months: Option<u32>,
}

/// Assess a loan against a monthly budget. `None` when no budget is set.
pub fn assess_budget(
    principal: Money,
    annual_rate_percent: Rate,
    duration_months: u32,
    monthly_budget: Money,
) -> Option<BudgetAssessment> {
    if monthly_budget <= Decimal::ZERO {
        return None;
    }

    let emi = installment(principal, annual_rate_percent, duration_months);
    let max_borrowable = max_borrowable_principal(monthly_budget, annual_rate_percent, duration_months);

    Some(BudgetAssessment {
        installment: emi,
        monthly_budget,
        over_budget: emi > monthly_budget,
        headroom: monthly_budget - emi,
        max_borrowable,
        suggested_principal: (max_borrowable / SUGGESTION_UNIT).floor() * SUGGESTION_UNIT,
        min_duration_months: min_duration_for_budget(principal, annual_rate_percent, monthly_budget),
    })
}

/// Validated budget assessment wrapped in the computation envelope.
pub fn budget_check(params: &LoanParameters) -> LoanCalcResult<ComputationOutput<Option<BudgetAssessment>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_terms(params.principal, params.annual_rate_percent, params.duration_months)?;

    let assessment = assess_budget(
        params.principal,
        params.annual_rate_percent,
        params.duration_months,
        params.monthly_budget,
    );

    match &assessment {
        None => warnings.push("No monthly budget given; nothing to assess".into()),
        Some(a) if a.over_budget => {
            warnings.push(format!(
                "Installment {} exceeds budget {}; extend the duration or borrow less",
                a.installment.round_dp(2),
                a.monthly_budget
            ));
            if a.min_duration_months.is_none() {
                warnings.push("Budget cannot carry this loan at any duration up to 360 months".into());
            }
        }
        Some(_) => {}
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Installment vs. budget with inverse-annuity borrowing power",
        params,
        warnings,
        elapsed,
        assessment,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_no_budget_no_assessment() {
        assert_eq!(assess_budget(dec!(1_000_000), dec!(22), 60, Decimal::ZERO), None);
    }

    #[test]
    fn test_within_budget() {
        let a = assess_budget(dec!(1_200_000), Decimal::ZERO, 12, dec!(125_000)).unwrap();
        assert_eq!(
            a,
            BudgetAssessment {
                installment: dec!(100_000),
                monthly_budget: dec!(125_000),
                over_budget: false,
                headroom: dec!(25_000),
                max_borrowable: dec!(1_500_000),
                suggested_principal: dec!(1_500_000),
                min_duration_months: Some(10),
            }
        );
    }

    #[test]
    fn test_over_budget() {
        let a = assess_budget(dec!(1_000_000), dec!(22), 60, dec!(25_000)).unwrap();
        assert!(a.over_budget);
        assert!(a.headroom < Decimal::ZERO);
        assert!(a.max_borrowable < dec!(1_000_000));
        assert_eq!(a.suggested_principal % dec!(10_000), Decimal::ZERO);
        assert!(a.suggested_principal <= a.max_borrowable);
        assert!(a.min_duration_months.unwrap() > 60);
    }

    #[test]
    fn test_budget_check_warns_when_over() {
        let params = LoanParameters {
            principal: dec!(1_000_000),
            annual_rate_percent: dec!(22),
            duration_months: 60,
            extra_payment: Decimal::ZERO,
            monthly_budget: dec!(18_000),
        };
        let out = budget_check(&params).unwrap();
        let a = out.result.unwrap();
        assert!(a.over_budget);
        assert_eq!(a.min_duration_months, None);
        assert_eq!(out.warnings.len(), 2);
    }
}
