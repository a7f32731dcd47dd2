//! Prepayment strategy suggestions.
//!
//! Three fixed tiers of extra monthly payment, sized as a fraction of the base
//! installment and rounded up to a friendly amount, each re-simulated against
//! the no-prepayment baseline.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::schedule::{simulate, summarize, validate_extra};
use crate::installment::{installment, validate_terms};
use crate::types::{format_duration, with_metadata, ComputationOutput, Money, Rate};
use crate::LoanCalcResult;

/// Extra amounts are rounded up to a multiple of this.
const ROUNDING_UNIT: Decimal = dec!(500);

/// (label, fraction of base installment), in presentation order.
const TIERS: [(&str, Decimal); 3] = [
    ("Conservative", dec!(0.10)),
    ("Balanced", dec!(0.25)),
    ("Aggressive", dec!(0.50)),
];

/// A suggested extra payment and its effect against the baseline schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepaymentScenario {
    pub label: String,
    /// Extra paid every month.
    pub extra_amount: Money,
    pub resulting_duration_months: u32,
    pub interest_saved: Money,
    pub time_saved_months: u32,
    /// Total paid over the shortened schedule, fees included.
    pub total_payment: Money,
    /// `time_saved_months` as "Xy Ym".
    pub time_saved_display: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentInput {
    pub principal: Money,
    pub annual_rate_percent: Rate,
    pub duration_months: u32,
    #[serde(default)]
    pub fee_rate: Rate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentOutput {
    pub base_installment: Money,
    pub baseline_total_interest: Money,
    pub scenarios: Vec<PrepaymentScenario>,
}

/// Rank the three prepayment tiers for a loan with no fee on extra payments.
pub fn rank_scenarios(
    principal: Money,
    annual_rate_percent: Rate,
    duration_months: u32,
) -> Vec<PrepaymentScenario> {
    rank_scenarios_with_fee(principal, annual_rate_percent, duration_months, Decimal::ZERO)
}

/// Rank the three prepayment tiers, charging `fee_rate` on every extra payment.
///
/// All three scenarios are always returned, even when nothing is saved.
pub fn rank_scenarios_with_fee(
    principal: Money,
    annual_rate_percent: Rate,
    duration_months: u32,
    fee_rate: Rate,
) -> Vec<PrepaymentScenario> {
    let base_emi = installment(principal, annual_rate_percent, duration_months);
    let baseline = summarize(&simulate(
        principal,
        annual_rate_percent,
        duration_months,
        Decimal::ZERO,
        Decimal::ZERO,
    ));

    TIERS
        .iter()
        .map(|(label, factor)| {
            let extra_amount = round_up_to_unit(base_emi * factor);
            let scenario = summarize(&simulate(
                principal,
                annual_rate_percent,
                duration_months,
                extra_amount,
                fee_rate,
            ));
            let time_saved_months = duration_months.saturating_sub(scenario.actual_duration_months);

            PrepaymentScenario {
                label: (*label).to_string(),
                extra_amount,
                resulting_duration_months: scenario.actual_duration_months,
                interest_saved: baseline.total_interest - scenario.total_interest,
                time_saved_months,
                total_payment: scenario.total_payment,
                time_saved_display: format_duration(time_saved_months),
            }
        })
        .collect()
}

/// `ceil(amount / 500) * 500`.
fn round_up_to_unit(amount: Money) -> Money {
    (amount / ROUNDING_UNIT).ceil() * ROUNDING_UNIT
}

/// Validated prepayment analysis wrapped in the computation envelope.
pub fn prepayment_scenarios(
    input: &PrepaymentInput,
) -> LoanCalcResult<ComputationOutput<PrepaymentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_terms(input.principal, input.annual_rate_percent, input.duration_months)?;
    validate_extra(Decimal::ZERO, input.fee_rate)?;

    let base_installment = installment(input.principal, input.annual_rate_percent, input.duration_months);
    let baseline_total_interest = summarize(&simulate(
        input.principal,
        input.annual_rate_percent,
        input.duration_months,
        Decimal::ZERO,
        Decimal::ZERO,
    ))
    .total_interest;

    let scenarios = rank_scenarios_with_fee(
        input.principal,
        input.annual_rate_percent,
        input.duration_months,
        input.fee_rate,
    );

    if input.annual_rate_percent.is_zero() {
        warnings.push("Interest-free loan: prepayment shortens the term but saves no interest".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Prepayment tiers at 10% / 25% / 50% of installment, rounded up to 500",
        input,
        warnings,
        elapsed,
        PrepaymentOutput {
            base_installment,
            baseline_total_interest,
            scenarios,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_three_tiers_in_order() {
        let scenarios = rank_scenarios(dec!(1_000_000), dec!(22), 60);
        let labels: Vec<&str> = scenarios.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Conservative", "Balanced", "Aggressive"]);
    }

    #[test]
    fn test_extra_amounts_rounded_up_to_500() {
        // EMI ≈ 27,618.91 -> raw tiers 2,761.89 / 6,904.73 / 13,809.46
        let scenarios = rank_scenarios(dec!(1_000_000), dec!(22), 60);
        let extras: Vec<Decimal> = scenarios.iter().map(|s| s.extra_amount).collect();
        assert_eq!(extras, vec![dec!(3000), dec!(7000), dec!(14000)]);
        for s in &scenarios {
            assert_eq!(s.extra_amount % dec!(500), Decimal::ZERO);
            assert!(s.extra_amount > Decimal::ZERO);
        }
    }

    #[test]
    fn test_savings_grow_with_tier() {
        let scenarios = rank_scenarios(dec!(1_000_000), dec!(22), 60);
        for s in &scenarios {
            assert!(s.interest_saved >= Decimal::ZERO);
            assert_eq!(s.time_saved_months, 60 - s.resulting_duration_months);
        }
        assert!(scenarios[0].interest_saved <= scenarios[1].interest_saved);
        assert!(scenarios[1].interest_saved <= scenarios[2].interest_saved);
        assert!(scenarios[2].time_saved_months > 0);
    }

    #[test]
    fn test_interest_free_loan_saves_time_only() {
        let scenarios = rank_scenarios(dec!(1_200_000), Decimal::ZERO, 12);
        assert_eq!(scenarios.len(), 3);
        for s in &scenarios {
            assert!(s.interest_saved.abs() < dec!(0.000001));
        }
        // 100,000 EMI + 50,000 extra clears 1.2m in 8 months.
        assert_eq!(scenarios[2].resulting_duration_months, 8);
        assert_eq!(scenarios[2].time_saved_display, "0y 4m");
    }

    #[test]
    fn test_round_up_to_unit() {
        assert_eq!(round_up_to_unit(dec!(0.01)), dec!(500));
        assert_eq!(round_up_to_unit(dec!(500)), dec!(500));
        assert_eq!(round_up_to_unit(dec!(500.01)), dec!(1000));
        assert_eq!(round_up_to_unit(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_fee_erodes_savings() {
        let free = rank_scenarios(dec!(1_000_000), dec!(22), 60);
        let charged = rank_scenarios_with_fee(dec!(1_000_000), dec!(22), 60, dec!(0.04));
        for (f, c) in free.iter().zip(charged.iter()) {
            assert_eq!(f.extra_amount, c.extra_amount);
            assert!(c.interest_saved <= f.interest_saved);
        }
    }

    #[test]
    fn test_prepayment_envelope() {
        let input = PrepaymentInput {
            principal: dec!(1_000_000),
            annual_rate_percent: dec!(22),
            duration_months: 60,
            fee_rate: Decimal::ZERO,
        };
        let out = prepayment_scenarios(&input).unwrap();
        assert_eq!(out.result.scenarios.len(), 3);
        assert!(out.result.baseline_total_interest > Decimal::ZERO);
        assert!(out.warnings.is_empty());
    }
}
