//! Period-by-period amortization of a reducing-balance loan.
//!
//! The simulator pays the fixed installment every month, optionally topped up
//! with a constant extra payment. Extra payments may carry a proportional fee
//! which is deducted from their principal-reducing effect. The schedule ends
//! with a variable-size settlement row that clears the balance to exactly 0.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanCalcError;
use crate::installment::{installment, periodic_rate, validate_terms};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::LoanCalcResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Residual balance at or below which the loan is considered fully paid.
/// Capped at half the installment for loans whose installment is smaller.
pub const BALANCE_EPSILON: Decimal = dec!(0.01);

/// The simulation never runs past this multiple of the scheduled duration.
const SAFETY_HORIZON_MULTIPLIER: u32 = 2;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One period of the repayment ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based period number.
    pub period: u32,
    pub opening_balance: Money,
    /// Installment paid this period. Smaller than the nominal EMI on a short
    /// final row.
    pub installment: Money,
    /// Extra amount actually paid this period (gross of fee).
    pub extra_payment: Money,
    /// Fee charged on the extra payment.
    pub fee: Money,
    /// installment + extra_payment.
    pub total_payment: Money,
    /// Part of the payment, net of fee, that reduced the balance.
    pub principal_component: Money,
    /// opening_balance * periodic rate.
    pub interest_component: Money,
    pub closing_balance: Money,
}

/// Totals over a simulated schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Number of rows, i.e. the month the loan is actually paid off.
    pub actual_duration_months: u32,
    pub total_interest: Money,
    pub total_payment: Money,
    pub total_fees: Money,
    /// Balance left after the last row; 0 unless the safety horizon was hit.
    pub final_balance: Money,
}

/// Input for the validated schedule entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub principal: Money,
    /// Annual rate as a percentage (e.g. 22 for 22%).
    pub annual_rate_percent: Rate,
    pub duration_months: u32,
    #[serde(default)]
    pub extra_payment: Money,
    /// Proportional fee on extra payments (e.g. 0.04 = 4%).
    #[serde(default)]
    pub fee_rate: Rate,
}

/// Output of the validated schedule entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    /// Nominal installment for the scheduled duration.
    pub installment: Money,
    pub summary: ScheduleSummary,
    pub rows: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Core simulation
// ---------------------------------------------------------------------------

/// Simulate the repayment of `principal` over `scheduled_duration_months`,
/// paying `extra_payment` on top of the installment every period.
///
/// `fee_rate` is the fraction of each extra payment lost to fees; only the
/// remaining `extra_payment * (1 - fee_rate)` reduces principal. With a zero
/// extra payment the schedule has exactly `scheduled_duration_months` rows.
///
/// The loop stops at `2 * scheduled_duration_months` periods even if the
/// balance has not cleared. That cannot happen for well-formed inputs, so it
/// is logged as an invariant violation rather than reported.
pub fn simulate(
    principal: Money,
    annual_rate_percent: Rate,
    scheduled_duration_months: u32,
    extra_payment: Money,
    fee_rate: Rate,
) -> Vec<AmortizationRow> {
    let emi = installment(principal, annual_rate_percent, scheduled_duration_months);
    let r = periodic_rate(annual_rate_percent);
    let net_extra = (extra_payment * (Decimal::ONE - fee_rate)).max(Decimal::ZERO);
    let horizon = scheduled_duration_months.saturating_mul(SAFETY_HORIZON_MULTIPLIER);
    let tolerance = BALANCE_EPSILON.min(emi / dec!(2));

    let mut rows: Vec<AmortizationRow> = Vec::with_capacity(scheduled_duration_months as usize);
    let mut balance = principal;
    let mut period = 1u32;

    while balance > Decimal::ZERO && period <= horizon {
        let interest = balance * r;
        let principal_from_installment = emi - interest;
        let reduction = principal_from_installment + net_extra;

        if reduction >= balance - tolerance {
            rows.push(settlement_row(period, balance, interest, emi, net_extra, fee_rate));
            balance = Decimal::ZERO;
            break;
        }

        let closing_balance = balance - reduction;
        rows.push(AmortizationRow {
            period,
            opening_balance: balance,
            installment: emi,
            extra_payment,
            fee: extra_payment * fee_rate,
            total_payment: emi + extra_payment,
            principal_component: reduction,
            interest_component: interest,
            closing_balance,
        });

        balance = closing_balance;
        period += 1;
    }

    if balance > Decimal::ZERO && horizon > 0 {
        log::warn!(
            "amortization stopped at safety horizon of {} periods with balance {} outstanding \
             (principal {}, rate {}%, extra {}, fee rate {})",
            horizon,
            balance,
            principal,
            annual_rate_percent,
            extra_payment,
            fee_rate
        );
    }

    rows
}

/// Final row: pay exactly what clears the balance, installment first and
/// the remainder as extra, grossed up so the fee is only charged on the extra
/// actually used.
fn settlement_row(
    period: u32,
    balance: Money,
    interest: Money,
    emi: Money,
    net_extra: Money,
    fee_rate: Rate,
) -> AmortizationRow {
    let amount_due = balance + interest;

    // Without a usable extra payment the residue is absorbed by the installment.
    let installment_part = if net_extra.is_zero() {
        amount_due
    } else {
        amount_due.min(emi)
    };
    let owed_from_extra = amount_due - installment_part;

    let (extra_part, fee) = if owed_from_extra > Decimal::ZERO {
        let gross = owed_from_extra / (Decimal::ONE - fee_rate);
        (gross, gross - owed_from_extra)
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    AmortizationRow {
        period,
        opening_balance: balance,
        installment: installment_part,
        extra_payment: extra_part,
        fee,
        total_payment: installment_part + extra_part,
        principal_component: balance,
        interest_component: interest,
        closing_balance: Decimal::ZERO,
    }
}

/// Aggregate a schedule into its totals.
pub fn summarize(rows: &[AmortizationRow]) -> ScheduleSummary {
    ScheduleSummary {
        actual_duration_months: rows.len() as u32,
        total_interest: rows.iter().map(|r| r.interest_component).sum(),
        total_payment: rows.iter().map(|r| r.total_payment).sum(),
        total_fees: rows.iter().map(|r| r.fee).sum(),
        final_balance: rows.last().map(|r| r.closing_balance).unwrap_or(Decimal::ZERO),
    }
}

// ---------------------------------------------------------------------------
// Validated entry point
// ---------------------------------------------------------------------------

/// Build a full amortization schedule with validation and metadata.
pub fn amortization_schedule(
    input: &ScheduleInput,
) -> LoanCalcResult<ComputationOutput<ScheduleOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_terms(input.principal, input.annual_rate_percent, input.duration_months)?;
    validate_extra(input.extra_payment, input.fee_rate)?;

    let rows = simulate(
        input.principal,
        input.annual_rate_percent,
        input.duration_months,
        input.extra_payment,
        input.fee_rate,
    );
    let summary = summarize(&rows);

    if summary.final_balance > Decimal::ZERO {
        warnings.push(format!(
            "Schedule truncated after {} months with {} still outstanding",
            summary.actual_duration_months, summary.final_balance
        ));
    }
    if input.fee_rate > Decimal::ZERO && input.extra_payment > Decimal::ZERO {
        warnings.push(format!(
            "Extra payments carry a {}% fee; total fees {}",
            input.fee_rate * dec!(100),
            summary.total_fees
        ));
    }

    let output = ScheduleOutput {
        installment: installment(input.principal, input.annual_rate_percent, input.duration_months),
        summary,
        rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Reducing-balance amortization with constant extra payments",
        input,
        warnings,
        elapsed,
        output,
    ))
}

pub(crate) fn validate_extra(extra_payment: Money, fee_rate: Rate) -> LoanCalcResult<()> {
    if extra_payment < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "extra_payment".into(),
            reason: "Extra payment cannot be negative".into(),
        });
    }
    if fee_rate < Decimal::ZERO || fee_rate >= Decimal::ONE {
        return Err(LoanCalcError::InvalidInput {
            field: "fee_rate".into(),
            reason: "Fee rate must be in [0, 1)".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    const TOL: Decimal = dec!(0.000001);

    fn assert_rows_reconcile(rows: &[AmortizationRow]) {
        for row in rows {
            assert!(
                (row.opening_balance - row.principal_component - row.closing_balance).abs() < TOL,
                "period {} does not roll forward",
                row.period
            );
            assert!(
                (row.interest_component + row.principal_component
                    - (row.total_payment - row.fee))
                    .abs()
                    < TOL,
                "period {} payments do not reconcile",
                row.period
            );
            assert!(row.closing_balance >= Decimal::ZERO);
        }
    }

    #[test]
    fn test_zero_extra_matches_standard_schedule() {
        let rows = simulate(dec!(1_000_000), dec!(22), 60, Decimal::ZERO, Decimal::ZERO);
        assert_eq!(rows.len(), 60);
        let last = rows.last().unwrap();
        assert_eq!(last.closing_balance, Decimal::ZERO);
        assert_eq!(last.fee, Decimal::ZERO);
        assert_eq!(last.extra_payment, Decimal::ZERO);
        assert_rows_reconcile(&rows);
    }

    #[test]
    fn test_sub_cent_installment_keeps_full_term() {
        let rows = simulate(dec!(1), Decimal::ZERO, 360, Decimal::ZERO, Decimal::ZERO);
        assert_eq!(rows.len(), 360);
        let emi = installment(dec!(1), Decimal::ZERO, 360);
        for row in &rows {
            assert!((row.installment - emi).abs() < TOL, "period {}", row.period);
        }
        assert_eq!(rows.last().unwrap().closing_balance, Decimal::ZERO);
        assert_rows_reconcile(&rows);

        let rows = simulate(dec!(0.5), dec!(22), 60, Decimal::ZERO, Decimal::ZERO);
        assert_eq!(rows.len(), 60);
    }

    #[test]
    fn test_periods_are_sequential() {
        let rows = simulate(dec!(300_000), dec!(14), 36, dec!(2_000), Decimal::ZERO);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.period, i as u32 + 1);
        }
        for pair in rows.windows(2) {
            assert_eq!(pair[0].closing_balance, pair[1].opening_balance);
        }
    }

    #[test]
    fn test_interest_free_schedule() {
        let rows = simulate(dec!(1_200_000), Decimal::ZERO, 12, Decimal::ZERO, Decimal::ZERO);
        assert_eq!(rows.len(), 12);
        for row in &rows {
            assert_eq!(row.interest_component, Decimal::ZERO);
            assert_eq!(row.installment, dec!(100_000));
        }
        assert_eq!(rows[11].closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_extra_payment_shortens_schedule() {
        let base = simulate(dec!(1_000_000), dec!(22), 60, Decimal::ZERO, Decimal::ZERO);
        let fast = simulate(dec!(1_000_000), dec!(22), 60, dec!(10_000), Decimal::ZERO);
        assert!(fast.len() < base.len());
        assert_eq!(fast.last().unwrap().closing_balance, Decimal::ZERO);
        assert!(summarize(&fast).total_interest < summarize(&base).total_interest);
        assert_rows_reconcile(&fast);
    }

    #[test]
    fn test_final_row_never_overpays() {
        let rows = simulate(dec!(100_000), dec!(10), 24, dec!(7_777), Decimal::ZERO);
        let last = rows.last().unwrap();
        let emi = installment(dec!(100_000), dec!(10), 24);
        assert_eq!(last.closing_balance, Decimal::ZERO);
        assert_eq!(last.principal_component, last.opening_balance);
        assert!(last.total_payment <= emi + dec!(7_777));
        assert!(last.installment <= emi);
    }

    #[test]
    fn test_small_final_payment_has_no_extra() {
        // Extra so large the loan clears in month two with less than one
        // installment due.
        let rows = simulate(dec!(10_000), dec!(12), 12, dec!(9_000), Decimal::ZERO);
        assert_eq!(rows.len(), 2);
        let last = &rows[1];
        let emi = installment(dec!(10_000), dec!(12), 12);
        assert!(last.total_payment < emi);
        assert_eq!(last.extra_payment, Decimal::ZERO);
        assert_eq!(last.fee, Decimal::ZERO);
    }

    #[test]
    fn test_fee_reduces_principal_effect() {
        let no_fee = simulate(dec!(1_000_000), dec!(22), 60, dec!(10_000), Decimal::ZERO);
        let with_fee = simulate(dec!(1_000_000), dec!(22), 60, dec!(10_000), dec!(0.04));
        assert!(with_fee.len() >= no_fee.len());
        assert!(summarize(&with_fee).total_interest >= summarize(&no_fee).total_interest);

        let first = &with_fee[0];
        assert_eq!(first.fee, dec!(400));
        let emi = installment(dec!(1_000_000), dec!(22), 60);
        let expected_principal = emi - first.interest_component + dec!(9_600);
        assert!((first.principal_component - expected_principal).abs() < TOL);
        assert_rows_reconcile(&with_fee);
    }

    #[test]
    fn test_fee_only_on_extra_actually_used() {
        let rows = simulate(dec!(100_000), dec!(12), 12, dec!(20_000), dec!(0.04));
        let last = rows.last().unwrap();
        assert!(last.extra_payment < dec!(20_000));
        assert!((last.fee - last.extra_payment * dec!(0.04)).abs() < TOL);
        assert_eq!(last.closing_balance, Decimal::ZERO);
        assert_rows_reconcile(&rows);
    }

    #[test]
    fn test_degenerate_inputs_do_not_panic() {
        assert!(simulate(Decimal::ZERO, dec!(10), 12, Decimal::ZERO, Decimal::ZERO).is_empty());
        assert!(simulate(dec!(1_000), dec!(10), 0, Decimal::ZERO, Decimal::ZERO).is_empty());
        let negative = simulate(dec!(-1_000), dec!(10), 12, Decimal::ZERO, Decimal::ZERO);
        assert!(negative.is_empty());
    }

    #[test]
    fn test_safety_horizon_bounds_negative_amortization() {
        // Pathological negative rate: whatever happens, the simulator stops
        // within twice the scheduled duration.
        let rows = simulate(dec!(50_000), dec!(-50), 12, Decimal::ZERO, Decimal::ZERO);
        assert!(rows.len() <= 24);
    }

    #[test]
    fn test_summary_totals() {
        let rows = simulate(dec!(1_200_000), Decimal::ZERO, 12, Decimal::ZERO, Decimal::ZERO);
        let summary = summarize(&rows);
        assert_eq!(
            summary,
            ScheduleSummary {
                actual_duration_months: 12,
                total_interest: Decimal::ZERO,
                total_payment: dec!(1_200_000),
                total_fees: Decimal::ZERO,
                final_balance: Decimal::ZERO,
            }
        );
    }

    #[test]
    fn test_amortization_schedule_envelope() {
        let input = ScheduleInput {
            principal: dec!(1_000_000),
            annual_rate_percent: dec!(22),
            duration_months: 60,
            extra_payment: dec!(5_000),
            fee_rate: dec!(0.04),
        };
        let out = amortization_schedule(&input).unwrap();
        assert_eq!(out.result.rows.len() as u32, out.result.summary.actual_duration_months);
        assert!(out.result.summary.actual_duration_months < 60);
        assert!(out.result.summary.total_fees > Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_amortization_schedule_rejects_bad_fee() {
        let input = ScheduleInput {
            principal: dec!(1_000_000),
            annual_rate_percent: dec!(22),
            duration_months: 60,
            extra_payment: dec!(5_000),
            fee_rate: Decimal::ONE,
        };
        assert!(amortization_schedule(&input).is_err());
    }
}
