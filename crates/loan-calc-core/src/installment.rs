use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanCalcError;
use crate::types::{with_metadata, ComputationOutput, LoanParameters, Money, Rate};
use crate::LoanCalcResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT_DIVISOR: Decimal = dec!(100);

/// Longest duration any search or validated entry point considers (30 years).
pub const MAX_DURATION_MONTHS: u32 = 360;

/// Installment together with the cost of carrying the loan to term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentOutput {
    pub installment: Money,
    /// installment * duration.
    pub total_payment: Money,
    /// total_payment - principal.
    pub total_interest: Money,
}

/// Monthly fractional rate for an annual percentage: `annual / 12 / 100`.
pub fn periodic_rate(annual_rate_percent: Rate) -> Rate {
    annual_rate_percent / MONTHS_PER_YEAR / PERCENT_DIVISOR
}

/// `(1 + r)^n`, the compounding factor shared by the installment formula
/// and its inverse. `None` when it overflows the decimal range.
pub(crate) fn compound_factor(monthly_rate: Rate, months: u32) -> Option<Decimal> {
    (Decimal::ONE + monthly_rate).checked_powi(i64::from(months))
}

/// Fixed periodic payment (EMI) of a reducing-balance loan.
///
/// Returns 0 for a zero duration and the straight-line `principal / months`
/// for an interest-free loan. Otherwise
/// `P * r * (1+r)^n / ((1+r)^n - 1)` with `r` the monthly rate.
pub fn installment(principal: Money, annual_rate_percent: Rate, duration_months: u32) -> Money {
    if duration_months == 0 {
        return Decimal::ZERO;
    }
    if annual_rate_percent.is_zero() {
        return principal / Decimal::from(duration_months);
    }

    let r = periodic_rate(annual_rate_percent);
    let Some(factor) = compound_factor(r, duration_months) else {
        // Factor beyond the decimal range: the installment is pure interest.
        return principal * r;
    };
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        // Rate so small the factor rounds to 1; straight-line is the limit.
        return principal / Decimal::from(duration_months);
    }

    principal * r * (factor / denominator)
}

/// Validated installment with totals, wrapped in the computation envelope.
pub fn calculate_installment(
    params: &LoanParameters,
) -> LoanCalcResult<ComputationOutput<InstallmentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_terms(params.principal, params.annual_rate_percent, params.duration_months)?;

    let emi = installment(params.principal, params.annual_rate_percent, params.duration_months);
    let total_payment = emi * Decimal::from(params.duration_months);
    let total_interest = total_payment - params.principal;

    if params.monthly_budget > Decimal::ZERO && emi > params.monthly_budget {
        warnings.push(format!(
            "Installment {} exceeds the monthly budget {}",
            emi.round_dp(2),
            params.monthly_budget
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Reducing-balance installment (EMI)",
        params,
        warnings,
        elapsed,
        InstallmentOutput {
            installment: emi,
            total_payment,
            total_interest,
        },
    ))
}

/// Range checks shared by every validated entry point.
pub(crate) fn validate_terms(
    principal: Money,
    annual_rate_percent: Rate,
    duration_months: u32,
) -> LoanCalcResult<()> {
    if principal <= Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive".into(),
        });
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(LoanCalcError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if duration_months == 0 || duration_months > MAX_DURATION_MONTHS {
        return Err(LoanCalcError::InvalidInput {
            field: "duration_months".into(),
            reason: format!("Duration must be between 1 and {MAX_DURATION_MONTHS} months"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_rate_is_straight_line() {
        assert_eq!(installment(dec!(1_200_000), dec!(0), 12), dec!(100_000));
    }

    #[test]
    fn test_zero_duration_is_degenerate() {
        assert_eq!(installment(dec!(1_000_000), dec!(22), 0), Decimal::ZERO);
        assert_eq!(installment(dec!(1_000_000), dec!(0), 0), Decimal::ZERO);
    }

    #[test]
    fn test_known_emi_value() {
        // 1,000,000 at 22% p.a. over 60 months.
        let emi = installment(dec!(1_000_000), dec!(22), 60);
        assert!((emi - dec!(27_618.912)).abs() < dec!(0.01), "emi = {emi}");
    }

    #[test]
    fn test_matches_closed_form() {
        let p = dec!(250_000);
        let r = dec!(12) / dec!(1200);
        let n = 24u32;
        let mut factor = Decimal::ONE;
        for _ in 0..n {
            factor *= Decimal::ONE + r;
        }
        let expected = p * r * factor / (factor - Decimal::ONE);
        let emi = installment(p, dec!(12), n);
        assert!((emi - expected).abs() < dec!(0.000001));
    }

    #[test]
    fn test_periodic_rate() {
        assert_eq!(periodic_rate(dec!(12)), dec!(0.01));
        assert_eq!(periodic_rate(dec!(0)), Decimal::ZERO);
    }

    #[test]
    fn test_stable_at_long_duration_and_high_rate() {
        let emi = installment(dec!(1_000_000), dec!(100), 360);
        // At 100% p.a. the installment is essentially the monthly interest.
        let monthly_interest = dec!(1_000_000) * periodic_rate(dec!(100));
        assert!(emi >= monthly_interest);
        assert!((emi - monthly_interest).abs() < dec!(1.0));
    }

    #[test]
    fn test_calculate_installment_totals() {
        let params = LoanParameters {
            principal: dec!(1_200_000),
            annual_rate_percent: Decimal::ZERO,
            duration_months: 12,
            extra_payment: Decimal::ZERO,
            monthly_budget: dec!(90_000),
        };
        let out = calculate_installment(&params).unwrap();
        assert_eq!(out.result.installment, dec!(100_000));
        assert_eq!(out.result.total_payment, dec!(1_200_000));
        assert_eq!(out.result.total_interest, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_validate_terms_rejects_out_of_range() {
        assert!(validate_terms(Decimal::ZERO, dec!(10), 12).is_err());
        assert!(validate_terms(dec!(1000), dec!(-1), 12).is_err());
        assert!(validate_terms(dec!(1000), dec!(10), 0).is_err());
        assert!(validate_terms(dec!(1000), dec!(10), 361).is_err());
        assert!(validate_terms(dec!(1000), dec!(10), 360).is_ok());
    }

    #[test]
    fn test_extreme_rate_does_not_overflow() {
        let emi = installment(dec!(1_000_000), dec!(5000), 360);
        assert_eq!(emi, dec!(1_000_000) * periodic_rate(dec!(5000)));
    }

    #[test]
    fn test_installment_falls_with_duration() {
        let mut prev = installment(dec!(500_000), dec!(15), 1);
        for n in 2..=360 {
            let emi = installment(dec!(500_000), dec!(15), n);
            assert!(emi <= prev, "n = {n}");
            prev = emi;
        }
    }
}
