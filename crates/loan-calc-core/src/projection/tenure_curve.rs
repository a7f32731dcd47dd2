//! Installment vs. total-interest trade-off across a range of durations.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LoanCalcError;
use crate::installment::{installment, validate_terms};
use crate::projection::equilibrium::{find_equilibrium, Equilibrium};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::LoanCalcResult;

pub const DEFAULT_MIN_MONTHS: u32 = 6;
pub const DEFAULT_MAX_MONTHS: u32 = 120;
pub const DEFAULT_STEP_MONTHS: u32 = 6;
/// Upper bound used when the borrower has a budget to fit.
pub const BUDGET_MAX_MONTHS: u32 = 240;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub duration_months: u32,
    pub installment: Money,
    pub total_interest: Money,
    pub total_payment: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub principal: Money,
    pub annual_rate_percent: Rate,
    #[serde(default = "default_min_months")]
    pub min_months: u32,
    #[serde(default = "default_max_months")]
    pub max_months: u32,
    #[serde(default = "default_step_months")]
    pub step_months: u32,
}

fn default_min_months() -> u32 {
    DEFAULT_MIN_MONTHS
}

fn default_max_months() -> u32 {
    DEFAULT_MAX_MONTHS
}

fn default_step_months() -> u32 {
    DEFAULT_STEP_MONTHS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionOutput {
    pub points: Vec<ProjectionPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equilibrium: Option<Equilibrium>,
}

/// Sample durations `min_months, min_months + step, ...` up to and including
/// `max_months`, in ascending order.
///
/// A zero step yields no points.
pub fn project(
    principal: Money,
    annual_rate_percent: Rate,
    min_months: u32,
    max_months: u32,
    step_months: u32,
) -> Vec<ProjectionPoint> {
    if step_months == 0 || min_months > max_months {
        return Vec::new();
    }

    (min_months..=max_months)
        .step_by(step_months as usize)
        .map(|n| {
            let emi = installment(principal, annual_rate_percent, n);
            let total_payment = emi * Decimal::from(n);
            ProjectionPoint {
                duration_months: n,
                installment: emi,
                total_interest: total_payment - principal,
                total_payment,
            }
        })
        .collect()
}

/// `project` over the default 6..=120 month grid.
pub fn project_default(principal: Money, annual_rate_percent: Rate) -> Vec<ProjectionPoint> {
    project(
        principal,
        annual_rate_percent,
        DEFAULT_MIN_MONTHS,
        DEFAULT_MAX_MONTHS,
        DEFAULT_STEP_MONTHS,
    )
}

/// Validated trade-off curve plus its sweet spot.
pub fn tenure_projection(input: &ProjectionInput) -> LoanCalcResult<ComputationOutput<ProjectionOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_terms(input.principal, input.annual_rate_percent, input.max_months.max(1))?;
    if input.step_months == 0 {
        return Err(LoanCalcError::InvalidInput {
            field: "step_months".into(),
            reason: "Step must be at least one month".into(),
        });
    }
    if input.min_months == 0 || input.min_months > input.max_months {
        return Err(LoanCalcError::InvalidInput {
            field: "min_months".into(),
            reason: format!("Minimum must be between 1 and max_months ({})", input.max_months),
        });
    }

    let points = project(
        input.principal,
        input.annual_rate_percent,
        input.min_months,
        input.max_months,
        input.step_months,
    );
    let equilibrium = find_equilibrium(&points);
    if equilibrium.is_none() {
        warnings.push("No installment / interest crossing within the sampled range".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        &format!(
            "Installment and total interest sampled every {} months",
            input.step_months
        ),
        input,
        warnings,
        elapsed,
        ProjectionOutput { points, equilibrium },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_grid() {
        let points = project_default(dec!(1_000_000), dec!(22));
        assert_eq!(points.len(), 20);
        assert_eq!(points.first().unwrap().duration_months, 6);
        assert_eq!(points.last().unwrap().duration_months, 120);
        for pair in points.windows(2) {
            assert_eq!(pair[1].duration_months - pair[0].duration_months, 6);
        }
    }

    #[test]
    fn test_max_is_inclusive_only_on_grid() {
        let points = project(dec!(100_000), dec!(10), 6, 20, 6);
        let durations: Vec<u32> = points.iter().map(|p| p.duration_months).collect();
        assert_eq!(durations, vec![6, 12, 18]);
    }

    #[test]
    fn test_trade_off_shape() {
        let points = project(dec!(1_000_000), dec!(22), 6, 240, 6);
        for pair in points.windows(2) {
            assert!(pair[1].installment <= pair[0].installment);
            assert!(pair[1].total_interest >= pair[0].total_interest);
        }
    }

    #[test]
    fn test_point_totals() {
        let points = project(dec!(1_200_000), Decimal::ZERO, 12, 12, 6);
        assert_eq!(
            points,
            vec![ProjectionPoint {
                duration_months: 12,
                installment: dec!(100_000),
                total_interest: Decimal::ZERO,
                total_payment: dec!(1_200_000),
            }]
        );
    }

    #[test]
    fn test_degenerate_ranges() {
        assert!(project(dec!(1_000), dec!(10), 6, 120, 0).is_empty());
        assert!(project(dec!(1_000), dec!(10), 130, 120, 6).is_empty());
    }

    #[test]
    fn test_tenure_projection_envelope() {
        let input: ProjectionInput =
            serde_json::from_str(r#"{"principal":"1000000","annual_rate_percent":"22"}"#).unwrap();
        assert_eq!(input.max_months, 120);
        let out = tenure_projection(&input).unwrap();
        assert_eq!(out.result.points.len(), 20);
        assert!(out.result.equilibrium.is_some());
    }

    #[test]
    fn test_tenure_projection_rejects_zero_step() {
        let input = ProjectionInput {
            principal: dec!(1_000_000),
            annual_rate_percent: dec!(22),
            min_months: 6,
            max_months: 120,
            step_months: 0,
        };
        assert!(tenure_projection(&input).is_err());
    }
}
