//! Sweet-spot detection on a projection curve.
//!
//! Both series are min-max normalised to [0, 1] so that a falling installment
//! and a rising total interest can be compared on one scale; the sweet spot is
//! where the normalised curves cross, linearly interpolated between samples.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::projection::tenure_curve::ProjectionPoint;
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equilibrium {
    /// Interpolated crossing point, in (fractional) months.
    pub duration_months: Decimal,
    /// Sampled duration closest to the crossing.
    pub nearest_sample_months: u32,
    /// Installment at the nearest sample.
    pub installment: Money,
    /// Total interest at the nearest sample.
    pub total_interest: Money,
}

/// Find where the normalised installment and total-interest curves cross.
///
/// `points` must be in ascending duration order, as produced by
/// [`project`](crate::projection::tenure_curve::project). Returns `None` for
/// fewer than two points, a flat series, or no crossing.
pub fn find_equilibrium(points: &[ProjectionPoint]) -> Option<Equilibrium> {
    if points.len() < 2 {
        return None;
    }

    let installments = normalise(points.iter().map(|p| p.installment))?;
    let interests = normalise(points.iter().map(|p| p.total_interest))?;
    let gaps: Vec<Decimal> = installments
        .iter()
        .zip(interests.iter())
        .map(|(i, t)| i - t)
        .collect();

    for i in 0..points.len() - 1 {
        let (g0, g1) = (gaps[i], gaps[i + 1]);

        if g0.is_zero() {
            return Some(at_sample(&points[i], Decimal::from(points[i].duration_months)));
        }
        if g0.is_sign_positive() != g1.is_sign_positive() || g1.is_zero() {
            let t = g0 / (g0 - g1);
            let d0 = Decimal::from(points[i].duration_months);
            let d1 = Decimal::from(points[i + 1].duration_months);
            let crossing = d0 + t * (d1 - d0);
            let nearest = if t <= dec!(0.5) { &points[i] } else { &points[i + 1] };
            return Some(at_sample(nearest, crossing));
        }
    }

    None
}

fn at_sample(point: &ProjectionPoint, crossing: Decimal) -> Equilibrium {
    Equilibrium {
        duration_months: crossing,
        nearest_sample_months: point.duration_months,
        installment: point.installment,
        total_interest: point.total_interest,
    }
}

/// Min-max scale to [0, 1]; `None` when the series is flat.
fn normalise(values: impl Iterator<Item = Decimal> + Clone) -> Option<Vec<Decimal>> {
    let min = values.clone().min()?;
    let max = values.clone().max()?;
    let range = max - min;
    if range.is_zero() {
        return None;
    }
    Some(values.map(|v| (v - min) / range).collect())
}
