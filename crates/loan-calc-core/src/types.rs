use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates. Annual loan rates are carried as percentages (22 = 22% p.a.);
/// fee rates and normalised values as fractions.
pub type Rate = Decimal;

/// The parameter snapshot every computation starts from.
///
/// `extra_payment` and `monthly_budget` default to zero, which means
/// "no prepayment" and "no budget constraint" respectively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Amount borrowed.
    pub principal: Money,
    /// Annual nominal rate as a percentage (0 = interest-free).
    pub annual_rate_percent: Rate,
    /// Number of monthly periods.
    pub duration_months: u32,
    /// Amount paid on top of the installment every period.
    #[serde(default)]
    pub extra_payment: Money,
    /// Ceiling on what the borrower can pay per period.
    #[serde(default)]
    pub monthly_budget: Money,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Render a month count as `"{years}y {months}m"`, e.g. 30 -> `"2y 6m"`.
pub fn format_duration(months: u32) -> String {
    format!("{}y {}m", months / 12, months % 12)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0y 0m");
        assert_eq!(format_duration(11), "0y 11m");
        assert_eq!(format_duration(30), "2y 6m");
        assert_eq!(format_duration(120), "10y 0m");
    }

    #[test]
    fn test_loan_parameters_optional_fields_default_to_zero() {
        let json = r#"{"principal":"1000000","annual_rate_percent":"22","duration_months":60}"#;
        let params: LoanParameters = serde_json::from_str(json).unwrap();
        assert_eq!(params.principal, dec!(1_000_000));
        assert_eq!(params.extra_payment, Decimal::ZERO);
        assert_eq!(params.monthly_budget, Decimal::ZERO);
    }

    #[test]
    fn test_with_metadata_envelope() {
        let out = with_metadata("test", &serde_json::json!({"a": 1}), vec![], 7, dec!(1.5));
        assert_eq!(out.result, dec!(1.5));
        assert_eq!(out.metadata.computation_time_us, 7);
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    }
}
