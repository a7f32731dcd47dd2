pub mod error;
pub mod installment;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "affordability")]
pub mod affordability;

#[cfg(feature = "projection")]
pub mod projection;

#[cfg(feature = "analysis")]
pub mod analysis;

pub use error::LoanCalcError;
pub use types::*;

/// Standard result type for all loan-calc operations
pub type LoanCalcResult<T> = Result<T, LoanCalcError>;
