//! Node bindings for the loan calculator UI. Every function takes the input
//! struct as a JSON string and returns the computation envelope as JSON.

use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Serialize;

use loan_calc_core::affordability::{budget, solvers};
use loan_calc_core::amortization::{prepayment, schedule};
use loan_calc_core::analysis::loan_report;
use loan_calc_core::projection::tenure_curve;
use loan_calc_core::{installment as emi, LoanCalcResult};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Parse `input_json`, run `compute`, serialise the output.
fn call<I, O>(input_json: &str, compute: impl FnOnce(&I) -> LoanCalcResult<O>) -> NapiResult<String>
where
    I: serde::de::DeserializeOwned,
    O: Serialize,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = compute(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn installment(input_json: String) -> NapiResult<String> {
    call(&input_json, emi::calculate_installment)
}

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    call(&input_json, schedule::amortization_schedule)
}

#[napi]
pub fn max_borrowable(input_json: String) -> NapiResult<String> {
    call(&input_json, solvers::max_loan)
}

#[napi]
pub fn min_duration(input_json: String) -> NapiResult<String> {
    call(&input_json, solvers::min_duration)
}

#[napi]
pub fn tenure_projection(input_json: String) -> NapiResult<String> {
    call(&input_json, tenure_curve::tenure_projection)
}

#[napi]
pub fn prepayment_scenarios(input_json: String) -> NapiResult<String> {
    call(&input_json, prepayment::prepayment_scenarios)
}

#[napi]
pub fn budget_check(input_json: String) -> NapiResult<String> {
    call(&input_json, budget::budget_check)
}

#[napi]
pub fn analyze_loan(input_json: String) -> NapiResult<String> {
    call(&input_json, loan_report::analyze_loan)
}
