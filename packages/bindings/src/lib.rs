use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use finhealth_core::benchmarks::IndustryBenchmarks;
use finhealth_core::forecast::ScoreObservation;
use finhealth_core::FinancialSnapshot;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

#[napi]
pub fn assess_financial_health(snapshot_json: String) -> NapiResult<String> {
    let snapshot: FinancialSnapshot =
        serde_json::from_str(&snapshot_json).map_err(to_napi_error)?;
    let benchmarks = IndustryBenchmarks::standard();
    let output = finhealth_core::assessment::assess_financial_health(&snapshot, &benchmarks)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_ratios(snapshot_json: String) -> NapiResult<String> {
    let snapshot: FinancialSnapshot =
        serde_json::from_str(&snapshot_json).map_err(to_napi_error)?;
    let output = finhealth_core::ratios::calculate_ratios(&snapshot).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_credit_score(snapshot_json: String) -> NapiResult<String> {
    let snapshot: FinancialSnapshot =
        serde_json::from_str(&snapshot_json).map_err(to_napi_error)?;
    let ratios = finhealth_core::ratios::calculate_ratios(&snapshot)
        .map_err(to_napi_error)?
        .result;
    let output = finhealth_core::scoring::calculate_credit_score(&snapshot, &ratios)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_with_industry(snapshot_json: String) -> NapiResult<String> {
    let snapshot: FinancialSnapshot =
        serde_json::from_str(&snapshot_json).map_err(to_napi_error)?;
    let benchmarks = IndustryBenchmarks::standard();
    let ratios = finhealth_core::ratios::calculate_ratios(&snapshot)
        .map_err(to_napi_error)?
        .result;
    let output = benchmarks
        .compare_with_industry(&snapshot.industry, &ratios)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn industry_profile(industry: String) -> NapiResult<String> {
    let benchmarks = IndustryBenchmarks::standard();
    let output = benchmarks.industry_profile(&industry).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Forecasting
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ForecastRequest {
    /// Most-recent-first observations.
    history: Vec<ScoreObservation>,
    months: u32,
    as_of: NaiveDate,
}

#[napi]
pub fn generate_forecast(request_json: String) -> NapiResult<String> {
    let request: ForecastRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let output =
        finhealth_core::forecast::generate_forecast(&request.history, request.months, request.as_of)
            .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
