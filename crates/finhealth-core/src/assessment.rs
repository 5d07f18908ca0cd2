use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::benchmarks::{IndustryBenchmarks, IndustryComparison};
use crate::ratios::{self, RatioSet};
use crate::recommendations::{self, CostSaving};
use crate::risk::{self, RiskProfile};
use crate::scoring::{self, CreditAssessment, CreditRating};
use crate::types::{with_metadata, ComputationOutput, FinancialSnapshot, Score};
use crate::FinHealthResult;

// ---------------------------------------------------------------------------
// Output type
// ---------------------------------------------------------------------------

/// The complete health picture for one snapshot: the credit score doubles
/// as the overall health score stored for forecasting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub overall_health_score: Score,
    pub rating: CreditRating,
    pub financial_ratios: RatioSet,
    pub credit_assessment: CreditAssessment,
    pub risk_analysis: RiskProfile,
    pub industry_comparison: IndustryComparison,
    pub recommendations: Vec<String>,
    pub cost_optimization: Vec<CostSaving>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the full pipeline over one snapshot: ratios, risk rules, credit
/// score, industry comparison, recommendations, and cost savings.
///
/// Component warnings are merged into the combined envelope.
pub fn assess_financial_health(
    snapshot: &FinancialSnapshot,
    benchmarks: &IndustryBenchmarks,
) -> FinHealthResult<ComputationOutput<HealthAssessment>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let ratio_out = ratios::calculate_ratios(snapshot)?;
    warnings.extend(ratio_out.warnings);
    let financial_ratios = ratio_out.result;

    let risk_out = risk::assess_risks(snapshot, &financial_ratios)?;
    warnings.extend(risk_out.warnings);

    let credit_out = scoring::calculate_credit_score(snapshot, &financial_ratios)?;
    warnings.extend(credit_out.warnings);
    let credit_assessment = credit_out.result;

    let comparison_out = benchmarks.compare_with_industry(&snapshot.industry, &financial_ratios)?;
    warnings.extend(comparison_out.warnings);

    let recommendations_out = recommendations::generate_recommendations(snapshot, &financial_ratios)?;
    let cost_out = recommendations::identify_cost_savings(snapshot)?;

    let assessment = HealthAssessment {
        overall_health_score: credit_assessment.overall_score,
        rating: credit_assessment.rating,
        financial_ratios,
        credit_assessment,
        risk_analysis: risk_out.result,
        industry_comparison: comparison_out.result,
        recommendations: recommendations_out.result,
        cost_optimization: cost_out.result,
    };

    Ok(with_metadata(
        "Composite financial health assessment across ratios, risk, credit, and benchmarks",
        snapshot,
        warnings,
        start.elapsed().as_micros() as u64,
        assessment,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
