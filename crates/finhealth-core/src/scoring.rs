use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::ratios::RatioSet;
use crate::types::{with_metadata, ComputationOutput, FinancialSnapshot, Industry, Money, Score};
use crate::FinHealthResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Letter ratings on the 8-bucket ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditRating {
    AAA,
    AA,
    A,
    BBB,
    BB,
    B,
    CCC,
    D,
}

impl CreditRating {
    /// Total, non-overlapping partition of [0, 100].
    pub fn from_score(score: Score) -> Self {
        if score >= dec!(90) {
            Self::AAA
        } else if score >= dec!(80) {
            Self::AA
        } else if score >= dec!(70) {
            Self::A
        } else if score >= dec!(60) {
            Self::BBB
        } else if score >= dec!(50) {
            Self::BB
        } else if score >= dec!(40) {
            Self::B
        } else if score >= dec!(30) {
            Self::CCC
        } else {
            Self::D
        }
    }
}

impl std::fmt::Display for CreditRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AAA => "AAA",
            Self::AA => "AA",
            Self::A => "A",
            Self::BBB => "BBB",
            Self::BB => "BB",
            Self::B => "B",
            Self::CCC => "CCC",
            Self::D => "D",
        };
        write!(f, "{}", s)
    }
}

/// 0–100 score per scored dimension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubScores {
    pub liquidity: Score,
    pub profitability: Score,
    pub leverage: Score,
    pub efficiency: Score,
    pub growth: Score,
}

/// Weight per dimension. The adjusted vector always sums to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionWeights {
    pub liquidity: Decimal,
    pub profitability: Decimal,
    pub leverage: Decimal,
    pub efficiency: Decimal,
    pub growth: Decimal,
}

impl DimensionWeights {
    pub fn sum(&self) -> Decimal {
        self.liquidity + self.profitability + self.leverage + self.efficiency + self.growth
    }
}

/// A recommendable lending product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanProduct {
    pub product: String,
    pub interest_rate: String,
    pub max_amount: String,
    pub tenure: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditAssessment {
    /// Composite score, clamped to [0, 100].
    pub overall_score: Score,
    pub rating: CreditRating,
    pub sub_scores: SubScores,
    /// The industry-adjusted weight vector actually applied.
    pub weights: DimensionWeights,
    /// Flat revenue-size bonus added after weighting, before clamping.
    pub size_bonus: Decimal,
    pub recommended_products: Vec<LoanProduct>,
}

// ---------------------------------------------------------------------------
// Band tables
//
// Each sub-score is a monotone step function: an ordered (threshold, score)
// list evaluated top-down, first satisfied threshold wins.
// ---------------------------------------------------------------------------

const CURRENT_RATIO_BANDS: [(Decimal, Decimal); 4] = [
    (dec!(2.0), dec!(100)),
    (dec!(1.5), dec!(80)),
    (dec!(1.0), dec!(60)),
    (dec!(0.8), dec!(40)),
];
const CURRENT_RATIO_FLOOR: Decimal = dec!(20);

const QUICK_RATIO_BANDS: [(Decimal, Decimal); 4] = [
    (dec!(1.5), dec!(100)),
    (dec!(1.0), dec!(80)),
    (dec!(0.8), dec!(60)),
    (dec!(0.5), dec!(40)),
];
const QUICK_RATIO_FLOOR: Decimal = dec!(20);

const PROFIT_MARGIN_BANDS: [(Decimal, Decimal); 5] = [
    (dec!(0.20), dec!(100)),
    (dec!(0.15), dec!(85)),
    (dec!(0.10), dec!(70)),
    (dec!(0.05), dec!(55)),
    (dec!(0), dec!(40)),
];
const PROFIT_MARGIN_FLOOR: Decimal = dec!(10);

const ROA_BANDS: [(Decimal, Decimal); 4] = [
    (dec!(0.15), dec!(100)),
    (dec!(0.10), dec!(80)),
    (dec!(0.05), dec!(60)),
    (dec!(0), dec!(40)),
];
const ROA_FLOOR: Decimal = dec!(10);

// Lower debt is better: evaluated with <= semantics.
const DEBT_TO_ASSET_BANDS: [(Decimal, Decimal); 4] = [
    (dec!(0.20), dec!(100)),
    (dec!(0.40), dec!(80)),
    (dec!(0.60), dec!(60)),
    (dec!(0.80), dec!(40)),
];
const DEBT_TO_ASSET_FLOOR: Decimal = dec!(20);

const EQUITY_RATIO_BANDS: [(Decimal, Decimal); 4] = [
    (dec!(0.80), dec!(100)),
    (dec!(0.60), dec!(80)),
    (dec!(0.40), dec!(60)),
    (dec!(0.20), dec!(40)),
];
const EQUITY_RATIO_FLOOR: Decimal = dec!(20);

const TURNOVER_BANDS: [(Decimal, Decimal); 4] = [
    (dec!(12), dec!(100)),
    (dec!(8), dec!(80)),
    (dec!(6), dec!(60)),
    (dec!(4), dec!(40)),
];
const TURNOVER_FLOOR: Decimal = dec!(20);

// Lower DSO is better: evaluated with <= semantics.
const DSO_BANDS: [(Decimal, Decimal); 4] = [
    (dec!(30), dec!(100)),
    (dec!(45), dec!(80)),
    (dec!(60), dec!(60)),
    (dec!(90), dec!(40)),
];
const DSO_FLOOR: Decimal = dec!(20);

const GROWTH_BANDS: [(Decimal, Decimal); 8] = [
    (dec!(0.30), dec!(100)),
    (dec!(0.20), dec!(85)),
    (dec!(0.15), dec!(70)),
    (dec!(0.10), dec!(60)),
    (dec!(0.05), dec!(50)),
    (dec!(0), dec!(40)),
    (dec!(-0.05), dec!(30)),
    (dec!(-0.10), dec!(20)),
];
const GROWTH_FLOOR: Decimal = dec!(10);

// Mixing coefficients for the two-ratio dimensions.
const LIQUIDITY_MIX_CURRENT: Decimal = dec!(0.6);
const LIQUIDITY_MIX_QUICK: Decimal = dec!(0.4);
const PROFITABILITY_MIX_MARGIN: Decimal = dec!(0.7);
const PROFITABILITY_MIX_ROA: Decimal = dec!(0.3);
const LEVERAGE_MIX_DEBT: Decimal = dec!(0.6);
const LEVERAGE_MIX_EQUITY: Decimal = dec!(0.4);
const EFFICIENCY_MIX_TURNOVER: Decimal = dec!(0.5);
const EFFICIENCY_MIX_DSO: Decimal = dec!(0.5);

const BASE_WEIGHTS: DimensionWeights = DimensionWeights {
    liquidity: dec!(0.25),
    profitability: dec!(0.30),
    leverage: dec!(0.25),
    efficiency: dec!(0.10),
    growth: dec!(0.10),
};

// Revenue breakpoints for the size bonus (10 lakh / 50 lakh / 1 crore).
const SIZE_TIER_SMALL: Money = dec!(1000000);
const SIZE_TIER_MEDIUM: Money = dec!(5000000);
const SIZE_TIER_LARGE: Money = dec!(10000000);

const MAX_SCORE: Decimal = dec!(100);

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Combine the five dimension sub-scores into a single 0–100 credit score
/// with rating and product recommendations.
///
/// Weights are adjusted per industry and renormalized to sum to 1.0; the
/// revenue-size bonus lands after weighting and before clamping. Unknown
/// industry tags score with the base weights.
pub fn calculate_credit_score(
    snapshot: &FinancialSnapshot,
    ratios: &RatioSet,
) -> FinHealthResult<ComputationOutput<CreditAssessment>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let industry = Industry::from_tag(&snapshot.industry);
    if industry.is_none() {
        warnings.push(format!(
            "Industry tag '{}' is not covered; scoring with base weights.",
            snapshot.industry
        ));
    }

    let sub_scores = SubScores {
        liquidity: score_liquidity(ratios),
        profitability: score_profitability(ratios),
        leverage: score_leverage(ratios),
        efficiency: score_efficiency(ratios),
        growth: score_growth(ratios),
    };

    let weights = adjust_weights_for_industry(industry);

    let weighted = sub_scores.liquidity * weights.liquidity
        + sub_scores.profitability * weights.profitability
        + sub_scores.leverage * weights.leverage
        + sub_scores.efficiency * weights.efficiency
        + sub_scores.growth * weights.growth;

    let size_bonus = size_adjustment(snapshot.revenue);
    let overall_score = (weighted + size_bonus).clamp(Decimal::ZERO, MAX_SCORE);
    let rating = CreditRating::from_score(overall_score);
    let recommended_products = recommended_products(overall_score);

    let assessment = CreditAssessment {
        overall_score,
        rating,
        sub_scores,
        weights,
        size_bonus,
        recommended_products,
    };

    Ok(with_metadata(
        "Weighted multi-factor credit scoring with industry and size adjustment",
        ratios,
        warnings,
        start.elapsed().as_micros() as u64,
        assessment,
    ))
}

/// Base weights nudged by the industry delta table, then renormalized so
/// the vector sums to exactly 1.0.
pub fn adjust_weights_for_industry(industry: Option<Industry>) -> DimensionWeights {
    let mut w = BASE_WEIGHTS;

    match industry {
        Some(Industry::Manufacturing) => {
            w.leverage += dec!(0.05);
            w.efficiency += dec!(0.05);
        }
        Some(Industry::Retail) => {
            w.liquidity += dec!(0.05);
            w.efficiency += dec!(0.05);
        }
        Some(Industry::Services) => {
            w.profitability += dec!(0.05);
            w.growth += dec!(0.05);
        }
        Some(Industry::Agriculture) => {
            w.growth -= dec!(0.05);
            w.leverage += dec!(0.05);
        }
        Some(Industry::Logistics) => {
            w.efficiency += dec!(0.10);
            w.leverage -= dec!(0.05);
        }
        Some(Industry::ECommerce) => {
            w.growth += dec!(0.10);
            w.liquidity -= dec!(0.05);
        }
        None => {}
    }

    let total = w.sum();
    DimensionWeights {
        liquidity: w.liquidity / total,
        profitability: w.profitability / total,
        leverage: w.leverage / total,
        efficiency: w.efficiency / total,
        growth: w.growth / total,
    }
}

// ---------------------------------------------------------------------------
// Sub-scores
// ---------------------------------------------------------------------------

fn score_liquidity(ratios: &RatioSet) -> Score {
    let current = score_at_least(ratios.current_ratio, &CURRENT_RATIO_BANDS, CURRENT_RATIO_FLOOR);
    let quick = score_at_least(ratios.quick_ratio, &QUICK_RATIO_BANDS, QUICK_RATIO_FLOOR);
    current * LIQUIDITY_MIX_CURRENT + quick * LIQUIDITY_MIX_QUICK
}

fn score_profitability(ratios: &RatioSet) -> Score {
    let margin = score_at_least(ratios.profit_margin, &PROFIT_MARGIN_BANDS, PROFIT_MARGIN_FLOOR);
    let roa = score_at_least(ratios.roa, &ROA_BANDS, ROA_FLOOR);
    margin * PROFITABILITY_MIX_MARGIN + roa * PROFITABILITY_MIX_ROA
}

fn score_leverage(ratios: &RatioSet) -> Score {
    let debt = score_at_most(
        ratios.debt_to_asset_ratio,
        &DEBT_TO_ASSET_BANDS,
        DEBT_TO_ASSET_FLOOR,
    );
    let equity = score_at_least(ratios.equity_ratio, &EQUITY_RATIO_BANDS, EQUITY_RATIO_FLOOR);
    debt * LEVERAGE_MIX_DEBT + equity * LEVERAGE_MIX_EQUITY
}

fn score_efficiency(ratios: &RatioSet) -> Score {
    let turnover = score_at_least(ratios.receivables_turnover, &TURNOVER_BANDS, TURNOVER_FLOOR);
    let dso = score_at_most(ratios.days_sales_outstanding, &DSO_BANDS, DSO_FLOOR);
    turnover * EFFICIENCY_MIX_TURNOVER + dso * EFFICIENCY_MIX_DSO
}

fn score_growth(ratios: &RatioSet) -> Score {
    score_at_least(ratios.revenue_growth_rate, &GROWTH_BANDS, GROWTH_FLOOR)
}

/// First band where `value >= threshold` wins; higher values score higher.
fn score_at_least(value: Decimal, bands: &[(Decimal, Decimal)], floor: Score) -> Score {
    bands
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map(|(_, score)| *score)
        .unwrap_or(floor)
}

/// First band where `value <= threshold` wins; lower values score higher.
fn score_at_most(value: Decimal, bands: &[(Decimal, Decimal)], floor: Score) -> Score {
    bands
        .iter()
        .find(|(threshold, _)| value <= *threshold)
        .map(|(_, score)| *score)
        .unwrap_or(floor)
}

// ---------------------------------------------------------------------------
// Size bonus and products
// ---------------------------------------------------------------------------

fn size_adjustment(revenue: Money) -> Decimal {
    if revenue >= SIZE_TIER_LARGE {
        dec!(5)
    } else if revenue >= SIZE_TIER_MEDIUM {
        dec!(3)
    } else if revenue >= SIZE_TIER_SMALL {
        dec!(1)
    } else {
        Decimal::ZERO
    }
}

fn product(name: &str, rate: &str, max_amount: &str, tenure: &str) -> LoanProduct {
    LoanProduct {
        product: name.to_string(),
        interest_rate: rate.to_string(),
        max_amount: max_amount.to_string(),
        tenure: tenure.to_string(),
    }
}

/// Product shelf keyed by score band (>= 70, >= 50, below).
pub fn recommended_products(score: Score) -> Vec<LoanProduct> {
    if score >= dec!(70) {
        vec![
            product("Term Loan", "8.5-10.5%", "Up to 5 Crores", "1-7 years"),
            product(
                "Working Capital Loan",
                "9.0-11.0%",
                "Up to 2 Crores",
                "12 months",
            ),
        ]
    } else if score >= dec!(50) {
        vec![
            product("MSME Loan", "10.0-12.0%", "Up to 1 Crore", "1-5 years"),
            product(
                "Invoice Financing",
                "12.0-15.0%",
                "Up to 50 Lakhs",
                "30-90 days",
            ),
        ]
    } else {
        vec![
            product(
                "Secured Business Loan",
                "12.0-16.0%",
                "Up to 25 Lakhs",
                "1-3 years",
            ),
            product(
                "Merchant Cash Advance",
                "15.0-20.0%",
                "Up to 10 Lakhs",
                "3-12 months",
            ),
        ]
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratios;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn services_snapshot() -> FinancialSnapshot {
        FinancialSnapshot {
            revenue: dec!(1000000),
            total_expenses: dec!(850000),
            current_assets: dec!(400000),
            current_liabilities: dec!(200000),
            total_assets: dec!(1200000),
            total_debt: dec!(360000),
            revenue_growth_rate: dec!(0.12),
            industry: "services".to_string(),
            ..Default::default()
        }
    }

    fn assessment_for(snapshot: &FinancialSnapshot) -> CreditAssessment {
        let ratios = ratios::derive(snapshot);
        calculate_credit_score(snapshot, &ratios).unwrap().result
    }

    fn approx_eq(a: Decimal, b: Decimal, eps: Decimal) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_services_scenario_lands_in_the_a_range() {
        let assessment = assessment_for(&services_snapshot());
        assert!(
            assessment.overall_score >= dec!(70) && assessment.overall_score <= dec!(89),
            "score {} outside expected range",
            assessment.overall_score
        );
        assert!(matches!(
            assessment.rating,
            CreditRating::A | CreditRating::AA
        ));
    }

    #[test]
    fn test_services_scenario_sub_scores() {
        let assessment = assessment_for(&services_snapshot());
        assert_eq!(assessment.sub_scores.liquidity, dec!(100));
        assert_eq!(assessment.sub_scores.leverage, dec!(80));
        assert_eq!(assessment.sub_scores.growth, dec!(60));
        // margin 0.15 -> 85, roa 0.125 -> 80: 0.7/0.3 blend
        assert_eq!(assessment.sub_scores.profitability, dec!(83.5));
    }

    #[test]
    fn test_weights_sum_to_one_for_every_industry() {
        for industry in Industry::ALL {
            let weights = adjust_weights_for_industry(Some(industry));
            assert!(
                approx_eq(weights.sum(), Decimal::ONE, dec!(0.000000001)),
                "{} weights sum to {}",
                industry,
                weights.sum()
            );
        }
        let base = adjust_weights_for_industry(None);
        assert!(approx_eq(base.sum(), Decimal::ONE, dec!(0.000000001)));
    }

    #[test]
    fn test_unknown_industry_uses_base_weights() {
        let weights = adjust_weights_for_industry(Industry::from_tag("unknown_tag"));
        assert_eq!(weights.liquidity, dec!(0.25));
        assert_eq!(weights.profitability, dec!(0.30));
        assert_eq!(weights.leverage, dec!(0.25));
        assert_eq!(weights.efficiency, dec!(0.10));
        assert_eq!(weights.growth, dec!(0.10));
    }

    #[test]
    fn test_logistics_shifts_weight_toward_efficiency() {
        let weights = adjust_weights_for_industry(Some(Industry::Logistics));
        assert!(weights.efficiency > weights.growth);
        // +0.10 efficiency, -0.05 leverage keeps the total at 1.05 before renormalizing
        assert!(approx_eq(weights.efficiency, dec!(0.20) / dec!(1.05), dec!(0.000000001)));
    }

    #[test]
    fn test_score_is_clamped_to_100() {
        let snapshot = FinancialSnapshot {
            revenue: dec!(50000000),
            total_expenses: dec!(30000000),
            current_assets: dec!(30000000),
            current_liabilities: dec!(5000000),
            total_assets: dec!(60000000),
            total_debt: dec!(5000000),
            accounts_receivable: dec!(2000000),
            revenue_growth_rate: dec!(0.50),
            industry: "services".to_string(),
            ..Default::default()
        };
        let assessment = assessment_for(&snapshot);
        assert_eq!(assessment.overall_score, dec!(100));
        assert_eq!(assessment.rating, CreditRating::AAA);
        assert_eq!(assessment.size_bonus, dec!(5));
    }

    #[test]
    fn test_score_never_negative_for_distressed_company() {
        let snapshot = FinancialSnapshot {
            revenue: dec!(100000),
            total_expenses: dec!(400000),
            current_assets: dec!(10000),
            current_liabilities: dec!(300000),
            total_assets: dec!(120000),
            total_debt: dec!(119000),
            revenue_growth_rate: dec!(-0.60),
            industry: "retail".to_string(),
            ..Default::default()
        };
        let assessment = assessment_for(&snapshot);
        assert!(assessment.overall_score >= Decimal::ZERO);
        assert_eq!(assessment.rating, CreditRating::D);
    }

    #[test]
    fn test_rating_ladder_partitions_0_to_100() {
        assert_eq!(CreditRating::from_score(dec!(100)), CreditRating::AAA);
        assert_eq!(CreditRating::from_score(dec!(90)), CreditRating::AAA);
        assert_eq!(CreditRating::from_score(dec!(89.99)), CreditRating::AA);
        assert_eq!(CreditRating::from_score(dec!(80)), CreditRating::AA);
        assert_eq!(CreditRating::from_score(dec!(70)), CreditRating::A);
        assert_eq!(CreditRating::from_score(dec!(60)), CreditRating::BBB);
        assert_eq!(CreditRating::from_score(dec!(50)), CreditRating::BB);
        assert_eq!(CreditRating::from_score(dec!(40)), CreditRating::B);
        assert_eq!(CreditRating::from_score(dec!(30)), CreditRating::CCC);
        assert_eq!(CreditRating::from_score(dec!(29.99)), CreditRating::D);
        assert_eq!(CreditRating::from_score(Decimal::ZERO), CreditRating::D);
    }

    #[test]
    fn test_size_adjustment_tiers() {
        assert_eq!(size_adjustment(dec!(999999)), Decimal::ZERO);
        assert_eq!(size_adjustment(dec!(1000000)), dec!(1));
        assert_eq!(size_adjustment(dec!(4999999)), dec!(1));
        assert_eq!(size_adjustment(dec!(5000000)), dec!(3));
        assert_eq!(size_adjustment(dec!(10000000)), dec!(5));
        assert_eq!(size_adjustment(dec!(250000000)), dec!(5));
    }

    #[test]
    fn test_band_helpers_first_match_wins() {
        assert_eq!(
            score_at_least(dec!(2.5), &CURRENT_RATIO_BANDS, CURRENT_RATIO_FLOOR),
            dec!(100)
        );
        assert_eq!(
            score_at_least(dec!(1.0), &CURRENT_RATIO_BANDS, CURRENT_RATIO_FLOOR),
            dec!(60)
        );
        assert_eq!(
            score_at_least(dec!(0.3), &CURRENT_RATIO_BANDS, CURRENT_RATIO_FLOOR),
            dec!(20)
        );
        assert_eq!(score_at_most(dec!(0.20), &DEBT_TO_ASSET_BANDS, DEBT_TO_ASSET_FLOOR), dec!(100));
        assert_eq!(score_at_most(dec!(0.95), &DEBT_TO_ASSET_BANDS, DEBT_TO_ASSET_FLOOR), dec!(20));
    }

    #[test]
    fn test_band_scores_are_monotone() {
        let values = [dec!(0.2), dec!(0.8), dec!(1.0), dec!(1.5), dec!(2.0), dec!(5.0)];
        let mut last = Decimal::ZERO;
        for v in values {
            let s = score_at_least(v, &CURRENT_RATIO_BANDS, CURRENT_RATIO_FLOOR);
            assert!(s >= last, "score regressed at {}", v);
            last = s;
        }
    }

    #[test]
    fn test_unbounded_liquidity_scores_top_band() {
        let mut snapshot = services_snapshot();
        snapshot.current_liabilities = Decimal::ZERO;
        let assessment = assessment_for(&snapshot);
        assert_eq!(assessment.sub_scores.liquidity, dec!(100));
    }

    #[test]
    fn test_product_tiers() {
        let prime: Vec<String> = recommended_products(dec!(82))
            .into_iter()
            .map(|p| p.product)
            .collect();
        assert_eq!(prime, vec!["Term Loan", "Working Capital Loan"]);

        let mid: Vec<String> = recommended_products(dec!(55))
            .into_iter()
            .map(|p| p.product)
            .collect();
        assert_eq!(mid, vec!["MSME Loan", "Invoice Financing"]);

        let sub: Vec<String> = recommended_products(dec!(35))
            .into_iter()
            .map(|p| p.product)
            .collect();
        assert_eq!(sub, vec!["Secured Business Loan", "Merchant Cash Advance"]);
    }

    #[test]
    fn test_unknown_industry_records_warning() {
        let mut snapshot = services_snapshot();
        snapshot.industry = "unknown_tag".to_string();
        let ratios = ratios::derive(&snapshot);
        let out = calculate_credit_score(&snapshot, &ratios).unwrap();
        assert!(!out.warnings.is_empty());
        assert_eq!(out.result.weights.profitability, dec!(0.30));
    }

    #[test]
    fn test_zero_revenue_scores_without_panicking() {
        let snapshot = FinancialSnapshot {
            industry: "services".to_string(),
            ..Default::default()
        };
        let assessment = assessment_for(&snapshot);
        assert!(assessment.overall_score >= Decimal::ZERO);
        assert!(assessment.overall_score <= dec!(100));
    }
}
