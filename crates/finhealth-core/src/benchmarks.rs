use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

use crate::error::FinHealthError;
use crate::ratios::RatioSet;
use crate::types::{with_metadata, ComputationOutput, Industry, Score, UNBOUNDED};
use crate::FinHealthResult;

// ---------------------------------------------------------------------------
// Table types
// ---------------------------------------------------------------------------

/// Industry distribution of one metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Quartiles {
    pub q1: Decimal,
    pub median: Decimal,
    pub q3: Decimal,
}

/// Quartiles for the five tracked metrics of one industry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndustryQuartiles {
    pub current_ratio: Quartiles,
    pub profit_margin: Quartiles,
    pub debt_to_asset_ratio: Quartiles,
    pub revenue_growth_rate: Quartiles,
    pub days_sales_outstanding: Quartiles,
}

/// The metrics with benchmark coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkMetric {
    CurrentRatio,
    ProfitMargin,
    DebtToAssetRatio,
    RevenueGrowthRate,
    DaysSalesOutstanding,
}

impl BenchmarkMetric {
    pub const ALL: [BenchmarkMetric; 5] = [
        BenchmarkMetric::CurrentRatio,
        BenchmarkMetric::ProfitMargin,
        BenchmarkMetric::DebtToAssetRatio,
        BenchmarkMetric::RevenueGrowthRate,
        BenchmarkMetric::DaysSalesOutstanding,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::CurrentRatio => "Current Ratio",
            Self::ProfitMargin => "Profit Margin",
            Self::DebtToAssetRatio => "Debt-to-Asset Ratio",
            Self::RevenueGrowthRate => "Revenue Growth Rate",
            Self::DaysSalesOutstanding => "Days Sales Outstanding",
        }
    }

    fn company_value(&self, ratios: &RatioSet) -> Decimal {
        match self {
            Self::CurrentRatio => ratios.current_ratio,
            Self::ProfitMargin => ratios.profit_margin,
            Self::DebtToAssetRatio => ratios.debt_to_asset_ratio,
            Self::RevenueGrowthRate => ratios.revenue_growth_rate,
            Self::DaysSalesOutstanding => ratios.days_sales_outstanding,
        }
    }

    fn remediation(&self) -> &'static str {
        match self {
            Self::CurrentRatio => "Improve working capital management",
            Self::ProfitMargin => "Optimize cost structure and pricing",
            Self::DebtToAssetRatio => "Reduce debt levels or increase assets",
            Self::RevenueGrowthRate => "Develop growth strategies",
            Self::DaysSalesOutstanding => "Improve collections and credit policies",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceRating {
    Excellent,
    #[serde(rename = "Above Average")]
    AboveAverage,
    #[serde(rename = "Below Average")]
    BelowAverage,
    Poor,
}

impl PerformanceRating {
    pub fn from_percentile(percentile: Score) -> Self {
        if percentile >= dec!(75) {
            Self::Excellent
        } else if percentile >= dec!(50) {
            Self::AboveAverage
        } else if percentile >= dec!(25) {
            Self::BelowAverage
        } else {
            Self::Poor
        }
    }
}

impl std::fmt::Display for PerformanceRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "Excellent"),
            Self::AboveAverage => write!(f, "Above Average"),
            Self::BelowAverage => write!(f, "Below Average"),
            Self::Poor => write!(f, "Poor"),
        }
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricComparison {
    pub metric: BenchmarkMetric,
    pub company_value: Decimal,
    pub industry_q1: Decimal,
    pub industry_median: Decimal,
    pub industry_q3: Decimal,
    pub percentile: Score,
    pub performance: PerformanceRating,
    pub comparison_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndustryComparison {
    /// The tag the caller supplied.
    pub industry: String,
    /// The industry whose table was actually used (fallback: services).
    pub benchmark_industry: Industry,
    /// Unweighted mean percentile across the compared metrics.
    pub overall_percentile: Score,
    pub overall_performance: PerformanceRating,
    pub metric_comparisons: Vec<MetricComparison>,
    pub industry_insights: Vec<String>,
    pub recommended_focus_areas: Vec<String>,
}

/// Full profile of one industry: quartile table, KPIs, characteristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndustryProfile {
    pub industry: Industry,
    pub benchmarks: IndustryQuartiles,
    pub key_performance_indicators: Vec<String>,
    pub characteristics: IndustryCharacteristics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndustryCharacteristics {
    pub typical_margins: String,
    pub capital_intensity: String,
    pub seasonality: String,
    pub key_challenges: Vec<String>,
}

// ---------------------------------------------------------------------------
// Benchmark table
// ---------------------------------------------------------------------------

const fn quartiles(q1: Decimal, median: Decimal, q3: Decimal) -> Quartiles {
    Quartiles { q1, median, q3 }
}

/// Process-wide, read-only industry reference data. Built once at startup
/// and injected into callers; never mutated afterwards, so any number of
/// concurrent readers may consult it without synchronization.
#[derive(Debug, Clone)]
pub struct IndustryBenchmarks {
    table: HashMap<Industry, IndustryQuartiles>,
}

impl IndustryBenchmarks {
    /// The standard table. Tests may build substitutes via `from_table`.
    pub fn standard() -> Self {
        let mut table = HashMap::new();
        table.insert(
            Industry::Manufacturing,
            IndustryQuartiles {
                current_ratio: quartiles(dec!(1.2), dec!(1.8), dec!(2.5)),
                profit_margin: quartiles(dec!(0.08), dec!(0.12), dec!(0.18)),
                debt_to_asset_ratio: quartiles(dec!(0.30), dec!(0.45), dec!(0.60)),
                revenue_growth_rate: quartiles(dec!(0.03), dec!(0.08), dec!(0.15)),
                days_sales_outstanding: quartiles(dec!(30), dec!(45), dec!(60)),
            },
        );
        table.insert(
            Industry::Retail,
            IndustryQuartiles {
                current_ratio: quartiles(dec!(1.0), dec!(1.5), dec!(2.2)),
                profit_margin: quartiles(dec!(0.04), dec!(0.08), dec!(0.12)),
                debt_to_asset_ratio: quartiles(dec!(0.35), dec!(0.50), dec!(0.65)),
                revenue_growth_rate: quartiles(dec!(0.02), dec!(0.06), dec!(0.12)),
                days_sales_outstanding: quartiles(dec!(10), dec!(15), dec!(25)),
            },
        );
        table.insert(
            Industry::Services,
            IndustryQuartiles {
                current_ratio: quartiles(dec!(1.3), dec!(2.0), dec!(3.0)),
                profit_margin: quartiles(dec!(0.10), dec!(0.15), dec!(0.22)),
                debt_to_asset_ratio: quartiles(dec!(0.20), dec!(0.35), dec!(0.50)),
                revenue_growth_rate: quartiles(dec!(0.05), dec!(0.12), dec!(0.20)),
                days_sales_outstanding: quartiles(dec!(25), dec!(35), dec!(50)),
            },
        );
        table.insert(
            Industry::Agriculture,
            IndustryQuartiles {
                current_ratio: quartiles(dec!(1.1), dec!(1.6), dec!(2.3)),
                profit_margin: quartiles(dec!(0.05), dec!(0.10), dec!(0.16)),
                debt_to_asset_ratio: quartiles(dec!(0.40), dec!(0.55), dec!(0.70)),
                revenue_growth_rate: quartiles(dec!(-0.02), dec!(0.04), dec!(0.10)),
                days_sales_outstanding: quartiles(dec!(20), dec!(30), dec!(45)),
            },
        );
        table.insert(
            Industry::Logistics,
            IndustryQuartiles {
                current_ratio: quartiles(dec!(1.0), dec!(1.4), dec!(1.9)),
                profit_margin: quartiles(dec!(0.03), dec!(0.06), dec!(0.10)),
                debt_to_asset_ratio: quartiles(dec!(0.45), dec!(0.60), dec!(0.75)),
                revenue_growth_rate: quartiles(dec!(0.04), dec!(0.10), dec!(0.18)),
                days_sales_outstanding: quartiles(dec!(30), dec!(40), dec!(55)),
            },
        );
        table.insert(
            Industry::ECommerce,
            IndustryQuartiles {
                current_ratio: quartiles(dec!(0.9), dec!(1.3), dec!(1.8)),
                profit_margin: quartiles(dec!(0.01), dec!(0.05), dec!(0.12)),
                debt_to_asset_ratio: quartiles(dec!(0.25), dec!(0.40), dec!(0.55)),
                revenue_growth_rate: quartiles(dec!(0.10), dec!(0.25), dec!(0.45)),
                days_sales_outstanding: quartiles(dec!(15), dec!(20), dec!(30)),
            },
        );
        Self { table }
    }

    /// Build from an explicit table, for tests and alternative data sources.
    pub fn from_table(table: HashMap<Industry, IndustryQuartiles>) -> Self {
        Self { table }
    }

    /// Resolve a free-form tag to a covered industry, falling back to
    /// services for anything unknown.
    pub fn resolve(&self, tag: &str) -> Industry {
        Industry::from_tag(tag)
            .filter(|i| self.table.contains_key(i))
            .unwrap_or(Industry::Services)
    }

    pub fn quartiles_for(&self, industry: Industry) -> Option<&IndustryQuartiles> {
        self.table.get(&industry)
    }

    // -----------------------------------------------------------------------
    // Comparison
    // -----------------------------------------------------------------------

    /// Rank each tracked ratio against the industry's quartile table and
    /// summarize overall standing, insights, and focus areas.
    pub fn compare_with_industry(
        &self,
        industry_tag: &str,
        ratios: &RatioSet,
    ) -> FinHealthResult<ComputationOutput<IndustryComparison>> {
        let start = Instant::now();
        let mut warnings: Vec<String> = Vec::new();

        let resolved = self.resolve(industry_tag);
        if Industry::from_tag(industry_tag) != Some(resolved) {
            warnings.push(format!(
                "Industry tag '{}' has no benchmark coverage; using the services table.",
                industry_tag
            ));
        }

        let quartile_set = self
            .table
            .get(&resolved)
            .ok_or_else(|| FinHealthError::InvalidInput {
                field: "industry".to_string(),
                reason: format!("No benchmark table for '{}'.", resolved),
            })?;

        let mut metric_comparisons = Vec::with_capacity(BenchmarkMetric::ALL.len());
        let mut percentile_sum = Decimal::ZERO;

        for metric in BenchmarkMetric::ALL {
            let value = metric.company_value(ratios);
            let q = metric_quartiles(quartile_set, metric);
            let percentile = interpolate_percentile(value, &q);
            percentile_sum += percentile;

            metric_comparisons.push(MetricComparison {
                metric,
                company_value: value,
                industry_q1: q.q1,
                industry_median: q.median,
                industry_q3: q.q3,
                percentile,
                performance: PerformanceRating::from_percentile(percentile),
                comparison_text: comparison_text(metric, percentile, value, &q),
            });
        }

        let overall_percentile = percentile_sum / Decimal::from(BenchmarkMetric::ALL.len() as u64);
        let overall_performance = PerformanceRating::from_percentile(overall_percentile);

        let comparison = IndustryComparison {
            industry: industry_tag.to_string(),
            benchmark_industry: resolved,
            overall_percentile,
            overall_performance,
            industry_insights: industry_insights(resolved, overall_percentile),
            recommended_focus_areas: focus_areas(&metric_comparisons),
            metric_comparisons,
        };

        Ok(with_metadata(
            "Quartile-based industry percentile ranking via piecewise-linear interpolation",
            &serde_json::json!({ "benchmark_industry": resolved }),
            warnings,
            start.elapsed().as_micros() as u64,
            comparison,
        ))
    }

    /// Quartile table, KPIs, and characteristics for a covered industry.
    /// Unlike comparison, an unknown tag here is an input error.
    pub fn industry_profile(&self, industry_tag: &str) -> FinHealthResult<IndustryProfile> {
        let industry =
            Industry::from_tag(industry_tag).ok_or_else(|| FinHealthError::InvalidInput {
                field: "industry".to_string(),
                reason: format!("Benchmarks not available for industry: {}", industry_tag),
            })?;
        let benchmarks = self
            .table
            .get(&industry)
            .ok_or_else(|| FinHealthError::InvalidInput {
                field: "industry".to_string(),
                reason: format!("Benchmarks not available for industry: {}", industry_tag),
            })?
            .clone();

        Ok(IndustryProfile {
            industry,
            benchmarks,
            key_performance_indicators: key_performance_indicators(industry),
            characteristics: characteristics(industry),
        })
    }
}

fn metric_quartiles(set: &IndustryQuartiles, metric: BenchmarkMetric) -> Quartiles {
    match metric {
        BenchmarkMetric::CurrentRatio => set.current_ratio,
        BenchmarkMetric::ProfitMargin => set.profit_margin,
        BenchmarkMetric::DebtToAssetRatio => set.debt_to_asset_ratio,
        BenchmarkMetric::RevenueGrowthRate => set.revenue_growth_rate,
        BenchmarkMetric::DaysSalesOutstanding => set.days_sales_outstanding,
    }
}

// ---------------------------------------------------------------------------
// Percentile interpolation
// ---------------------------------------------------------------------------

/// Four-piece linear interpolation against (q1, median, q3).
///
/// Degenerate quartiles pin the segment value (0 / 25 / 50 / 75). Values at
/// or beyond twice q3 saturate at 100 before any arithmetic, which also
/// absorbs the UNBOUNDED sentinel without overflowing Decimal.
pub fn interpolate_percentile(value: Decimal, q: &Quartiles) -> Score {
    if value <= q.q1 {
        if q.q1 > Decimal::ZERO {
            dec!(25) * value / q.q1
        } else {
            Decimal::ZERO
        }
    } else if value <= q.median {
        if q.median > q.q1 {
            dec!(25) + dec!(25) * (value - q.q1) / (q.median - q.q1)
        } else {
            dec!(25)
        }
    } else if value <= q.q3 {
        if q.q3 > q.median {
            dec!(50) + dec!(25) * (value - q.median) / (q.q3 - q.median)
        } else {
            dec!(50)
        }
    } else if q.q3 > Decimal::ZERO {
        if value >= q.q3 + q.q3 {
            dec!(100)
        } else {
            dec!(75) + dec!(25) * (value - q.q3) / q.q3
        }
    } else {
        dec!(75)
    }
}

// ---------------------------------------------------------------------------
// Narrative
// ---------------------------------------------------------------------------

fn fmt_value(value: Decimal) -> String {
    if value == UNBOUNDED {
        "unbounded".to_string()
    } else {
        format!("{:.2}", value)
    }
}

fn comparison_text(
    metric: BenchmarkMetric,
    percentile: Score,
    value: Decimal,
    q: &Quartiles,
) -> String {
    let name = metric.display_name();
    if percentile >= dec!(75) {
        format!(
            "Your {} of {} is excellent, ranking in the top 25% of {} performers in your industry.",
            name,
            fmt_value(value),
            name.to_lowercase()
        )
    } else if percentile >= dec!(50) {
        format!(
            "Your {} of {} is above the industry median of {}.",
            name,
            fmt_value(value),
            fmt_value(q.median)
        )
    } else if percentile >= dec!(25) {
        format!(
            "Your {} of {} is below the industry median of {} and needs improvement.",
            name,
            fmt_value(value),
            fmt_value(q.median)
        )
    } else {
        format!(
            "Your {} of {} is significantly below industry standards and requires immediate attention.",
            name,
            fmt_value(value)
        )
    }
}

fn industry_insights(industry: Industry, overall_percentile: Score) -> Vec<String> {
    let base: &[&str] = match industry {
        Industry::Manufacturing => &[
            "Manufacturing businesses typically require higher working capital",
            "Focus on inventory management and production efficiency",
            "Asset utilization is crucial for profitability",
        ],
        Industry::Retail => &[
            "Retail businesses have seasonal variations in performance",
            "Inventory turnover is a key success metric",
            "Location and customer experience drive revenue",
        ],
        Industry::Services => &[
            "Service businesses typically have higher profit margins",
            "Human capital is the primary asset",
            "Scalability depends on process optimization",
        ],
        Industry::Agriculture => &[
            "Agricultural businesses face weather and commodity price risks",
            "Seasonal cash flow patterns are normal",
            "Government policies significantly impact profitability",
        ],
        Industry::Logistics => &[
            "Logistics businesses are capital intensive",
            "Fuel costs and route optimization are critical",
            "Technology adoption drives efficiency gains",
        ],
        Industry::ECommerce => &[
            "E-commerce businesses prioritize growth over immediate profitability",
            "Customer acquisition costs are typically high initially",
            "Technology and marketing investments are essential",
        ],
    };

    let mut insights: Vec<String> = base.iter().map(|s| s.to_string()).collect();
    insights.push(
        if overall_percentile >= dec!(75) {
            "Your business is performing exceptionally well compared to industry peers."
        } else if overall_percentile >= dec!(50) {
            "Your business performance is solid with room for optimization."
        } else {
            "Consider industry best practices to improve your competitive position."
        }
        .to_string(),
    );
    insights
}

fn focus_areas(comparisons: &[MetricComparison]) -> Vec<String> {
    comparisons
        .iter()
        .filter(|c| c.percentile < dec!(25))
        .map(|c| c.metric.remediation().to_string())
        .collect()
}

fn key_performance_indicators(industry: Industry) -> Vec<String> {
    let kpis: &[&str] = match industry {
        Industry::Manufacturing => &["inventory_turnover", "asset_turnover", "capacity_utilization"],
        Industry::Retail => &["inventory_turnover", "sales_per_sqft", "customer_acquisition_cost"],
        Industry::Services => &["utilization_rate", "customer_retention", "revenue_per_employee"],
        Industry::Agriculture => &["yield_per_acre", "seasonal_variance", "weather_dependency"],
        Industry::Logistics => &["fleet_utilization", "delivery_efficiency", "fuel_cost_ratio"],
        Industry::ECommerce => &["conversion_rate", "customer_lifetime_value", "cart_abandonment_rate"],
    };
    kpis.iter().map(|s| s.to_string()).collect()
}

fn characteristics(industry: Industry) -> IndustryCharacteristics {
    let (margins, intensity, seasonality, challenges): (&str, &str, &str, &[&str]) = match industry
    {
        Industry::Manufacturing => (
            "8-18%",
            "High",
            "Moderate",
            &["Raw material costs", "Labor availability", "Regulatory compliance"],
        ),
        Industry::Retail => (
            "4-12%",
            "Medium",
            "High",
            &["Inventory management", "Customer retention", "Online competition"],
        ),
        Industry::Services => (
            "10-22%",
            "Low",
            "Low",
            &["Talent retention", "Service quality", "Scalability"],
        ),
        Industry::Agriculture => (
            "5-16%",
            "High",
            "Very High",
            &["Weather dependency", "Price volatility", "Input costs"],
        ),
        Industry::Logistics => (
            "3-10%",
            "High",
            "Moderate",
            &["Fuel costs", "Route optimization", "Regulatory changes"],
        ),
        Industry::ECommerce => (
            "1-12%",
            "Medium",
            "High",
            &["Customer acquisition", "Logistics costs", "Technology investments"],
        ),
    };

    IndustryCharacteristics {
        typical_margins: margins.to_string(),
        capital_intensity: intensity.to_string(),
        seasonality: seasonality.to_string(),
        key_challenges: challenges.iter().map(|s| s.to_string()).collect(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratios;
    use crate::types::FinancialSnapshot;
    use rust_decimal_macros::dec;

    fn services_quartiles() -> Quartiles {
        // current_ratio table for services
        quartiles(dec!(1.3), dec!(2.0), dec!(3.0))
    }

    fn sample_ratios() -> RatioSet {
        ratios::derive(&FinancialSnapshot {
            revenue: dec!(1000000),
            total_expenses: dec!(850000),
            current_assets: dec!(400000),
            current_liabilities: dec!(200000),
            total_assets: dec!(1200000),
            total_debt: dec!(360000),
            accounts_receivable: dec!(100000),
            revenue_growth_rate: dec!(0.12),
            industry: "services".to_string(),
            ..Default::default()
        })
    }

    #[test]
    fn test_percentile_at_quartile_anchors() {
        let q = services_quartiles();
        assert_eq!(interpolate_percentile(dec!(1.3), &q), dec!(25));
        assert_eq!(interpolate_percentile(dec!(2.0), &q), dec!(50));
        assert_eq!(interpolate_percentile(dec!(3.0), &q), dec!(75));
    }

    #[test]
    fn test_percentile_interpolates_between_anchors() {
        let q = services_quartiles();
        // Midway between q1 and median
        assert_eq!(interpolate_percentile(dec!(1.65), &q), dec!(37.5));
        // Midway between median and q3
        assert_eq!(interpolate_percentile(dec!(2.5), &q), dec!(62.5));
    }

    #[test]
    fn test_percentile_below_q1_scales_linearly() {
        let q = services_quartiles();
        assert_eq!(interpolate_percentile(dec!(0.65), &q), dec!(12.5));
        assert_eq!(interpolate_percentile(Decimal::ZERO, &q), Decimal::ZERO);
    }

    #[test]
    fn test_percentile_above_q3_caps_at_100() {
        let q = services_quartiles();
        assert_eq!(interpolate_percentile(dec!(6.0), &q), dec!(100));
        assert_eq!(interpolate_percentile(dec!(60), &q), dec!(100));
        // 3.6 is 20% past q3: 75 + 25 * 0.2
        assert_eq!(interpolate_percentile(dec!(3.6), &q), dec!(80));
    }

    #[test]
    fn test_percentile_absorbs_unbounded_sentinel() {
        let q = services_quartiles();
        assert_eq!(interpolate_percentile(UNBOUNDED, &q), dec!(100));
    }

    #[test]
    fn test_percentile_degenerate_quartiles() {
        let flat = quartiles(dec!(1.0), dec!(1.0), dec!(1.0));
        assert_eq!(interpolate_percentile(dec!(1.0), &flat), dec!(25));
        let zero_q1 = quartiles(Decimal::ZERO, dec!(1.0), dec!(2.0));
        assert_eq!(interpolate_percentile(dec!(-0.5), &zero_q1), Decimal::ZERO);
        let all_zero = quartiles(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
        assert_eq!(interpolate_percentile(dec!(5), &all_zero), dec!(75));
    }

    #[test]
    fn test_percentile_is_monotone_in_value() {
        let q = services_quartiles();
        let values = [
            dec!(-1), dec!(0), dec!(0.5), dec!(1.3), dec!(1.7), dec!(2.0),
            dec!(2.4), dec!(3.0), dec!(4.5), dec!(6.0), dec!(100),
        ];
        let mut last = dec!(-1000);
        for v in values {
            let p = interpolate_percentile(v, &q);
            assert!(p >= last, "percentile regressed at value {}", v);
            last = p;
        }
    }

    #[test]
    fn test_compare_covers_all_five_metrics() {
        let table = IndustryBenchmarks::standard();
        let out = table.compare_with_industry("services", &sample_ratios()).unwrap();
        assert_eq!(out.result.metric_comparisons.len(), 5);
        assert_eq!(out.result.benchmark_industry, Industry::Services);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_overall_percentile_is_unweighted_mean() {
        let table = IndustryBenchmarks::standard();
        let out = table.compare_with_industry("services", &sample_ratios()).unwrap();
        let sum: Decimal = out
            .result
            .metric_comparisons
            .iter()
            .map(|c| c.percentile)
            .sum();
        assert_eq!(out.result.overall_percentile, sum / dec!(5));
    }

    #[test]
    fn test_unknown_industry_falls_back_to_services() {
        let table = IndustryBenchmarks::standard();
        let out = table
            .compare_with_industry("unknown_tag", &sample_ratios())
            .unwrap();
        assert_eq!(out.result.benchmark_industry, Industry::Services);
        assert_eq!(out.result.industry, "unknown_tag");
        assert!(!out.warnings.is_empty());
    }

    #[test]
    fn test_focus_areas_only_for_poor_metrics() {
        let table = IndustryBenchmarks::standard();
        // Deep in distress: weak liquidity, losses, heavy debt, shrinking.
        let ratios = ratios::derive(&FinancialSnapshot {
            revenue: dec!(200000),
            total_expenses: dec!(260000),
            current_assets: dec!(50000),
            current_liabilities: dec!(120000),
            total_assets: dec!(300000),
            total_debt: dec!(270000),
            accounts_receivable: dec!(100000),
            revenue_growth_rate: dec!(-0.20),
            industry: "services".to_string(),
            ..Default::default()
        });
        let out = table.compare_with_industry("services", &ratios).unwrap();
        let areas = &out.result.recommended_focus_areas;
        assert!(areas.contains(&"Improve working capital management".to_string()));
        assert!(areas.contains(&"Optimize cost structure and pricing".to_string()));
        assert!(areas.contains(&"Develop growth strategies".to_string()));
    }

    #[test]
    fn test_comparison_text_tiers() {
        let q = services_quartiles();
        let excellent = comparison_text(BenchmarkMetric::CurrentRatio, dec!(80), dec!(3.5), &q);
        assert!(excellent.contains("top 25%"));
        let above = comparison_text(BenchmarkMetric::CurrentRatio, dec!(60), dec!(2.4), &q);
        assert!(above.contains("above the industry median of 2.00"));
        let below = comparison_text(BenchmarkMetric::CurrentRatio, dec!(40), dec!(1.7), &q);
        assert!(below.contains("needs improvement"));
        let poor = comparison_text(BenchmarkMetric::CurrentRatio, dec!(10), dec!(0.5), &q);
        assert!(poor.contains("requires immediate attention"));
    }

    #[test]
    fn test_insights_end_with_percentile_summary() {
        let strong = industry_insights(Industry::Services, dec!(80));
        assert_eq!(strong.len(), 4);
        assert!(strong.last().unwrap().contains("exceptionally well"));
        let weak = industry_insights(Industry::Retail, dec!(30));
        assert!(weak.last().unwrap().contains("industry best practices"));
    }

    #[test]
    fn test_industry_profile_known() {
        let table = IndustryBenchmarks::standard();
        let profile = table.industry_profile("logistics").unwrap();
        assert_eq!(profile.industry, Industry::Logistics);
        assert_eq!(profile.characteristics.capital_intensity, "High");
        assert!(profile
            .key_performance_indicators
            .contains(&"fleet_utilization".to_string()));
    }

    #[test]
    fn test_industry_profile_unknown_is_an_error() {
        let table = IndustryBenchmarks::standard();
        assert!(table.industry_profile("mining").is_err());
    }

    #[test]
    fn test_substitute_table_is_honoured() {
        let mut custom = HashMap::new();
        custom.insert(
            Industry::Services,
            IndustryQuartiles {
                current_ratio: quartiles(dec!(1), dec!(2), dec!(4)),
                profit_margin: quartiles(dec!(0.1), dec!(0.2), dec!(0.3)),
                debt_to_asset_ratio: quartiles(dec!(0.1), dec!(0.2), dec!(0.3)),
                revenue_growth_rate: quartiles(dec!(0.1), dec!(0.2), dec!(0.3)),
                days_sales_outstanding: quartiles(dec!(10), dec!(20), dec!(30)),
            },
        );
        let table = IndustryBenchmarks::from_table(custom);
        let out = table.compare_with_industry("services", &sample_ratios()).unwrap();
        let current = &out.result.metric_comparisons[0];
        assert_eq!(current.industry_median, dec!(2));
        assert_eq!(current.industry_q3, dec!(4));
    }
}
