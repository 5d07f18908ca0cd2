use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::ratios::RatioSet;
use crate::types::{with_metadata, ComputationOutput, FinancialSnapshot, Money};
use crate::FinHealthResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "HIGH"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

/// One cost-optimization opportunity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostSaving {
    pub category: String,
    /// Estimated annual savings, rounded to whole currency units.
    pub potential_savings: Money,
    pub recommendation: String,
    pub priority: Priority,
}

// ---------------------------------------------------------------------------
// Recommendation rules
// ---------------------------------------------------------------------------

const CURRENT_RATIO_TRIGGER: Decimal = dec!(1.5);
const MARGIN_TRIGGER: Decimal = dec!(0.10);
const LEVERAGE_TRIGGER: Decimal = dec!(0.6);
const GROWTH_TRIGGER: Decimal = dec!(0.10);
const DSO_TRIGGER: Decimal = dec!(45);

const EXPENSE_AUDIT_TRIGGER: Decimal = dec!(0.85);
const EXPENSE_TARGET: Decimal = dec!(0.80);
const AUTOMATION_SAVINGS_PCT: Decimal = dec!(0.05);
const VENDOR_SAVINGS_PCT: Decimal = dec!(0.03);

struct AdviceRule {
    triggered: fn(&RatioSet) -> bool,
    advice: &'static [&'static str],
}

fn weak_liquidity(r: &RatioSet) -> bool {
    r.current_ratio < CURRENT_RATIO_TRIGGER
}
fn thin_margin(r: &RatioSet) -> bool {
    r.profit_margin < MARGIN_TRIGGER
}
fn heavy_leverage(r: &RatioSet) -> bool {
    r.debt_to_asset_ratio > LEVERAGE_TRIGGER
}
fn slow_growth(r: &RatioSet) -> bool {
    r.revenue_growth_rate < GROWTH_TRIGGER
}
fn slow_collections(r: &RatioSet) -> bool {
    r.days_sales_outstanding > DSO_TRIGGER
}

static ADVICE_RULES: &[AdviceRule] = &[
    AdviceRule {
        triggered: weak_liquidity,
        advice: &[
            "Improve working capital management - consider invoice factoring or short-term credit facilities",
            "Accelerate accounts receivable collection",
        ],
    },
    AdviceRule {
        triggered: thin_margin,
        advice: &[
            "Review pricing strategy and cost structure",
            "Identify and eliminate non-essential expenses",
        ],
    },
    AdviceRule {
        triggered: heavy_leverage,
        advice: &[
            "Consider debt restructuring or equity financing",
            "Focus on debt reduction through improved cash flow",
        ],
    },
    AdviceRule {
        triggered: slow_growth,
        advice: &[
            "Develop new revenue streams or market expansion strategies",
            "Invest in marketing and customer acquisition",
        ],
    },
    AdviceRule {
        triggered: slow_collections,
        advice: &["Implement stricter credit policies and collection procedures"],
    },
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Actionable recommendations from the threshold rule table, in fixed
/// rule order.
pub fn generate_recommendations(
    _snapshot: &FinancialSnapshot,
    ratios: &RatioSet,
) -> FinHealthResult<ComputationOutput<Vec<String>>> {
    let start = Instant::now();

    let recommendations: Vec<String> = ADVICE_RULES
        .iter()
        .filter(|rule| (rule.triggered)(ratios))
        .flat_map(|rule| rule.advice.iter().map(|s| s.to_string()))
        .collect();

    Ok(with_metadata(
        "Threshold-triggered recommendation rules",
        ratios,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        recommendations,
    ))
}

/// Cost-optimization opportunities. The automation and vendor entries are
/// always emitted; an overall cost-structure audit is added with high
/// priority when the expense ratio exceeds 85% of revenue.
pub fn identify_cost_savings(
    snapshot: &FinancialSnapshot,
) -> FinHealthResult<ComputationOutput<Vec<CostSaving>>> {
    let start = Instant::now();

    let expense_ratio = if snapshot.revenue > Decimal::ZERO {
        snapshot.total_expenses / snapshot.revenue
    } else {
        Decimal::ZERO
    };

    let mut savings: Vec<CostSaving> = Vec::new();

    if expense_ratio > EXPENSE_AUDIT_TRIGGER {
        savings.push(CostSaving {
            category: "Overall Cost Structure".to_string(),
            potential_savings: ((expense_ratio - EXPENSE_TARGET) * snapshot.revenue).round_dp(0),
            recommendation: "Comprehensive cost audit and reduction program".to_string(),
            priority: Priority::High,
        });
    }

    savings.push(CostSaving {
        category: "Technology & Automation".to_string(),
        potential_savings: (snapshot.total_expenses * AUTOMATION_SAVINGS_PCT).round_dp(0),
        recommendation: "Implement automation tools to reduce manual processes".to_string(),
        priority: Priority::Medium,
    });

    savings.push(CostSaving {
        category: "Vendor Management".to_string(),
        potential_savings: (snapshot.total_expenses * VENDOR_SAVINGS_PCT).round_dp(0),
        recommendation: "Renegotiate supplier contracts and consolidate vendors".to_string(),
        priority: Priority::Medium,
    });

    Ok(with_metadata(
        "Expense-ratio cost audit with standing automation and vendor reviews",
        snapshot,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        savings,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratios;
    use rust_decimal_macros::dec;

    fn strong_snapshot() -> FinancialSnapshot {
        FinancialSnapshot {
            revenue: dec!(2000000),
            total_expenses: dec!(1500000),
            current_assets: dec!(800000),
            current_liabilities: dec!(300000),
            total_assets: dec!(2500000),
            total_debt: dec!(500000),
            accounts_receivable: dec!(150000),
            revenue_growth_rate: dec!(0.18),
            industry: "manufacturing".to_string(),
            ..Default::default()
        }
    }

    fn recommendations_for(snapshot: &FinancialSnapshot) -> Vec<String> {
        let ratios = ratios::derive(snapshot);
        generate_recommendations(snapshot, &ratios).unwrap().result
    }

    #[test]
    fn test_strong_company_gets_no_recommendations() {
        assert!(recommendations_for(&strong_snapshot()).is_empty());
    }

    #[test]
    fn test_weak_liquidity_emits_both_working_capital_lines() {
        let mut snapshot = strong_snapshot();
        snapshot.current_assets = dec!(400000); // current ratio 1.33
        let recs = recommendations_for(&snapshot);
        assert_eq!(recs.len(), 2);
        assert!(recs[0].contains("working capital"));
        assert!(recs[1].contains("accounts receivable"));
    }

    #[test]
    fn test_slow_collections_rule() {
        let mut snapshot = strong_snapshot();
        snapshot.accounts_receivable = dec!(400000); // DSO 73
        let recs = recommendations_for(&snapshot);
        assert_eq!(
            recs,
            vec!["Implement stricter credit policies and collection procedures"]
        );
    }

    #[test]
    fn test_rules_fire_in_fixed_order() {
        let snapshot = FinancialSnapshot {
            revenue: dec!(500000),
            total_expenses: dec!(480000),     // margin 0.04
            current_assets: dec!(100000),     // current ratio 1.0
            current_liabilities: dec!(100000),
            total_assets: dec!(400000),
            total_debt: dec!(300000),         // debt/asset 0.75
            accounts_receivable: dec!(100000), // DSO 73
            revenue_growth_rate: dec!(0.02),
            industry: "retail".to_string(),
            ..Default::default()
        };
        let recs = recommendations_for(&snapshot);
        assert_eq!(recs.len(), 9);
        assert!(recs[0].contains("working capital"));
        assert!(recs[2].contains("pricing strategy"));
        assert!(recs[4].contains("debt restructuring"));
        assert!(recs[6].contains("revenue streams"));
        assert!(recs[8].contains("stricter credit policies"));
    }

    #[test]
    fn test_cost_savings_always_include_standing_entries() {
        let out = identify_cost_savings(&strong_snapshot()).unwrap();
        let categories: Vec<&str> = out.result.iter().map(|s| s.category.as_str()).collect();
        assert_eq!(categories, vec!["Technology & Automation", "Vendor Management"]);
        assert_eq!(out.result[0].potential_savings, dec!(75000));
        assert_eq!(out.result[1].potential_savings, dec!(45000));
        assert!(out.result.iter().all(|s| s.priority == Priority::Medium));
    }

    #[test]
    fn test_expense_audit_entry_when_ratio_exceeds_85_percent() {
        let mut snapshot = strong_snapshot();
        snapshot.total_expenses = dec!(1800000); // expense ratio 0.90
        let out = identify_cost_savings(&snapshot).unwrap();
        assert_eq!(out.result.len(), 3);
        let audit = &out.result[0];
        assert_eq!(audit.category, "Overall Cost Structure");
        assert_eq!(audit.priority, Priority::High);
        // (0.90 - 0.80) * 2,000,000
        assert_eq!(audit.potential_savings, dec!(200000));
    }

    #[test]
    fn test_zero_revenue_skips_audit_but_keeps_standing_entries() {
        let snapshot = FinancialSnapshot {
            total_expenses: dec!(100000),
            ..Default::default()
        };
        let out = identify_cost_savings(&snapshot).unwrap();
        assert_eq!(out.result.len(), 2);
        assert_eq!(out.result[0].potential_savings, dec!(5000));
    }

    #[test]
    fn test_priority_serializes_uppercase() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, r#""HIGH""#);
    }
}
