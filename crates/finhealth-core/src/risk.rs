use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::ratios::RatioSet;
use crate::types::{with_metadata, ComputationOutput, FinancialSnapshot};
use crate::FinHealthResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Minimal => write!(f, "MINIMAL"),
            Self::Low => write!(f, "LOW"),
            Self::Medium => write!(f, "MEDIUM"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Coarse per-dimension flags, independent of the scored rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactors {
    pub liquidity_risk: bool,
    pub leverage_risk: bool,
    pub profitability_risk: bool,
    pub growth_risk: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskProfile {
    pub risk_level: RiskLevel,
    /// Sum of triggered rule points. Accumulates without a cap.
    pub risk_score: u32,
    /// Narratives of every triggered rule, in evaluation order.
    pub identified_risks: Vec<String>,
    pub risk_factors: RiskFactors,
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

// Threshold constants shared by the rules and the factor flags.
const CURRENT_RATIO_LOW: Decimal = dec!(1.0);
const CURRENT_RATIO_MEDIUM: Decimal = dec!(1.5);
const DEBT_TO_ASSET_MEDIUM: Decimal = dec!(0.6);
const DEBT_TO_ASSET_HIGH: Decimal = dec!(0.8);
const PROFIT_MARGIN_LOW: Decimal = dec!(0.05);
const GROWTH_LOW: Decimal = dec!(0.05);
const RECEIVABLES_CONCENTRATION: Decimal = dec!(0.25);

struct RiskRule {
    narrative: &'static str,
    points: u32,
    triggered: fn(&FinancialSnapshot, &RatioSet) -> bool,
}

/// One risk dimension. Rules are evaluated in order and the first match
/// wins within the group; groups are independent of each other.
struct RuleGroup {
    rules: &'static [RiskRule],
}

fn liquidity_severe(_s: &FinancialSnapshot, r: &RatioSet) -> bool {
    r.current_ratio < CURRENT_RATIO_LOW
}
fn liquidity_moderate(_s: &FinancialSnapshot, r: &RatioSet) -> bool {
    r.current_ratio < CURRENT_RATIO_MEDIUM
}
fn leverage_severe(_s: &FinancialSnapshot, r: &RatioSet) -> bool {
    r.debt_to_asset_ratio > DEBT_TO_ASSET_HIGH
}
fn leverage_moderate(_s: &FinancialSnapshot, r: &RatioSet) -> bool {
    r.debt_to_asset_ratio > DEBT_TO_ASSET_MEDIUM
}
fn operating_at_loss(_s: &FinancialSnapshot, r: &RatioSet) -> bool {
    r.profit_margin < Decimal::ZERO
}
fn thin_margins(_s: &FinancialSnapshot, r: &RatioSet) -> bool {
    r.profit_margin < PROFIT_MARGIN_LOW
}
fn revenue_declining(_s: &FinancialSnapshot, r: &RatioSet) -> bool {
    r.revenue_growth_rate < Decimal::ZERO
}
fn revenue_stalling(_s: &FinancialSnapshot, r: &RatioSet) -> bool {
    r.revenue_growth_rate < GROWTH_LOW
}
fn receivables_concentrated(s: &FinancialSnapshot, _r: &RatioSet) -> bool {
    s.accounts_receivable > s.revenue * RECEIVABLES_CONCENTRATION
}

static RULE_GROUPS: &[RuleGroup] = &[
    RuleGroup {
        rules: &[
            RiskRule {
                narrative: "Low liquidity - Current ratio below 1.0",
                points: 25,
                triggered: liquidity_severe,
            },
            RiskRule {
                narrative: "Moderate liquidity concern",
                points: 15,
                triggered: liquidity_moderate,
            },
        ],
    },
    RuleGroup {
        rules: &[
            RiskRule {
                narrative: "High leverage - Debt to asset ratio above 80%",
                points: 30,
                triggered: leverage_severe,
            },
            RiskRule {
                narrative: "Moderate leverage concern",
                points: 20,
                triggered: leverage_moderate,
            },
        ],
    },
    RuleGroup {
        rules: &[
            RiskRule {
                narrative: "Operating at a loss",
                points: 35,
                triggered: operating_at_loss,
            },
            RiskRule {
                narrative: "Low profit margins",
                points: 20,
                triggered: thin_margins,
            },
        ],
    },
    RuleGroup {
        rules: &[
            RiskRule {
                narrative: "Declining revenue",
                points: 25,
                triggered: revenue_declining,
            },
            RiskRule {
                narrative: "Slow revenue growth",
                points: 10,
                triggered: revenue_stalling,
            },
        ],
    },
    RuleGroup {
        rules: &[RiskRule {
            narrative: "High accounts receivable - potential cash flow issues",
            points: 15,
            triggered: receivables_concentrated,
        }],
    },
];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate the risk rule table against one snapshot and its ratios.
///
/// Groups are mutually non-exclusive; points accumulate additively and the
/// total is bucketed into a risk level afterwards.
pub fn assess_risks(
    snapshot: &FinancialSnapshot,
    ratios: &RatioSet,
) -> FinHealthResult<ComputationOutput<RiskProfile>> {
    let start = Instant::now();

    let mut risk_score: u32 = 0;
    let mut identified_risks: Vec<String> = Vec::new();

    for group in RULE_GROUPS {
        if let Some(rule) = group
            .rules
            .iter()
            .find(|rule| (rule.triggered)(snapshot, ratios))
        {
            identified_risks.push(rule.narrative.to_string());
            risk_score += rule.points;
        }
    }

    let profile = RiskProfile {
        risk_level: classify_risk_level(risk_score),
        risk_score,
        identified_risks,
        risk_factors: RiskFactors {
            liquidity_risk: ratios.current_ratio < CURRENT_RATIO_MEDIUM,
            leverage_risk: ratios.debt_to_asset_ratio > DEBT_TO_ASSET_MEDIUM,
            profitability_risk: ratios.profit_margin < PROFIT_MARGIN_LOW,
            growth_risk: ratios.revenue_growth_rate < GROWTH_LOW,
        },
    };

    Ok(with_metadata(
        "Threshold rule table over liquidity, leverage, profitability, growth, and receivables",
        ratios,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        profile,
    ))
}

fn classify_risk_level(score: u32) -> RiskLevel {
    if score >= 70 {
        RiskLevel::High
    } else if score >= 40 {
        RiskLevel::Medium
    } else if score >= 20 {
        RiskLevel::Low
    } else {
        RiskLevel::Minimal
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
