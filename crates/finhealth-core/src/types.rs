use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Scores on the 0–100 scale (credit score, sub-scores, percentiles).
pub type Score = Decimal;

/// Sentinel for ratios whose denominator is zero (e.g. current ratio with
/// no current liabilities). `Decimal` has no infinity; this value orders
/// above every band threshold and every benchmark quartile, and percentile
/// interpolation short-circuits it before doing arithmetic.
pub const UNBOUNDED: Decimal = Decimal::MAX;

/// Industries with benchmark and weight-adjustment coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Industry {
    Manufacturing,
    Retail,
    Services,
    Agriculture,
    Logistics,
    #[serde(rename = "e-commerce")]
    ECommerce,
}

impl Industry {
    /// Parse a free-form industry tag. Case-insensitive. Returns None for
    /// tags outside the covered set; callers decide the fallback policy.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "manufacturing" => Some(Self::Manufacturing),
            "retail" => Some(Self::Retail),
            "services" => Some(Self::Services),
            "agriculture" => Some(Self::Agriculture),
            "logistics" => Some(Self::Logistics),
            "e-commerce" | "ecommerce" => Some(Self::ECommerce),
            _ => None,
        }
    }

    pub const ALL: [Industry; 6] = [
        Industry::Manufacturing,
        Industry::Retail,
        Industry::Services,
        Industry::Agriculture,
        Industry::Logistics,
        Industry::ECommerce,
    ];
}

impl std::fmt::Display for Industry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manufacturing => write!(f, "manufacturing"),
            Self::Retail => write!(f, "retail"),
            Self::Services => write!(f, "services"),
            Self::Agriculture => write!(f, "agriculture"),
            Self::Logistics => write!(f, "logistics"),
            Self::ECommerce => write!(f, "e-commerce"),
        }
    }
}

/// One period of raw financial figures for a company.
///
/// Monetary fields are non-negative and `current_assets <= total_assets`,
/// `total_debt <= total_assets` — enforced by the validation layer before
/// the engine runs. Missing fields deserialize to zero.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    #[serde(default)]
    pub revenue: Money,
    #[serde(default)]
    pub total_expenses: Money,
    #[serde(default)]
    pub current_assets: Money,
    #[serde(default)]
    pub current_liabilities: Money,
    #[serde(default)]
    pub total_assets: Money,
    #[serde(default)]
    pub total_debt: Money,
    #[serde(default)]
    pub inventory: Money,
    #[serde(default)]
    pub accounts_receivable: Money,
    #[serde(default)]
    pub accounts_payable: Money,
    /// Year-over-year revenue growth as a decimal (0.10 = 10%).
    #[serde(default)]
    pub revenue_growth_rate: Rate,
    /// Free-form industry tag. Tags outside `Industry::ALL` fall back to
    /// services for benchmarking and to base weights for scoring.
    #[serde(default)]
    pub industry: String,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_industry_from_tag_known() {
        assert_eq!(Industry::from_tag("retail"), Some(Industry::Retail));
        assert_eq!(Industry::from_tag("Manufacturing"), Some(Industry::Manufacturing));
        assert_eq!(Industry::from_tag("  LOGISTICS "), Some(Industry::Logistics));
    }

    #[test]
    fn test_industry_from_tag_ecommerce_spellings() {
        assert_eq!(Industry::from_tag("e-commerce"), Some(Industry::ECommerce));
        assert_eq!(Industry::from_tag("ecommerce"), Some(Industry::ECommerce));
    }

    #[test]
    fn test_industry_from_tag_unknown() {
        assert_eq!(Industry::from_tag("mining"), None);
        assert_eq!(Industry::from_tag(""), None);
    }

    #[test]
    fn test_industry_display_roundtrips_through_from_tag() {
        for industry in Industry::ALL {
            assert_eq!(Industry::from_tag(&industry.to_string()), Some(industry));
        }
    }

    #[test]
    fn test_snapshot_missing_fields_default_to_zero() {
        let snapshot: FinancialSnapshot =
            serde_json::from_str(r#"{"revenue": "500000", "industry": "retail"}"#).unwrap();
        assert_eq!(snapshot.revenue, Decimal::from(500000));
        assert_eq!(snapshot.total_expenses, Decimal::ZERO);
        assert_eq!(snapshot.inventory, Decimal::ZERO);
    }
}
