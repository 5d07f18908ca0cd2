use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{with_metadata, ComputationOutput, FinancialSnapshot, Rate, UNBOUNDED};
use crate::FinHealthResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// The full set of ratios derived from one snapshot. Immutable once
/// computed; every downstream component consumes this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatioSet {
    /// Current assets / current liabilities. UNBOUNDED when liabilities are zero.
    pub current_ratio: Decimal,
    /// (Current assets - inventory) / current liabilities. UNBOUNDED when liabilities are zero.
    pub quick_ratio: Decimal,
    /// (Revenue - expenses) / revenue. Zero when revenue is zero.
    pub profit_margin: Rate,
    /// Expenses / revenue. Zero when revenue is zero.
    pub expense_ratio: Rate,
    /// (Revenue - expenses) / total assets. Zero when assets are zero.
    pub roa: Rate,
    /// Total debt / total assets. Zero when assets are zero.
    pub debt_to_asset_ratio: Rate,
    /// (Total assets - total debt) / total assets. Zero when assets are zero.
    pub equity_ratio: Rate,
    /// Revenue / accounts receivable. Zero unless both are positive.
    pub receivables_turnover: Decimal,
    /// 365 / receivables turnover. Zero unless both revenue and AR are positive.
    pub days_sales_outstanding: Decimal,
    /// Echoed from the snapshot.
    pub revenue_growth_rate: Rate,
}

const DAYS_PER_YEAR: Decimal = dec!(365);

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive the ratio set from raw monetary figures.
///
/// Zero denominators are defined values, never errors: ratios expressing a
/// capacity (current, quick) become `UNBOUNDED`, ratios expressing a rate
/// become zero. The receivables pair additionally requires positive
/// receivables, otherwise both turnover and DSO are zero.
pub fn calculate_ratios(
    snapshot: &FinancialSnapshot,
) -> FinHealthResult<ComputationOutput<RatioSet>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let ratios = derive(snapshot);

    if ratios.current_ratio == UNBOUNDED {
        warnings.push(
            "current_liabilities is zero; liquidity ratios are reported as unbounded."
                .to_string(),
        );
    }
    if snapshot.revenue == Decimal::ZERO {
        warnings.push("revenue is zero; margin, expense, and turnover ratios are zero.".to_string());
    }

    Ok(with_metadata(
        "Financial ratio analysis over a single reporting period",
        snapshot,
        warnings,
        start.elapsed().as_micros() as u64,
        ratios,
    ))
}

/// Ratio derivation without the envelope, for in-crate composition.
pub fn derive(snapshot: &FinancialSnapshot) -> RatioSet {
    let (current_ratio, quick_ratio) = if snapshot.current_liabilities > Decimal::ZERO {
        (
            snapshot.current_assets / snapshot.current_liabilities,
            (snapshot.current_assets - snapshot.inventory) / snapshot.current_liabilities,
        )
    } else {
        (UNBOUNDED, UNBOUNDED)
    };

    let (profit_margin, expense_ratio) = if snapshot.revenue > Decimal::ZERO {
        (
            (snapshot.revenue - snapshot.total_expenses) / snapshot.revenue,
            snapshot.total_expenses / snapshot.revenue,
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO)
    };

    let (roa, debt_to_asset_ratio, equity_ratio) = if snapshot.total_assets > Decimal::ZERO {
        (
            (snapshot.revenue - snapshot.total_expenses) / snapshot.total_assets,
            snapshot.total_debt / snapshot.total_assets,
            (snapshot.total_assets - snapshot.total_debt) / snapshot.total_assets,
        )
    } else {
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    };

    let (receivables_turnover, days_sales_outstanding) =
        if snapshot.accounts_receivable > Decimal::ZERO && snapshot.revenue > Decimal::ZERO {
            let turnover = snapshot.revenue / snapshot.accounts_receivable;
            (turnover, DAYS_PER_YEAR / turnover)
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };

    RatioSet {
        current_ratio,
        quick_ratio,
        profit_margin,
        expense_ratio,
        roa,
        debt_to_asset_ratio,
        equity_ratio,
        receivables_turnover,
        days_sales_outstanding,
        revenue_growth_rate: snapshot.revenue_growth_rate,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
