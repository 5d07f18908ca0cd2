use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::FinHealthError;
use crate::types::{with_metadata, ComputationOutput, Score};
use crate::FinHealthResult;

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// One historical overall-health score, as read back from storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreObservation {
    pub recorded_at: NaiveDate,
    pub score: Score,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Improving => write!(f, "improving"),
            Self::Declining => write!(f, "declining"),
            Self::Stable => write!(f, "stable"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Calendar month label, "YYYY-MM".
    pub month: String,
    /// Projected score, clamped to [0, 100] and rounded to one decimal.
    pub projected_health_score: Score,
    /// Decays from 0.9 by 0.05 per month, floored at 0.5.
    pub confidence: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    pub horizon_months: u32,
    /// Average score change per month over the history window.
    pub trend_per_month: Decimal,
    pub trend_direction: TrendDirection,
    pub points: Vec<ForecastPoint>,
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MIN_HISTORY: usize = 3;
const CONFIDENCE_START: Decimal = dec!(0.9);
const CONFIDENCE_DECAY: Decimal = dec!(0.05);
const CONFIDENCE_FLOOR: Decimal = dec!(0.5);
const MAX_SCORE: Decimal = dec!(100);
const DAYS_PER_MONTH: i64 = 30;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Project health scores forward by linear trend extrapolation.
///
/// `history` is ordered most-recent-first. The trend convention is fixed
/// as (newest − oldest) / window length, so a positive trend always means
/// scores have been improving. Each projected point decays in confidence
/// by 0.05 per month down to a floor of 0.5; the floor is a clamp, not a
/// horizon limit.
pub fn generate_forecast(
    history: &[ScoreObservation],
    months: u32,
    as_of: NaiveDate,
) -> FinHealthResult<ComputationOutput<Forecast>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if history.len() < MIN_HISTORY {
        return Err(FinHealthError::InsufficientData(format!(
            "Forecasting requires at least {} historical assessments, got {}.",
            MIN_HISTORY,
            history.len()
        )));
    }

    if history
        .windows(2)
        .any(|pair| pair[0].recorded_at < pair[1].recorded_at)
    {
        warnings.push(
            "History dates are not ordered most-recent-first; the trend sign may be inverted."
                .to_string(),
        );
    }

    let newest = history[0].score;
    let oldest = history[history.len() - 1].score;
    let trend = (newest - oldest) / Decimal::from(history.len() as u64);

    let trend_direction = if trend > Decimal::ZERO {
        TrendDirection::Improving
    } else if trend < Decimal::ZERO {
        TrendDirection::Declining
    } else {
        TrendDirection::Stable
    };

    let mut points = Vec::with_capacity(months as usize);
    for i in 0..months {
        let step = Decimal::from(i + 1);
        let month = (as_of + Duration::days(DAYS_PER_MONTH * (i as i64 + 1)))
            .format("%Y-%m")
            .to_string();
        let projected = (newest + trend * step)
            .clamp(Decimal::ZERO, MAX_SCORE)
            .round_dp(1);
        let confidence =
            (CONFIDENCE_START - CONFIDENCE_DECAY * Decimal::from(i)).max(CONFIDENCE_FLOOR);

        points.push(ForecastPoint {
            month,
            projected_health_score: projected,
            confidence,
        });
    }

    let forecast = Forecast {
        horizon_months: months,
        trend_per_month: trend,
        trend_direction,
        points,
    };

    Ok(with_metadata(
        "Trend-based projection with historical performance analysis",
        &serde_json::json!({
            "history_points": history.len(),
            "as_of": as_of,
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        forecast,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
