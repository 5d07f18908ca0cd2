use chrono::{Duration, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use finhealth_core::forecast::{self, ScoreObservation};

use crate::input;

#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ForecastArgs {
    /// Path to a JSON array of {recorded_at, score} observations,
    /// most recent first
    #[arg(long)]
    pub input: Option<String>,

    /// Historical scores as a comma-separated list, most recent first
    /// (e.g. "72,66,60"); observation dates are spaced 30 days apart
    #[arg(long, value_delimiter = ',')]
    pub scores: Option<Vec<Decimal>>,

    /// Months to project forward
    #[arg(long, default_value = "6")]
    pub months: u32,

    /// Projection start date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub from: Option<NaiveDate>,
}

pub fn run_forecast(args: ForecastArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let as_of = args
        .from
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let history: Vec<ScoreObservation> = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(scores) = args.scores {
        scores
            .into_iter()
            .enumerate()
            .map(|(i, score)| ScoreObservation {
                recorded_at: as_of - Duration::days(30 * i as i64),
                score,
            })
            .collect()
    } else {
        return Err("--scores or --input is required".into());
    };

    let output = forecast::generate_forecast(&history, args.months, as_of)?;
    Ok(serde_json::to_value(output)?)
}
