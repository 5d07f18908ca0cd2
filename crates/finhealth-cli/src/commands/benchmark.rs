use clap::Args;
use serde_json::Value;

use finhealth_core::benchmarks::IndustryBenchmarks;
use finhealth_core::ratios;
use finhealth_core::FinancialSnapshot;

use crate::input;

#[derive(Args)]
pub struct BenchmarkArgs {
    /// Industry to profile or compare against
    #[arg(long)]
    pub industry: String,

    /// Path to a snapshot JSON file; when given, runs a comparison instead
    /// of printing the industry profile
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_benchmark(args: BenchmarkArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let benchmarks = IndustryBenchmarks::standard();

    if let Some(ref path) = args.input {
        let snapshot: FinancialSnapshot = input::file::read_json(path)?;
        let ratio_set = ratios::calculate_ratios(&snapshot)?.result;
        let output = benchmarks.compare_with_industry(&args.industry, &ratio_set)?;
        return Ok(serde_json::to_value(output)?);
    }

    let profile = benchmarks.industry_profile(&args.industry)?;
    Ok(serde_json::to_value(profile)?)
}
