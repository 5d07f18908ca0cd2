use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use finhealth_core::assessment;
use finhealth_core::benchmarks::IndustryBenchmarks;
use finhealth_core::ratios;
use finhealth_core::scoring;
use finhealth_core::FinancialSnapshot;

use crate::input;

/// Arguments describing one financial snapshot.
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SnapshotArgs {
    /// Annual revenue
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Total annual expenses
    #[arg(long)]
    pub total_expenses: Option<Decimal>,

    /// Current assets
    #[arg(long)]
    pub current_assets: Option<Decimal>,

    /// Current liabilities
    #[arg(long)]
    pub current_liabilities: Option<Decimal>,

    /// Total assets
    #[arg(long)]
    pub total_assets: Option<Decimal>,

    /// Total debt
    #[arg(long)]
    pub total_debt: Option<Decimal>,

    /// Inventory balance
    #[arg(long)]
    pub inventory: Option<Decimal>,

    /// Accounts receivable balance
    #[arg(long)]
    pub accounts_receivable: Option<Decimal>,

    /// Accounts payable balance
    #[arg(long)]
    pub accounts_payable: Option<Decimal>,

    /// Year-over-year revenue growth (e.g. 0.12 for 12%)
    #[arg(long, alias = "growth")]
    pub revenue_growth_rate: Option<Decimal>,

    /// Industry tag (manufacturing, retail, services, agriculture, logistics, e-commerce)
    #[arg(long)]
    pub industry: Option<String>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct AssessArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,
}

#[derive(Args)]
pub struct RatiosArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,
}

#[derive(Args)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub snapshot: SnapshotArgs,
}

/// Resolve the snapshot from file, piped stdin, or individual flags.
fn resolve_snapshot(args: SnapshotArgs) -> Result<FinancialSnapshot, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(serde_json::from_value(data)?);
    }

    Ok(FinancialSnapshot {
        revenue: args
            .revenue
            .ok_or("--revenue is required (or provide --input)")?,
        total_expenses: args.total_expenses.unwrap_or_default(),
        current_assets: args.current_assets.unwrap_or_default(),
        current_liabilities: args.current_liabilities.unwrap_or_default(),
        total_assets: args.total_assets.unwrap_or_default(),
        total_debt: args.total_debt.unwrap_or_default(),
        inventory: args.inventory.unwrap_or_default(),
        accounts_receivable: args.accounts_receivable.unwrap_or_default(),
        accounts_payable: args.accounts_payable.unwrap_or_default(),
        revenue_growth_rate: args.revenue_growth_rate.unwrap_or_default(),
        industry: args
            .industry
            .ok_or("--industry is required (or provide --input)")?,
    })
}

pub fn run_assess(args: AssessArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = resolve_snapshot(args.snapshot)?;
    let benchmarks = IndustryBenchmarks::standard();
    let output = assessment::assess_financial_health(&snapshot, &benchmarks)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_ratios(args: RatiosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = resolve_snapshot(args.snapshot)?;
    let output = ratios::calculate_ratios(&snapshot)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_score(args: ScoreArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = resolve_snapshot(args.snapshot)?;
    let ratio_set = ratios::calculate_ratios(&snapshot)?.result;
    let output = scoring::calculate_credit_score(&snapshot, &ratio_set)?;
    Ok(serde_json::to_value(output)?)
}
