mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::assess::{AssessArgs, RatiosArgs, ScoreArgs};
use commands::benchmark::BenchmarkArgs;
use commands::forecast::ForecastArgs;

/// SME financial health assessment
#[derive(Parser)]
#[command(
    name = "fha",
    version,
    about = "SME financial health assessment",
    long_about = "Turns raw financial figures into a normalized health assessment: \
                  financial ratios, a 0-100 credit score with rating and product \
                  recommendations, a risk profile, industry benchmark percentiles, \
                  and a trend-based score forecast."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full health assessment over one snapshot
    Assess(AssessArgs),
    /// Calculate the financial ratio set only
    Ratios(RatiosArgs),
    /// Calculate the credit score only
    Score(ScoreArgs),
    /// Show an industry benchmark profile, or compare a snapshot against it
    Benchmark(BenchmarkArgs),
    /// Project health scores forward from historical assessments
    Forecast(ForecastArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Assess(args) => commands::assess::run_assess(args),
        Commands::Ratios(args) => commands::assess::run_ratios(args),
        Commands::Score(args) => commands::assess::run_score(args),
        Commands::Benchmark(args) => commands::benchmark::run_benchmark(args),
        Commands::Forecast(args) => commands::forecast::run_forecast(args),
        Commands::Version => {
            println!("fha {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
