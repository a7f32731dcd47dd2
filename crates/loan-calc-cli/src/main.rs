mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::affordability::{BudgetArgs, MaxLoanArgs, MinDurationArgs};
use commands::loan::{AnalyzeArgs, InstallmentArgs, ScheduleArgs, StrategiesArgs};
use commands::projection::ProjectArgs;

/// Reducing-balance loan calculations
#[derive(Parser)]
#[command(
    name = "loancalc",
    version,
    about = "Reducing-balance loan calculations",
    long_about = "A CLI for loan installment, amortization and affordability calculations \
                  with decimal precision. Supports EMI, full schedules with extra payments, \
                  borrowing power, budget-fitting durations, duration trade-off curves and \
                  prepayment strategies."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the monthly installment (EMI) and cost to term
    Installment(InstallmentArgs),
    /// Build the month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Largest loan a monthly budget can carry
    MaxLoan(MaxLoanArgs),
    /// Shortest duration whose installment fits a monthly budget
    MinDuration(MinDurationArgs),
    /// Installment vs. total interest across durations, with sweet spot
    Project(ProjectArgs),
    /// Suggested extra-payment strategies and their savings
    Strategies(StrategiesArgs),
    /// Check a loan against a monthly budget
    Budget(BudgetArgs),
    /// Full analysis of one loan
    Analyze(AnalyzeArgs),
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

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Installment(args) => commands::loan::run_installment(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::MaxLoan(args) => commands::affordability::run_max_loan(args),
        Commands::MinDuration(args) => commands::affordability::run_min_duration(args),
        Commands::Project(args) => commands::projection::run_project(args),
        Commands::Strategies(args) => commands::loan::run_strategies(args),
        Commands::Budget(args) => commands::affordability::run_budget(args),
        Commands::Analyze(args) => commands::loan::run_analyze(args),
        Commands::Version => {
            println!("loancalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
