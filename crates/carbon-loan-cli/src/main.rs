mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use carbon_loan_core::carbon::profile::ProfileCatalog;
use commands::carbon::RateArgs;
use commands::emissions::{FinancingArgs, PenaltyArgs, SavingsArgs, TripArgs};
use commands::loan::{AmortizeArgs, PriceArgs};

/// Carbon-linked loan pricing
#[derive(Parser)]
#[command(
    name = "carbon-loan",
    version,
    about = "Carbon-linked loan pricing",
    long_about = "Prices loans whose interest rate is adjusted by the borrower's carbon \
                  emissions against a profile baseline and the GWP of its gas mix, \
                  then amortizes them with decimal precision. Also estimates fleet \
                  emissions, penalty exposure and ESG financing savings."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Emission-profile catalog file (JSON or YAML) replacing the built-in tiers
    #[arg(long, global = true)]
    catalog: Option<String>,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Carbon-adjusted interest rate for an emission profile
    Rate(RateArgs),
    /// Fixed-rate amortization schedule
    Amortize(AmortizeArgs),
    /// Price a carbon-linked loan end to end
    Price(PriceArgs),
    /// List the emission-profile catalog
    Profiles,
    /// Emissions of a single trip (kg CO2e)
    Emissions(TripArgs),
    /// Emissions saved against a baseline
    Savings(SavingsArgs),
    /// Penalty exposure above an emissions threshold
    PenaltyRisk(PenaltyArgs),
    /// Borrowing cost saved through an ESG score
    FinancingImpact(FinancingArgs),
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

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_catalog(path: Option<&str>) -> Result<ProfileCatalog, Box<dyn std::error::Error>> {
    match path {
        Some(path) => input::file::read_catalog(path),
        None => Ok(ProfileCatalog::default()),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let catalog_path = cli.catalog.as_deref();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Rate(args) => {
            load_catalog(catalog_path).and_then(|catalog| commands::carbon::run_rate(args, &catalog))
        }
        Commands::Amortize(args) => commands::loan::run_amortize(args),
        Commands::Price(args) => {
            load_catalog(catalog_path).and_then(|catalog| commands::loan::run_price(args, &catalog))
        }
        Commands::Profiles => {
            load_catalog(catalog_path).and_then(|catalog| commands::carbon::run_profiles(&catalog))
        }
        Commands::Emissions(args) => commands::emissions::run_emissions(args),
        Commands::Savings(args) => commands::emissions::run_savings(args),
        Commands::PenaltyRisk(args) => commands::emissions::run_penalty_risk(args),
        Commands::FinancingImpact(args) => commands::emissions::run_financing_impact(args),
        Commands::Version => {
            println!("carbon-loan {}", env!("CARGO_PKG_VERSION"));
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
