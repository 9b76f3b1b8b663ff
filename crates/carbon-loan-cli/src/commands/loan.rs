use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tracing::{info, warn};

use carbon_loan_core::carbon::profile::ProfileCatalog;
use carbon_loan_core::loan::amortization::{self, AmortizationInput};
use carbon_loan_core::loan::pricing::{self, PricingInput};

use crate::commands::carbon::select_profile;
use crate::input;

const DEFAULT_PRINCIPAL: Decimal = dec!(100000);
const DEFAULT_TERM_MONTHS: u32 = 60;

/// Arguments for a fixed-rate amortization
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AmortizeArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 6.75)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let amort_input: AmortizationInput = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let rate = args.rate.ok_or("--rate is required (or provide --input)")?;
        AmortizationInput {
            principal: args.principal.unwrap_or(DEFAULT_PRINCIPAL),
            annual_rate_percent: rate,
            term_months: args.term.unwrap_or(DEFAULT_TERM_MONTHS),
        }
    };

    let result = amortization::build_amortization_schedule(&amort_input)?;
    log_warnings(&result.warnings);
    Ok(serde_json::to_value(result)?)
}

/// Arguments for end-to-end carbon-linked loan pricing
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PriceArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Emission tier: Low, Medium-Low, Medium, High, Very High
    #[arg(long)]
    pub tier: Option<String>,

    /// Measured emissions in tonnes CO2e (defaults to the profile baseline)
    #[arg(long)]
    pub actual_emissions: Option<Decimal>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Term in months
    #[arg(long)]
    pub term: Option<u32>,
}

pub fn run_price(args: PriceArgs, catalog: &ProfileCatalog) -> Result<Value, Box<dyn std::error::Error>> {
    let pricing_input: PricingInput = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let profile = select_profile(catalog, args.tier.as_deref(), None, None)?;
        PricingInput {
            actual_emissions: args.actual_emissions.unwrap_or(profile.baseline_emissions),
            profile,
            principal: args.principal.unwrap_or(DEFAULT_PRINCIPAL),
            term_months: args.term.unwrap_or(DEFAULT_TERM_MONTHS),
        }
    };

    info!(
        tier = %pricing_input.profile.tier,
        principal = %pricing_input.principal,
        term_months = pricing_input.term_months,
        "pricing carbon-linked loan"
    );
    let result = pricing::price_carbon_linked_loan(&pricing_input)?;
    log_warnings(&result.warnings);
    Ok(serde_json::to_value(result)?)
}

fn log_warnings(warnings: &[String]) {
    for w in warnings {
        warn!("{}", w);
    }
}
