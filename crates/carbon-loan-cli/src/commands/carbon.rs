use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use carbon_loan_core::carbon::profile::{EmissionProfile, EmissionsRange, ProfileCatalog};
use carbon_loan_core::carbon::rate_model::{self, RateAdjustmentInput};

use crate::input;

/// Arguments for the carbon rate adjustment
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RateArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Emission tier: Low, Medium-Low, Medium, High, Very High
    #[arg(long)]
    pub tier: Option<String>,

    /// Measured emissions in tonnes CO2e (defaults to the profile baseline)
    #[arg(long)]
    pub actual_emissions: Option<Decimal>,

    /// Override the profile's baseline emissions
    #[arg(long)]
    pub baseline: Option<Decimal>,

    /// Override the profile's GWP multiplier
    #[arg(long)]
    pub gwp: Option<Decimal>,
}

pub fn run_rate(args: RateArgs, catalog: &ProfileCatalog) -> Result<Value, Box<dyn std::error::Error>> {
    let rate_input: RateAdjustmentInput = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let profile = select_profile(catalog, args.tier.as_deref(), args.baseline, args.gwp)?;
        let actual_emissions = args.actual_emissions.unwrap_or(profile.baseline_emissions);
        RateAdjustmentInput {
            profile,
            actual_emissions,
        }
    };

    info!(tier = %rate_input.profile.tier, actual = %rate_input.actual_emissions, "computing rate adjustment");
    let result = rate_model::compute_rate_adjustment(&rate_input.profile, rate_input.actual_emissions)?;
    Ok(serde_json::to_value(result)?)
}

/// Pick a profile from the catalog by tier label (default profile when
/// absent) and apply any baseline / GWP overrides.
pub fn select_profile(
    catalog: &ProfileCatalog,
    tier: Option<&str>,
    baseline: Option<Decimal>,
    gwp: Option<Decimal>,
) -> Result<EmissionProfile, Box<dyn std::error::Error>> {
    let mut profile = match tier {
        Some(label) => catalog.find_by_label(label)?.clone(),
        None => catalog.default_profile().clone(),
    };
    if let Some(baseline) = baseline {
        profile.baseline_emissions = baseline;
    }
    if let Some(gwp) = gwp {
        profile.gwp_multiplier = gwp;
    }
    Ok(profile)
}

#[derive(Serialize)]
struct ProfileRow<'a> {
    tier: &'a str,
    gas_type: &'a str,
    baseline_emissions: Decimal,
    gwp_multiplier: Decimal,
    emissions_range: EmissionsRange,
    description: &'a str,
}

/// List the emission-profile catalog in use.
pub fn run_profiles(catalog: &ProfileCatalog) -> Result<Value, Box<dyn std::error::Error>> {
    let rows: Vec<ProfileRow<'_>> = catalog
        .profiles()
        .iter()
        .map(|p| ProfileRow {
            tier: p.tier.label(),
            gas_type: &p.gas_type,
            baseline_emissions: p.baseline_emissions,
            gwp_multiplier: p.gwp_multiplier,
            emissions_range: p.emissions_range(),
            description: &p.description,
        })
        .collect();
    Ok(serde_json::to_value(rows)?)
}
