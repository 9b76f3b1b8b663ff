use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use carbon_loan_core::carbon::emissions::{
    self, FinancingImpactInput, PenaltyRiskInput, SavingsInput, TripInput, VehicleType,
};

use crate::input;

/// Arguments for trip emissions
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct TripArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// DIESEL, PETROL, EV_SOLAR, EV_NUCLEAR or EV_GRID
    #[arg(long, default_value = "DIESEL")]
    pub vehicle: String,

    /// Distance travelled in km
    #[arg(long)]
    pub distance: Option<Decimal>,

    /// Load carried in tonnes
    #[arg(long, default_value = "0")]
    pub weight: Decimal,
}

#[derive(Serialize)]
struct TripEmissions {
    vehicle_type: VehicleType,
    distance_km: Decimal,
    weight_tonnes: Decimal,
    emissions_kg: Decimal,
}

pub fn run_emissions(args: TripArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let trip: TripInput = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let distance_km = args.distance.ok_or("--distance is required (or provide --input)")?;
        let vehicle_type = VehicleType::from_code(&args.vehicle).unwrap_or_else(|| {
            warn!(code = %args.vehicle, "unknown vehicle type, using DIESEL factor");
            VehicleType::Diesel
        });
        TripInput {
            vehicle_type,
            distance_km,
            weight_tonnes: args.weight,
        }
    };

    info!(vehicle = %trip.vehicle_type, distance_km = %trip.distance_km, "computing trip emissions");
    let emissions_kg =
        emissions::calculate_emissions(trip.vehicle_type, trip.distance_km, trip.weight_tonnes)?;
    Ok(serde_json::to_value(TripEmissions {
        vehicle_type: trip.vehicle_type,
        distance_km: trip.distance_km,
        weight_tonnes: trip.weight_tonnes,
        emissions_kg,
    })?)
}

/// Arguments for emissions savings against a baseline
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SavingsArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Current emissions in kg CO2e
    #[arg(long)]
    pub current: Option<Decimal>,

    /// Baseline emissions in kg CO2e
    #[arg(long)]
    pub baseline: Option<Decimal>,
}

pub fn run_savings(args: SavingsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let savings_input: SavingsInput = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        SavingsInput {
            current_emissions: args.current.ok_or("--current is required (or provide --input)")?,
            baseline_emissions: args.baseline.ok_or("--baseline is required (or provide --input)")?,
        }
    };

    let result = emissions::calculate_emissions_savings(
        savings_input.current_emissions,
        savings_input.baseline_emissions,
    )?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for emissions penalty exposure
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PenaltyArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Total emissions in kg CO2e
    #[arg(long)]
    pub emissions: Option<Decimal>,

    /// Regulatory threshold in kg CO2e
    #[arg(long)]
    pub threshold: Option<Decimal>,

    /// Annual turnover (EUR)
    #[arg(long)]
    pub turnover: Option<Decimal>,
}

pub fn run_penalty_risk(args: PenaltyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let risk_input: PenaltyRiskInput = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        PenaltyRiskInput {
            total_emissions_kg: args.emissions.ok_or("--emissions is required (or provide --input)")?,
            threshold_kg: args.threshold.ok_or("--threshold is required (or provide --input)")?,
            turnover: args.turnover.ok_or("--turnover is required (or provide --input)")?,
        }
    };

    let result = emissions::calculate_penalty_risk(
        risk_input.total_emissions_kg,
        risk_input.threshold_kg,
        risk_input.turnover,
    )?;
    if result.exceeds_threshold {
        warn!(
            excess_kg = %result.excess_emissions_kg,
            penalty = %result.potential_penalty_eur,
            "emissions threshold exceeded"
        );
    }
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the ESG financing impact
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct FinancingArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// ESG score, 0-100
    #[arg(long)]
    pub esg_score: Option<Decimal>,

    /// Annual turnover (EUR)
    #[arg(long)]
    pub turnover: Option<Decimal>,
}

pub fn run_financing_impact(args: FinancingArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let impact_input: FinancingImpactInput = if let Some(ref path) = args.input {
        input::file::read_structured(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        FinancingImpactInput {
            esg_score: args.esg_score.ok_or("--esg-score is required (or provide --input)")?,
            turnover: args.turnover.ok_or("--turnover is required (or provide --input)")?,
        }
    };

    let result = emissions::calculate_financing_impact(impact_input.esg_score, impact_input.turnover)?;
    Ok(serde_json::to_value(result)?)
}
