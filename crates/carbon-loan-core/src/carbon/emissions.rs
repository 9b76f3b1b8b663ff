//! Fleet emissions and their financial consequences.
//!
//! Covers:
//! 1. **Trip emissions** -- vehicle emission factor x distance, plus a load
//!    term of 0.05 kg CO2e per km per tonne carried.
//! 2. **Savings against a baseline** -- kg, percent, and tonnes avoided.
//! 3. **Penalty exposure** -- 5% of turnover once emissions exceed a threshold.
//! 4. **ESG financing impact** -- borrowing rate reduced by up to 2 points
//!    for a perfect ESG score, applied to borrowing of 30% of turnover.
//!
//! Results are rounded half-to-even: kg and percent to 2 places, tonnes and
//! trip emissions to 3.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CarbonLoanError;
use crate::types::{Money, Percent};
use crate::CarbonLoanResult;

/// kg CO2e per km per tonne of load.
pub const WEIGHT_FACTOR: Decimal = dec!(0.05);

/// Share of turnover at risk when the emissions threshold is breached.
pub const PENALTY_RATE: Decimal = dec!(0.05);

/// Borrowing rate before any ESG reduction, as a fraction.
pub const ESG_BASE_RATE: Decimal = dec!(0.05);

/// Rate reduction earned by an ESG score of 100, as a fraction.
pub const ESG_MAX_REDUCTION: Decimal = dec!(0.02);

/// Annual borrowing assumed as a share of turnover.
pub const BORROWING_SHARE: Decimal = dec!(0.3);

// ---------------------------------------------------------------------------
// Vehicle types
// ---------------------------------------------------------------------------

/// Drivetrain of a fleet vehicle. Unrecognised codes are treated as diesel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum VehicleType {
    Diesel,
    Petrol,
    EvSolar,
    EvNuclear,
    EvGrid,
}

impl VehicleType {
    pub const ALL: [VehicleType; 5] = [
        VehicleType::Diesel,
        VehicleType::Petrol,
        VehicleType::EvSolar,
        VehicleType::EvNuclear,
        VehicleType::EvGrid,
    ];

    /// kg CO2e per km travelled.
    pub fn emission_factor(self) -> Decimal {
        match self {
            VehicleType::Diesel => dec!(0.636),
            VehicleType::Petrol => dec!(0.580),
            VehicleType::EvSolar => dec!(0.050),
            VehicleType::EvNuclear => dec!(0.080),
            VehicleType::EvGrid => dec!(0.235),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            VehicleType::Diesel => "DIESEL",
            VehicleType::Petrol => "PETROL",
            VehicleType::EvSolar => "EV_SOLAR",
            VehicleType::EvNuclear => "EV_NUCLEAR",
            VehicleType::EvGrid => "EV_GRID",
        }
    }

    /// Case-insensitive code lookup; `-` and spaces count as `_`.
    pub fn from_code(code: &str) -> Option<VehicleType> {
        let wanted = code
            .trim()
            .to_ascii_uppercase()
            .replace(|c: char| c == '-' || c == ' ', "_");
        Self::ALL.into_iter().find(|v| v.code() == wanted)
    }
}

impl From<String> for VehicleType {
    fn from(code: String) -> Self {
        VehicleType::from_code(&code).unwrap_or(VehicleType::Diesel)
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// One delivery leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripInput {
    pub vehicle_type: VehicleType,
    pub distance_km: Decimal,
    pub weight_tonnes: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsInput {
    /// Current emissions, kg CO2e.
    pub current_emissions: Decimal,
    /// Reference emissions, kg CO2e.
    pub baseline_emissions: Decimal,
}

/// Emissions avoided relative to a baseline. Negative when emissions rose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmissionsSavings {
    pub savings_kg: Decimal,
    pub savings_percentage: Percent,
    pub savings_tonnes: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenaltyRiskInput {
    pub total_emissions_kg: Decimal,
    pub threshold_kg: Decimal,
    pub turnover: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyRisk {
    pub exceeds_threshold: bool,
    pub potential_penalty_eur: Money,
    pub excess_emissions_kg: Decimal,
    pub excess_percentage: Percent,
    pub threshold_kg: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancingImpactInput {
    /// ESG score on a 0-100 scale.
    pub esg_score: Decimal,
    pub turnover: Money,
}

/// Borrowing cost with and without the ESG reduction. Rates are fractions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancingImpact {
    pub base_rate: Decimal,
    pub adjusted_rate: Decimal,
    pub rate_reduction: Decimal,
    pub annual_savings_eur: Money,
    pub esg_score: Decimal,
}

// ---------------------------------------------------------------------------
// Calculations
// ---------------------------------------------------------------------------

/// Emissions of one trip in kg CO2e, rounded to 3 places.
pub fn calculate_emissions(
    vehicle_type: VehicleType,
    distance_km: Decimal,
    weight_tonnes: Decimal,
) -> CarbonLoanResult<Decimal> {
    non_negative("distance_km", distance_km)?;
    non_negative("weight_tonnes", weight_tonnes)?;

    let base = vehicle_type
        .emission_factor()
        .checked_mul(distance_km)
        .ok_or_else(|| out_of_range("distance_km"))?;
    let load = WEIGHT_FACTOR
        .checked_mul(distance_km)
        .and_then(|per_tonne| per_tonne.checked_mul(weight_tonnes))
        .ok_or_else(|| out_of_range("weight_tonnes"))?;
    let total = base
        .checked_add(load)
        .ok_or_else(|| out_of_range("distance_km"))?;
    Ok(total.round_dp(3))
}

/// Savings of `current` against `baseline`. A zero baseline yields zeros.
pub fn calculate_emissions_savings(
    current_emissions: Decimal,
    baseline_emissions: Decimal,
) -> CarbonLoanResult<EmissionsSavings> {
    if baseline_emissions.is_zero() {
        return Ok(EmissionsSavings {
            savings_kg: Decimal::ZERO,
            savings_percentage: Decimal::ZERO,
            savings_tonnes: Decimal::ZERO,
        });
    }

    let savings_kg = baseline_emissions
        .checked_sub(current_emissions)
        .ok_or_else(|| out_of_range("current_emissions"))?;
    let savings_percentage = savings_kg
        .checked_div(baseline_emissions)
        .and_then(|share| share.checked_mul(dec!(100)))
        .ok_or_else(|| out_of_range("baseline_emissions"))?;
    let savings_tonnes = savings_kg / dec!(1000);

    Ok(EmissionsSavings {
        savings_kg: savings_kg.round_dp(2),
        savings_percentage: savings_percentage.round_dp(2),
        savings_tonnes: savings_tonnes.round_dp(3),
    })
}

/// Penalty exposure once total emissions exceed `threshold_kg`.
pub fn calculate_penalty_risk(
    total_emissions_kg: Decimal,
    threshold_kg: Decimal,
    turnover: Money,
) -> CarbonLoanResult<PenaltyRisk> {
    if threshold_kg <= Decimal::ZERO {
        return Err(CarbonLoanError::InvalidInput {
            field: "threshold_kg".into(),
            reason: "Emissions threshold must be positive".into(),
        });
    }
    non_negative("turnover", turnover)?;

    let exceeds_threshold = total_emissions_kg > threshold_kg;
    let (potential_penalty, excess_emissions, excess_percentage) = if exceeds_threshold {
        let penalty = turnover
            .checked_mul(PENALTY_RATE)
            .ok_or_else(|| out_of_range("turnover"))?;
        let excess = total_emissions_kg
            .checked_sub(threshold_kg)
            .ok_or_else(|| out_of_range("total_emissions_kg"))?;
        let excess_pct = excess
            .checked_div(threshold_kg)
            .and_then(|share| share.checked_mul(dec!(100)))
            .ok_or_else(|| out_of_range("total_emissions_kg"))?;
        (penalty, excess, excess_pct)
    } else {
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
    };

    Ok(PenaltyRisk {
        exceeds_threshold,
        potential_penalty_eur: potential_penalty.round_dp(2),
        excess_emissions_kg: excess_emissions.round_dp(2),
        excess_percentage: excess_percentage.round_dp(2),
        threshold_kg,
    })
}

/// Annual interest saved on ESG-linked borrowing.
pub fn calculate_financing_impact(
    esg_score: Decimal,
    turnover: Money,
) -> CarbonLoanResult<FinancingImpact> {
    if esg_score < Decimal::ZERO || esg_score > dec!(100) {
        return Err(CarbonLoanError::InvalidInput {
            field: "esg_score".into(),
            reason: "ESG score must be between 0 and 100".into(),
        });
    }
    non_negative("turnover", turnover)?;

    let rate_reduction = esg_score / dec!(100) * ESG_MAX_REDUCTION;
    let adjusted_rate = ESG_BASE_RATE - rate_reduction;
    let annual_borrowing = turnover
        .checked_mul(BORROWING_SHARE)
        .ok_or_else(|| out_of_range("turnover"))?;

    // base cost - adjusted cost
    let annual_savings = annual_borrowing
        .checked_mul(ESG_BASE_RATE)
        .zip(annual_borrowing.checked_mul(adjusted_rate))
        .map(|(base_cost, adjusted_cost)| base_cost - adjusted_cost)
        .ok_or_else(|| out_of_range("turnover"))?;

    Ok(FinancingImpact {
        base_rate: ESG_BASE_RATE,
        adjusted_rate,
        rate_reduction,
        annual_savings_eur: annual_savings.round_dp(2),
        esg_score,
    })
}

fn non_negative(field: &str, value: Decimal) -> CarbonLoanResult<()> {
    if value < Decimal::ZERO {
        return Err(CarbonLoanError::InvalidInput {
            field: field.into(),
            reason: "Value cannot be negative".into(),
        });
    }
    Ok(())
}

fn out_of_range(field: &str) -> CarbonLoanError {
    CarbonLoanError::InvalidInput {
        field: field.into(),
        reason: "Result exceeds decimal range".into(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
