//! End-to-end pricing of a carbon-linked loan.
//!
//! Runs the emission-banded rate model and feeds the resulting annual rate
//! into the amortization engine, then adds the figures a borrower sees next to
//! the quote: the qualitative emission status and, when the carbon adjustment
//! is a discount, the interest saved relative to the market rate.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::carbon::profile::EmissionProfile;
use crate::carbon::rate_model::{self, EmissionStatus};
use crate::loan::amortization::{self, AmortizationRow, SCHEDULE_MONTHS_CAP};
use crate::types::*;
use crate::CarbonLoanResult;

/// Principal range offered to borrowers. Values outside it are priced but flagged.
pub const PRINCIPAL_RANGE: (Money, Money) = (dec!(10000), dec!(500000));

/// Term range offered to borrowers, in months.
pub const TERM_RANGE_MONTHS: (u32, u32) = (12, 360);

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingInput {
    pub profile: EmissionProfile,
    /// Measured emissions, tonnes CO2e.
    pub actual_emissions: Tonnes,
    pub principal: Money,
    pub term_months: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingResult {
    pub base_rate: Percent,
    pub adjustment_percent: Percent,
    pub final_rate_percent: Percent,
    pub emission_ratio: Decimal,
    pub emission_status: EmissionStatus,
    pub monthly_payment: Money,
    pub total_payment: Money,
    pub total_interest: Money,
    /// Interest saved against the market rate; present only for discounted loans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_vs_market: Option<Money>,
    pub schedule: Vec<AmortizationRow>,
}

// ---------------------------------------------------------------------------
// Core calculation
// ---------------------------------------------------------------------------

/// Price a carbon-linked loan: rate adjustment, payment, and schedule.
pub fn price_carbon_linked_loan(
    input: &PricingInput,
) -> CarbonLoanResult<ComputationOutput<PricingResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let rates = rate_model::compute_rate_adjustment(&input.profile, input.actual_emissions)?;
    debug!(
        tier = %input.profile.tier,
        ratio = %rates.emission_ratio,
        final_rate = %rates.final_rate_percent,
        "rate adjustment computed"
    );

    let loan = amortization::amortize(
        input.principal,
        rates.final_rate_percent,
        input.term_months,
    )?;
    debug!(
        monthly_payment = %loan.monthly_payment,
        rows = loan.schedule.len(),
        "amortization computed"
    );

    // --- Warnings ---
    if input.principal < PRINCIPAL_RANGE.0 || input.principal > PRINCIPAL_RANGE.1 {
        warnings.push(format!(
            "Principal {} is outside the offered range {} - {}.",
            input.principal, PRINCIPAL_RANGE.0, PRINCIPAL_RANGE.1
        ));
    }
    if input.term_months < TERM_RANGE_MONTHS.0 || input.term_months > TERM_RANGE_MONTHS.1 {
        warnings.push(format!(
            "Term of {} months is outside the offered range {} - {} months.",
            input.term_months, TERM_RANGE_MONTHS.0, TERM_RANGE_MONTHS.1
        ));
    }
    if input.profile.gwp_multiplier < Decimal::ONE {
        warnings.push("GWP multiplier below 1.0 produces a negative surcharge.".into());
    }
    if rates.base_rate + rates.adjustment_percent < rate_model::RATE_FLOOR {
        warnings.push(format!(
            "Rate floored at {}%.",
            rate_model::RATE_FLOOR
        ));
    }
    if input.term_months > SCHEDULE_MONTHS_CAP {
        warnings.push(format!(
            "Schedule truncated to the first {SCHEDULE_MONTHS_CAP} of {} months.",
            input.term_months
        ));
    }

    // Share of the market-rate interest bill avoided by the discount
    let savings_vs_market = if rates.adjustment_percent < Decimal::ZERO {
        Some((rates.base_rate - rates.final_rate_percent) / rates.base_rate * loan.total_interest)
    } else {
        None
    };

    let result = PricingResult {
        base_rate: rates.base_rate,
        adjustment_percent: rates.adjustment_percent,
        final_rate_percent: rates.final_rate_percent,
        emission_ratio: rates.emission_ratio,
        emission_status: rate_model::classify_emission_ratio(rates.emission_ratio),
        monthly_payment: loan.monthly_payment,
        total_payment: loan.total_payment,
        total_interest: loan.total_interest,
        savings_vs_market,
        schedule: loan.schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Carbon-linked loan: emission-ratio band + GWP surcharge over 5.5% base, annuity amortization",
        input,
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
