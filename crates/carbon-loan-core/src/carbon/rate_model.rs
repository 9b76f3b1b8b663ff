//! Carbon-linked interest-rate model.
//!
//! The rate charged on a loan is the base market rate plus an adjustment:
//!
//! 1. **Emission band** -- actual / baseline emissions mapped through a fixed
//!    step table (better than baseline earns a discount, worse pays a premium).
//! 2. **GWP surcharge** -- `(gwp_multiplier - 1.0) x 1.5` percentage points,
//!    applied regardless of the emission ratio.
//! 3. **Floor** -- the final rate never drops below 0.5%.
//!
//! Bands are half-open and lower-inclusive: a ratio of exactly 0.75 lands in
//! `[0.75, 1.00)`, not in `[0.50, 0.75)`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::carbon::profile::EmissionProfile;
use crate::error::CarbonLoanError;
use crate::types::{Percent, Tonnes};
use crate::CarbonLoanResult;

/// Reference market rate, percent per annum.
pub const BASE_RATE: Percent = dec!(5.5);

/// Lowest rate the model will quote, percent per annum.
pub const RATE_FLOOR: Percent = dec!(0.5);

/// Percentage points charged per unit of GWP multiplier above 1.0.
pub const GWP_SURCHARGE_FACTOR: Decimal = dec!(1.5);

/// Upper (exclusive) ratio bound and adjustment for each band, ascending.
/// Ratios at or above the last bound fall into [`TOP_BAND_ADJUSTMENT`].
const RATIO_BANDS: [(Decimal, Percent); 6] = [
    (dec!(0.50), dec!(-2.0)),
    (dec!(0.75), dec!(-1.5)),
    (dec!(1.00), dec!(-1.0)),
    (dec!(1.25), dec!(0.5)),
    (dec!(1.50), dec!(1.5)),
    (dec!(2.00), dec!(2.5)),
];

const TOP_BAND_ADJUSTMENT: Percent = dec!(4.0);

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// Profile and measured emissions to price against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateAdjustmentInput {
    pub profile: EmissionProfile,
    /// Measured emissions, tonnes CO2e.
    pub actual_emissions: Tonnes,
}

/// Rate adjustment for a profile and an actual-emissions figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateAdjustment {
    /// Market reference rate (constant).
    pub base_rate: Percent,
    /// Actual emissions divided by the profile baseline.
    pub emission_ratio: Decimal,
    /// Adjustment from the emission band alone.
    pub band_adjustment: Percent,
    /// Adjustment from the GWP multiplier alone.
    pub gwp_surcharge: Percent,
    /// Band adjustment plus GWP surcharge.
    pub adjustment_percent: Percent,
    /// `max(RATE_FLOOR, base_rate + adjustment_percent)`.
    pub final_rate_percent: Percent,
}

/// Qualitative reading of the emission ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmissionStatus {
    /// Well below baseline (ratio < 0.75).
    Excellent,
    /// Below baseline (0.75 <= ratio < 1.0).
    Good,
    /// Above baseline (1.0 <= ratio < 1.5).
    AtRisk,
    /// Significantly over baseline (ratio >= 1.5).
    Critical,
}

// ---------------------------------------------------------------------------
// Core calculation
// ---------------------------------------------------------------------------

/// Compute the carbon-adjusted interest rate.
pub fn compute_rate_adjustment(
    profile: &EmissionProfile,
    actual_emissions: Tonnes,
) -> CarbonLoanResult<RateAdjustment> {
    profile.validate()?;
    if actual_emissions < Decimal::ZERO {
        return Err(CarbonLoanError::InvalidInput {
            field: "actual_emissions".into(),
            reason: "Actual emissions cannot be negative".into(),
        });
    }

    let emission_ratio = actual_emissions
        .checked_div(profile.baseline_emissions)
        .ok_or_else(|| out_of_range("actual_emissions", "Emission ratio exceeds decimal range"))?;
    let band_adjustment = band_adjustment(emission_ratio);
    let gwp_surcharge = profile
        .gwp_multiplier
        .checked_sub(Decimal::ONE)
        .and_then(|excess| excess.checked_mul(GWP_SURCHARGE_FACTOR))
        .ok_or_else(|| out_of_range("gwp_multiplier", "GWP surcharge exceeds decimal range"))?;
    let adjustment_percent = band_adjustment
        .checked_add(gwp_surcharge)
        .ok_or_else(|| out_of_range("gwp_multiplier", "Rate adjustment exceeds decimal range"))?;
    let final_rate_percent = BASE_RATE
        .checked_add(adjustment_percent)
        .ok_or_else(|| out_of_range("gwp_multiplier", "Adjusted rate exceeds decimal range"))?
        .max(RATE_FLOOR);

    Ok(RateAdjustment {
        base_rate: BASE_RATE,
        emission_ratio,
        band_adjustment,
        gwp_surcharge,
        adjustment_percent,
        final_rate_percent,
    })
}

fn out_of_range(field: &str, reason: &str) -> CarbonLoanError {
    CarbonLoanError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Step-function adjustment for an emission ratio. First band whose upper
/// bound exceeds the ratio wins.
pub fn band_adjustment(emission_ratio: Decimal) -> Percent {
    RATIO_BANDS
        .iter()
        .find(|(upper, _)| emission_ratio < *upper)
        .map(|(_, adjustment)| *adjustment)
        .unwrap_or(TOP_BAND_ADJUSTMENT)
}

pub fn classify_emission_ratio(emission_ratio: Decimal) -> EmissionStatus {
    if emission_ratio < dec!(0.75) {
        EmissionStatus::Excellent
    } else if emission_ratio < Decimal::ONE {
        EmissionStatus::Good
    } else if emission_ratio < dec!(1.5) {
        EmissionStatus::AtRisk
    } else {
        EmissionStatus::Critical
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carbon::profile::EmissionTier;
    use rust_decimal_macros::dec;

    fn flat_profile(baseline: Decimal, gwp: Decimal) -> EmissionProfile {
        EmissionProfile {
            tier: EmissionTier::Medium,
            gas_type: String::new(),
            baseline_emissions: baseline,
            gwp_multiplier: gwp,
            description: String::new(),
        }
    }

    #[test]
    fn test_band_table() {
        let cases = [
            (dec!(0), dec!(-2.0)),
            (dec!(0.4999), dec!(-2.0)),
            (dec!(0.50), dec!(-1.5)),
            (dec!(0.75), dec!(-1.0)),
            (dec!(0.9999), dec!(-1.0)),
            (dec!(1.00), dec!(0.5)),
            (dec!(1.25), dec!(1.5)),
            (dec!(1.50), dec!(2.5)),
            (dec!(1.9999), dec!(2.5)),
            (dec!(2.00), dec!(4.0)),
            (dec!(10), dec!(4.0)),
        ];
        for (ratio, expected) in cases {
            assert_eq!(band_adjustment(ratio), expected, "ratio {ratio}");
        }
    }

    #[test]
    fn test_ratio_exactly_075_is_lower_inclusive() {
        let out = compute_rate_adjustment(&flat_profile(dec!(1000), dec!(1.0)), dec!(750)).unwrap();
        assert_eq!(out.emission_ratio, dec!(0.75));
        assert_eq!(out.adjustment_percent, dec!(-1.0));
        assert_eq!(out.final_rate_percent, dec!(4.5));
    }

    #[test]
    fn test_gwp_surcharge_offsets_discount() {
        let out = compute_rate_adjustment(&flat_profile(dec!(1000), dec!(2.0)), dec!(500)).unwrap();
        assert_eq!(out.band_adjustment, dec!(-1.5));
        assert_eq!(out.gwp_surcharge, dec!(1.5));
        assert_eq!(out.adjustment_percent, Decimal::ZERO);
        assert_eq!(out.final_rate_percent, dec!(5.5));
    }

    #[test]
    fn test_gwp_surcharge_is_unbounded() {
        let out = compute_rate_adjustment(&flat_profile(dec!(1000), dec!(3.0)), dec!(3000)).unwrap();
        // +4.0 band, +3.0 surcharge
        assert_eq!(out.final_rate_percent, dec!(12.5));
    }

    #[test]
    fn test_rate_floor() {
        // -2.0 band, (-1.0 - 1.0) * 1.5 = -3.0 surcharge => 0.5 exactly
        let out = compute_rate_adjustment(&flat_profile(dec!(1000), dec!(-1.0)), dec!(0)).unwrap();
        assert_eq!(out.final_rate_percent, dec!(0.5));

        // Raw rate of -1.0 is floored
        let out = compute_rate_adjustment(&flat_profile(dec!(1000), dec!(-2.0)), dec!(0)).unwrap();
        assert_eq!(out.adjustment_percent, dec!(-6.5));
        assert_eq!(out.final_rate_percent, RATE_FLOOR);
    }

    #[test]
    fn test_floor_holds_across_ratios_and_multipliers() {
        for gwp in [dec!(-3), dec!(0), dec!(0.5), dec!(1), dec!(2), dec!(3)] {
            for actual in [dec!(0), dec!(250), dec!(999), dec!(1000), dec!(5000)] {
                let out = compute_rate_adjustment(&flat_profile(dec!(1000), gwp), actual).unwrap();
                assert!(out.final_rate_percent >= RATE_FLOOR);
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let profile = flat_profile(dec!(3000), dec!(1.5));
        let a = compute_rate_adjustment(&profile, dec!(2875)).unwrap();
        let b = compute_rate_adjustment(&profile, dec!(2875)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_negative_emissions_rejected() {
        let err = compute_rate_adjustment(&flat_profile(dec!(1000), dec!(1.0)), dec!(-1)).unwrap_err();
        match err {
            CarbonLoanError::InvalidInput { field, .. } => assert_eq!(field, "actual_emissions"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_baseline_rejected() {
        let result = compute_rate_adjustment(&flat_profile(Decimal::ZERO, dec!(1.0)), dec!(10));
        assert!(matches!(result, Err(CarbonLoanError::InvalidInput { .. })));
    }

    #[test]
    fn test_ratio_overflow_is_an_input_error() {
        let err = compute_rate_adjustment(&flat_profile(dec!(0.0001), dec!(1.0)), Decimal::MAX)
            .unwrap_err();
        match err {
            CarbonLoanError::InvalidInput { field, .. } => assert_eq!(field, "actual_emissions"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_surcharge_overflow_is_an_input_error() {
        let err = compute_rate_adjustment(&flat_profile(dec!(1000), Decimal::MAX), dec!(1000))
            .unwrap_err();
        match err {
            CarbonLoanError::InvalidInput { field, .. } => assert_eq!(field, "gwp_multiplier"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_classify_emission_ratio() {
        assert_eq!(classify_emission_ratio(dec!(0.74)), EmissionStatus::Excellent);
        assert_eq!(classify_emission_ratio(dec!(0.75)), EmissionStatus::Good);
        assert_eq!(classify_emission_ratio(dec!(1.0)), EmissionStatus::AtRisk);
        assert_eq!(classify_emission_ratio(dec!(1.49)), EmissionStatus::AtRisk);
        assert_eq!(classify_emission_ratio(dec!(1.5)), EmissionStatus::Critical);
    }
}
