use carbon_loan_core::carbon::profile::{EmissionProfile, EmissionTier, ProfileCatalog};
use carbon_loan_core::carbon::rate_model::{self, EmissionStatus};
use carbon_loan_core::loan::{amortization, pricing};
use carbon_loan_core::CarbonLoanError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn custom_profile(baseline: Decimal, gwp: Decimal) -> EmissionProfile {
    EmissionProfile {
        tier: EmissionTier::Medium,
        gas_type: "CO₂".into(),
        baseline_emissions: baseline,
        gwp_multiplier: gwp,
        description: String::new(),
    }
}

// ===========================================================================
// Rate model
// ===========================================================================

#[test]
fn test_rate_adjustment_is_deterministic_across_catalog() {
    let catalog = ProfileCatalog::default();
    for profile in catalog.profiles() {
        let range = profile.emissions_range();
        for actual in [range.min, profile.baseline_emissions, range.max] {
            let a = rate_model::compute_rate_adjustment(profile, actual).unwrap();
            let b = rate_model::compute_rate_adjustment(profile, actual).unwrap();
            assert_eq!(a, b);
            assert!(a.final_rate_percent >= rate_model::RATE_FLOOR);
        }
    }
}

#[test]
fn test_boundary_ratio_075_uses_upper_band() {
    let out = rate_model::compute_rate_adjustment(&custom_profile(dec!(1000), dec!(1.0)), dec!(750))
        .unwrap();
    assert_eq!(out.adjustment_percent, dec!(-1.0));
    assert_eq!(out.final_rate_percent, dec!(4.5));
}

#[test]
fn test_gwp_surcharge_added_to_band() {
    // Ratio exactly 0.5 is not "< 0.50": band [0.50, 0.75) => -1.5, surcharge +1.5
    let out = rate_model::compute_rate_adjustment(&custom_profile(dec!(1000), dec!(2.0)), dec!(500))
        .unwrap();
    assert_eq!(out.adjustment_percent, dec!(0));
    assert_eq!(out.final_rate_percent, dec!(5.5));
}

#[test]
fn test_catalog_tiers_at_baseline() {
    // At baseline every tier sits in the +0.5 band; the GWP surcharge separates them
    let catalog = ProfileCatalog::default();
    let expected = [
        (EmissionTier::Low, dec!(6.0)),
        (EmissionTier::MediumLow, dec!(6.375)),
        (EmissionTier::Medium, dec!(6.75)),
        (EmissionTier::High, dec!(7.5)),
        (EmissionTier::VeryHigh, dec!(9.0)),
    ];
    for (tier, rate) in expected {
        let profile = catalog.get(tier).unwrap();
        let out = rate_model::compute_rate_adjustment(profile, profile.baseline_emissions).unwrap();
        assert_eq!(out.final_rate_percent, rate, "tier {tier}");
    }
}

// ===========================================================================
// Amortization
// ===========================================================================

#[test]
fn test_zero_rate_loan_pays_equal_instalments() {
    let out = amortization::amortize(dec!(120000), Decimal::ZERO, 12).unwrap();
    assert_eq!(out.monthly_payment, dec!(10000));
    assert_eq!(out.total_payment, dec!(120000));
}

#[test]
fn test_thirty_year_loan_reports_sixty_months() {
    let out = amortization::amortize(dec!(100000), dec!(6.0), 360).unwrap();
    assert_eq!(out.schedule.len(), 60);
    let months: Vec<u32> = out.schedule.iter().map(|r| r.month).collect();
    assert_eq!(months, (1..=60).collect::<Vec<u32>>());
}

#[test]
fn test_balance_declines_monotonically() {
    let out = amortization::amortize(dec!(250000), dec!(7.25), 120).unwrap();
    for pair in out.schedule.windows(2) {
        assert!(pair[1].remaining_balance < pair[0].remaining_balance);
        // Interest share shrinks, principal share grows
        assert!(pair[1].interest_portion < pair[0].interest_portion);
        assert!(pair[1].principal_portion > pair[0].principal_portion);
    }
}

#[test]
fn test_amortize_rejects_zero_term() {
    let err = amortization::amortize(dec!(1000), dec!(5), 0).unwrap_err();
    match err {
        CarbonLoanError::InvalidInput { field, .. } => assert_eq!(field, "term_months"),
        other => panic!("unexpected error: {other}"),
    }
}

// ===========================================================================
// End-to-end
// ===========================================================================

#[test]
fn test_medium_profile_end_to_end() {
    let catalog = ProfileCatalog::default();
    let input = pricing::PricingInput {
        profile: catalog.find_by_label("Medium").unwrap().clone(),
        actual_emissions: dec!(3000),
        principal: dec!(100000),
        term_months: 60,
    };
    let out = pricing::price_carbon_linked_loan(&input).unwrap();
    let r = &out.result;

    assert_eq!(r.base_rate, dec!(5.5));
    assert_eq!(r.adjustment_percent, dec!(1.25));
    assert_eq!(r.final_rate_percent, dec!(6.75));
    assert_eq!(r.emission_status, EmissionStatus::AtRisk);

    // Annuity: 100,000 * 0.005625 / (1 - 1.005625^-60)
    assert_eq!(r.monthly_payment.round_dp(2), dec!(1968.35));
    assert_eq!(r.total_interest.round_dp(2), dec!(18100.76));
    assert_eq!(r.schedule.len(), 60);
    assert!(r.schedule[59].remaining_balance < dec!(0.000001));

    let standalone = amortization::amortize(dec!(100000), dec!(6.75), 60).unwrap();
    assert_eq!(standalone.schedule, r.schedule);
}

#[test]
fn test_pricing_envelope_metadata() {
    let catalog = ProfileCatalog::default();
    let input = pricing::PricingInput {
        profile: catalog.default_profile().clone(),
        actual_emissions: dec!(1200),
        principal: dec!(50000),
        term_months: 36,
    };
    let out = pricing::price_carbon_linked_loan(&input).unwrap();
    assert_eq!(out.metadata.precision, "rust_decimal_128bit");
    assert_eq!(out.assumptions["term_months"], 36);
    // ratio 0.4 => -2.0, Medium GWP 1.5 => +0.75
    assert_eq!(out.result.final_rate_percent, dec!(4.25));
    assert!(out.result.savings_vs_market.unwrap() > Decimal::ZERO);
}

// ===========================================================================
// Extreme inputs
// ===========================================================================

#[test]
fn test_heavy_gwp_profile_prices_as_interest_only() {
    // band +0.5, surcharge (200 - 1) * 1.5 = 298.5 => 304.5% p.a.
    let input = pricing::PricingInput {
        profile: custom_profile(dec!(1000), dec!(200)),
        actual_emissions: dec!(1000),
        principal: dec!(100000),
        term_months: 360,
    };
    let out = pricing::price_carbon_linked_loan(&input).unwrap();
    let r = &out.result;
    assert_eq!(r.final_rate_percent, dec!(304.5));
    assert_eq!(r.monthly_payment, dec!(25375));
    assert_eq!(r.schedule[0].principal_portion, Decimal::ZERO);
    assert_eq!(r.total_payment, dec!(25375) * dec!(360));
}

#[test]
fn test_out_of_range_amounts_fail_without_panicking() {
    let rate = rate_model::compute_rate_adjustment(&custom_profile(dec!(0.0001), dec!(1.0)), Decimal::MAX);
    assert!(matches!(rate, Err(CarbonLoanError::InvalidInput { .. })));

    let input = pricing::PricingInput {
        profile: custom_profile(dec!(1000), dec!(1.0)),
        actual_emissions: dec!(1000),
        principal: dec!(70000000000000000000000000000),
        term_months: 360,
    };
    assert!(matches!(
        pricing::price_carbon_linked_loan(&input),
        Err(CarbonLoanError::FinancialImpossibility(_))
    ));
}
