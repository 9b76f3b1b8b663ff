use carbon_loan_core::carbon::emissions::{
    self, FinancingImpactInput, PenaltyRiskInput, TripInput, VehicleType,
};
use carbon_loan_core::CarbonLoanError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Fleet emissions
// ===========================================================================

#[test]
fn test_electric_fleet_beats_diesel_baseline() {
    let legs = [(dec!(120), dec!(8)), (dec!(45.5), dec!(2.25)), (dec!(300), dec!(12))];

    let total = |vehicle: VehicleType| -> Decimal {
        legs.iter()
            .map(|(km, t)| emissions::calculate_emissions(vehicle, *km, *t).unwrap())
            .sum()
    };
    let diesel = total(VehicleType::Diesel);
    let solar = total(VehicleType::EvSolar);

    let savings = emissions::calculate_emissions_savings(solar, diesel).unwrap();
    assert!(savings.savings_kg > Decimal::ZERO);
    assert!(savings.savings_percentage > dec!(0) && savings.savings_percentage < dec!(100));
    assert_eq!(savings.savings_kg, (diesel - solar).round_dp(2));
}

#[test]
fn test_load_term_is_independent_of_vehicle() {
    for vehicle in VehicleType::ALL {
        let empty = emissions::calculate_emissions(vehicle, dec!(100), Decimal::ZERO).unwrap();
        let loaded = emissions::calculate_emissions(vehicle, dec!(100), dec!(4)).unwrap();
        // 0.05 * 100 * 4
        assert_eq!(loaded - empty, dec!(20));
    }
}

#[test]
fn test_trip_input_from_json() {
    let trip: TripInput = serde_json::from_str(
        r#"{"vehicle_type":"PETROL","distance_km":"250","weight_tonnes":"1.5"}"#,
    )
    .unwrap();
    // 0.580 * 250 + 0.05 * 250 * 1.5
    let kg = emissions::calculate_emissions(trip.vehicle_type, trip.distance_km, trip.weight_tonnes)
        .unwrap();
    assert_eq!(kg, dec!(163.75));
    assert_eq!(
        serde_json::to_value(trip.vehicle_type).unwrap(),
        serde_json::json!("PETROL")
    );
}

// ===========================================================================
// Financial exposure
// ===========================================================================

#[test]
fn test_penalty_risk_from_json() {
    let input: PenaltyRiskInput = serde_json::from_str(
        r#"{"total_emissions_kg":"1333.333","threshold_kg":"1000","turnover":"1234567.89"}"#,
    )
    .unwrap();
    let risk =
        emissions::calculate_penalty_risk(input.total_emissions_kg, input.threshold_kg, input.turnover)
            .unwrap();
    assert!(risk.exceeds_threshold);
    // 1234567.89 * 0.05 = 61728.3945
    assert_eq!(risk.potential_penalty_eur, dec!(61728.39));
    assert_eq!(risk.excess_emissions_kg, dec!(333.33));
    assert_eq!(risk.excess_percentage, dec!(33.33));
}

#[test]
fn test_financing_impact_scales_with_score() {
    let input = FinancingImpactInput {
        esg_score: dec!(40),
        turnover: dec!(500000),
    };
    let low = emissions::calculate_financing_impact(input.esg_score, input.turnover).unwrap();
    let high = emissions::calculate_financing_impact(dec!(80), input.turnover).unwrap();
    // 150,000 borrowed; 0.008 and 0.016 off the rate
    assert_eq!(low.annual_savings_eur, dec!(1200));
    assert_eq!(high.annual_savings_eur, dec!(2400));
    assert!(high.adjusted_rate < low.adjusted_rate);
}

#[test]
fn test_invalid_exposure_inputs() {
    match emissions::calculate_penalty_risk(dec!(10), dec!(-5), dec!(100)).unwrap_err() {
        CarbonLoanError::InvalidInput { field, .. } => assert_eq!(field, "threshold_kg"),
        other => panic!("unexpected error: {other}"),
    }
    match emissions::calculate_financing_impact(dec!(50), dec!(-1)).unwrap_err() {
        CarbonLoanError::InvalidInput { field, .. } => assert_eq!(field, "turnover"),
        other => panic!("unexpected error: {other}"),
    }
}
