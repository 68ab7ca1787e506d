//! Property suites for the mission engine models.
//!
//! Run with more cases:
//!   MISSION_FUZZ_CASES=10000 cargo test -p mission-fuzz

use mission_engine::flight::{calculate_wind_volatility, is_winter, simulate_station_keeping};
use mission_engine::simulation::is_feasible;
use mission_engine::{
    DriftRisk, MissionRequest, PowerModel, PowerStatus, PricingEngine, SimulationService, Warning,
};
use mission_fuzz::prelude::*;

// ============================================================================
// Power
// ============================================================================

proptest! {
    #![proptest_config(FuzzConfig::from_env().to_proptest_config())]

    #[test]
    fn day_and_night_cover_the_whole_day(lat in latitude_deg(), doy in day_of_year()) {
        let (day, night) = PowerModel::calculate_day_night_hours(lat, doy);
        prop_assert!(((day + night) - 24.0).abs() < 1e-9, "{} + {}", day, night);
        prop_assert!(day >= 0.0 && day <= 24.0 + 1e-9, "day {}", day);
    }

    #[test]
    fn mirrored_latitudes_swap_day_and_night(lat in latitude_non_polar(), doy in day_of_year()) {
        let (north_day, _) = PowerModel::calculate_day_night_hours(lat, doy);
        let (_, south_night) = PowerModel::calculate_day_night_hours(-lat, doy);
        prop_assert!((north_day - south_night).abs() < 1e-6);
    }

    #[test]
    fn power_status_matches_survival(
        lat in latitude_deg(),
        month in month(),
        battery in 0.0f64..=10_000.0,
        power in 0.0f64..=300.0,
    ) {
        let model = PowerModel::default();
        let assessment = model.check_feasibility(lat, month, battery, power).unwrap();

        let positive = assessment.status == PowerStatus::PowerPositive;
        prop_assert_eq!(assessment.survives_night, positive);
        prop_assert!((assessment.day_hours + assessment.night_hours - 24.0).abs() <= 0.01 + 1e-9);
        if assessment.survives_night {
            prop_assert!(assessment.margin_wh >= 0.0);
        } else {
            prop_assert!(assessment.margin_wh <= 0.0);
        }
    }

    #[test]
    fn bigger_battery_never_hurts(
        lat in latitude_deg(),
        month in month(),
        battery in 0.0f64..=5_000.0,
        extra in 0.0f64..=5_000.0,
        power in 0.0f64..=300.0,
    ) {
        let model = PowerModel::default();
        let small = model.check_feasibility(lat, month, battery, power).unwrap();
        let large = model.check_feasibility(lat, month, battery + extra, power).unwrap();
        prop_assert!(!small.survives_night || large.survives_night);
    }
}

// ============================================================================
// Flight
// ============================================================================

proptest! {
    #![proptest_config(FuzzConfig::from_env().to_proptest_config())]

    #[test]
    fn volatility_is_bounded(lat in latitude_deg(), month in month()) {
        let volatility = calculate_wind_volatility(lat, month);
        prop_assert!((0.0..=0.9).contains(&volatility), "volatility {}", volatility);
    }

    #[test]
    fn winter_is_never_calmer(lat in latitude_deg(), month in month()) {
        let volatility = calculate_wind_volatility(lat, month);
        let calm_month = if lat > 0.0 { 7 } else { 1 };
        prop_assert!(!is_winter(lat, calm_month));
        prop_assert!(volatility >= calculate_wind_volatility(lat, calm_month));
    }

    #[test]
    fn station_keeping_stays_in_range(
        lat in latitude_deg(),
        month in month(),
        radius in radius_km(),
        maneuverability in maneuverability(),
    ) {
        let flight = simulate_station_keeping(lat, month, radius, maneuverability).unwrap();
        prop_assert!((0.01..=0.8).contains(&flight.failure_probability));
        prop_assert!(flight.overprovisioning_factor >= 1.0);
        prop_assert!(flight.overprovisioning_factor <= 2.2 + 1e-9);
        prop_assert!(
            (flight.failure_probability + flight.station_keeping_probability - 1.0).abs() <= 0.01 + 1e-9
        );
    }

    #[test]
    fn wider_box_is_easier_to_hold(
        lat in latitude_deg(),
        month in month(),
        radius in radius_km(),
        extra in 0.0f64..=500.0,
    ) {
        let tight = simulate_station_keeping(lat, month, radius, 1.0).unwrap();
        let loose = simulate_station_keeping(lat, month, radius + extra, 1.0).unwrap();
        prop_assert!(loose.failure_probability <= tight.failure_probability);
        prop_assert!(loose.station_keeping_probability >= tight.station_keeping_probability);
        prop_assert!(loose.overprovisioning_factor <= tight.overprovisioning_factor);
    }

    #[test]
    fn better_steering_lowers_risk(
        lat in latitude_deg(),
        month in month(),
        radius in radius_km(),
        base in maneuverability(),
        boost in 0.0f64..=5.0,
    ) {
        let sluggish = simulate_station_keeping(lat, month, radius, base).unwrap();
        let agile = simulate_station_keeping(lat, month, radius, base + boost).unwrap();
        prop_assert!(agile.failure_probability <= sluggish.failure_probability);
    }

    #[test]
    fn drift_risk_tracks_failure_probability(
        lat in latitude_deg(),
        month in month(),
        radius in radius_km(),
    ) {
        let flight = simulate_station_keeping(lat, month, radius, 1.0).unwrap();
        // Risk is classified before rounding, so allow the rounding band
        match flight.drift_risk {
            DriftRisk::High => prop_assert!(flight.failure_probability >= 0.4),
            DriftRisk::Moderate => prop_assert!((0.2..=0.4).contains(&flight.failure_probability)),
            DriftRisk::Low => prop_assert!(flight.failure_probability <= 0.2),
        }
    }
}

// ============================================================================
// Pricing
// ============================================================================

proptest! {
    #![proptest_config(FuzzConfig::from_env().to_proptest_config())]

    #[test]
    fn price_covers_cost_at_margin(
        platform in platform(),
        payload in payload(),
        days in duration_days(),
        k in overprovisioning_factor(),
        margin in margin_fraction(),
    ) {
        let quote = PricingEngine::default()
            .calculate_quote(&platform, &payload, days, k, margin)
            .unwrap();

        let expected = quote.total_cost / (1.0 - margin);
        let tolerance = 0.01 / (1.0 - margin) + 1e-6;
        prop_assert!(
            (quote.price_quoted - expected).abs() <= tolerance,
            "price {} vs {}", quote.price_quoted, expected
        );
        prop_assert!(
            (quote.margin_absolute - (quote.price_quoted - quote.total_cost)).abs() <= 0.015 + 1e-6
        );
        prop_assert!(quote.price_quoted >= quote.total_cost);
        prop_assert_eq!(quote.breakdown.overprovisioning_factor, k);
    }

    #[test]
    fn larger_fleet_costs_more(
        platform in platform(),
        payload in payload(),
        days in duration_days(),
        k in overprovisioning_factor(),
        extra in 0.0f64..=1.0,
    ) {
        let engine = PricingEngine::default();
        let base = engine.calculate_quote(&platform, &payload, days, k, 0.3).unwrap();
        let bigger = engine.calculate_quote(&platform, &payload, days, k + extra, 0.3).unwrap();
        prop_assert!(bigger.total_cost >= base.total_cost);
    }
}

// ============================================================================
// Simulation
// ============================================================================

proptest! {
    #![proptest_config(FuzzConfig::from_env().to_proptest_config())]

    #[test]
    fn verdict_follows_warnings((platform, payload, request) in mission()) {
        let result = SimulationService::default()
            .simulate(&platform, &payload, &request)
            .unwrap();

        prop_assert_eq!(result.is_feasible, is_feasible(&result.warnings));
        prop_assert_eq!(
            result.quote.breakdown.overprovisioning_factor,
            result.flight_analysis.overprovisioning_factor
        );
        prop_assert_eq!(
            result.warnings.contains(&Warning::InsufficientBattery),
            !result.power_analysis.survives_night
        );
        prop_assert_eq!(
            result.warnings.contains(&Warning::HighDriftRisk),
            result.flight_analysis.drift_risk == DriftRisk::High
        );
        let overweight = result
            .warnings
            .iter()
            .any(|w| matches!(w, Warning::PayloadOverweight { .. }));
        prop_assert_eq!(overweight, payload.mass_kg > platform.max_payload_mass_kg);
    }

    #[test]
    fn simulation_is_idempotent((platform, payload, request) in mission()) {
        let service = SimulationService::default();
        let first = service.simulate(&platform, &payload, &request).unwrap();
        let second = service.simulate(&platform, &payload, &request).unwrap();
        prop_assert_eq!(first, second);
    }
}

// ============================================================================
// Reference scenarios
// ============================================================================

#[test]
fn scenario_equator_is_calm() {
    for month in 1..=12 {
        let volatility = calculate_wind_volatility(0.0, month);
        assert!(volatility <= 0.15 + 1e-9, "month {}: {}", month, volatility);

        let flight = simulate_station_keeping(0.0, month, 50.0, 1.0).unwrap();
        assert_eq!(flight.drift_risk, DriftRisk::Low);
    }
}

#[test]
fn scenario_arctic_winter_is_windy() {
    let volatility = calculate_wind_volatility(70.0, 1);
    assert!(volatility >= 0.5, "volatility {}", volatility);

    let flight = simulate_station_keeping(70.0, 1, 30.0, 1.0).unwrap();
    assert_eq!(flight.drift_risk, DriftRisk::High);
}

#[test]
fn scenario_equatorial_battery_survives() {
    let model = PowerModel::default();
    for month in 1..=12 {
        let power = model.check_feasibility(0.0, month, 2000.0, 45.0).unwrap();
        assert!(power.survives_night);
        assert_eq!(power.status, PowerStatus::PowerPositive);
        assert!((power.night_energy_needed_wh - 540.0).abs() < 0.5);
    }
}

#[test]
fn scenario_reference_quote() {
    let catalog = mission_engine::Catalog::with_defaults();
    let platform = catalog.platform("SmartBalloon Mk1").unwrap();
    let payload = catalog.payload("Optical High-Res (EOS-1)").unwrap();

    let quote = PricingEngine::default()
        .calculate_quote(platform, payload, 30, 1.0, 0.30)
        .unwrap();
    assert_eq!(quote.breakdown.platform_amortized, 6666.67);
    assert_eq!(quote.breakdown.payload_amortized, 2500.0);
    assert_eq!(quote.total_cost, 76666.67);
    assert_eq!(quote.price_quoted, 109523.81);
}

#[test]
fn scenario_reference_mission_end_to_end() {
    let catalog = mission_engine::Catalog::with_defaults();
    let request = MissionRequest {
        latitude: 0.0,
        longitude: 36.8,
        month: 3,
        duration_days: 30,
        target_radius_km: 50.0,
        margin_fraction: 0.30,
        start_date: None,
    };

    let result = SimulationService::default()
        .simulate(
            catalog.platform("SmartBalloon Mk1").unwrap(),
            catalog.payload("Optical High-Res (EOS-1)").unwrap(),
            &request,
        )
        .unwrap();
    assert!(result.is_feasible);
    assert!(result.warnings.is_empty());
}
