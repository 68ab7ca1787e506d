//! Mission-domain generators for property-based testing
//!
//! Every strategy produces values that pass the engine's input validation,
//! so properties exercise the models rather than the error paths.

use mission_engine::{MissionRequest, Payload, Platform};
use proptest::prelude::*;

// ============================================================================
// Location / Calendar Generators
// ============================================================================

/// Latitude (-90 to 90 deg)
pub fn latitude_deg() -> impl Strategy<Value = f64> {
    -90.0f64..=90.0
}

/// Latitude short of the poles, where the hour-angle formula stays finite
pub fn latitude_non_polar() -> impl Strategy<Value = f64> {
    -89.0f64..=89.0
}

/// Longitude (-180 to 180 deg)
pub fn longitude_deg() -> impl Strategy<Value = f64> {
    -180.0f64..=180.0
}

/// Calendar month (1-12)
pub fn month() -> impl Strategy<Value = u32> {
    1u32..=12
}

/// Day of year (1-366)
pub fn day_of_year() -> impl Strategy<Value = u32> {
    1u32..=366
}

// ============================================================================
// Mission Parameter Generators
// ============================================================================

/// Station-keeping radius (1-500 km)
pub fn radius_km() -> impl Strategy<Value = f64> {
    1.0f64..=500.0
}

/// Mission length (1-365 days)
pub fn duration_days() -> impl Strategy<Value = u32> {
    1u32..=365
}

/// Margin fraction in [0, 0.9]
pub fn margin_fraction() -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(0.0),
        Just(0.3),
        0.0f64..=0.9,
    ]
}

/// Overprovisioning factor over the range the flight model emits
pub fn overprovisioning_factor() -> impl Strategy<Value = f64> {
    1.0f64..=2.2
}

/// Maneuverability (0.1-5.0)
pub fn maneuverability() -> impl Strategy<Value = f64> {
    0.1f64..=5.0
}

// ============================================================================
// Record Generators
// ============================================================================

/// Record name
pub fn record_name() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,8} Mk[0-9]".prop_map(|s| s.to_string())
}

/// Valid platform record
pub fn platform() -> impl Strategy<Value = Platform> {
    (
        record_name(),
        0.0f64..=200_000.0,
        0.0f64..=50_000.0,
        1.0f64..=50.0,
        15.0f64..=22.0,
        0.0f64..=10.0,
        1u32..=365,
        1u32..=20,
        10.0f64..=500.0,
        0.0f64..=10_000.0,
    )
        .prop_map(
            |(
                name,
                capex,
                launch_cost,
                max_payload_mass_kg,
                min_altitude_km,
                altitude_span_km,
                max_duration_days,
                amortization_flights,
                power_available_payload_w,
                battery_capacity_wh,
            )| Platform {
                name,
                capex,
                launch_cost,
                max_payload_mass_kg,
                min_altitude_km,
                max_altitude_km: min_altitude_km + altitude_span_km,
                max_duration_days,
                amortization_flights,
                power_available_payload_w,
                battery_capacity_wh,
            },
        )
}

/// Valid payload record
pub fn payload() -> impl Strategy<Value = Payload> {
    (
        record_name(),
        0.0f64..=200_000.0,
        0.1f64..=40.0,
        0.0f64..=300.0,
        0.1f64..=10.0,
        1.0f64..=60.0,
        0.0f64..=500.0,
    )
        .prop_map(
            |(
                name,
                capex,
                mass_kg,
                power_consumption_w,
                resolution_gsd_m,
                fov_deg,
                daily_data_rate_gb,
            )| Payload {
                name,
                capex,
                mass_kg,
                power_consumption_w,
                resolution_gsd_m,
                fov_deg,
                daily_data_rate_gb,
            },
        )
}

/// Valid mission request
pub fn mission_request() -> impl Strategy<Value = MissionRequest> {
    (
        latitude_deg(),
        longitude_deg(),
        month(),
        duration_days(),
        radius_km(),
        margin_fraction(),
    )
        .prop_map(
            |(latitude, longitude, month, duration_days, target_radius_km, margin_fraction)| {
                MissionRequest {
                    latitude,
                    longitude,
                    month,
                    duration_days,
                    target_radius_km,
                    margin_fraction,
                    start_date: None,
                }
            },
        )
}

// ============================================================================
// Composite Generators
// ============================================================================

/// Full simulation input
pub fn mission() -> impl Strategy<Value = (Platform, Payload, MissionRequest)> {
    (platform(), payload(), mission_request())
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_platforms_validate(p in platform()) {
            prop_assert!(p.validate().is_ok());
        }

        #[test]
        fn test_payloads_validate(p in payload()) {
            prop_assert!(p.validate().is_ok());
        }

        #[test]
        fn test_requests_validate(r in mission_request()) {
            prop_assert!(r.validate().is_ok());
        }
    }
}
