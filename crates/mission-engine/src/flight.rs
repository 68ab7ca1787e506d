//! Station-keeping flight model
//!
//! Estimates how often a platform is blown out of its containment box and
//! turns that failure probability into a fleet overprovisioning factor K:
//!
//! ```text
//! volatility = min(0.9, (0.1 + lat_factor) · season)
//! failure    = clamp(volatility / maneuverability · 50 / max(10, r_km), 0.01, 0.8)
//! K          = 1 + 1.5 · failure
//! ```
//!
//! Mid-latitudes sit under the jet stream and are the most volatile band; the
//! polar band is modeled slightly calmer (inside the vortex). Winter is
//! hemisphere-aware.

use crate::{round_to, EngineError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Volatility model constants (9 decimal precision)
pub const BASE_VOLATILITY: f64 = 0.100000000;
pub const MID_LATITUDE_FACTOR: f64 = 0.400000000;
pub const POLAR_FACTOR: f64 = 0.300000000;
pub const WINTER_MULTIPLIER: f64 = 1.500000000;
pub const MAX_VOLATILITY: f64 = 0.900000000;

/// Latitude band edges in degrees
const TROPICAL_EDGE_DEG: f64 = 20.000000000;
const POLAR_EDGE_DEG: f64 = 60.000000000;

/// 50 km containment box is standard difficulty
pub const REFERENCE_RADIUS_KM: f64 = 50.000000000;
/// Tighter boxes stop adding difficulty below this radius
pub const MIN_RADIUS_KM: f64 = 10.000000000;

pub const MIN_FAILURE_PROB: f64 = 0.010000000;
pub const MAX_FAILURE_PROB: f64 = 0.800000000;

/// Extra fleet fraction per unit failure probability
pub const OVERPROVISIONING_SLOPE: f64 = 1.500000000;

/// Drift-risk cut points (strict `>`)
pub const HIGH_DRIFT_THRESHOLD: f64 = 0.400000000;
pub const MODERATE_DRIFT_THRESHOLD: f64 = 0.200000000;

/// Flight model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    /// Altitude-seeking control authority; 1.0 = standard ACS
    pub maneuverability: f64,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            maneuverability: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriftRisk {
    Low,
    Moderate,
    High,
}

impl DriftRisk {
    pub fn from_failure_probability(failure_prob: f64) -> Self {
        if failure_prob > HIGH_DRIFT_THRESHOLD {
            DriftRisk::High
        } else if failure_prob > MODERATE_DRIFT_THRESHOLD {
            DriftRisk::Moderate
        } else {
            DriftRisk::Low
        }
    }
}

impl fmt::Display for DriftRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DriftRisk::Low => "Low",
            DriftRisk::Moderate => "Moderate",
            DriftRisk::High => "High",
        };
        f.write_str(label)
    }
}

/// Station-keeping outcome, reported to 2 decimals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightAssessment {
    pub wind_volatility_score: f64,
    #[serde(rename = "station_keeping_prob")]
    pub station_keeping_probability: f64,
    pub failure_probability: f64,
    pub overprovisioning_factor: f64,
    pub drift_risk: DriftRisk,
}

/// Winter is Dec-Feb north of the equator, Jun-Aug on and south of it.
pub fn is_winter(latitude: f64, month: u32) -> bool {
    if latitude > 0.0 {
        matches!(month, 12 | 1 | 2)
    } else {
        matches!(month, 6 | 7 | 8)
    }
}

fn latitude_factor(abs_latitude: f64) -> f64 {
    if abs_latitude > TROPICAL_EDGE_DEG && abs_latitude < POLAR_EDGE_DEG {
        MID_LATITUDE_FACTOR
    } else if abs_latitude >= POLAR_EDGE_DEG {
        POLAR_FACTOR
    } else {
        0.000000000
    }
}

/// Wind volatility score in [0, 0.9] for a latitude and calendar month.
pub fn calculate_wind_volatility(latitude: f64, month: u32) -> f64 {
    let season_multiplier = if is_winter(latitude, month) {
        WINTER_MULTIPLIER
    } else {
        1.000000000
    };

    let volatility = (BASE_VOLATILITY + latitude_factor(latitude.abs())) * season_multiplier;
    volatility.min(MAX_VOLATILITY)
}

/// Probability of holding a `target_radius_km` box and the resulting fleet
/// overprovisioning factor.
///
/// `maneuverability` divides the wind volatility and must be positive.
pub fn simulate_station_keeping(
    latitude: f64,
    month: u32,
    target_radius_km: f64,
    maneuverability: f64,
) -> Result<FlightAssessment> {
    if !maneuverability.is_finite() || maneuverability <= 0.0 {
        return Err(EngineError::invalid(
            "maneuverability",
            format!("{} must be a positive number", maneuverability),
        ));
    }

    let volatility = calculate_wind_volatility(latitude, month);
    let effective_volatility = volatility / maneuverability;

    let radius_difficulty = REFERENCE_RADIUS_KM / target_radius_km.max(MIN_RADIUS_KM);

    let failure_prob =
        (effective_volatility * radius_difficulty).clamp(MIN_FAILURE_PROB, MAX_FAILURE_PROB);
    let success_prob = 1.0 - failure_prob;
    let k_factor = 1.0 + failure_prob * OVERPROVISIONING_SLOPE;
    let drift_risk = DriftRisk::from_failure_probability(failure_prob);

    debug!(
        "Station keeping at {:.2}° month {}: vol={:.3}, fail={:.3}, K={:.3}, drift={}",
        latitude, month, volatility, failure_prob, k_factor, drift_risk
    );

    Ok(FlightAssessment {
        wind_volatility_score: round_to(volatility, 2),
        station_keeping_probability: round_to(success_prob, 2),
        failure_probability: round_to(failure_prob, 2),
        overprovisioning_factor: round_to(k_factor, 2),
        drift_risk,
    })
}
