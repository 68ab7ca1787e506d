//! Stratospheric Mission Engine
//!
//! Decides whether a station-keeping stratospheric platform carrying a payload
//! can sustain an observation mission at a given location and season, and what
//! that mission should be sold for at a target margin.
//!
//! # Pipeline
//!
//! ```text
//! MissionRequest + Platform + Payload
//!        ├── PowerModel   (day/night geometry, battery survives night?)
//!        └── FlightModel  (wind volatility → failure prob → K)
//!                 └── PricingEngine (costs × K → quote)
//!                          └── SimulationResult (warnings + verdict)
//! ```
//!
//! | Model         | Output            | Depends on      |
//! |---------------|-------------------|-----------------|
//! | PowerModel    | PowerAssessment   | request, records|
//! | FlightModel   | FlightAssessment  | request         |
//! | PricingEngine | Quote             | FlightModel's K |
//!
//! Every model is a pure function of its inputs. Nothing here reads the clock,
//! touches the filesystem, or holds state between calls. Only the
//! [`catalog`] and [`config`] loaders do I/O.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod catalog;
pub mod config;
pub mod flight;
pub mod power;
pub mod pricing;
pub mod simulation;

pub use catalog::Catalog;
pub use config::EngineConfig;
pub use flight::{DriftRisk, FlightAssessment, FlightConfig};
pub use power::{PowerAssessment, PowerConfig, PowerModel, PowerStatus};
pub use pricing::{CostBreakdown, PricingConfig, PricingEngine, Quote};
pub use simulation::{SimulationResult, SimulationService, Warning};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// A lifting platform (balloon, pseudo-satellite) as stored by the fleet catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub name: String,
    /// Capital expenditure (currency)
    pub capex: f64,
    /// Launch cost per flight (currency)
    pub launch_cost: f64,
    #[serde(rename = "max_payload_mass")]
    pub max_payload_mass_kg: f64,
    #[serde(rename = "min_altitude")]
    pub min_altitude_km: f64,
    #[serde(rename = "max_altitude")]
    pub max_altitude_km: f64,
    pub max_duration_days: u32,
    /// Number of flights the capital and launch cost is spread over (>= 1)
    pub amortization_flights: u32,
    #[serde(rename = "power_available_payload")]
    pub power_available_payload_w: f64,
    #[serde(rename = "battery_capacity")]
    pub battery_capacity_wh: f64,
}

impl Platform {
    /// Reject records the engine would divide by zero or NaN on.
    pub fn validate(&self) -> Result<()> {
        if self.amortization_flights == 0 {
            return Err(EngineError::invalid(
                "amortization_flights",
                "must be at least 1",
            ));
        }
        ensure_non_negative("platform.capex", self.capex)?;
        ensure_non_negative("platform.launch_cost", self.launch_cost)?;
        ensure_non_negative("platform.max_payload_mass", self.max_payload_mass_kg)?;
        ensure_non_negative("platform.battery_capacity", self.battery_capacity_wh)?;
        ensure_non_negative(
            "platform.power_available_payload",
            self.power_available_payload_w,
        )?;
        if self.min_altitude_km > self.max_altitude_km {
            return Err(EngineError::invalid(
                "platform.min_altitude",
                format!(
                    "{} km is above max_altitude {} km",
                    self.min_altitude_km, self.max_altitude_km
                ),
            ));
        }
        Ok(())
    }
}

/// An observation payload (optical, SAR, ...) as stored by the fleet catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub name: String,
    pub capex: f64,
    #[serde(rename = "mass")]
    pub mass_kg: f64,
    #[serde(rename = "power_consumption")]
    pub power_consumption_w: f64,
    /// Ground sample distance (m)
    #[serde(rename = "resolution_gsd")]
    pub resolution_gsd_m: f64,
    #[serde(rename = "fov")]
    pub fov_deg: f64,
    pub daily_data_rate_gb: f64,
}

impl Payload {
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("payload.capex", self.capex)?;
        ensure_non_negative("payload.mass", self.mass_kg)?;
        ensure_non_negative("payload.power_consumption", self.power_consumption_w)?;
        ensure_non_negative("payload.daily_data_rate_gb", self.daily_data_rate_gb)?;
        Ok(())
    }
}

/// One mission to assess. Longitude is part of the mission identity only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionRequest {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
    /// Calendar month, 1-12
    pub month: u32,
    pub duration_days: u32,
    pub target_radius_km: f64,
    /// Fraction of the price kept as margin, 0 <= m < 1
    #[serde(rename = "margin_percent", default = "default_margin_fraction")]
    pub margin_fraction: f64,
    /// Exact start date. When set, the night check uses its day of year
    /// instead of the mid-month proxy; its month must equal `month`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

/// 30% default margin
pub const DEFAULT_MARGIN_FRACTION: f64 = 0.30;

fn default_margin_fraction() -> f64 {
    DEFAULT_MARGIN_FRACTION
}

impl MissionRequest {
    pub fn validate(&self) -> Result<()> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(EngineError::invalid(
                "lat",
                format!("{} is outside [-90, 90]", self.latitude),
            ));
        }
        if !self.longitude.is_finite() {
            return Err(EngineError::invalid("lon", "must be a finite number"));
        }
        validate_month(self.month)?;
        if self.duration_days == 0 {
            return Err(EngineError::invalid("duration_days", "must be greater than 0"));
        }
        if !self.target_radius_km.is_finite() || self.target_radius_km <= 0.0 {
            return Err(EngineError::invalid(
                "target_radius_km",
                format!("{} must be a positive distance", self.target_radius_km),
            ));
        }
        validate_margin(self.margin_fraction)?;
        if let Some(date) = self.start_date {
            if date.month() != self.month {
                return Err(EngineError::invalid(
                    "start_date",
                    format!("{} is not in month {}", date, self.month),
                ));
            }
        }
        Ok(())
    }
}

pub(crate) fn validate_month(month: u32) -> Result<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(EngineError::invalid(
            "month",
            format!("{} is outside 1-12", month),
        ))
    }
}

pub(crate) fn validate_margin(margin_fraction: f64) -> Result<()> {
    if margin_fraction.is_finite() && (0.0..1.0).contains(&margin_fraction) {
        Ok(())
    } else {
        Err(EngineError::invalid(
            "margin_percent",
            format!("{} is outside [0, 1)", margin_fraction),
        ))
    }
}

fn ensure_non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(EngineError::invalid(
            field,
            format!("{} must be a finite, non-negative number", value),
        ))
    }
}

/// Largest precision `round_to` honours; `2^53 · 10^15` still fits in a u128.
const MAX_ROUND_DECIMALS: u32 = 15;

/// Round the exact binary value of `value` to `decimals` places, ties to even.
///
/// The literal 1.075 is stored as 1.07499999.. and rounds to 1.07, while
/// 1.125 is stored exactly and is a true tie, so it goes to 1.12.
pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }
    let decimals = decimals.min(MAX_ROUND_DECIMALS);

    // value = mantissa · 2^exponent
    let bits = value.abs().to_bits();
    let biased_exponent = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exponent) = if biased_exponent == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), biased_exponent - 1075)
    };
    if exponent >= 0 {
        // Already an integer
        return value;
    }

    let scale = 10u128.pow(decimals);
    let scaled = mantissa as u128 * scale;
    let shift = exponent.unsigned_abs();
    let quotient = if shift >= 128 {
        0
    } else {
        let whole = scaled >> shift;
        let remainder = scaled & ((1u128 << shift) - 1);
        let half = 1u128 << (shift - 1);
        if remainder > half || (remainder == half && whole & 1 == 1) {
            whole + 1
        } else {
            whole
        }
    };

    let rounded = quotient as f64 / scale as f64;
    if value.is_sign_negative() {
        -rounded
    } else {
        rounded
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(6666.666666, 2), 6666.67);
        assert_eq!(round_to(30.04, 1), 30.0);
        assert_eq!(round_to(-12.345, 1), -12.3);
        assert_eq!(round_to(2200.0, 2), 2200.0);
        assert_eq!(round_to(0.0, 2), 0.0);
        assert!(round_to(f64::NAN, 2).is_nan());
    }

    #[test]
    fn test_round_to_uses_stored_value_and_ties_to_even() {
        // Stored just below the decimal midpoint
        assert_eq!(round_to(1.075, 2), 1.07);
        assert_eq!(round_to(1.045, 2), 1.04);
        // Exact binary ties go to the even digit
        assert_eq!(round_to(1.125, 2), 1.12);
        assert_eq!(round_to(-1.125, 2), -1.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(2.5, 0), 2.0);
        assert_eq!(round_to(3.5, 0), 4.0);
    }

    #[test]
    fn test_request_validation_accepts_reference_mission() {
        assert!(equatorial_request().validate().is_ok());
        assert!(smart_balloon().validate().is_ok());
        assert!(optical_payload().validate().is_ok());
    }

    #[test]
    fn test_margin_of_one_is_rejected() {
        let mut req = equatorial_request();
        req.margin_fraction = 1.0;
        match req.validate() {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "margin_percent"),
            other => panic!("expected margin rejection, got {:?}", other),
        }

        req.margin_fraction = -0.1;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_month_and_latitude_bounds() {
        let mut req = equatorial_request();
        req.month = 13;
        assert!(req.validate().is_err());
        req.month = 0;
        assert!(req.validate().is_err());

        let mut req = equatorial_request();
        req.latitude = 90.5;
        assert!(req.validate().is_err());
        req.latitude = f64::NAN;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_zero_duration_and_radius_rejected() {
        let mut req = equatorial_request();
        req.duration_days = 0;
        assert!(req.validate().is_err());

        let mut req = equatorial_request();
        req.target_radius_km = 0.0;
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_zero_amortization_flights_rejected() {
        let mut platform = smart_balloon();
        platform.amortization_flights = 0;
        match platform.validate() {
            Err(EngineError::InvalidInput { field, .. }) => {
                assert_eq!(field, "amortization_flights")
            }
            other => panic!("expected amortization rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_request_wire_names() {
        let json = r#"{"lat": 45.0, "lon": 7.6, "month": 1, "duration_days": 14, "target_radius_km": 30.0}"#;
        let req: MissionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.latitude, 45.0);
        assert_eq!(req.margin_fraction, DEFAULT_MARGIN_FRACTION);
        assert_eq!(req.start_date, None);

        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("start_date").is_none());
    }

    #[test]
    fn test_start_date_must_fall_in_month() {
        let mut req = equatorial_request();
        req.start_date = NaiveDate::from_ymd_opt(2026, 3, 9);
        assert!(req.validate().is_ok());

        req.start_date = NaiveDate::from_ymd_opt(2026, 4, 9);
        match req.validate() {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "start_date"),
            other => panic!("expected start_date rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_start_date_wire_format() {
        let json = r#"{"lat": 65.0, "lon": 25.0, "month": 6, "duration_days": 14,
                       "target_radius_km": 30.0, "start_date": "2026-06-21"}"#;
        let req: MissionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.start_date, NaiveDate::from_ymd_opt(2026, 6, 21));
    }
}
