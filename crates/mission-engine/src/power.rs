//! Night-survival power model
//!
//! Solar panels carry the platform through the day; at night the payload runs
//! off the battery. The check is worst case: the payload draws full power for
//! the whole night (no duty cycling) and only the depth-of-discharge share of
//! the battery may be used.

use crate::{round_to, validate_month, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Axial tilt used for the solar declination, degrees
const AXIAL_TILT_DEG: f64 = 23.44;
/// Day of year of the March equinox in the declination model
const EQUINOX_DAY: f64 = 81.0;
/// Degrees of Earth rotation per hour
const DEG_PER_HOUR: f64 = 15.0;
const HOURS_PER_DAY: f64 = 24.0;

/// Default usable share of the rated battery capacity
pub const DEFAULT_DEPTH_OF_DISCHARGE: f64 = 0.8;

/// Power model configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    /// Fraction of rated capacity that may be drawn per night, (0, 1]
    pub depth_of_discharge: f64,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            depth_of_discharge: DEFAULT_DEPTH_OF_DISCHARGE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerStatus {
    #[serde(rename = "Power Positive")]
    PowerPositive,
    #[serde(rename = "Insufficient Battery")]
    InsufficientBattery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerAssessment {
    pub survives_night: bool,
    pub day_hours: f64,
    pub night_hours: f64,
    pub night_energy_needed_wh: f64,
    pub battery_capacity_wh: f64,
    pub usable_battery_wh: f64,
    /// Usable energy left at sunrise; negative when the battery runs flat
    pub margin_wh: f64,
    pub status: PowerStatus,
}

#[derive(Debug, Clone, Default)]
pub struct PowerModel {
    config: PowerConfig,
}

impl PowerModel {
    pub fn new(config: PowerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PowerConfig {
        &self.config
    }

    /// Solar declination in degrees for a day of the year.
    pub fn solar_declination(day_of_year: u32) -> f64 {
        let angle_deg = (360.0 / 365.0) * (day_of_year as f64 - EQUINOX_DAY);
        AXIAL_TILT_DEG * angle_deg.to_radians().sin()
    }

    /// Hours of daylight and darkness; always sums to 24.
    ///
    /// At or beyond -1 the hour-angle cosine means the sun never sets (24 h),
    /// at or beyond 1 it never rises. A non-finite cosine (e.g. a NaN
    /// latitude) is resolved by the sign of `latitude · declination` instead.
    pub fn calculate_day_night_hours(latitude: f64, day_of_year: u32) -> (f64, f64) {
        let declination = Self::solar_declination(day_of_year);

        // cos(h) = -tan(lat) · tan(decl)
        let cos_hour_angle = -latitude.to_radians().tan() * declination.to_radians().tan();

        let day_hours = if !cos_hour_angle.is_finite() {
            if latitude * declination > 0.0 {
                HOURS_PER_DAY
            } else {
                0.0
            }
        } else if cos_hour_angle <= -1.0 {
            // Sun never sets
            HOURS_PER_DAY
        } else if cos_hour_angle >= 1.0 {
            0.0
        } else {
            2.0 * cos_hour_angle.acos().to_degrees() / DEG_PER_HOUR
        };

        (day_hours, HOURS_PER_DAY - day_hours)
    }

    /// Mid-month day-of-year proxy: `trunc((month - 1) · 30.5 + 15)`.
    pub fn day_of_year_for_month(month: u32) -> u32 {
        (month.saturating_sub(1) as f64 * 30.5 + 15.0) as u32
    }

    /// Night-survival check for a calendar month.
    pub fn check_feasibility(
        &self,
        latitude: f64,
        month: u32,
        battery_capacity_wh: f64,
        payload_power_w: f64,
    ) -> Result<PowerAssessment> {
        validate_month(month)?;
        let day_of_year = Self::day_of_year_for_month(month);
        Ok(self.assess(latitude, day_of_year, battery_capacity_wh, payload_power_w))
    }

    /// Night-survival check for an exact calendar date.
    pub fn check_feasibility_on_date(
        &self,
        latitude: f64,
        date: NaiveDate,
        battery_capacity_wh: f64,
        payload_power_w: f64,
    ) -> PowerAssessment {
        self.assess(latitude, date.ordinal(), battery_capacity_wh, payload_power_w)
    }

    fn assess(
        &self,
        latitude: f64,
        day_of_year: u32,
        battery_capacity_wh: f64,
        payload_power_w: f64,
    ) -> PowerAssessment {
        let (day_hours, night_hours) = Self::calculate_day_night_hours(latitude, day_of_year);

        let night_energy_needed_wh = payload_power_w * night_hours;
        let usable_battery_wh = battery_capacity_wh * self.config.depth_of_discharge;

        let survives_night = usable_battery_wh >= night_energy_needed_wh;
        let margin_wh = usable_battery_wh - night_energy_needed_wh;

        let status = if survives_night {
            PowerStatus::PowerPositive
        } else {
            PowerStatus::InsufficientBattery
        };

        debug!(
            "Power at {:.2}° day {}: night={:.2}h need={:.1}Wh usable={:.1}Wh margin={:.1}Wh",
            latitude, day_of_year, night_hours, night_energy_needed_wh, usable_battery_wh, margin_wh
        );

        PowerAssessment {
            survives_night,
            day_hours: round_to(day_hours, 2),
            night_hours: round_to(night_hours, 2),
            night_energy_needed_wh: round_to(night_energy_needed_wh, 2),
            battery_capacity_wh,
            usable_battery_wh: round_to(usable_battery_wh, 2),
            margin_wh: round_to(margin_wh, 2),
            status,
        }
    }
}
