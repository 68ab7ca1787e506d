//! Mission simulation service
//!
//! Runs the three models for one mission and renders the verdict. Power and
//! flight do not depend on each other; pricing needs the flight model's K.
//! Battery shortfall and an overweight payload block the mission outright,
//! while high drift risk on its own is only advisory.

use crate::flight::{self, DriftRisk, FlightAssessment};
use crate::power::{PowerAssessment, PowerModel};
use crate::pricing::{PricingEngine, Quote};
use crate::{EngineConfig, MissionRequest, Payload, Platform, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    InsufficientBattery,
    PayloadOverweight { mass_kg: f64, max_kg: f64 },
    HighDriftRisk,
}

impl Warning {
    /// Drift risk can be covered by flying more platforms.
    pub fn is_advisory(&self) -> bool {
        matches!(self, Warning::HighDriftRisk)
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::InsufficientBattery => {
                f.write_str("Insufficient Battery for Night Operations")
            }
            Warning::PayloadOverweight { mass_kg, max_kg } => {
                write!(f, "Payload Overweight: {:?}kg > {:?}kg", mass_kg, max_kg)
            }
            Warning::HighDriftRisk => {
                f.write_str("High Drift Risk: Requires large fleet overprovisioning")
            }
        }
    }
}

impl Serialize for Warning {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub is_feasible: bool,
    pub warnings: Vec<Warning>,
    pub power_analysis: PowerAssessment,
    pub flight_analysis: FlightAssessment,
    pub quote: Quote,
}

/// Feasible with no warnings, or with drift risk as the only warning.
pub fn is_feasible(warnings: &[Warning]) -> bool {
    match warnings {
        [] => true,
        [only] => only.is_advisory(),
        _ => false,
    }
}

/// Outputs of the models that only read the request and the records.
struct IndependentStage {
    power: PowerAssessment,
    flight: FlightAssessment,
}

#[derive(Debug, Clone, Default)]
pub struct SimulationService {
    config: EngineConfig,
    power: PowerModel,
    pricing: PricingEngine,
}

impl SimulationService {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            power: PowerModel::new(config.power.clone()),
            pricing: PricingEngine::new(config.pricing.clone()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Assess one mission end to end.
    pub fn simulate(
        &self,
        platform: &Platform,
        payload: &Payload,
        request: &MissionRequest,
    ) -> Result<SimulationResult> {
        self.config.validate()?;
        request.validate()?;
        platform.validate()?;
        payload.validate()?;

        if request.duration_days > platform.max_duration_days {
            warn!(
                "{} day mission exceeds {} max duration of {} days; quote assumes a single launch",
                request.duration_days, platform.name, platform.max_duration_days
            );
        }

        let stage = self.run_independent(platform, payload, request)?;
        let quote = self.pricing.calculate_quote(
            platform,
            payload,
            request.duration_days,
            stage.flight.overprovisioning_factor,
            request.margin_fraction,
        )?;

        let warnings = collect_warnings(platform, payload, &stage);
        let feasible = is_feasible(&warnings);

        info!(
            "Simulated {} + {} at ({:.2}, {:.2}) month {}: feasible={} warnings={} price={:.2}",
            platform.name,
            payload.name,
            request.latitude,
            request.longitude,
            request.month,
            feasible,
            warnings.len(),
            quote.price_quoted
        );

        Ok(SimulationResult {
            is_feasible: feasible,
            warnings,
            power_analysis: stage.power,
            flight_analysis: stage.flight,
            quote,
        })
    }

    /// Run the same mission for every month, January first. Any start date
    /// is dropped so each month uses its mid-month day.
    pub fn seasonal_sweep(
        &self,
        platform: &Platform,
        payload: &Payload,
        request: &MissionRequest,
    ) -> Result<Vec<SimulationResult>> {
        (1..=12)
            .map(|month| {
                let monthly = MissionRequest {
                    month,
                    start_date: None,
                    ..request.clone()
                };
                self.simulate(platform, payload, &monthly)
            })
            .collect()
    }

    fn run_independent(
        &self,
        platform: &Platform,
        payload: &Payload,
        request: &MissionRequest,
    ) -> Result<IndependentStage> {
        let power = match request.start_date {
            Some(date) => self.power.check_feasibility_on_date(
                request.latitude,
                date,
                platform.battery_capacity_wh,
                payload.power_consumption_w,
            ),
            None => self.power.check_feasibility(
                request.latitude,
                request.month,
                platform.battery_capacity_wh,
                payload.power_consumption_w,
            )?,
        };
        let flight = flight::simulate_station_keeping(
            request.latitude,
            request.month,
            request.target_radius_km,
            self.config.flight.maneuverability,
        )?;

        debug!(
            "Independent stage: power={:?} drift={}",
            power.status, flight.drift_risk
        );

        Ok(IndependentStage { power, flight })
    }
}

fn collect_warnings(
    platform: &Platform,
    payload: &Payload,
    stage: &IndependentStage,
) -> Vec<Warning> {
    let mut warnings = Vec::new();

    if !stage.power.survives_night {
        warnings.push(Warning::InsufficientBattery);
    }
    if payload.mass_kg > platform.max_payload_mass_kg {
        warnings.push(Warning::PayloadOverweight {
            mass_kg: payload.mass_kg,
            max_kg: platform.max_payload_mass_kg,
        });
    }
    if stage.flight.drift_risk == DriftRisk::High {
        warnings.push(Warning::HighDriftRisk);
    }

    warnings
}
