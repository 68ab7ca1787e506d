//! Engine-wide configuration
//!
//! Each model owns its tunables ([`FlightConfig`], [`PowerConfig`],
//! [`PricingConfig`]); `EngineConfig` bundles them so a deployment can override
//! the defaults from one JSON file. Missing sections and fields fall back to
//! the reference values.

use crate::{EngineError, FlightConfig, PowerConfig, PricingConfig, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub flight: FlightConfig,
    pub power: PowerConfig,
    pub pricing: PricingConfig,
}

impl EngineConfig {
    /// Load overrides from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading engine config from {:?}", path);

        let file = File::open(path)?;
        let config: EngineConfig = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.flight.maneuverability.is_finite() || self.flight.maneuverability <= 0.0 {
            return Err(EngineError::invalid(
                "flight.maneuverability",
                "must be a positive number",
            ));
        }
        let dod = self.power.depth_of_discharge;
        if !dod.is_finite() || dod <= 0.0 || dod > 1.0 {
            return Err(EngineError::invalid(
                "power.depth_of_discharge",
                format!("{} is outside (0, 1]", dod),
            ));
        }
        if self.pricing.payload_amortization_missions == 0 {
            return Err(EngineError::invalid(
                "pricing.payload_amortization_missions",
                "must be at least 1",
            ));
        }
        for (field, rate) in [
            ("pricing.ops_daily_rate", self.pricing.ops_daily_rate),
            ("pricing.datalink_cost_per_gb", self.pricing.datalink_cost_per_gb),
        ] {
            if !rate.is_finite() || rate < 0.0 {
                return Err(EngineError::invalid(field, "must be a non-negative number"));
            }
        }
        Ok(())
    }
}
