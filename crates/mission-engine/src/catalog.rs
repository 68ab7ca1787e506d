//! Platform and payload catalog
//!
//! Stands in for the persistence layer: resolves record names to the
//! immutable [`Platform`] / [`Payload`] values the engine consumes, and owns
//! the not-found condition. Ships with the reference fleet; a deployment can
//! load its own fleet from JSON:
//!
//! ```json
//! { "platforms": [ { "name": "...", "capex": 15000.0, ... } ],
//!   "payloads":  [ { "name": "...", "capex": 25000.0, ... } ] }
//! ```

use crate::{EngineError, Payload, Platform, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub payloads: Vec<Payload>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog seeded with the reference fleet.
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.load_reference_fleet();
        catalog
    }

    fn load_reference_fleet(&mut self) {
        self.platforms = vec![
            Platform {
                name: "SmartBalloon Mk1".to_string(),
                capex: 15_000.0,
                launch_cost: 5_000.0,
                max_payload_mass_kg: 15.0,
                min_altitude_km: 18.0,
                max_altitude_km: 25.0,
                max_duration_days: 100,
                amortization_flights: 3,
                power_available_payload_w: 150.0,
                battery_capacity_wh: 2_000.0,
            },
            Platform {
                name: "PseudoSat Alpha".to_string(),
                capex: 45_000.0,
                launch_cost: 12_000.0,
                max_payload_mass_kg: 25.0,
                min_altitude_km: 20.0,
                max_altitude_km: 30.0,
                max_duration_days: 180,
                amortization_flights: 5,
                power_available_payload_w: 300.0,
                battery_capacity_wh: 5_000.0,
            },
        ];

        self.payloads = vec![
            Payload {
                name: "Optical High-Res (EOS-1)".to_string(),
                capex: 25_000.0,
                mass_kg: 5.0,
                power_consumption_w: 45.0,
                resolution_gsd_m: 0.3,
                fov_deg: 15.0,
                daily_data_rate_gb: 50.0,
            },
            Payload {
                name: "SAR Radar (S-Band)".to_string(),
                capex: 85_000.0,
                mass_kg: 12.0,
                power_consumption_w: 120.0,
                resolution_gsd_m: 1.0,
                fov_deg: 25.0,
                daily_data_rate_gb: 120.0,
            },
        ];
    }

    /// Load a catalog from a JSON file.
    ///
    /// Records that fail validation are skipped with a warning rather than
    /// failing the whole file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading catalog from {:?}", path);

        let file = File::open(path)?;
        let raw: Catalog = serde_json::from_reader(BufReader::new(file))?;

        let total_platforms = raw.platforms.len();
        let total_payloads = raw.payloads.len();

        let platforms: Vec<Platform> = raw
            .platforms
            .into_iter()
            .filter(|p| match p.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!("Skipping platform {:?}: {}", p.name, e);
                    false
                }
            })
            .collect();

        let payloads: Vec<Payload> = raw
            .payloads
            .into_iter()
            .filter(|p| match p.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!("Skipping payload {:?}: {}", p.name, e);
                    false
                }
            })
            .collect();

        info!(
            "Loaded {} platforms ({} skipped), {} payloads ({} skipped)",
            platforms.len(),
            total_platforms - platforms.len(),
            payloads.len(),
            total_payloads - payloads.len()
        );

        Ok(Self {
            platforms,
            payloads,
        })
    }

    /// Look up a platform by name, ignoring case.
    pub fn platform(&self, name: &str) -> Result<&Platform> {
        self.platforms
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| EngineError::NotFound {
                kind: "Platform",
                name: name.to_string(),
            })
    }

    /// Look up a payload by name, ignoring case.
    pub fn payload(&self, name: &str) -> Result<&Payload> {
        self.payloads
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| EngineError::NotFound {
                kind: "Payload",
                name: name.to_string(),
            })
    }
}
