//! Mission pricing
//!
//! ```text
//! platform_unit = (capex + launch) / amortization_flights
//! payload_unit  = payload_capex / payload_amortization_missions
//! hardware      = (platform_unit + payload_unit) · K
//! ops           = ops_daily_rate · K · days
//! data          = daily_gb · days · K · datalink_rate
//! total         = hardware + ops + data
//! price         = total / (1 - margin)
//! ```
//!
//! K is the fleet overprovisioning factor from the flight model; every cost
//! line scales with the size of the fleet. One launch is assumed to cover the
//! whole mission.

use crate::{round_to, validate_margin, EngineError, Payload, Platform, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Operations team cost per day (currency/day)
pub const OPS_DAILY_RATE: f64 = 2000.0;
/// Satellite data-link cost (currency/GB)
pub const DATALINK_COST_PER_GB: f64 = 5.0;
/// Payloads are reused; capital is spread over this many missions
pub const PAYLOAD_AMORTIZATION_MISSIONS: u32 = 10;

/// Engine-wide cost rates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub ops_daily_rate: f64,
    pub datalink_cost_per_gb: f64,
    pub payload_amortization_missions: u32,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            ops_daily_rate: OPS_DAILY_RATE,
            datalink_cost_per_gb: DATALINK_COST_PER_GB,
            payload_amortization_missions: PAYLOAD_AMORTIZATION_MISSIONS,
        }
    }
}

/// Itemized mission cost, already scaled by K
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub platform_amortized: f64,
    pub payload_amortized: f64,
    pub ops_cost: f64,
    pub data_cost: f64,
    pub overprovisioning_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub breakdown: CostBreakdown,
    pub total_cost: f64,
    pub price_quoted: f64,
    pub margin_absolute: f64,
    /// Margin as a percentage of price (30.0 for a 0.30 fraction)
    pub margin_percent: f64,
}

#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Price one mission.
    ///
    /// Money is rounded to cents and the margin percentage to one decimal.
    /// Inputs that would divide by zero are rejected up front.
    pub fn calculate_quote(
        &self,
        platform: &Platform,
        payload: &Payload,
        duration_days: u32,
        overprovisioning_factor: f64,
        margin_fraction: f64,
    ) -> Result<Quote> {
        if platform.amortization_flights == 0 {
            return Err(EngineError::invalid(
                "amortization_flights",
                "must be at least 1",
            ));
        }
        if self.config.payload_amortization_missions == 0 {
            return Err(EngineError::invalid(
                "pricing.payload_amortization_missions",
                "must be at least 1",
            ));
        }
        if !overprovisioning_factor.is_finite() || overprovisioning_factor < 1.0 {
            return Err(EngineError::invalid(
                "overprovisioning_factor",
                format!("{} must be at least 1", overprovisioning_factor),
            ));
        }
        validate_margin(margin_fraction)?;

        let k = overprovisioning_factor;
        let days = duration_days as f64;

        // 1-2. Unit costs for a single platform and payload
        let platform_unit_cost =
            (platform.capex + platform.launch_cost) / platform.amortization_flights as f64;
        let payload_unit_cost =
            payload.capex / self.config.payload_amortization_missions as f64;

        // 3. Fleet monitoring
        let ops_cost = self.config.ops_daily_rate * k * days;

        // 4. Downlink
        let total_data_gb = payload.daily_data_rate_gb * days * k;
        let data_cost = total_data_gb * self.config.datalink_cost_per_gb;

        // 5-6. Fleet hardware plus operations
        let hardware_cost = (platform_unit_cost + payload_unit_cost) * k;
        let total_cost = hardware_cost + ops_cost + data_cost;

        // 7. Margin on price, not on cost
        let price = total_cost / (1.0 - margin_fraction);
        let net_margin = price - total_cost;

        debug!(
            "Quote {} + {} over {} days, K={:.2}: cost={:.2} price={:.2}",
            platform.name, payload.name, duration_days, k, total_cost, price
        );

        Ok(Quote {
            breakdown: CostBreakdown {
                platform_amortized: round_to(platform_unit_cost * k, 2),
                payload_amortized: round_to(payload_unit_cost * k, 2),
                ops_cost: round_to(ops_cost, 2),
                data_cost: round_to(data_cost, 2),
                overprovisioning_factor: k,
            },
            total_cost: round_to(total_cost, 2),
            price_quoted: round_to(price, 2),
            margin_absolute: round_to(net_margin, 2),
            margin_percent: round_to(margin_fraction * 100.0, 1),
        })
    }
}
