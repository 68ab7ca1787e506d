//! Mission Simulation CLI
//!
//! Runs the feasibility and pricing engine for one platform/payload pairing.
//!
//! Usage:
//!   simulate-mission --platform "SmartBalloon Mk1" \
//!                    --payload "Optical High-Res (EOS-1)" \
//!                    --lat 45.0 --lon 7.6 --month 1 \
//!                    --duration-days 30 --radius-km 50 \
//!                    --output result.json
//!
//! `--date 2026-06-21` may replace `--month` to check the night on that day.

use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};
use clap::Parser;
use mission_engine::{
    Catalog, EngineConfig, MissionRequest, SimulationResult, SimulationService,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "simulate-mission",
    about = "Assess feasibility and price of a stratospheric observation mission"
)]
struct Args {
    /// Catalog JSON with platforms and payloads (built-in reference fleet if omitted)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Engine config JSON overriding rates and model constants
    #[arg(long)]
    config: Option<PathBuf>,

    /// Platform name
    #[arg(short = 'p', long)]
    platform: String,

    /// Payload name
    #[arg(short = 'y', long)]
    payload: String,

    /// Target latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,

    /// Target longitude in degrees
    #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
    lon: f64,

    /// Calendar month (1-12)
    #[arg(short, long, conflicts_with = "date")]
    month: Option<u32>,

    /// Mission start date (YYYY-MM-DD); its month is used
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Mission duration in days
    #[arg(short, long, default_value_t = 30)]
    duration_days: u32,

    /// Station-keeping radius in km
    #[arg(short, long, default_value_t = 50.0)]
    radius_km: f64,

    /// Margin fraction of the quoted price, 0 <= m < 1
    #[arg(long, default_value_t = mission_engine::DEFAULT_MARGIN_FRACTION)]
    margin: f64,

    /// Run the mission for every month of the year
    #[arg(long)]
    all_months: bool,

    /// Output JSON file (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    info!("{}", "=".repeat(60));
    info!("Stratospheric Mission Simulator");
    info!("{}", "=".repeat(60));

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::with_defaults(),
    };
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let platform = catalog.platform(&args.platform)?;
    let payload = catalog.payload(&args.payload)?;

    let request = build_request(&args)?;
    let month = request.month;

    let service = SimulationService::new(config);

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => {
            info!("Writing output to {:?}", path);
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    };

    if args.all_months {
        let results = service.seasonal_sweep(platform, payload, &request)?;
        for (month, result) in (1..=12).zip(&results) {
            log_summary(month, result);
        }
        serde_json::to_writer_pretty(&mut writer, &results)?;
    } else {
        let result = service.simulate(platform, payload, &request)?;
        log_summary(month, &result);
        serde_json::to_writer_pretty(&mut writer, &result)?;
    }
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

/// Mission request from the command line. `--date` pins the night check to
/// that exact day; `--month` uses the mid-month day.
fn build_request(args: &Args) -> Result<MissionRequest> {
    let month = match (args.month, args.date) {
        (Some(month), _) => month,
        (None, Some(date)) => date.month(),
        (None, None) if args.all_months => 1,
        (None, None) => bail!("either --month or --date is required"),
    };

    Ok(MissionRequest {
        latitude: args.lat,
        longitude: args.lon,
        month,
        duration_days: args.duration_days,
        target_radius_km: args.radius_km,
        margin_fraction: args.margin,
        start_date: args.date,
    })
}

fn log_summary(month: u32, result: &SimulationResult) {
    info!(
        "  month {:>2} | {:11} | drift {:8} | K {:.2} | night {:5.2}h | price {:>12.2}",
        month,
        if result.is_feasible { "FEASIBLE" } else { "INFEASIBLE" },
        result.flight_analysis.drift_risk.to_string(),
        result.flight_analysis.overprovisioning_factor,
        result.power_analysis.night_hours,
        result.quote.price_quoted
    );
    for warning in &result.warnings {
        info!("           ! {}", warning);
    }
}
