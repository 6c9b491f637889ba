//! Command-line definition and the run loop behind it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rust_decimal::Decimal;
use solar_core::{Estimator, SizingInput};
use solar_data::{ProjectProfile, scenarios};
use tracing::info;

use crate::report::{self, NamedEstimate, OutputFormat};
use crate::utils::parse_decimal;

/// Solar installation sizing and payback estimator.
///
/// Sizes a PV array for the given load and location, then prices it as a
/// grid-tied, stand-alone and hybrid system: investment, break-even,
/// rental cash flows and, when a margin is set, installer profit.
#[derive(Debug, Parser)]
#[command(name = "solar-estimator", version, about, long_about = None)]
pub struct Cli {
    /// TOML project profile; built-in reference values are used when omitted.
    #[arg(short, long)]
    pub profile: Option<PathBuf>,

    /// CSV of named scenarios layered over the profile.
    #[arg(short, long)]
    pub scenarios: Option<PathBuf>,

    /// Report format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log level or EnvFilter directive (overrides RUST_LOG).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Append log output to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Average load in kW.
    #[arg(long, value_parser = parse_decimal)]
    pub load_kw: Option<Decimal>,

    /// Operating hours per day.
    #[arg(long, value_parser = parse_decimal)]
    pub hours: Option<Decimal>,

    /// Grid tariff per kWh.
    #[arg(long, value_parser = parse_decimal)]
    pub tariff: Option<Decimal>,

    /// Peak sun hours at the site.
    #[arg(long, value_parser = parse_decimal)]
    pub sun_hours: Option<Decimal>,

    /// Grid-tied savings target in percent (capped at 40).
    #[arg(long, value_parser = parse_decimal)]
    pub grid_tied_savings: Option<Decimal>,

    /// Hybrid savings target in percent.
    #[arg(long, value_parser = parse_decimal)]
    pub hybrid_savings: Option<Decimal>,

    /// Installer margin in percent; enables the profit breakdown.
    #[arg(long, value_parser = parse_decimal)]
    pub margin: Option<Decimal>,

    /// Include the inverter/battery replacement reserve in CAPEX.
    #[arg(long)]
    pub replacement_reserve: bool,
}

impl Cli {
    /// Applies command-line overrides on top of a profile's input.
    pub fn apply_overrides(
        &self,
        mut input: SizingInput,
    ) -> SizingInput {
        if let Some(value) = self.load_kw {
            input.average_load_kw = value;
        }
        if let Some(value) = self.hours {
            input.operating_hours_per_day = value;
        }
        if let Some(value) = self.tariff {
            input.grid_tariff = value;
        }
        if let Some(value) = self.sun_hours {
            input.peak_sun_hours = value;
        }
        if let Some(value) = self.grid_tied_savings {
            input.grid_tied_savings_percent = value;
        }
        if let Some(value) = self.hybrid_savings {
            input.hybrid_savings_percent = value;
        }
        if self.margin.is_some() {
            input.profit_margin_percent = self.margin;
        }
        if self.replacement_reserve {
            input.include_replacement_reserve = true;
        }
        input
    }
}

/// Loads the configured inputs, computes every estimate and returns the
/// rendered report.
pub fn run(cli: &Cli) -> Result<String> {
    let profile = match &cli.profile {
        Some(path) => ProjectProfile::load(path)
            .with_context(|| format!("failed to load profile {}", path.display()))?,
        None => ProjectProfile::default(),
    };
    let base = cli.apply_overrides(profile.input);
    let estimator = Estimator::new(profile.constants);

    match &cli.scenarios {
        Some(path) => {
            let batch = scenarios::load_from_file(path, &base)
                .with_context(|| format!("failed to load scenarios {}", path.display()))?;
            info!(count = batch.len(), "scenarios loaded");

            let estimates = batch
                .into_iter()
                .map(|scenario| {
                    let estimate = estimator
                        .compute(&scenario.input)
                        .with_context(|| format!("scenario '{}'", scenario.name))?;
                    Ok(NamedEstimate {
                        name: scenario.name,
                        estimate,
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            match cli.format {
                OutputFormat::Text => Ok(report::render_text_batch(&estimates)),
                OutputFormat::Json => Ok(report::render_json(&estimates)?),
            }
        }
        None => {
            let estimate = estimator.compute(&base).context("invalid installation input")?;
            info!(panels = estimate.array.panel_count, "estimate ready");

            match cli.format {
                OutputFormat::Text => Ok(report::render_text(&estimate)),
                OutputFormat::Json => Ok(report::render_json(&estimate)?),
            }
        }
    }
}
