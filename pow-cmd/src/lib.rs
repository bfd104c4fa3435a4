//! Forecast pipeline and command implementations for the pow CLI.
//!
//! Provides subcommands for listing resorts, fetching reconciled
//! multi-model forecasts, observed snowfall history and snow alerts.

use clap::Subcommand;
use pow_core::resort::ElevationBand;
use pow_data::alerts::DEFAULT_THRESHOLD_CM;
use pow_utils::units::Units;
use std::path::PathBuf;

pub mod alerts;
pub mod pipeline;
pub mod query;

pub use pipeline::{compute_band_forecast, compute_resort_forecast, PipelineConfig};

#[derive(Subcommand)]
pub enum Command {
    /// List supported resorts
    Resorts {
        /// Filter by slug, name, region or country code
        #[arg(short, long)]
        query: Option<String>,

        /// Show elevations in metres
        #[arg(long)]
        metric: bool,
    },

    /// Reconciled multi-model forecast for a resort
    Forecast {
        /// Resort slug, e.g. "alta-ut"
        slug: String,

        /// Only show one band (base, mid or top)
        #[arg(short, long)]
        band: Option<ElevationBand>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Metric units (°C, m, cm)
        #[arg(long)]
        metric: bool,

        /// Days to forecast
        #[arg(long, default_value_t = 7, env = "POW_FORECAST_DAYS")]
        days: u8,

        /// IANA timezone for the daily boundaries
        #[arg(long, default_value = "auto", env = "POW_TIMEZONE")]
        timezone: String,
    },

    /// Observed daily snowfall as CSV
    History {
        /// Resort slug
        slug: String,

        /// First day, YYYY-MM-DD
        #[arg(short, long)]
        start: String,

        /// Last day, YYYY-MM-DD
        #[arg(short, long)]
        end: String,

        #[arg(long, default_value = "auto", env = "POW_TIMEZONE")]
        timezone: String,
    },

    /// Check resorts for upcoming snow above a threshold
    Alerts {
        /// Resort slugs to watch
        #[arg(required = true)]
        slugs: Vec<String>,

        /// Daily snowfall that triggers an alert, in cm
        #[arg(short, long, default_value_t = DEFAULT_THRESHOLD_CM, env = "POW_ALERT_THRESHOLD_CM")]
        threshold_cm: f64,

        #[arg(long, default_value = "auto", env = "POW_TIMEZONE")]
        timezone: String,

        /// JSON file remembering which storms were already announced
        #[arg(long, env = "POW_ALERT_STATE")]
        state: Option<PathBuf>,
    },
}

fn units(metric: bool) -> Units {
    if metric {
        Units::Metric
    } else {
        Units::Imperial
    }
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Resorts { query, metric } => query::run_resorts(query.as_deref(), units(metric)),
        Command::Forecast {
            slug,
            band,
            json,
            metric,
            days,
            timezone,
        } => {
            let config = PipelineConfig {
                forecast_days: days,
                timezone,
                ..PipelineConfig::default()
            };
            query::run_forecast(&slug, band, json, units(metric), &config).await
        }
        Command::History {
            slug,
            start,
            end,
            timezone,
        } => query::run_history(&slug, &start, &end, &timezone).await,
        Command::Alerts {
            slugs,
            threshold_cm,
            timezone,
            state,
        } => alerts::run_alerts(slugs, threshold_cm, &timezone, state.as_deref()).await,
    }
}
