//! Resort listing, forecast and history commands.

use crate::pipeline::{compute_resort_forecast, PipelineConfig};
use anyhow::Context;
use log::info;
use pow_core::{
    resort::{ElevationBand, Resort},
    series::{BandForecast, ResortForecast},
    source::HttpSource,
};
use pow_utils::{
    dates::{day_label, parse_date},
    units::{cm_to_in, fmt_elevation, fmt_snow, fmt_temp, rain_dot_rating, Units},
    weather_codes::describe,
};

/// Print resorts matching `query` (all when absent).
pub fn run_resorts(query: Option<&str>, units: Units) -> anyhow::Result<()> {
    let resorts = Resort::search(query.unwrap_or(""));
    if resorts.is_empty() {
        anyhow::bail!("No resorts match '{}'", query.unwrap_or(""));
    }
    for r in resorts {
        println!(
            "{:<24} {:<28} {:<18} {:<3} {:>9} - {:<9} ({} vertical)",
            r.slug,
            r.name,
            r.region,
            r.country,
            fmt_elevation(r.elevation.base, units),
            fmt_elevation(r.elevation.top, units),
            fmt_elevation(r.vertical_drop(), units)
        );
    }
    Ok(())
}

/// Fetch and print the reconciled forecast for a resort.
pub async fn run_forecast(
    slug: &str,
    band: Option<ElevationBand>,
    json: bool,
    units: Units,
    config: &PipelineConfig,
) -> anyhow::Result<()> {
    let resort = Resort::require(slug)?;
    let source = HttpSource::new().context("Failed to build HTTP client")?;
    let forecast = compute_resort_forecast(&source, resort, config)
        .await
        .with_context(|| format!("Forecast failed for {}", slug))?;
    info!("Forecast for {} fetched at {}", slug, forecast.fetched_at);

    if json {
        let out = match band {
            Some(b) => serde_json::to_string_pretty(forecast.band(b))?,
            None => serde_json::to_string_pretty(&forecast)?,
        };
        println!("{}", out);
        return Ok(());
    }

    println!("{} ({}, {})", resort.name, resort.region, resort.country);
    let bands = match band {
        Some(b) => vec![b],
        None => ElevationBand::ALL.to_vec(),
    };
    for b in bands {
        print_band(forecast.band(b), units);
    }
    println!("{}", snow_summary(&forecast, units));
    Ok(())
}

fn print_band(band: &BandForecast, units: Units) {
    println!();
    println!("{} @ {}", band.band, fmt_elevation(band.elevation, units));
    for day in &band.daily {
        let weather = describe(day.weather_code);
        let dots = rain_dot_rating(cm_to_in(day.rain_sum / 10.0));
        println!(
            "  {:<12} {} {:<24} {:>6} / {:<6} snow {:>7}  rain {}",
            day_label(&day.date),
            weather.icon,
            weather.label,
            fmt_temp(day.temperature_max, units),
            fmt_temp(day.temperature_min, units),
            fmt_snow(day.snowfall_sum, units),
            "●".repeat(dots as usize)
        );
    }
}

fn snow_summary(forecast: &ResortForecast, units: Units) -> String {
    let total: f64 = forecast.top.daily.iter().map(|d| d.snowfall_sum).sum();
    format!(
        "\n{}-day summit total: {}",
        forecast.top.daily.len(),
        fmt_snow(total, units)
    )
}

/// Write observed daily snowfall for a date range to stdout as CSV.
pub async fn run_history(slug: &str, start: &str, end: &str, timezone: &str) -> anyhow::Result<()> {
    let resort = Resort::require(slug)?;
    let start_date = parse_date(start).with_context(|| format!("Bad start date '{}'", start))?;
    let end_date = parse_date(end).with_context(|| format!("Bad end date '{}'", end))?;
    if end_date < start_date {
        anyhow::bail!("End date {} is before start date {}", end_date, start_date);
    }

    let source = HttpSource::new().context("Failed to build HTTP client")?;
    info!(
        "Querying history for {} from {} to {}",
        slug, start_date, end_date
    );
    let days = source
        .open_meteo
        .fetch_historical(
            resort.latitude,
            resort.longitude,
            resort.elevation.mid,
            &start_date,
            &end_date,
            timezone,
        )
        .await
        .with_context(|| format!("History failed for {}", slug))?;

    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for day in &days {
        writer.serialize(day)?;
    }
    writer.flush()?;
    info!("Wrote {} days", days.len());
    Ok(())
}
