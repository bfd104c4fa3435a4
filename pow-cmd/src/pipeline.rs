//! Forecast pipeline: fetch every model for a band, merge, recalculate
//! snow, resum days, then blend in the secondary source where one exists.

use futures::future::try_join_all;
use log::{debug, info};
use pow_core::{
    error::Result,
    model::{has_secondary_source, models_for_country},
    nws::snow_map,
    resort::{ElevationBand, Resort},
    series::{BandForecast, ResortForecast},
    source::{ForecastSource, ModelRequest},
};
use pow_data::{
    blend::{apply_secondary_blend, SECONDARY_WEIGHT},
    merge::{merge_daily, merge_hourly},
    recalc::{recalc_band, SnowPhaseThresholds},
};
use std::collections::HashMap;

/// Knobs for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub forecast_days: u8,
    pub past_days: u8,
    /// IANA zone name or "auto" for the resort's local zone
    pub timezone: String,
    pub secondary_weight: f64,
    pub thresholds: SnowPhaseThresholds,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            forecast_days: 7,
            past_days: 0,
            timezone: "auto".to_string(),
            secondary_weight: SECONDARY_WEIGHT,
            thresholds: SnowPhaseThresholds::default(),
        }
    }
}

fn model_requests(resort: &Resort, band: ElevationBand, config: &PipelineConfig) -> Vec<ModelRequest> {
    let elevation = resort.elevation_for(band);
    models_for_country(&resort.country)
        .into_iter()
        .map(|model| ModelRequest {
            latitude: resort.latitude,
            longitude: resort.longitude,
            elevation,
            model,
            forecast_days: config.forecast_days,
            past_days: config.past_days,
            timezone: config.timezone.clone(),
        })
        .collect()
}

/// Merged and recalculated forecast for one band, without the secondary blend.
/// Any failed model fetch fails the band.
pub async fn build_band_forecast<S: ForecastSource + ?Sized>(
    source: &S,
    resort: &Resort,
    band: ElevationBand,
    config: &PipelineConfig,
) -> Result<BandForecast> {
    let requests = model_requests(resort, band, config);
    let elevation = resort.elevation_for(band);
    info!(
        "Fetching {} models for {} {} ({}m)",
        requests.len(),
        resort.slug,
        band,
        elevation
    );

    let raw = try_join_all(requests.iter().map(|r| source.fetch_model(r))).await?;
    let (hourly, daily): (Vec<_>, Vec<_>) = raw.into_iter().map(|r| (r.hourly, r.daily)).unzip();

    let mut hourly = merge_hourly(hourly)?;
    let mut daily = merge_daily(daily)?;
    recalc_band(&mut hourly, &mut daily, elevation, &config.thresholds);

    Ok(BandForecast {
        band,
        elevation,
        hourly,
        daily,
    })
}

/// Date to snowfall (cm) from the secondary source. Empty when the country
/// has no coverage or the fetch fails.
pub async fn fetch_secondary_map<S: ForecastSource + ?Sized>(
    source: &S,
    resort: &Resort,
) -> HashMap<String, f64> {
    if !has_secondary_source(&resort.country) {
        return HashMap::new();
    }
    match source
        .fetch_secondary_snowfall(resort.latitude, resort.longitude)
        .await
    {
        Ok(days) => {
            if days.is_empty() {
                debug!("No secondary snowfall for {}", resort.slug);
            }
            snow_map(&days)
        }
        Err(e) => {
            debug!("Secondary snowfall failed for {}: {}", resort.slug, e);
            HashMap::new()
        }
    }
}

/// Final forecast for one band.
pub async fn compute_band_forecast<S: ForecastSource + ?Sized>(
    source: &S,
    resort: &Resort,
    band: ElevationBand,
    config: &PipelineConfig,
) -> Result<BandForecast> {
    let (forecast, secondary) = tokio::join!(
        build_band_forecast(source, resort, band, config),
        fetch_secondary_map(source, resort)
    );
    let mut forecast = forecast?;
    apply_secondary_blend(&mut forecast, &secondary, config.secondary_weight);
    Ok(forecast)
}

/// All three bands, fetched concurrently, sharing one secondary fetch.
pub async fn compute_resort_forecast<S: ForecastSource + ?Sized>(
    source: &S,
    resort: &Resort,
    config: &PipelineConfig,
) -> Result<ResortForecast> {
    let (base, mid, top, secondary) = tokio::join!(
        build_band_forecast(source, resort, ElevationBand::Base, config),
        build_band_forecast(source, resort, ElevationBand::Mid, config),
        build_band_forecast(source, resort, ElevationBand::Top, config),
        fetch_secondary_map(source, resort)
    );
    let (mut base, mut mid, mut top) = (base?, mid?, top?);
    for band in [&mut base, &mut mid, &mut top] {
        apply_secondary_blend(band, &secondary, config.secondary_weight);
    }

    Ok(ResortForecast {
        resort: resort.clone(),
        fetched_at: chrono::Utc::now(),
        base,
        mid,
        top,
    })
}
