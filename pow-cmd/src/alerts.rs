//! Snow alert check over a list of resorts.

use crate::pipeline::{compute_band_forecast, PipelineConfig};
use anyhow::Context;
use log::{info, warn};
use pow_core::{
    resort::{ElevationBand, Resort},
    source::{ForecastSource, HttpSource},
};
use pow_data::alerts::{check_resort, AlertSettings, NotifiedMap, SnowAlert};
use std::path::Path;

/// Alerts look three days ahead at mid-mountain.
const ALERT_FORECAST_DAYS: u8 = 3;

/// Evaluate every favorite resort and return the alerts that are new.
/// Resorts that are unknown or fail to forecast are skipped.
pub async fn collect_alerts<S: ForecastSource + ?Sized>(
    source: &S,
    settings: &AlertSettings,
    notified: &mut NotifiedMap,
) -> Vec<SnowAlert> {
    let config = PipelineConfig {
        forecast_days: ALERT_FORECAST_DAYS,
        timezone: settings.timezone.clone(),
        ..PipelineConfig::default()
    };
    let mut alerts = Vec::new();
    if !settings.is_active() {
        return alerts;
    }

    for slug in &settings.favorite_slugs {
        let resort = match Resort::by_slug(slug) {
            Some(r) => r,
            None => {
                warn!("Skipping unknown resort {}", slug);
                continue;
            }
        };
        let forecast = match compute_band_forecast(source, resort, ElevationBand::Mid, &config).await {
            Ok(f) => f,
            Err(e) => {
                warn!("Skipping {}: {}", slug, e);
                continue;
            }
        };
        if let Some(alert) = check_resort(
            slug,
            &resort.name,
            &forecast.daily,
            settings.threshold_cm,
            notified,
        ) {
            alerts.push(alert);
        }
    }
    alerts
}

fn load_notified(path: &Path) -> anyhow::Result<NotifiedMap> {
    if !path.exists() {
        return Ok(NotifiedMap::new());
    }
    let data = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Print new snow alerts. With `state`, already-announced storms are
/// remembered across runs in that JSON file.
pub async fn run_alerts(
    slugs: Vec<String>,
    threshold_cm: f64,
    timezone: &str,
    state: Option<&Path>,
) -> anyhow::Result<()> {
    let settings = AlertSettings {
        favorite_slugs: slugs,
        timezone: timezone.to_string(),
        threshold_cm,
        enabled: true,
    };
    let mut notified = match state {
        Some(path) => load_notified(path)
            .with_context(|| format!("Failed to read alert state {}", path.display()))?,
        None => NotifiedMap::new(),
    };

    let source = HttpSource::new().context("Failed to build HTTP client")?;
    let alerts = collect_alerts(&source, &settings, &mut notified).await;
    info!(
        "{} new alerts across {} resorts",
        alerts.len(),
        settings.favorite_slugs.len()
    );
    for alert in &alerts {
        println!("{}\n  {}", alert.title, alert.body);
    }

    if let Some(path) = state {
        std::fs::write(path, serde_json::to_string_pretty(&notified)?)
            .with_context(|| format!("Failed to write alert state {}", path.display()))?;
    }
    Ok(())
}
