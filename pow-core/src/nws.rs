//! National Weather Service gridpoint snowfall (US only).
//!
//! Two-step lookup:
//!   1. `GET /points/{lat},{lon}` gives the forecast office and grid cell
//!   2. `GET /gridpoints/{office}/{x},{y}` gives `snowfallAmount` as
//!      ISO-8601 interval/value pairs
//!
//! Values are converted to cm and bucketed into daily totals keyed by the
//! interval's start date.

use crate::series::DailySnowfall;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

#[cfg(feature = "api")]
use crate::error::{ForecastError, Result};
#[cfg(feature = "api")]
use log::debug;
#[cfg(feature = "api")]
use reqwest::Client;

pub const NWS_BASE: &str = "https://api.weather.gov";

#[derive(Debug, Deserialize)]
pub struct PointsResponse {
    pub properties: GridPoint,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridPoint {
    pub grid_id: String,
    pub grid_x: u32,
    pub grid_y: u32,
}

#[derive(Debug, Deserialize)]
pub struct GridDataResponse {
    pub properties: GridDataProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridDataProperties {
    #[serde(default)]
    pub snowfall_amount: Option<GridLayer>,
}

#[derive(Debug, Deserialize)]
pub struct GridLayer {
    #[serde(default)]
    pub uom: String,
    pub values: Vec<GridValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridValue {
    /// e.g. "2026-02-18T06:00:00+00:00/PT6H"
    pub valid_time: String,
    pub value: Option<f64>,
}

/// "YYYY-MM-DD" start of a "<start>/<ISO-8601 duration>" interval.
pub fn interval_start_date(valid_time: &str) -> Option<&str> {
    let (start, duration) = valid_time.split_once('/')?;
    if duration.is_empty() || duration.contains('/') {
        return None;
    }
    start.get(..10)
}

/// Multiplier from the layer's unit of measure to cm. The API reports metres
/// unless it says otherwise.
pub fn unit_to_cm(uom: &str) -> f64 {
    if uom.ends_with(":mm") || uom == "mm" {
        0.1
    } else if uom.ends_with(":cm") || uom == "cm" {
        1.0
    } else {
        100.0
    }
}

/// Bucket interval values into daily totals, sorted by date. Each value is
/// credited wholly to its start date; null and non-positive values are skipped.
pub fn bucket_daily(layer: &GridLayer) -> Vec<DailySnowfall> {
    let to_cm = unit_to_cm(&layer.uom);
    let mut daily: BTreeMap<String, f64> = BTreeMap::new();
    for entry in &layer.values {
        let value = match entry.value {
            Some(v) if v > 0.0 => v,
            _ => continue,
        };
        let date = match interval_start_date(&entry.valid_time) {
            Some(d) => d,
            None => continue,
        };
        *daily.entry(date.to_string()).or_insert(0.0) += value * to_cm;
    }
    daily
        .into_iter()
        .map(|(date, cm)| DailySnowfall {
            date,
            snowfall_cm: (cm * 100.0).round() / 100.0,
        })
        .collect()
}

/// Date to cm lookup used for blending.
pub fn snow_map(days: &[DailySnowfall]) -> HashMap<String, f64> {
    days.iter()
        .map(|d| (d.date.clone(), d.snowfall_cm))
        .collect()
}

#[cfg(feature = "api")]
pub struct NwsClient {
    client: Client,
    base_url: String,
}

#[cfg(feature = "api")]
impl NwsClient {
    pub fn new(client: Client) -> Self {
        NwsClient {
            client,
            base_url: NWS_BASE.to_string(),
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/geo+json")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ForecastError::UpstreamStatus {
                service: "NWS",
                status: response.status().as_u16(),
            });
        }
        Ok(response.json::<T>().await?)
    }

    /// Resolve the forecast office grid cell. Fails outside NWS coverage.
    pub async fn fetch_gridpoint(&self, latitude: f64, longitude: f64) -> Result<GridPoint> {
        let url = format!("{}/points/{:.4},{:.4}", self.base_url, latitude, longitude);
        let points: PointsResponse = self.get(&url).await?;
        Ok(points.properties)
    }

    /// Daily snowfall totals for the next several days.
    pub async fn fetch_snowfall(&self, latitude: f64, longitude: f64) -> Result<Vec<DailySnowfall>> {
        let grid = self.fetch_gridpoint(latitude, longitude).await?;
        let url = format!(
            "{}/gridpoints/{}/{},{}",
            self.base_url, grid.grid_id, grid.grid_x, grid.grid_y
        );
        let data: GridDataResponse = self.get(&url).await?;
        Ok(data
            .properties
            .snowfall_amount
            .map(|layer| bucket_daily(&layer))
            .unwrap_or_default())
    }

    /// Like [`NwsClient::fetch_snowfall`], but any failure yields an empty list.
    pub async fn daily_snowfall(&self, latitude: f64, longitude: f64) -> Vec<DailySnowfall> {
        match self.fetch_snowfall(latitude, longitude).await {
            Ok(days) => days,
            Err(e) => {
                debug!("NWS snowfall unavailable for {},{}: {}", latitude, longitude, e);
                Vec::new()
            }
        }
    }
}
