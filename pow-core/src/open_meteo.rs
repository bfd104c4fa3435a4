//! Open-Meteo response schema and client.
//!
//! Responses are arrays of nullable numbers indexed in parallel by a shared
//! `time` array. They are validated here, at the boundary, so everything
//! downstream can assume complete rows.
//!
//! See: <https://open-meteo.com/en/docs>

use crate::{
    error::{ForecastError, Result},
    series::{DailyMetrics, HistoricalSnowDay, HourlyMetrics},
};
use log::debug;
use serde::Deserialize;

#[cfg(feature = "api")]
use crate::{series::RawForecast, source::ModelRequest};
#[cfg(feature = "api")]
use chrono::NaiveDate;
#[cfg(feature = "api")]
use log::{info, warn};
#[cfg(feature = "api")]
use reqwest::Client;
#[cfg(feature = "api")]
use serde::{de::DeserializeOwned, Serialize};
#[cfg(feature = "api")]
use std::time::Duration;

pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

pub const HOURLY_VARS: &str = "temperature_2m,apparent_temperature,relative_humidity_2m,\
precipitation,rain,snowfall,precipitation_probability,weather_code,wind_speed_10m,\
wind_direction_10m,wind_gusts_10m,freezing_level_height,snow_depth";

pub const DAILY_VARS: &str = "weather_code,temperature_2m_max,temperature_2m_min,\
apparent_temperature_max,apparent_temperature_min,uv_index_max,precipitation_sum,rain_sum,\
snowfall_sum,precipitation_probability_max,wind_speed_10m_max,wind_gusts_10m_max";

pub const ARCHIVE_DAILY_VARS: &str =
    "snowfall_sum,snow_depth_max,temperature_2m_max,temperature_2m_min";

type Column = Vec<Option<f64>>;

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub hourly: HourlyBlock,
    pub daily: DailyBlock,
}

#[derive(Debug, Deserialize)]
pub struct HourlyBlock {
    pub time: Vec<String>,
    pub temperature_2m: Column,
    pub apparent_temperature: Column,
    pub relative_humidity_2m: Column,
    pub precipitation: Column,
    pub rain: Column,
    pub snowfall: Column,
    pub precipitation_probability: Column,
    pub weather_code: Column,
    pub wind_speed_10m: Column,
    pub wind_direction_10m: Column,
    pub wind_gusts_10m: Column,
    pub freezing_level_height: Column,
    #[serde(default)]
    pub snow_depth: Option<Column>,
}

#[derive(Debug, Deserialize)]
pub struct DailyBlock {
    pub time: Vec<String>,
    pub weather_code: Column,
    pub temperature_2m_max: Column,
    pub temperature_2m_min: Column,
    pub apparent_temperature_max: Column,
    pub apparent_temperature_min: Column,
    pub uv_index_max: Column,
    pub precipitation_sum: Column,
    pub rain_sum: Column,
    pub snowfall_sum: Column,
    pub precipitation_probability_max: Column,
    pub wind_speed_10m_max: Column,
    pub wind_gusts_10m_max: Column,
}

#[derive(Debug, Deserialize)]
pub struct ArchiveResponse {
    pub daily: ArchiveDailyBlock,
}

#[derive(Debug, Deserialize)]
pub struct ArchiveDailyBlock {
    pub time: Vec<String>,
    pub snowfall_sum: Column,
    #[serde(default)]
    pub snow_depth_max: Option<Column>,
    pub temperature_2m_max: Column,
    pub temperature_2m_min: Column,
}

fn check_len(name: &str, values: &[Option<f64>], expected: usize) -> Result<()> {
    if values.len() != expected {
        return Err(ForecastError::InvalidInput(format!(
            "{} has {} values but time has {}",
            name,
            values.len(),
            expected
        )));
    }
    Ok(())
}

impl HourlyBlock {
    fn row(&self, i: usize) -> Option<HourlyMetrics> {
        Some(HourlyMetrics {
            time: self.time[i].clone(),
            temperature: self.temperature_2m[i]?,
            apparent_temperature: self.apparent_temperature[i]?,
            relative_humidity: self.relative_humidity_2m[i]?,
            precipitation: self.precipitation[i]?,
            rain: self.rain[i]?,
            snowfall: self.snowfall[i]?,
            precipitation_probability: self.precipitation_probability[i]?,
            weather_code: self.weather_code[i]? as i32,
            wind_speed: self.wind_speed_10m[i]?,
            wind_direction: self.wind_direction_10m[i]?,
            wind_gusts: self.wind_gusts_10m[i]?,
            freezing_level_height: self.freezing_level_height[i]?,
            snow_depth: self.snow_depth.as_ref().and_then(|d| d[i]),
        })
    }

    /// Validate array lengths and convert to rows, dropping rows with a null
    /// in any required field.
    pub fn into_metrics(self) -> Result<Vec<HourlyMetrics>> {
        let n = self.time.len();
        let columns: [(&str, &Column); 12] = [
            ("temperature_2m", &self.temperature_2m),
            ("apparent_temperature", &self.apparent_temperature),
            ("relative_humidity_2m", &self.relative_humidity_2m),
            ("precipitation", &self.precipitation),
            ("rain", &self.rain),
            ("snowfall", &self.snowfall),
            ("precipitation_probability", &self.precipitation_probability),
            ("weather_code", &self.weather_code),
            ("wind_speed_10m", &self.wind_speed_10m),
            ("wind_direction_10m", &self.wind_direction_10m),
            ("wind_gusts_10m", &self.wind_gusts_10m),
            ("freezing_level_height", &self.freezing_level_height),
        ];
        for (name, column) in columns {
            check_len(name, column, n)?;
        }
        if let Some(depth) = &self.snow_depth {
            check_len("snow_depth", depth, n)?;
        }
        let rows: Vec<HourlyMetrics> = (0..n).filter_map(|i| self.row(i)).collect();
        if rows.len() < n {
            debug!("dropped {} incomplete hourly rows", n - rows.len());
        }
        Ok(rows)
    }
}

impl DailyBlock {
    fn row(&self, i: usize) -> Option<DailyMetrics> {
        Some(DailyMetrics {
            date: self.time[i].clone(),
            weather_code: self.weather_code[i]? as i32,
            temperature_max: self.temperature_2m_max[i]?,
            temperature_min: self.temperature_2m_min[i]?,
            apparent_temperature_max: self.apparent_temperature_max[i]?,
            apparent_temperature_min: self.apparent_temperature_min[i]?,
            uv_index_max: self.uv_index_max[i]?,
            precipitation_sum: self.precipitation_sum[i]?,
            rain_sum: self.rain_sum[i]?,
            snowfall_sum: self.snowfall_sum[i]?,
            precipitation_probability_max: self.precipitation_probability_max[i]?,
            wind_speed_max: self.wind_speed_10m_max[i]?,
            wind_gusts_max: self.wind_gusts_10m_max[i]?,
        })
    }

    pub fn into_metrics(self) -> Result<Vec<DailyMetrics>> {
        let n = self.time.len();
        let columns: [(&str, &Column); 12] = [
            ("weather_code", &self.weather_code),
            ("temperature_2m_max", &self.temperature_2m_max),
            ("temperature_2m_min", &self.temperature_2m_min),
            ("apparent_temperature_max", &self.apparent_temperature_max),
            ("apparent_temperature_min", &self.apparent_temperature_min),
            ("uv_index_max", &self.uv_index_max),
            ("precipitation_sum", &self.precipitation_sum),
            ("rain_sum", &self.rain_sum),
            ("snowfall_sum", &self.snowfall_sum),
            ("precipitation_probability_max", &self.precipitation_probability_max),
            ("wind_speed_10m_max", &self.wind_speed_10m_max),
            ("wind_gusts_10m_max", &self.wind_gusts_10m_max),
        ];
        for (name, column) in columns {
            check_len(name, column, n)?;
        }
        let rows: Vec<DailyMetrics> = (0..n).filter_map(|i| self.row(i)).collect();
        if rows.len() < n {
            debug!("dropped {} incomplete daily rows", n - rows.len());
        }
        Ok(rows)
    }
}

impl ArchiveDailyBlock {
    /// Snow depth arrives in metres and is reported in cm; a missing depth reads as 0.
    pub fn into_days(self) -> Result<Vec<HistoricalSnowDay>> {
        let n = self.time.len();
        check_len("snowfall_sum", &self.snowfall_sum, n)?;
        check_len("temperature_2m_max", &self.temperature_2m_max, n)?;
        check_len("temperature_2m_min", &self.temperature_2m_min, n)?;
        if let Some(depth) = &self.snow_depth_max {
            check_len("snow_depth_max", depth, n)?;
        }
        let days = (0..n)
            .filter_map(|i| {
                Some(HistoricalSnowDay {
                    date: self.time[i].clone(),
                    snowfall: self.snowfall_sum[i]?,
                    snow_depth: self
                        .snow_depth_max
                        .as_ref()
                        .and_then(|d| d[i])
                        .map_or(0.0, |m| m * 100.0),
                    temperature_max: self.temperature_2m_max[i]?,
                    temperature_min: self.temperature_2m_min[i]?,
                })
            })
            .collect();
        Ok(days)
    }
}

#[cfg(feature = "api")]
#[derive(Serialize)]
struct ForecastQuery<'a> {
    latitude: f64,
    longitude: f64,
    elevation: f64,
    hourly: &'a str,
    daily: &'a str,
    models: &'a str,
    forecast_days: u8,
    past_days: u8,
    timezone: &'a str,
}

#[cfg(feature = "api")]
#[derive(Serialize)]
struct ArchiveQuery<'a> {
    latitude: f64,
    longitude: f64,
    elevation: f64,
    start_date: String,
    end_date: String,
    daily: &'a str,
    timezone: &'a str,
}

/// Thin Open-Meteo client with retry and exponential backoff.
#[cfg(feature = "api")]
pub struct OpenMeteoClient {
    client: Client,
    forecast_url: String,
    archive_url: String,
    max_tries: u32,
}

#[cfg(feature = "api")]
impl OpenMeteoClient {
    pub fn new(client: Client) -> Self {
        OpenMeteoClient {
            client,
            forecast_url: FORECAST_URL.to_string(),
            archive_url: ARCHIVE_URL.to_string(),
            max_tries: 3,
        }
    }

    /// Fetch hourly and daily series for a single model.
    pub async fn fetch_forecast(&self, request: &ModelRequest) -> Result<RawForecast> {
        let query = ForecastQuery {
            latitude: request.latitude,
            longitude: request.longitude,
            elevation: request.elevation,
            hourly: HOURLY_VARS,
            daily: DAILY_VARS,
            models: request.model.as_str(),
            forecast_days: request.forecast_days,
            past_days: request.past_days,
            timezone: &request.timezone,
        };
        let label = format!("{} @ {}m", request.model, request.elevation);
        let response: ForecastResponse = self.get_json(&self.forecast_url, &query, &label).await?;
        Ok(RawForecast {
            model: request.model,
            hourly: response.hourly.into_metrics()?,
            daily: response.daily.into_metrics()?,
        })
    }

    /// Fetch observed daily snowfall between two dates (inclusive).
    pub async fn fetch_historical(
        &self,
        latitude: f64,
        longitude: f64,
        elevation: f64,
        start_date: &NaiveDate,
        end_date: &NaiveDate,
        timezone: &str,
    ) -> Result<Vec<HistoricalSnowDay>> {
        let query = ArchiveQuery {
            latitude,
            longitude,
            elevation,
            start_date: start_date.format("%Y-%m-%d").to_string(),
            end_date: end_date.format("%Y-%m-%d").to_string(),
            daily: ARCHIVE_DAILY_VARS,
            timezone,
        };
        let label = format!("archive {}..{}", start_date, end_date);
        let response: ArchiveResponse = self.get_json(&self.archive_url, &query, &label).await?;
        response.daily.into_days()
    }

    async fn get_json<T: DeserializeOwned, Q: Serialize>(
        &self,
        url: &str,
        query: &Q,
        label: &str,
    ) -> Result<T> {
        let mut sleep_millis: u64 = 1000;
        let mut last_error = ForecastError::ResponseParse(format!("no attempt made for {}", label));

        for attempt in 1..=self.max_tries {
            match self.client.get(url).query(query).send().await {
                Ok(response) if response.status().is_success() => {
                    match response.json::<T>().await {
                        Ok(body) => return Ok(body),
                        Err(e) => {
                            warn!(
                                "Attempt {}/{}: Failed to decode response for {}: {}",
                                attempt, self.max_tries, label, e
                            );
                            last_error = ForecastError::ResponseParse(e.to_string());
                        }
                    }
                }
                Ok(response) => {
                    warn!(
                        "Attempt {}/{}: Bad response status for {}: {}",
                        attempt,
                        self.max_tries,
                        label,
                        response.status()
                    );
                    last_error = ForecastError::UpstreamStatus {
                        service: "Open-Meteo",
                        status: response.status().as_u16(),
                    };
                }
                Err(e) => {
                    warn!(
                        "Attempt {}/{}: Request failed for {}: {}",
                        attempt, self.max_tries, label, e
                    );
                    last_error = e.into();
                }
            }

            if attempt < self.max_tries {
                info!(
                    "Sleeping for {} milliseconds before retry for {}",
                    sleep_millis, label
                );
                tokio::time::sleep(Duration::from_millis(sleep_millis)).await;
                sleep_millis *= 2;
            }
        }

        warn!("All attempts failed for {}", label);
        Err(last_error)
    }
}
