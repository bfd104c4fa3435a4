use crate::{model::WeatherModel, resort::ElevationBand, resort::Resort};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One hourly row of a forecast. `time` is ISO-8601 local time ("YYYY-MM-DDTHH:MM").
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlyMetrics {
    pub time: String,
    /// °C
    pub temperature: f64,
    /// °C
    pub apparent_temperature: f64,
    /// 0-100 %
    pub relative_humidity: f64,
    /// mm
    pub precipitation: f64,
    /// mm
    pub rain: f64,
    /// cm
    pub snowfall: f64,
    /// %
    pub precipitation_probability: f64,
    /// WMO weather code
    pub weather_code: i32,
    /// km/h
    pub wind_speed: f64,
    /// degrees
    pub wind_direction: f64,
    /// km/h
    pub wind_gusts: f64,
    /// m above sea level
    pub freezing_level_height: f64,
    /// m, only some models report it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snow_depth: Option<f64>,
}

impl HourlyMetrics {
    /// The "YYYY-MM-DD" prefix of `time`.
    pub fn date(&self) -> &str {
        self.time.get(..10).unwrap_or(&self.time)
    }
}

/// One daily row of a forecast. `date` is "YYYY-MM-DD".
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyMetrics {
    pub date: String,
    /// dominant WMO weather code
    pub weather_code: i32,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub apparent_temperature_max: f64,
    pub apparent_temperature_min: f64,
    pub uv_index_max: f64,
    /// mm
    pub precipitation_sum: f64,
    /// mm
    pub rain_sum: f64,
    /// cm
    pub snowfall_sum: f64,
    /// %
    pub precipitation_probability_max: f64,
    /// km/h
    pub wind_speed_max: f64,
    /// km/h
    pub wind_gusts_max: f64,
}

/// What a single weather model returned for one location and elevation.
#[derive(Debug, PartialEq, Clone)]
pub struct RawForecast {
    pub model: WeatherModel,
    pub hourly: Vec<HourlyMetrics>,
    pub daily: Vec<DailyMetrics>,
}

/// The reconciled forecast for one elevation band.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct BandForecast {
    pub band: ElevationBand,
    /// m above sea level
    pub elevation: f64,
    pub hourly: Vec<HourlyMetrics>,
    pub daily: Vec<DailyMetrics>,
}

/// All three bands of a resort, fetched together.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResortForecast {
    pub resort: Resort,
    pub fetched_at: DateTime<Utc>,
    pub base: BandForecast,
    pub mid: BandForecast,
    pub top: BandForecast,
}

impl ResortForecast {
    pub fn band(&self, band: ElevationBand) -> &BandForecast {
        match band {
            ElevationBand::Base => &self.base,
            ElevationBand::Mid => &self.mid,
            ElevationBand::Top => &self.top,
        }
    }
}

/// Daily snowfall total from the secondary (NWS) source.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySnowfall {
    /// "YYYY-MM-DD"
    pub date: String,
    pub snowfall_cm: f64,
}

/// Observed snowfall for one past day.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalSnowDay {
    pub date: String,
    /// cm
    pub snowfall: f64,
    /// cm
    pub snow_depth: f64,
    /// °C
    pub temperature_max: f64,
    /// °C
    pub temperature_min: f64,
}
