//! Elevation-aware rain/snow split.
//!
//! The vendor snowfall field assumes a fixed ~7:1 ratio and takes the phase
//! from the grid cell, not the station. Here the phase comes from the
//! freezing level relative to the station and the station temperature, and
//! the depth from [`snow_liquid_ratio`].

use crate::{slr::snow_liquid_ratio, slr::RAIN_ABOVE_C, stats::round2};
use pow_core::series::{DailyMetrics, HourlyMetrics};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The two empirical constants of the phase decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnowPhaseThresholds {
    /// A station this far (m) above the freezing level gets all snow.
    pub freezing_level_margin_m: f64,
    /// Upper bound (°C) of the mixed rain/snow zone, which starts at 0 °C.
    pub rain_threshold_c: f64,
}

impl Default for SnowPhaseThresholds {
    fn default() -> Self {
        SnowPhaseThresholds {
            freezing_level_margin_m: 100.0,
            rain_threshold_c: RAIN_ABOVE_C,
        }
    }
}

/// One timestep as seen by the recalculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecalcInput {
    /// mm total
    pub precipitation: f64,
    /// mm, vendor value (unused by the split)
    pub rain: f64,
    /// cm, vendor value (unused by the split)
    pub snowfall: f64,
    /// °C at the station
    pub temperature: f64,
    /// m above sea level
    pub freezing_level_height: f64,
    pub relative_humidity: Option<f64>,
    /// km/h
    pub wind_speed: Option<f64>,
}

impl From<&HourlyMetrics> for RecalcInput {
    fn from(row: &HourlyMetrics) -> Self {
        RecalcInput {
            precipitation: row.precipitation,
            rain: row.rain,
            snowfall: row.snowfall,
            temperature: row.temperature,
            freezing_level_height: row.freezing_level_height,
            relative_humidity: Some(row.relative_humidity),
            wind_speed: Some(row.wind_speed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RecalcOutput {
    /// cm
    pub snowfall: f64,
    /// mm
    pub rain: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DailyTotals {
    /// cm
    pub snowfall_sum: f64,
    /// mm
    pub rain_sum: f64,
}

/// Re-derive snowfall and rain for one timestep with the default thresholds.
pub fn recalc_hourly(input: &RecalcInput, station_elevation: f64) -> RecalcOutput {
    recalc_hourly_with(input, station_elevation, &SnowPhaseThresholds::default())
}

pub fn recalc_hourly_with(
    input: &RecalcInput,
    station_elevation: f64,
    thresholds: &SnowPhaseThresholds,
) -> RecalcOutput {
    let precipitation = input.precipitation;
    if precipitation <= 0.0 {
        return RecalcOutput::default();
    }
    let slr = |temp: f64| snow_liquid_ratio(temp, input.relative_humidity, input.wind_speed);

    if station_elevation > input.freezing_level_height + thresholds.freezing_level_margin_m {
        // solidly above the freezing line; a mild station reading must not zero the ratio
        let clamped = input.temperature.min(0.0);
        return RecalcOutput {
            snowfall: round2(precipitation * slr(clamped)),
            rain: 0.0,
        };
    }

    if input.temperature <= 0.0 {
        return RecalcOutput {
            snowfall: round2(precipitation * slr(input.temperature)),
            rain: 0.0,
        };
    }

    if input.temperature <= thresholds.rain_threshold_c {
        let snow_fraction =
            (thresholds.rain_threshold_c - input.temperature) / thresholds.rain_threshold_c;
        let snow_portion = precipitation * snow_fraction;
        let rain_portion = precipitation * (1.0 - snow_fraction);
        return RecalcOutput {
            snowfall: round2(snow_portion * slr(input.temperature)),
            rain: round2(rain_portion),
        };
    }

    RecalcOutput {
        snowfall: 0.0,
        rain: round2(precipitation),
    }
}

/// Plain sums of recalculated hourly values.
pub fn daily_from_hourly(hourly_snowfall: &[f64], hourly_rain: &[f64]) -> DailyTotals {
    DailyTotals {
        snowfall_sum: round2(hourly_snowfall.iter().sum()),
        rain_sum: round2(hourly_rain.iter().sum()),
    }
}

/// Recalculate every hourly row in place, then replace each day's snowfall
/// and rain sums with the totals of that day's recalculated hours.
///
/// Days without any hourly coverage keep the values they had.
pub fn recalc_band(
    hourly: &mut [HourlyMetrics],
    daily: &mut [DailyMetrics],
    station_elevation: f64,
    thresholds: &SnowPhaseThresholds,
) {
    for row in hourly.iter_mut() {
        let out = recalc_hourly_with(&RecalcInput::from(&*row), station_elevation, thresholds);
        row.snowfall = out.snowfall;
        row.rain = out.rain;
    }

    let mut by_date: BTreeMap<&str, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for row in hourly.iter() {
        let entry = by_date.entry(row.date()).or_default();
        entry.0.push(row.snowfall);
        entry.1.push(row.rain);
    }

    for day in daily.iter_mut() {
        if let Some((snow, rain)) = by_date.get(day.date.as_str()) {
            let totals = daily_from_hourly(snow, rain);
            day.snowfall_sum = totals.snowfall_sum;
            day.rain_sum = totals.rain_sum;
        }
    }
}
