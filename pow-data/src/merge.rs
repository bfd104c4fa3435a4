//! Multi-model merge.
//!
//! Models do not share a sampling grid: a short-range model such as HRRR
//! covers 48 h while the global models run for days. Every merge therefore
//! works on the sorted union of timestamps and gathers contributors by key,
//! never by position. Each field is then reduced with its own rule:
//!
//! | rule          | fields                                                  |
//! |---------------|---------------------------------------------------------|
//! | median        | precipitation, rain, snowfall (and their daily sums)    |
//! | mode          | weather code                                            |
//! | circular mean | wind direction                                          |
//! | mean          | everything else                                         |

use crate::stats::{circular_mean, mean, median, mode, round2};
use log::debug;
use pow_core::{
    error::{ForecastError, Result},
    series::{DailyMetrics, HourlyMetrics},
};
use std::collections::{BTreeSet, HashMap};

/// How a field is reduced across models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    Mean,
    Median,
    Mode,
    CircularMean,
}

impl Aggregation {
    pub fn apply(self, values: &[f64]) -> f64 {
        match self {
            Aggregation::Mean => mean(values),
            Aggregation::Median => median(values),
            Aggregation::Mode => mode(values),
            Aggregation::CircularMean => circular_mean(values),
        }
    }
}

/// A row keyed by its timestamp.
pub trait Timestamped {
    fn timestamp(&self) -> &str;
}

impl Timestamped for HourlyMetrics {
    fn timestamp(&self) -> &str {
        &self.time
    }
}

impl Timestamped for DailyMetrics {
    fn timestamp(&self) -> &str {
        &self.date
    }
}

/// Sorted union of all timestamps, each with the rows that report it.
pub fn align<T: Timestamped>(models: &[Vec<T>]) -> Vec<(&str, Vec<&T>)> {
    let indexes: Vec<HashMap<&str, &T>> = models
        .iter()
        .map(|rows| rows.iter().map(|r| (r.timestamp(), r)).collect())
        .collect();
    let times: BTreeSet<&str> = indexes.iter().flat_map(|i| i.keys().copied()).collect();
    times
        .into_iter()
        .map(|t| {
            let rows = indexes.iter().filter_map(|i| i.get(t).copied()).collect();
            (t, rows)
        })
        .collect()
}

fn reduce<T>(rows: &[&T], how: Aggregation, get: impl Fn(&T) -> f64) -> f64 {
    let values: Vec<f64> = rows.iter().map(|r| get(r)).collect();
    let value = round2(how.apply(&values));
    // bearings stay in [0, 360) after rounding
    if how == Aggregation::CircularMean && value >= 360.0 {
        0.0
    } else {
        value
    }
}

fn weather_code<T>(rows: &[&T], get: impl Fn(&T) -> i32) -> i32 {
    let codes: Vec<i32> = rows.iter().map(|r| get(r)).collect();
    mode(&codes)
}

fn merge_hourly_rows(time: &str, rows: &[&HourlyMetrics]) -> HourlyMetrics {
    use Aggregation::*;
    let depths: Vec<f64> = rows.iter().filter_map(|r| r.snow_depth).collect();
    HourlyMetrics {
        time: time.to_string(),
        temperature: reduce(rows, Mean, |r| r.temperature),
        apparent_temperature: reduce(rows, Mean, |r| r.apparent_temperature),
        relative_humidity: reduce(rows, Mean, |r| r.relative_humidity),
        precipitation: reduce(rows, Median, |r| r.precipitation),
        rain: reduce(rows, Median, |r| r.rain),
        snowfall: reduce(rows, Median, |r| r.snowfall),
        precipitation_probability: reduce(rows, Mean, |r| r.precipitation_probability),
        weather_code: weather_code(rows, |r| r.weather_code),
        wind_speed: reduce(rows, Mean, |r| r.wind_speed),
        wind_direction: reduce(rows, CircularMean, |r| r.wind_direction),
        wind_gusts: reduce(rows, Mean, |r| r.wind_gusts),
        freezing_level_height: reduce(rows, Mean, |r| r.freezing_level_height),
        snow_depth: (!depths.is_empty()).then(|| round2(mean(&depths))),
    }
}

fn merge_daily_rows(date: &str, rows: &[&DailyMetrics]) -> DailyMetrics {
    use Aggregation::*;
    DailyMetrics {
        date: date.to_string(),
        weather_code: weather_code(rows, |r| r.weather_code),
        temperature_max: reduce(rows, Mean, |r| r.temperature_max),
        temperature_min: reduce(rows, Mean, |r| r.temperature_min),
        apparent_temperature_max: reduce(rows, Mean, |r| r.apparent_temperature_max),
        apparent_temperature_min: reduce(rows, Mean, |r| r.apparent_temperature_min),
        uv_index_max: reduce(rows, Mean, |r| r.uv_index_max),
        precipitation_sum: reduce(rows, Median, |r| r.precipitation_sum),
        rain_sum: reduce(rows, Median, |r| r.rain_sum),
        snowfall_sum: reduce(rows, Median, |r| r.snowfall_sum),
        precipitation_probability_max: reduce(rows, Mean, |r| r.precipitation_probability_max),
        wind_speed_max: reduce(rows, Mean, |r| r.wind_speed_max),
        wind_gusts_max: reduce(rows, Mean, |r| r.wind_gusts_max),
    }
}

fn merge_with<T: Timestamped + Clone>(
    kind: &str,
    mut models: Vec<Vec<T>>,
    merge_rows: impl Fn(&str, &[&T]) -> T,
) -> Result<Vec<T>> {
    match models.len() {
        0 => Err(ForecastError::InvalidInput(format!(
            "no {} model data to merge",
            kind
        ))),
        1 => Ok(models.remove(0)),
        n => {
            let merged: Vec<T> = align(&models)
                .into_iter()
                .map(|(t, rows)| match rows.as_slice() {
                    // a lone contributor passes through untouched
                    [only] => (*only).clone(),
                    _ => merge_rows(t, &rows),
                })
                .collect();
            debug!("merged {} {} models into {} rows", n, kind, merged.len());
            Ok(merged)
        }
    }
}

/// Merge N models' hourly rows into one series.
pub fn merge_hourly(models: Vec<Vec<HourlyMetrics>>) -> Result<Vec<HourlyMetrics>> {
    merge_with("hourly", models, merge_hourly_rows)
}

/// Merge N models' daily rows into one series.
pub fn merge_daily(models: Vec<Vec<DailyMetrics>>) -> Result<Vec<DailyMetrics>> {
    merge_with("daily", models, merge_daily_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour(time: &str, precipitation: f64, weather_code: i32) -> HourlyMetrics {
        HourlyMetrics {
            time: time.to_string(),
            temperature: -5.0,
            apparent_temperature: -9.0,
            relative_humidity: 85.0,
            precipitation,
            rain: 0.0,
            snowfall: precipitation * 0.7,
            precipitation_probability: 70.0,
            weather_code,
            wind_speed: 12.0,
            wind_direction: 180.0,
            wind_gusts: 25.0,
            freezing_level_height: 800.0,
            snow_depth: None,
        }
    }

    fn day(date: &str, snowfall_sum: f64, weather_code: i32) -> DailyMetrics {
        DailyMetrics {
            date: date.to_string(),
            weather_code,
            temperature_max: -1.0,
            temperature_min: -8.0,
            apparent_temperature_max: -5.0,
            apparent_temperature_min: -14.0,
            uv_index_max: 2.0,
            precipitation_sum: snowfall_sum / 0.7,
            rain_sum: 0.0,
            snowfall_sum,
            precipitation_probability_max: 90.0,
            wind_speed_max: 20.0,
            wind_gusts_max: 40.0,
        }
    }

    #[test]
    fn test_zero_models_is_invalid_input() {
        assert!(matches!(
            merge_hourly(Vec::new()),
            Err(ForecastError::InvalidInput(_))
        ));
        assert!(matches!(
            merge_daily(Vec::new()),
            Err(ForecastError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_single_model_is_identity() {
        let model = vec![
            hour("2026-02-18T00:00", 0.123, 71),
            hour("2026-02-18T01:00", 0.456, 73),
        ];
        assert_eq!(merge_hourly(vec![model.clone()]).unwrap(), model);
    }

    #[test]
    fn test_union_of_timestamps() {
        let mut m1 = vec![
            hour("2026-02-18T00:00", 1.0, 71),
            hour("2026-02-18T01:00", 1.0, 71),
            hour("2026-02-18T02:00", 0.333, 75),
        ];
        m1[2].temperature = -11.111;
        let m2 = vec![
            hour("2026-02-18T00:00", 3.0, 73),
            hour("2026-02-18T01:00", 3.0, 73),
        ];
        let merged = merge_hourly(vec![m1.clone(), m2]).unwrap();
        let times: Vec<&str> = merged.iter().map(|r| r.time.as_str()).collect();
        assert_eq!(
            times,
            vec!["2026-02-18T00:00", "2026-02-18T01:00", "2026-02-18T02:00"]
        );
        assert_eq!(merged[0].precipitation, 2.0);
        // only m1 reports T2: raw values survive
        assert_eq!(merged[2], m1[2]);
    }

    #[test]
    fn test_union_is_sorted_regardless_of_model_order() {
        let m1 = vec![hour("2026-02-18T03:00", 1.0, 71)];
        let m2 = vec![
            hour("2026-02-18T01:00", 1.0, 71),
            hour("2026-02-18T02:00", 1.0, 71),
        ];
        let a = merge_hourly(vec![m1.clone(), m2.clone()]).unwrap();
        let b = merge_hourly(vec![m2, m1]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a[0].time, "2026-02-18T01:00");
        assert_eq!(a[2].time, "2026-02-18T03:00");
    }

    #[test]
    fn test_precipitation_uses_median() {
        let t = "2026-02-18T06:00";
        let merged = merge_hourly(vec![
            vec![hour(t, 0.5, 71)],
            vec![hour(t, 1.0, 73)],
            vec![hour(t, 10.0, 71)],
        ])
        .unwrap();
        assert_eq!(merged[0].precipitation, 1.0);
        assert_eq!(merged[0].snowfall, 0.7);
    }

    #[test]
    fn test_weather_code_uses_mode() {
        let t = "2026-02-18T06:00";
        let merged = merge_hourly(vec![
            vec![hour(t, 0.5, 71)],
            vec![hour(t, 1.0, 73)],
            vec![hour(t, 10.0, 71)],
        ])
        .unwrap();
        assert_eq!(merged[0].weather_code, 71);
    }

    #[test]
    fn test_wind_direction_uses_circular_mean() {
        let t = "2026-02-18T06:00";
        let mut a = hour(t, 0.5, 71);
        let mut b = hour(t, 0.5, 71);
        a.wind_direction = 350.0;
        b.wind_direction = 10.0;
        let merged = merge_hourly(vec![vec![a], vec![b]]).unwrap();
        assert!(merged[0].wind_direction < 10.0);
    }

    #[test]
    fn test_wind_direction_just_below_north_wraps() {
        let t = "2026-02-18T06:00";
        let mut a = hour(t, 0.5, 71);
        let mut b = hour(t, 0.5, 71);
        a.wind_direction = 359.992;
        b.wind_direction = 0.0;
        let merged = merge_hourly(vec![vec![a], vec![b]]).unwrap();
        assert_eq!(merged[0].wind_direction, 0.0);
    }

    #[test]
    fn test_continuous_fields_use_mean_rounded() {
        let t = "2026-02-18T06:00";
        let mut a = hour(t, 0.5, 71);
        let mut b = hour(t, 0.5, 71);
        let mut c = hour(t, 0.5, 71);
        a.temperature = -1.0;
        b.temperature = -2.0;
        c.temperature = -2.0;
        a.freezing_level_height = 600.0;
        b.freezing_level_height = 700.0;
        c.freezing_level_height = 900.0;
        let merged = merge_hourly(vec![vec![a], vec![b], vec![c]]).unwrap();
        assert_eq!(merged[0].temperature, -1.67);
        assert!((merged[0].freezing_level_height - 733.33).abs() < 1e-9);
    }

    #[test]
    fn test_snow_depth_from_reporting_models_only() {
        let t = "2026-02-18T06:00";
        let mut a = hour(t, 0.5, 71);
        let b = hour(t, 0.5, 71);
        a.snow_depth = Some(1.2);
        let merged = merge_hourly(vec![vec![a], vec![b.clone()]]).unwrap();
        assert_eq!(merged[0].snow_depth, Some(1.2));
        let merged = merge_hourly(vec![vec![b.clone()], vec![b]]).unwrap();
        assert_eq!(merged[0].snow_depth, None);
    }

    #[test]
    fn test_merge_daily() {
        let m1 = vec![day("2026-02-18", 2.0, 71), day("2026-02-19", 5.0, 73)];
        let m2 = vec![day("2026-02-18", 4.0, 73), day("2026-02-19", 6.0, 73)];
        let m3 = vec![
            day("2026-02-18", 30.0, 71),
            day("2026-02-19", 7.0, 75),
            day("2026-02-20", 1.5, 71),
        ];
        let merged = merge_daily(vec![m1, m2, m3]).unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].snowfall_sum, 4.0);
        assert_eq!(merged[0].weather_code, 71);
        assert_eq!(merged[1].snowfall_sum, 6.0);
        assert_eq!(merged[1].weather_code, 73);
        assert_eq!(merged[2].snowfall_sum, 1.5);
    }

    #[test]
    fn test_aggregation_dispatch() {
        let values = [1.0, 2.0, 2.0, 50.0];
        assert_eq!(Aggregation::Mean.apply(&values), 13.75);
        assert_eq!(Aggregation::Median.apply(&values), 2.0);
        assert_eq!(Aggregation::Mode.apply(&values), 2.0);
    }
}
