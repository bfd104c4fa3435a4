//! Secondary-source blend: nudge the merged daily snowfall toward an
//! independent forecaster product, keyed by date.

use crate::stats::round2;
use log::debug;
use pow_core::series::{BandForecast, DailyMetrics};
use std::collections::{BTreeMap, HashMap};

/// Trust placed in the secondary source.
pub const SECONDARY_WEIGHT: f64 = 0.3;

/// Date to blended snowfall (cm) for every model day. Days the secondary
/// source does not cover keep the model value.
pub fn blend_with_secondary(
    daily: &[DailyMetrics],
    secondary: &HashMap<String, f64>,
    weight: f64,
) -> BTreeMap<String, f64> {
    daily
        .iter()
        .map(|day| {
            let value = match secondary.get(&day.date) {
                Some(other) => round2((1.0 - weight) * day.snowfall_sum + weight * other),
                None => day.snowfall_sum,
            };
            (day.date.clone(), value)
        })
        .collect()
}

/// Overwrite a band's daily snowfall with the blended values. An empty
/// secondary map leaves the band untouched.
pub fn apply_secondary_blend(band: &mut BandForecast, secondary: &HashMap<String, f64>, weight: f64) {
    if secondary.is_empty() {
        return;
    }
    let blended = blend_with_secondary(&band.daily, secondary, weight);
    let mut touched = 0;
    for day in band.daily.iter_mut() {
        if let Some(&value) = blended.get(&day.date) {
            if secondary.contains_key(&day.date) {
                touched += 1;
            }
            day.snowfall_sum = value;
        }
    }
    debug!("blended {} of {} days at {} band", touched, band.daily.len(), band.band);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pow_core::resort::ElevationBand;

    fn day(date: &str, snowfall_sum: f64) -> DailyMetrics {
        DailyMetrics {
            date: date.to_string(),
            weather_code: 73,
            temperature_max: -2.0,
            temperature_min: -9.0,
            apparent_temperature_max: -6.0,
            apparent_temperature_min: -15.0,
            uv_index_max: 1.5,
            precipitation_sum: 8.0,
            rain_sum: 0.0,
            snowfall_sum,
            precipitation_probability_max: 95.0,
            wind_speed_max: 25.0,
            wind_gusts_max: 50.0,
        }
    }

    fn secondary(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(d, v)| (d.to_string(), *v)).collect()
    }

    #[test]
    fn test_weighted_blend() {
        let daily = vec![day("2026-02-18", 10.0), day("2026-02-19", 5.0)];
        let blended = blend_with_secondary(
            &daily,
            &secondary(&[("2026-02-18", 15.0), ("2026-02-19", 3.0)]),
            SECONDARY_WEIGHT,
        );
        assert_eq!(blended["2026-02-18"], 11.5);
        assert_eq!(blended["2026-02-19"], 4.4);
    }

    #[test]
    fn test_absent_date_keeps_model_value() {
        let daily = vec![day("2026-02-18", 10.0), day("2026-02-25", 2.345)];
        let blended = blend_with_secondary(&daily, &secondary(&[("2026-02-18", 15.0)]), 0.3);
        assert_eq!(blended["2026-02-25"], 2.345);
    }

    #[test]
    fn test_empty_secondary_is_noop() {
        let daily = vec![day("2026-02-18", 10.0), day("2026-02-19", 5.0)];
        let blended = blend_with_secondary(&daily, &HashMap::new(), 0.3);
        assert_eq!(blended["2026-02-18"], 10.0);
        assert_eq!(blended["2026-02-19"], 5.0);
    }

    #[test]
    fn test_custom_weight() {
        let daily = vec![day("2026-02-18", 10.0)];
        let blended = blend_with_secondary(&daily, &secondary(&[("2026-02-18", 20.0)]), 0.5);
        assert_eq!(blended["2026-02-18"], 15.0);
    }

    #[test]
    fn test_apply_overwrites_in_place() {
        let mut band = BandForecast {
            band: ElevationBand::Mid,
            elevation: 1800.0,
            hourly: Vec::new(),
            daily: vec![day("2026-02-18", 10.0), day("2026-02-19", 5.0)],
        };
        let before = band.clone();
        apply_secondary_blend(&mut band, &HashMap::new(), SECONDARY_WEIGHT);
        assert_eq!(band, before);

        apply_secondary_blend(&mut band, &secondary(&[("2026-02-19", 3.0)]), SECONDARY_WEIGHT);
        assert_eq!(band.daily[0].snowfall_sum, 10.0);
        assert_eq!(band.daily[1].snowfall_sum, 4.4);
        assert_eq!(band.daily[1].precipitation_sum, 8.0);
    }
}
