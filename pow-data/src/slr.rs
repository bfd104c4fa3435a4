//! Snow-to-liquid ratio.
//!
//! The base ratio comes from a temperature lookup, then is nudged by
//! humidity (moist air grows larger dendrites, fluffier snow) and wind
//! (compaction and sublimation at the surface). The optional adjustments
//! apply only below freezing and only when the caller supplies the reading.

use crate::stats::round2;

/// Above this temperature (°C) precipitation is rain.
pub const RAIN_ABOVE_C: f64 = 2.0;

/// Flat ratio for the wet mix between 0 °C and [`RAIN_ABOVE_C`].
pub const WET_MIX_RATIO: f64 = 0.5;

/// (exclusive lower bound °C, ratio) for sub-freezing air, checked top-down;
/// colder than the last bound gets [`COLDEST_RATIO`].
const BASE_RATIOS: [(f64, f64); 3] = [
    (-2.0, 1.0),
    (-5.0, 1.2),
    (-10.0, 1.5),
];
const COLD_BOUND_C: f64 = -15.0;
const COLD_RATIO: f64 = 1.8;
const COLDEST_RATIO: f64 = 2.0;

fn base_ratio(temp_c: f64) -> f64 {
    for (bound, ratio) in BASE_RATIOS {
        if temp_c > bound {
            return ratio;
        }
    }
    if temp_c > COLD_BOUND_C {
        COLD_RATIO
    } else {
        COLDEST_RATIO
    }
}

fn humidity_factor(relative_humidity: f64) -> f64 {
    if relative_humidity >= 90.0 {
        1.15
    } else if relative_humidity >= 80.0 {
        1.10
    } else if relative_humidity < 50.0 {
        0.90
    } else {
        1.0
    }
}

fn wind_factor(wind_speed_kmh: f64) -> f64 {
    if wind_speed_kmh >= 50.0 {
        0.80
    } else if wind_speed_kmh >= 30.0 {
        0.90
    } else {
        1.0
    }
}

/// cm of snow per mm of liquid precipitation, rounded to two decimals.
pub fn snow_liquid_ratio(
    temp_c: f64,
    relative_humidity: Option<f64>,
    wind_speed_kmh: Option<f64>,
) -> f64 {
    if temp_c > RAIN_ABOVE_C {
        return 0.0;
    }
    if temp_c > 0.0 {
        return WET_MIX_RATIO;
    }
    let mut ratio = base_ratio(temp_c);
    if let Some(rh) = relative_humidity {
        ratio *= humidity_factor(rh);
    }
    if let Some(wind) = wind_speed_kmh {
        ratio *= wind_factor(wind);
    }
    round2(ratio)
}

#[cfg(test)]
mod tests {
    use super::snow_liquid_ratio;

    fn slr(t: f64) -> f64 {
        snow_liquid_ratio(t, None, None)
    }

    #[test]
    fn test_base_ratio_bands() {
        assert_eq!(slr(5.0), 0.0);
        assert_eq!(slr(3.0), 0.0);
        assert_eq!(slr(1.0), 0.5);
        assert_eq!(slr(0.5), 0.5);
        assert_eq!(slr(0.0), 1.0);
        assert_eq!(slr(-1.0), 1.0);
        assert_eq!(slr(-3.0), 1.2);
        assert_eq!(slr(-4.9), 1.2);
        assert_eq!(slr(-5.0), 1.5);
        assert_eq!(slr(-7.0), 1.5);
        assert_eq!(slr(-10.0), 1.8);
        assert_eq!(slr(-12.0), 1.8);
        assert_eq!(slr(-15.0), 2.0);
        assert_eq!(slr(-20.0), 2.0);
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(slr(2.0), 0.5);
        assert_eq!(slr(-2.0), 1.2);
    }

    #[test]
    fn test_humidity_adjustment() {
        assert_eq!(snow_liquid_ratio(-12.0, Some(95.0), None), 2.07);
        assert_eq!(snow_liquid_ratio(-12.0, Some(85.0), None), 1.98);
        assert_eq!(snow_liquid_ratio(-12.0, Some(65.0), None), 1.8);
        assert_eq!(snow_liquid_ratio(-12.0, Some(40.0), None), 1.62);
    }

    #[test]
    fn test_wind_adjustment() {
        assert_eq!(snow_liquid_ratio(-12.0, None, Some(55.0)), 1.44);
        assert_eq!(snow_liquid_ratio(-12.0, None, Some(35.0)), 1.62);
        assert_eq!(snow_liquid_ratio(-12.0, None, Some(10.0)), 1.8);
    }

    #[test]
    fn test_adjustments_compound() {
        // 2.0 * 1.15 * 0.8
        assert_eq!(snow_liquid_ratio(-20.0, Some(92.0), Some(60.0)), 1.84);
    }

    #[test]
    fn test_wet_mix_ignores_adjustments() {
        assert_eq!(snow_liquid_ratio(1.0, Some(95.0), Some(60.0)), 0.5);
        assert_eq!(snow_liquid_ratio(1.0, Some(95.0), None), 0.5);
        assert_eq!(snow_liquid_ratio(1.0, None, Some(60.0)), 0.5);
        assert_eq!(snow_liquid_ratio(2.0, Some(40.0), Some(35.0)), 0.5);
        // freezing itself is adjusted
        assert_eq!(snow_liquid_ratio(0.0, Some(95.0), None), 1.15);
    }

    #[test]
    fn test_rain_ignores_adjustments() {
        assert_eq!(snow_liquid_ratio(4.0, Some(99.0), Some(5.0)), 0.0);
    }
}
