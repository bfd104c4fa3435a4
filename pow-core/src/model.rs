use serde::{Deserialize, Serialize};
use std::fmt;

/// A numerical weather prediction model served by Open-Meteo.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherModel {
    /// NOAA GFS blended with HRRR where available; global baseline
    GfsSeamless,
    /// ECMWF IFS 0.25°; global baseline
    EcmwfIfs025,
    /// NOAA HRRR, 3 km, 48 h; continental US only
    Hrrr,
    /// Environment Canada GEM
    GemSeamless,
}

/// The global models every resort is forecast with.
pub const GLOBAL_BASELINE: [WeatherModel; 2] = [WeatherModel::GfsSeamless, WeatherModel::EcmwfIfs025];

impl WeatherModel {
    /// Identifier used in the Open-Meteo `models` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherModel::GfsSeamless => "gfs_seamless",
            WeatherModel::EcmwfIfs025 => "ecmwf_ifs025",
            WeatherModel::Hrrr => "hrrr",
            WeatherModel::GemSeamless => "gem_seamless",
        }
    }
}

impl fmt::Display for WeatherModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Models to request for a resort in the given country.
///
/// US resorts add HRRR for the short range, Canadian resorts add GEM instead,
/// everyone else gets the global baseline only.
pub fn models_for_country(country: &str) -> Vec<WeatherModel> {
    let mut models = GLOBAL_BASELINE.to_vec();
    match country {
        "US" => models.push(WeatherModel::Hrrr),
        "CA" => models.push(WeatherModel::GemSeamless),
        _ => {}
    }
    models
}

/// Whether an NWS-style secondary snowfall forecast covers this country.
pub fn has_secondary_source(country: &str) -> bool {
    country == "US"
}
