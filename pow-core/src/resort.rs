use crate::error::{ForecastError, Result};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::OnceLock};

/// Embedded CSV data for every supported resort.
pub static CSV_OBJECT: &str = include_str!("../../fixtures/resorts.csv");

static RESORTS: OnceLock<Vec<Resort>> = OnceLock::new();

/// One of the three representative altitudes a resort is forecast at.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElevationBand {
    Base,
    Mid,
    Top,
}

impl ElevationBand {
    pub const ALL: [ElevationBand; 3] = [ElevationBand::Base, ElevationBand::Mid, ElevationBand::Top];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElevationBand::Base => "base",
            ElevationBand::Mid => "mid",
            ElevationBand::Top => "top",
        }
    }
}

impl fmt::Display for ElevationBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElevationBand {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "base" => Ok(ElevationBand::Base),
            "mid" => Ok(ElevationBand::Mid),
            "top" => Ok(ElevationBand::Top),
            other => Err(ForecastError::InvalidInput(format!(
                "unknown elevation band '{}'",
                other
            ))),
        }
    }
}

/// Station elevations in metres above sea level.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct ResortElevation {
    pub base: f64,
    pub mid: f64,
    pub top: f64,
}

/// Represents a ski resort and the coordinates its forecast is requested for.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Resort {
    /// URL-safe unique slug, e.g. "vail-co"
    pub slug: String,
    pub name: String,
    /// State / province / region label
    pub region: String,
    /// ISO 3166-1 alpha-2 country code
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: ResortElevation,
}

/// Flat CSV row; columns: slug, name, region, country, lat, lon, base, mid, top
#[derive(Debug, Deserialize)]
struct ResortRow {
    slug: String,
    name: String,
    region: String,
    country: String,
    lat: f64,
    lon: f64,
    base: f64,
    mid: f64,
    top: f64,
}

impl From<ResortRow> for Resort {
    fn from(row: ResortRow) -> Self {
        Resort {
            slug: row.slug,
            name: row.name,
            region: row.region,
            country: row.country,
            latitude: row.lat,
            longitude: row.lon,
            elevation: ResortElevation {
                base: row.base,
                mid: row.mid,
                top: row.top,
            },
        }
    }
}

impl Resort {
    /// All resorts from the embedded CSV, parsed once.
    pub fn all() -> &'static [Resort] {
        RESORTS.get_or_init(|| match Resort::parse_resort_csv(CSV_OBJECT) {
            Ok(r) => r,
            Err(e) => panic!("failed to parse embedded resorts csv: {}", e),
        })
    }

    /// Look up a resort by its slug.
    pub fn by_slug(slug: &str) -> Option<&'static Resort> {
        Resort::all().iter().find(|r| r.slug == slug)
    }

    /// Like [`Resort::by_slug`] but reports a missing slug as an error.
    pub fn require(slug: &str) -> Result<&'static Resort> {
        Resort::by_slug(slug).ok_or_else(|| ForecastError::ResortNotFound(slug.to_string()))
    }

    /// Case-insensitive search over slug, name, region and country.
    /// A blank query returns every resort.
    pub fn search(query: &str) -> Vec<&'static Resort> {
        let needle = query.trim().to_lowercase();
        Resort::all()
            .iter()
            .filter(|r| {
                needle.is_empty()
                    || r.slug.to_lowercase().contains(&needle)
                    || r.name.to_lowercase().contains(&needle)
                    || r.region.to_lowercase().contains(&needle)
                    || r.country.to_lowercase() == needle
            })
            .collect()
    }

    pub fn elevation_for(&self, band: ElevationBand) -> f64 {
        match band {
            ElevationBand::Base => self.elevation.base,
            ElevationBand::Mid => self.elevation.mid,
            ElevationBand::Top => self.elevation.top,
        }
    }

    /// Skiable vertical in metres.
    pub fn vertical_drop(&self) -> f64 {
        self.elevation.top - self.elevation.base
    }

    /// Parse a CSV string of resort data into a vector of Resorts.
    pub fn parse_resort_csv(csv_object: &str) -> Result<Vec<Resort>> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_object.as_bytes());
        let mut resort_list = Vec::new();
        for row in rdr.deserialize::<ResortRow>() {
            resort_list.push(row?.into());
        }
        Ok(resort_list)
    }
}

#[cfg(test)]
mod tests {
    use super::{ElevationBand, Resort};
    use std::collections::HashSet;

    #[test]
    fn test_embedded_resorts_parse() {
        let resorts = Resort::all();
        assert!(resorts.len() >= 15);
        let slugs: HashSet<&str> = resorts.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs.len(), resorts.len());
    }

    #[test]
    fn test_elevations_are_ordered() {
        for r in Resort::all() {
            assert!(r.elevation.base <= r.elevation.mid, "{}", r.slug);
            assert!(r.elevation.mid <= r.elevation.top, "{}", r.slug);
            assert!(r.vertical_drop() > 0.0, "{}", r.slug);
        }
    }

    #[test]
    fn test_by_slug() {
        let vail = Resort::by_slug("vail-co").unwrap();
        assert_eq!(vail.name, "Vail");
        assert_eq!(vail.country, "US");
        assert!(Resort::by_slug("nonexistent").is_none());
        assert!(Resort::require("nonexistent").is_err());
    }

    #[test]
    fn test_search() {
        assert_eq!(Resort::search("").len(), Resort::all().len());
        assert_eq!(Resort::search("   ").len(), Resort::all().len());

        let colorado = Resort::search("Colorado");
        assert!(colorado.len() > 1);
        assert!(colorado.iter().all(|r| r.region == "Colorado"));

        assert_eq!(Resort::search("VAIL"), Resort::search("vail"));
        assert!(Resort::search("vail-co").iter().any(|r| r.name == "Vail"));
        assert!(Resort::search("zzzznotaresort").is_empty());
    }

    #[test]
    fn test_elevation_for_band() {
        let crystal = Resort::by_slug("crystal-mountain-wa").unwrap();
        assert_eq!(crystal.elevation_for(ElevationBand::Mid), 1800.0);
        assert_eq!(crystal.elevation_for(ElevationBand::Base), crystal.elevation.base);
        assert_eq!(crystal.elevation_for(ElevationBand::Top), crystal.elevation.top);
    }

    #[test]
    fn test_parse_band() {
        assert_eq!("Top".parse::<ElevationBand>().unwrap(), ElevationBand::Top);
        assert!("summit".parse::<ElevationBand>().is_err());
    }

    #[test]
    fn test_parse_empty_csv() {
        let csv_data = "slug,name,region,country,lat,lon,base,mid,top\n";
        assert!(Resort::parse_resort_csv(csv_data).unwrap().is_empty());
    }
}
