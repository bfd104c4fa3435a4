//! Snow alerts for favorite resorts.
//!
//! A resort alerts on the first forecast day whose snowfall reaches the
//! threshold. The last alerted date per resort is remembered so the same
//! storm is only announced once.

use pow_core::series::DailyMetrics;
use pow_utils::{dates::day_label, units::cm_to_in};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 3 inches.
pub const DEFAULT_THRESHOLD_CM: f64 = 7.62;

/// Resort slug to the date it was last alerted for.
pub type NotifiedMap = HashMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertSettings {
    pub favorite_slugs: Vec<String>,
    pub timezone: String,
    pub threshold_cm: f64,
    pub enabled: bool,
}

impl Default for AlertSettings {
    fn default() -> Self {
        AlertSettings {
            favorite_slugs: Vec::new(),
            timezone: "auto".to_string(),
            threshold_cm: DEFAULT_THRESHOLD_CM,
            enabled: false,
        }
    }
}

impl AlertSettings {
    /// Alerts are only evaluated when switched on and something is watched.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.favorite_slugs.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnowAlert {
    pub slug: String,
    pub date: String,
    pub snowfall_cm: f64,
    pub title: String,
    pub body: String,
}

impl SnowAlert {
    pub fn new(slug: &str, resort_name: &str, day: &DailyMetrics, threshold_cm: f64) -> Self {
        let inches = format!("{:.1}", cm_to_in(day.snowfall_sum));
        let threshold_inches = format!("{:.1}", cm_to_in(threshold_cm));
        SnowAlert {
            slug: slug.to_string(),
            date: day.date.clone(),
            snowfall_cm: day.snowfall_sum,
            title: format!("❄️ {}: {}\" forecast", resort_name, inches),
            body: format!(
                "{} at {} is forecasting {}\" of snow (≥ {}\").",
                day_label(&day.date),
                resort_name,
                inches,
                threshold_inches
            ),
        }
    }
}

/// First day whose snowfall reaches the threshold.
pub fn next_snow_day(daily: &[DailyMetrics], threshold_cm: f64) -> Option<&DailyMetrics> {
    daily.iter().find(|d| d.snowfall_sum >= threshold_cm)
}

/// False when this resort was already alerted for this date.
pub fn should_notify(slug: &str, date: &str, notified: &NotifiedMap) -> bool {
    notified.get(slug).map(String::as_str) != Some(date)
}

/// Evaluate one resort; records the alert in `notified` when one is raised.
pub fn check_resort(
    slug: &str,
    resort_name: &str,
    daily: &[DailyMetrics],
    threshold_cm: f64,
    notified: &mut NotifiedMap,
) -> Option<SnowAlert> {
    let day = next_snow_day(daily, threshold_cm)?;
    if !should_notify(slug, &day.date, notified) {
        return None;
    }
    notified.insert(slug.to_string(), day.date.clone());
    Some(SnowAlert::new(slug, resort_name, day, threshold_cm))
}
