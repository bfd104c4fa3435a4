//! Shared display helpers for the pow crates.

/// Unit conversion and formatting
pub mod units {
    const FEET_PER_METRE: f64 = 3.28084;
    const CM_PER_INCH: f64 = 2.54;

    /// Display unit system.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum Units {
        #[default]
        Imperial,
        Metric,
    }

    pub fn cm_to_in(cm: f64) -> f64 {
        cm / CM_PER_INCH
    }

    pub fn c_to_f(celsius: f64) -> f64 {
        celsius * 9.0 / 5.0 + 32.0
    }

    /// Whole degrees, e.g. "23°F" or "-5°C"
    pub fn fmt_temp(celsius: f64, units: Units) -> String {
        match units {
            Units::Imperial => format!("{}°F", c_to_f(celsius).round() as i64),
            Units::Metric => format!("{}°C", celsius.round() as i64),
        }
    }

    /// Whole feet or metres with thousands separators, e.g. "11,570ft"
    pub fn fmt_elevation(metres: f64, units: Units) -> String {
        match units {
            Units::Imperial => format!("{}ft", group_thousands((metres * FEET_PER_METRE).round() as i64)),
            Units::Metric => format!("{}m", group_thousands(metres.round() as i64)),
        }
    }

    /// One decimal place, e.g. `4.0"` or "10.2cm"
    pub fn fmt_snow(cm: f64, units: Units) -> String {
        match units {
            Units::Imperial => format!("{:.1}\"", cm_to_in(cm)),
            Units::Metric => format!("{:.1}cm", cm),
        }
    }

    /// 0 to 3 dots for a rain amount in inches.
    pub fn rain_dot_rating(rain_inches: f64) -> u8 {
        if rain_inches <= 0.0 {
            0
        } else if rain_inches <= 0.1 {
            1
        } else if rain_inches <= 0.5 {
            2
        } else {
            3
        }
    }

    fn group_thousands(value: i64) -> String {
        let digits = value.unsigned_abs().to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        if value < 0 {
            out.push('-');
        }
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }
        out
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_cm_to_in() {
            assert_eq!(cm_to_in(2.54), 1.0);
            assert!((cm_to_in(7.62) - 3.0).abs() < 1e-9);
        }

        #[test]
        fn test_fmt_temp() {
            assert_eq!(fmt_temp(-5.0, Units::Imperial), "23°F");
            assert_eq!(fmt_temp(0.0, Units::Imperial), "32°F");
            assert_eq!(fmt_temp(-5.4, Units::Metric), "-5°C");
        }

        #[test]
        fn test_fmt_elevation() {
            assert_eq!(fmt_elevation(3527.0, Units::Imperial), "11,572ft");
            assert_eq!(fmt_elevation(1800.0, Units::Metric), "1,800m");
            assert_eq!(fmt_elevation(250.0, Units::Metric), "250m");
        }

        #[test]
        fn test_fmt_snow() {
            assert_eq!(fmt_snow(10.16, Units::Imperial), "4.0\"");
            assert_eq!(fmt_snow(10.16, Units::Metric), "10.2cm");
        }

        #[test]
        fn test_rain_dot_rating() {
            assert_eq!(rain_dot_rating(0.0), 0);
            assert_eq!(rain_dot_rating(0.05), 1);
            assert_eq!(rain_dot_rating(0.1), 1);
            assert_eq!(rain_dot_rating(0.3), 2);
            assert_eq!(rain_dot_rating(0.5), 2);
            assert_eq!(rain_dot_rating(1.2), 3);
        }
    }
}

/// WMO weather interpretation codes
pub mod weather_codes {
    /// Human label and emoji icon for a code.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct WeatherDescription {
        pub label: String,
        pub icon: &'static str,
    }

    fn lookup(code: i32) -> Option<(&'static str, &'static str)> {
        let desc = match code {
            0 => ("Clear sky", "☀️"),
            1 => ("Mainly clear", "🌤️"),
            2 => ("Partly cloudy", "⛅"),
            3 => ("Overcast", "☁️"),
            45 => ("Fog", "🌫️"),
            48 => ("Rime fog", "🌫️"),
            51 => ("Light drizzle", "🌦️"),
            53 => ("Drizzle", "🌦️"),
            55 => ("Dense drizzle", "🌧️"),
            56 => ("Light freezing drizzle", "🌧️"),
            57 => ("Freezing drizzle", "🌧️"),
            61 => ("Slight rain", "🌦️"),
            63 => ("Rain", "🌧️"),
            65 => ("Heavy rain", "🌧️"),
            66 => ("Light freezing rain", "🌧️"),
            67 => ("Freezing rain", "🌧️"),
            71 => ("Slight snow", "🌨️"),
            73 => ("Snow", "🌨️"),
            75 => ("Heavy snow", "❄️"),
            77 => ("Snow grains", "❄️"),
            80 => ("Slight rain showers", "🌦️"),
            81 => ("Rain showers", "🌧️"),
            82 => ("Violent rain showers", "🌧️"),
            85 => ("Slight snow showers", "🌨️"),
            86 => ("Heavy snow showers", "❄️"),
            95 => ("Thunderstorm", "⛈️"),
            96 => ("Thunderstorm w/ hail", "⛈️"),
            99 => ("Thunderstorm w/ heavy hail", "⛈️"),
            _ => return None,
        };
        Some(desc)
    }

    pub fn describe(code: i32) -> WeatherDescription {
        match lookup(code) {
            Some((label, icon)) => WeatherDescription {
                label: label.to_string(),
                icon,
            },
            None => WeatherDescription {
                label: format!("Code {}", code),
                icon: "❓",
            },
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_known_code() {
            let d = describe(73);
            assert_eq!(d.label, "Snow");
            assert_eq!(d.icon, "🌨️");
        }

        #[test]
        fn test_unknown_code() {
            let d = describe(42);
            assert_eq!(d.label, "Code 42");
            assert_eq!(d.icon, "❓");
        }
    }
}

/// Date utility functions
pub mod dates {
    use chrono::NaiveDate;

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Short label such as "Wed, Feb 18". Anything unparseable is returned as is.
    pub fn day_label(date_iso: &str) -> String {
        match date_iso.get(..10).map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d")) {
            Some(Ok(date)) => date.format("%a, %b %-d").to_string(),
            _ => date_iso.to_string(),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_date() {
            let date = NaiveDate::from_ymd_opt(2026, 2, 18).unwrap();
            assert_eq!(parse_date("2026-02-18").unwrap(), date);
            assert!(parse_date("18/02/2026").is_err());
            assert!(parse_date("2026-02-30").is_err());
        }

        #[test]
        fn test_day_label() {
            assert_eq!(day_label("2026-02-18"), "Wed, Feb 18");
            assert_eq!(day_label("2026-03-01T06:00"), "Sun, Mar 1");
            assert_eq!(day_label("soon"), "soon");
        }
    }
}
