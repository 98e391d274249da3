use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FetchError;

/// Number of forecast days kept after today.
pub const MAX_FORECAST_DAYS: usize = 7;

/// Maximum length of the combined `[current, ...forecast]` sequence.
pub const MAX_TIMELINE_LEN: usize = 1 + MAX_FORECAST_DAYS;

/// A `"City,CountryCode"` string sent verbatim to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Location(String);

impl Location {
    pub fn new(value: impl Into<String>) -> Result<Self, FetchError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(FetchError::EmptyLocation);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// City part, everything before the first comma.
    pub fn city_name(&self) -> &str {
        self.0.split(',').next().unwrap_or(&self.0).trim()
    }

    /// Country code part, if the location carries one.
    pub fn country_code(&self) -> Option<&str> {
        self.0
            .split(',')
            .nth(1)
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Location {
    type Error = FetchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Location {
    type Error = FetchError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Location> for String {
    fn from(value: Location) -> Self {
        value.0
    }
}

/// Unit group requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Us,
    Uk,
    Base,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Us => "us",
            Units::Uk => "uk",
            Units::Base => "base",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "km/h",
            Units::Us | Units::Uk => "mph",
            Units::Base => "m/s",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Us, Units::Uk, Units::Base]
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();
        Units::all()
            .iter()
            .copied()
            .find(|u| u.as_str() == lower)
            .ok_or_else(|| {
                anyhow::anyhow!("Unknown unit group '{value}'. Supported: metric, us, uk, base.")
            })
    }
}

/// One hourly precipitation probability reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyPrecip {
    pub time: NaiveTime,
    pub probability: f64,
}

/// Weather for one entry of the timeline: today's current conditions or a
/// forecast day.
///
/// Every field the provider may omit is optional. Missing data is decided
/// once during normalization; consumers never read raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conditions {
    /// Resolved address, present only on current conditions.
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    /// Local timestamp the entry describes. Midnight for forecast days.
    pub observed_at: Option<NaiveDateTime>,
    pub temperature: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub condition: Option<String>,
    pub sunrise: Option<NaiveTime>,
    pub sunset: Option<NaiveTime>,
    pub moon_phase: Option<f64>,
    pub uv_index: Option<f64>,
    pub precip_probability: Option<f64>,
    pub hourly_precip: Vec<HourlyPrecip>,
}

/// Normalized provider response: current conditions plus up to seven
/// forecast days in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub current: Conditions,
    pub forecast: Vec<Conditions>,
}

impl Timeline {
    /// `[current, ...forecast]`, capped at [`MAX_TIMELINE_LEN`].
    pub fn combined(&self) -> Vec<&Conditions> {
        std::iter::once(&self.current)
            .chain(self.forecast.iter())
            .take(MAX_TIMELINE_LEN)
            .collect()
    }

    pub fn combined_len(&self) -> usize {
        (1 + self.forecast.len()).min(MAX_TIMELINE_LEN)
    }

    /// Entry `index` of the combined timeline.
    pub fn day(&self, index: usize) -> Option<&Conditions> {
        if index >= self.combined_len() {
            return None;
        }
        match index {
            0 => Some(&self.current),
            n => self.forecast.get(n - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(temp: f64) -> Conditions {
        Conditions {
            temperature: Some(temp),
            ..Conditions::default()
        }
    }

    #[test]
    fn location_rejects_blank_input() {
        assert!(matches!(Location::new("   "), Err(FetchError::EmptyLocation)));
        assert!(matches!(Location::new(""), Err(FetchError::EmptyLocation)));
    }

    #[test]
    fn location_splits_city_and_country() {
        let loc = Location::new(" Vilnius, LT ").unwrap();
        assert_eq!(loc.as_str(), "Vilnius, LT");
        assert_eq!(loc.city_name(), "Vilnius");
        assert_eq!(loc.country_code(), Some("LT"));

        let bare = Location::new("Paris").unwrap();
        assert_eq!(bare.city_name(), "Paris");
        assert_eq!(bare.country_code(), None);
    }

    #[test]
    fn units_parse_case_insensitively() {
        assert_eq!(Units::try_from("US").unwrap(), Units::Us);
        assert_eq!(Units::try_from("metric").unwrap(), Units::Metric);
        assert!(Units::try_from("kelvin").is_err());
        assert_eq!(Units::default().speed_suffix(), "km/h");
    }

    #[test]
    fn combined_timeline_is_capped_at_eight() {
        let timeline = Timeline {
            current: day(5.0),
            forecast: (1..=9).map(|i| day(i as f64)).collect(),
        };

        assert_eq!(timeline.combined_len(), 8);
        assert_eq!(timeline.combined().len(), 8);
        assert_eq!(timeline.day(0).and_then(|d| d.temperature), Some(5.0));
        assert_eq!(timeline.day(7).and_then(|d| d.temperature), Some(7.0));
        assert!(timeline.day(8).is_none());
    }

    #[test]
    fn combined_timeline_with_short_forecast() {
        let timeline = Timeline {
            current: day(1.0),
            forecast: vec![day(2.0), day(3.0)],
        };

        assert_eq!(timeline.combined_len(), 3);
        assert!(timeline.day(3).is_none());
    }
}
