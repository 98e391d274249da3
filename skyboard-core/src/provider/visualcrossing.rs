use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    config::DEFAULT_PROVIDER_URL,
    error::{FetchError, truncate_body},
    model::{Conditions, HourlyPrecip, Location, MAX_FORECAST_DAYS, Timeline, Units},
};

use super::WeatherProvider;

/// Client for the Visual Crossing timeline endpoint.
#[derive(Debug, Clone)]
pub struct VisualCrossingProvider {
    api_key: String,
    units: Units,
    base_url: String,
    http: Client,
}

impl VisualCrossingProvider {
    pub fn new(api_key: String, units: Units) -> Self {
        Self {
            api_key,
            units,
            base_url: DEFAULT_PROVIDER_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// `{base}/timeline/{location}`, with the location encoded as a single
    /// path segment.
    fn timeline_url(&self, location: &Location) -> Result<Url, FetchError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push("timeline")
            .push(location.as_str());

        Ok(url)
    }

    async fn fetch_timeline(&self, location: &Location) -> Result<Timeline, FetchError> {
        let url = self.timeline_url(location)?;
        debug!(%location, units = %self.units, "requesting timeline");

        let res = self
            .http
            .get(url)
            .query(&[
                ("unitGroup", self.units.as_str()),
                ("key", self.api_key.as_str()),
                ("contentType", "json"),
            ])
            .send()
            .await
            .inspect_err(|e| warn!(%location, error = %e, "timeline request failed"))?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            warn!(%location, %status, "timeline request returned non-success status");
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: VcTimeline = serde_json::from_str(&body)
            .inspect_err(|e| warn!(%location, error = %e, "failed to parse timeline JSON"))?;

        let timeline = normalize(parsed);
        debug!(%location, days = timeline.combined_len(), "timeline normalized");

        Ok(timeline)
    }
}

#[async_trait]
impl WeatherProvider for VisualCrossingProvider {
    async fn fetch_weather(&self, location: &Location) -> Result<Timeline, FetchError> {
        self.fetch_timeline(location).await
    }
}

/// One record of the timeline response. The provider uses the same field
/// names for `currentConditions`, `days[]` and `days[].hours[]`.
#[derive(Debug, Default, Deserialize)]
struct VcRecord {
    datetime: Option<String>,
    temp: Option<f64>,
    feelslike: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
    windspeed: Option<f64>,
    winddir: Option<f64>,
    conditions: Option<String>,
    sunrise: Option<String>,
    sunset: Option<String>,
    moonphase: Option<f64>,
    uvindex: Option<f64>,
    precipprob: Option<f64>,
    hours: Option<Vec<VcRecord>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VcTimeline {
    address: Option<String>,
    resolved_address: Option<String>,
    current_conditions: Option<VcRecord>,
    days: Option<Vec<VcRecord>>,
}

/// Reshape the provider response into a [`Timeline`].
///
/// `currentConditions` plus the celestial fields of `days[0]` form today;
/// `days[1..=7]` form the forecast.
fn normalize(raw: VcTimeline) -> Timeline {
    let mut days = raw.days.unwrap_or_default().into_iter();
    let today = days.next().unwrap_or_default();
    let now = raw.current_conditions.unwrap_or_default();

    let date = today.datetime.as_deref().and_then(parse_date);
    let observed_at = match (date, now.datetime.as_deref().and_then(parse_time)) {
        (Some(d), Some(t)) => Some(d.and_time(t)),
        (Some(d), None) => Some(midnight(d)),
        _ => None,
    };

    let current = Conditions {
        name: raw.address.or(raw.resolved_address),
        date,
        observed_at,
        temperature: now.temp,
        feels_like: now.feelslike,
        humidity: now.humidity,
        pressure: now.pressure,
        wind_speed: now.windspeed,
        wind_direction: now.winddir,
        condition: now.conditions,
        sunrise: today.sunrise.as_deref().and_then(parse_time),
        sunset: today.sunset.as_deref().and_then(parse_time),
        moon_phase: today.moonphase,
        uv_index: now.uvindex,
        precip_probability: now.precipprob.or(today.precipprob),
        hourly_precip: hourly(today.hours),
    };

    let forecast = days.take(MAX_FORECAST_DAYS).map(forecast_day).collect();

    Timeline { current, forecast }
}

fn forecast_day(day: VcRecord) -> Conditions {
    let date = day.datetime.as_deref().and_then(parse_date);

    Conditions {
        name: None,
        date,
        observed_at: date.map(midnight),
        temperature: day.temp,
        feels_like: day.feelslike,
        humidity: day.humidity,
        pressure: day.pressure,
        wind_speed: day.windspeed,
        wind_direction: day.winddir,
        condition: day.conditions,
        sunrise: day.sunrise.as_deref().and_then(parse_time),
        sunset: day.sunset.as_deref().and_then(parse_time),
        moon_phase: day.moonphase,
        uv_index: day.uvindex,
        precip_probability: day.precipprob,
        hourly_precip: hourly(day.hours),
    }
}

fn hourly(hours: Option<Vec<VcRecord>>) -> Vec<HourlyPrecip> {
    hours
        .unwrap_or_default()
        .into_iter()
        .filter_map(|h| {
            let time = h.datetime.as_deref().and_then(parse_time)?;
            Some(HourlyPrecip {
                time,
                probability: h.precipprob.unwrap_or(0.0),
            })
        })
        .collect()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Accepts `"HH:MM:SS"` and `"HH:MM"`.
pub(crate) fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}
