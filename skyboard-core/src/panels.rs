//! Panels derived from the combined timeline and the selected day.
//!
//! Each builder is a pure function of its inputs. A missing day yields
//! `None` (the front end shows a loading placeholder); missing fields
//! inside a day yield `"N/A"` values.

use chrono::{Duration, NaiveTime, Timelike, Weekday};
use serde::Serialize;

use crate::{
    display,
    model::{Conditions, Timeline, Units},
};

/// Number of hourly buckets in the rain chart.
pub const RAIN_BUCKETS: usize = 6;

/// Sun, moon, UV and wind details for the selected day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CelestialPanel {
    pub sunrise: String,
    pub sunset: String,
    pub moon_icon: &'static str,
    pub moon_percent: String,
    pub uv_index: String,
    pub wind_speed: String,
    pub wind_direction: &'static str,
    /// Raw bearing for a compass needle; 0 when unknown.
    pub wind_degrees: f64,
}

impl CelestialPanel {
    pub fn from_day(day: Option<&Conditions>, units: Units) -> Option<Self> {
        let day = day?;

        Some(Self {
            sunrise: display::clock_12h(day.sunrise),
            sunset: display::clock_12h(day.sunset),
            moon_icon: display::moon_phase_icon(day.moon_phase.unwrap_or(0.0)),
            moon_percent: display::moon_phase_percent(day.moon_phase),
            uv_index: display::uv_index(day.uv_index),
            wind_speed: display::wind_speed(day.wind_speed, units),
            wind_direction: display::wind_direction(day.wind_direction),
            wind_degrees: day.wind_direction.unwrap_or(0.0),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RainBucket {
    pub label: String,
    /// Probability of precipitation, rounded, 0..=100.
    pub chance: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RainChance {
    pub buckets: Vec<RainBucket>,
}

impl RainChance {
    /// Six hourly buckets starting at the day's base hour.
    ///
    /// Each bucket uses the provider's probability for that hour when the
    /// day reports one. Hours it does not report, including those past
    /// midnight, carry the daily probability.
    pub fn from_day(day: Option<&Conditions>) -> Option<Self> {
        let day = day?;
        let base = day
            .observed_at
            .map(|ts| ts.time())
            .unwrap_or(NaiveTime::MIN);
        let base = NaiveTime::from_hms_opt(base.hour(), 0, 0).unwrap_or(NaiveTime::MIN);
        let daily = day.precip_probability.unwrap_or(0.0);

        let buckets = (0..RAIN_BUCKETS)
            .map(|i| {
                let (time, wrapped) = base.overflowing_add_signed(Duration::hours(i as i64));
                let reported = day
                    .hourly_precip
                    .iter()
                    .find(|h| wrapped == 0 && h.time.hour() == time.hour());

                RainBucket {
                    label: display::hour_label(time),
                    chance: percent(reported.map_or(daily, |h| h.probability)),
                }
            })
            .collect();

        Some(Self { buckets })
    }

    /// True when every bucket rounds to zero; the front end shows a
    /// "no rain" placeholder instead of bars.
    pub fn is_dry(&self) -> bool {
        self.buckets.iter().all(|b| b.chance == 0)
    }
}

fn percent(value: f64) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    display::round_display(value).clamp(0, 100) as u8
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub label: &'static str,
    pub temperature: String,
    /// Bar height in percent of the chart, 20..=100.
    pub height_pct: f64,
    pub selected: bool,
}

/// Temperature bars for every entry of the combined timeline.
pub fn temperature_chart(timeline: &Timeline, today: Weekday, selected: usize) -> Vec<ChartBar> {
    let days = timeline.combined();
    let temps: Vec<f64> = days
        .iter()
        .filter_map(|d| d.temperature)
        .filter(|t| t.is_finite())
        .collect();

    let min = temps.iter().copied().fold(f64::INFINITY, f64::min);
    let max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    days.iter()
        .enumerate()
        .map(|(index, day)| {
            let height_pct = match day.temperature {
                Some(t) if t.is_finite() && range > 0.0 => ((t - min) / range) * 80.0 + 20.0,
                Some(t) if t.is_finite() => 100.0,
                _ => 20.0,
            };

            ChartBar {
                label: display::weekday_short(today, index),
                temperature: display::temperature(day.temperature),
                height_pct,
                selected: index == selected,
            }
        })
        .collect()
}

/// Which cards of the strip are visible. `Today` and `Tomorrow` also pin
/// the selection; `Dashboard` keeps the two in step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ForecastRange {
    Today,
    Tomorrow,
    #[default]
    Week,
}

impl ForecastRange {
    pub fn is_visible(&self, index: usize) -> bool {
        match self {
            ForecastRange::Today => index == 0,
            ForecastRange::Tomorrow => index == 1,
            ForecastRange::Week => true,
        }
    }

    /// Day forced into focus by the range, if any.
    pub fn pinned_day(&self) -> Option<usize> {
        match self {
            ForecastRange::Today => Some(0),
            ForecastRange::Tomorrow => Some(1),
            ForecastRange::Week => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardDetails {
    pub real_feel: String,
    pub wind: String,
    pub pressure: String,
    pub humidity: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastCard {
    pub index: usize,
    pub weekday: &'static str,
    pub temperature: String,
    pub icon: &'static str,
    /// Present only on the selected card.
    pub details: Option<CardDetails>,
}

impl ForecastCard {
    pub fn is_selected(&self) -> bool {
        self.details.is_some()
    }
}

pub fn forecast_cards(
    timeline: &Timeline,
    today: Weekday,
    selected: usize,
    range: ForecastRange,
    units: Units,
) -> Vec<ForecastCard> {
    timeline
        .combined()
        .into_iter()
        .enumerate()
        .filter(|(index, _)| range.is_visible(*index))
        .map(|(index, day)| ForecastCard {
            index,
            weekday: display::weekday_name(today, index),
            temperature: display::temperature(day.temperature),
            icon: display::condition_icon(day.condition.as_deref()),
            details: (index == selected).then(|| CardDetails {
                real_feel: display::temperature(day.feels_like),
                wind: display::wind_speed(day.wind_speed, units),
                pressure: display::pressure(day.pressure),
                humidity: display::humidity(day.humidity),
            }),
        })
        .collect()
}
