//! Formatting helpers shared by every panel.
//!
//! All helpers take optional inputs and return a placeholder instead of
//! failing, so one missing field never blanks a whole panel.

use chrono::{NaiveTime, Weekday};

use crate::model::Units;

/// Placeholder for any value the provider did not send.
pub const NOT_AVAILABLE: &str = "N/A";

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

const WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// One of the eight compass points, `round(deg / 45) mod 8`.
pub fn compass_label(degrees: f64) -> &'static str {
    if !degrees.is_finite() {
        return COMPASS[0];
    }
    let idx = (degrees.rem_euclid(360.0) / 45.0).round() as usize % COMPASS.len();
    COMPASS[idx]
}

pub fn wind_direction(degrees: Option<f64>) -> &'static str {
    degrees.map_or(NOT_AVAILABLE, compass_label)
}

/// Missing speed reads as calm rather than unknown.
pub fn wind_speed(speed: Option<f64>, units: Units) -> String {
    format!("{:.1} {}", speed.unwrap_or(0.0), units.speed_suffix())
}

/// Moon icon for a phase in `[0, 1]`, where both ends are the new moon.
pub fn moon_phase_icon(phase: f64) -> &'static str {
    if !phase.is_finite() {
        return "🌑";
    }
    let p = if phase == 1.0 { 0.0 } else { phase.rem_euclid(1.0) };

    match p {
        p if p == 0.0 => "🌑",
        p if p < 0.25 => "🌒",
        p if p == 0.25 => "🌓",
        p if p < 0.5 => "🌔",
        p if p == 0.5 => "🌕",
        p if p < 0.75 => "🌖",
        p if p == 0.75 => "🌗",
        _ => "🌘",
    }
}

pub fn moon_phase_percent(phase: Option<f64>) -> String {
    match phase {
        Some(p) if p.is_finite() => format!("{:.0}%", p * 100.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// 12-hour clock, e.g. `"06:05 AM"`.
pub fn clock_12h(time: Option<NaiveTime>) -> String {
    time.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |t| t.format("%I:%M %p").to_string(),
    )
}

/// Hour label used by the rain chart, e.g. `"10AM"`.
pub fn hour_label(time: NaiveTime) -> String {
    time.format("%I%p").to_string()
}

/// Rounded temperature with a degree sign, e.g. `"5°"`.
pub fn temperature(value: Option<f64>) -> String {
    match value {
        Some(t) if t.is_finite() => format!("{}°", round_display(t)),
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn pressure(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |p| format!("{} MB", number(p)))
}

pub fn humidity(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |h| format!("{}%", number(h)))
}

pub fn uv_index(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), number)
}

/// Drop a trailing `.0`, keep real fractions.
fn number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// `Math.round` semantics: halves round up, and `-0` prints as `0`.
pub(crate) fn round_display(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Icon for a free-text condition label such as `"Partially cloudy"`.
pub fn condition_icon(condition: Option<&str>) -> &'static str {
    let Some(condition) = condition.filter(|c| !c.trim().is_empty()) else {
        return "🌤";
    };
    let c = condition.to_lowercase();

    if c.contains("snow") || c.contains("flurries") {
        "❄️"
    } else if c.contains("rain") {
        "🌧"
    } else if c.contains("thunder") || c.contains("storm") {
        "⚡️"
    } else if c.contains("cloudy") || c.contains("overcast") {
        "☁"
    } else if c.contains("partly") {
        "⛅"
    } else if c.contains("clear") || c.contains("sunny") {
        "☀"
    } else {
        "🌤"
    }
}

/// Weekday name for entry `index` of the combined timeline.
pub fn weekday_name(today: Weekday, index: usize) -> &'static str {
    let start = today.num_days_from_sunday() as usize;
    WEEKDAYS[(start + index) % WEEKDAYS.len()]
}

pub fn weekday_short(today: Weekday, index: usize) -> &'static str {
    &weekday_name(today, index)[..3]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compass_maps_all_eight_directions() {
        assert_eq!(compass_label(0.0), "N");
        assert_eq!(compass_label(45.0), "NE");
        assert_eq!(compass_label(90.0), "E");
        assert_eq!(compass_label(135.0), "SE");
        assert_eq!(compass_label(180.0), "S");
        assert_eq!(compass_label(225.0), "SW");
        assert_eq!(compass_label(270.0), "W");
        assert_eq!(compass_label(315.0), "NW");
        assert_eq!(compass_label(360.0), "N");
        assert_eq!(compass_label(350.0), "N");
        assert_eq!(compass_label(-45.0), "NW");
    }

    #[test]
    fn compass_is_periodic() {
        for deg in (0..720).map(|d| d as f64 * 0.5) {
            assert_eq!(compass_label(deg), compass_label(deg + 360.0), "deg {deg}");
        }
    }

    #[test]
    fn missing_wind_reads_calm_and_unknown() {
        assert_eq!(wind_speed(None, Units::Metric), "0.0 km/h");
        assert_eq!(wind_direction(None), "N/A");
        assert_eq!(wind_speed(Some(10.84), Units::Us), "10.8 mph");
    }

    #[test]
    fn moon_phase_buckets() {
        assert_eq!(moon_phase_icon(0.0), "🌑");
        assert_eq!(moon_phase_icon(0.1), "🌒");
        assert_eq!(moon_phase_icon(0.25), "🌓");
        assert_eq!(moon_phase_icon(0.4), "🌔");
        assert_eq!(moon_phase_icon(0.5), "🌕");
        assert_eq!(moon_phase_icon(0.6), "🌖");
        assert_eq!(moon_phase_icon(0.75), "🌗");
        assert_eq!(moon_phase_icon(0.9), "🌘");
        assert_eq!(moon_phase_icon(1.0), "🌑");
        assert_eq!(moon_phase_icon(f64::NAN), "🌑");
    }

    #[test]
    fn moon_phase_percentage() {
        assert_eq!(moon_phase_percent(Some(0.25)), "25%");
        assert_eq!(moon_phase_percent(Some(0.0)), "0%");
        assert_eq!(moon_phase_percent(None), "N/A");
    }

    #[test]
    fn clock_uses_twelve_hour_format() {
        assert_eq!(clock_12h(NaiveTime::from_hms_opt(6, 5, 0)), "06:05 AM");
        assert_eq!(clock_12h(NaiveTime::from_hms_opt(17, 42, 59)), "05:42 PM");
        assert_eq!(clock_12h(None), "N/A");
        assert_eq!(hour_label(NaiveTime::from_hms_opt(13, 0, 0).unwrap()), "01PM");
    }

    #[test]
    fn temperature_rounds_like_the_card() {
        assert_eq!(temperature(Some(5.0)), "5°");
        assert_eq!(temperature(Some(4.5)), "5°");
        assert_eq!(temperature(Some(-0.4)), "0°");
        assert_eq!(temperature(Some(-2.5)), "-2°");
        assert_eq!(temperature(None), "N/A");
    }

    #[test]
    fn detail_values() {
        assert_eq!(pressure(Some(1015.0)), "1015 MB");
        assert_eq!(humidity(Some(71.5)), "71.5%");
        assert_eq!(uv_index(Some(3.0)), "3");
        assert_eq!(uv_index(None), "N/A");
    }

    #[test]
    fn condition_icons() {
        assert_eq!(condition_icon(Some("Snow, Partially cloudy")), "❄️");
        assert_eq!(condition_icon(Some("Rain, Overcast")), "🌧");
        assert_eq!(condition_icon(Some("Thunderstorm")), "⚡️");
        assert_eq!(condition_icon(Some("Overcast")), "☁");
        assert_eq!(condition_icon(Some("Partly sunny")), "⛅");
        assert_eq!(condition_icon(Some("Clear")), "☀");
        assert_eq!(condition_icon(Some("Fog")), "🌤");
        assert_eq!(condition_icon(None), "🌤");
    }

    #[test]
    fn weekday_labels_wrap_around() {
        assert_eq!(weekday_name(Weekday::Sun, 0), "Sunday");
        assert_eq!(weekday_name(Weekday::Fri, 2), "Sunday");
        assert_eq!(weekday_short(Weekday::Sat, 1), "Sun");
        assert_eq!(weekday_short(Weekday::Mon, 7), "Mon");
    }
}
