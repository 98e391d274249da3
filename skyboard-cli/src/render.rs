//! Plain-text rendering of the dashboard panels.

use chrono::Weekday;
use skyboard_core::{CitySuggestion, Comparison, Dashboard};
use std::fmt::{self, Write};

const BAR_WIDTH: usize = 20;

pub fn dashboard(dash: &Dashboard, today: Weekday) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "📍 {}", dash.location())?;

    if dash.is_loading() {
        writeln!(out, "Loading...")?;
        return Ok(out);
    }
    if let Some(err) = dash.error() {
        writeln!(out, "{err}")?;
        return Ok(out);
    }
    if dash.timeline().is_none() {
        writeln!(out, "No weather data available")?;
        return Ok(out);
    }

    writeln!(out, "\nWeather Forecast")?;
    for card in dash.cards(today) {
        let marker = if card.is_selected() { "▶" } else { " " };
        write!(
            out,
            "  {marker} {:<10} {:>5}  {}",
            card.weekday, card.temperature, card.icon
        )?;
        if let Some(details) = &card.details {
            write!(
                out,
                "   Real Feel: {} | Wind: {} | Pressure: {} | Humidity: {}",
                details.real_feel, details.wind, details.pressure, details.humidity
            )?;
        }
        out.push('\n');
    }

    writeln!(out, "\nTemperature next 7 days")?;
    for bar in dash.chart(today) {
        let width = ((bar.height_pct / 100.0) * BAR_WIDTH as f64).round() as usize;
        let fill = if bar.selected { "█" } else { "▒" };
        writeln!(
            out,
            "  {}  {:<w$}  {}",
            bar.label,
            fill.repeat(width),
            bar.temperature,
            w = BAR_WIDTH
        )?;
    }

    writeln!(out, "\nChance of rain")?;
    match dash.rain_chance() {
        Some(rain) if rain.is_dry() => writeln!(out, "  No rain expected")?,
        Some(rain) => {
            for bucket in &rain.buckets {
                let width = (bucket.chance as usize * BAR_WIDTH) / 100;
                writeln!(
                    out,
                    "  {:>4}  {:<w$}  {}%",
                    bucket.label,
                    "█".repeat(width),
                    bucket.chance,
                    w = BAR_WIDTH
                )?;
            }
        }
        None => writeln!(out, "  Loading...")?,
    }

    writeln!(out, "\nWeather Details")?;
    match dash.celestial() {
        Some(c) => {
            writeln!(out, "  Sunrise         {}", c.sunrise)?;
            writeln!(out, "  Sunset          {}", c.sunset)?;
            writeln!(out, "  Moon Phase      {} {}", c.moon_icon, c.moon_percent)?;
            writeln!(out, "  UV Index        {}", c.uv_index)?;
            writeln!(out, "  Wind Speed      {}", c.wind_speed)?;
            writeln!(out, "  Wind Direction  {}", c.wind_direction)?;
        }
        None => writeln!(out, "  Loading...")?,
    }

    Ok(out)
}

pub fn comparison(comparison: &Comparison) -> Result<String, fmt::Error> {
    let mut out = String::from("\nOther largest cities\n");
    match comparison {
        Comparison::Ready(tiles) => {
            for tile in tiles {
                writeln!(out, "  {:<18} {}  {:>5}", tile.city, tile.icon, tile.temperature)?;
            }
        }
        Comparison::Failed(message) => writeln!(out, "  {message}")?,
    }
    Ok(out)
}

pub fn suggestion_label(suggestion: &CitySuggestion) -> String {
    match &suggestion.state {
        Some(state) => format!("{}, {} ({state})", suggestion.name, suggestion.country),
        None => format!("{}, {}", suggestion.name, suggestion.country),
    }
}

pub fn suggestions(suggestions: &[CitySuggestion]) -> String {
    if suggestions.is_empty() {
        return "No suggestions\n".to_string();
    }
    suggestions
        .iter()
        .map(|s| format!("{}\n", suggestion_label(s)))
        .collect()
}
