//! Core library for the `skyboard` weather dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weather provider abstraction and its Visual Crossing client
//! - The normalized timeline model
//! - The day-selection view-model and the panels derived from it
//! - City comparison and debounced search suggestions
//!
//! It renders nothing itself; `skyboard-cli` turns the panels into text,
//! other front ends can do the same with the serializable panel types.
//! Interactive front ends feed each keystroke of a search box to
//! [`Suggester`]; the one-shot CLI calls [`GeocodeClient`] directly.

pub mod compare;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod error;
pub mod geocode;
pub mod model;
pub mod panels;
pub mod provider;

pub use compare::{CityTile, Comparison};
pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{FETCH_FAILED_MESSAGE, FetchError};
pub use geocode::{CitySuggestion, GeocodeClient, SuggestionSource, Suggester};
pub use model::{Conditions, Location, Timeline, Units};
pub use panels::ForecastRange;
pub use provider::{WeatherProvider, provider_from_config};

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Weekday;

    /// Provider returning a fixed Vilnius timeline, one current entry plus
    /// a week of forecast.
    #[derive(Debug)]
    struct Fixed;

    #[async_trait]
    impl WeatherProvider for Fixed {
        async fn fetch_weather(&self, location: &Location) -> Result<Timeline, FetchError> {
            Ok(Timeline {
                current: Conditions {
                    name: Some(location.to_string()),
                    temperature: Some(5.0),
                    ..Conditions::default()
                },
                forecast: vec![Conditions::default(); 7],
            })
        }
    }

    #[tokio::test]
    async fn vilnius_dashboard_end_to_end() {
        let config = Config::default();
        let mut dash = Dashboard::new(config.default_location().unwrap(), config.units);

        dash.refresh(&Fixed).await.unwrap();

        let cards = dash.cards(Weekday::Sun);
        assert_eq!(cards.len(), 8);
        assert!(cards[0].is_selected());
        assert_eq!(cards[0].temperature, "5°");
        assert_eq!(cards[1].temperature, "N/A");

        let celestial = dash.celestial().unwrap();
        assert_eq!(celestial.wind_speed, "0.0 km/h");
        assert_eq!(celestial.wind_direction, "N/A");
    }
}
