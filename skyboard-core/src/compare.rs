//! "Other largest cities" comparison panel.

use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    display,
    error::FetchError,
    model::Location,
    provider::WeatherProvider,
};

/// Message shown in place of every tile when any city fails.
pub const COMPARISON_FAILED_MESSAGE: &str = "Failed to fetch weather data";

pub const DEFAULT_COUNTRY: &str = "LT";

const CITIES_BY_COUNTRY: &[(&str, [&str; 3])] = &[
    ("LT", ["Vilnius,LT", "Kaunas,LT", "Klaipėda,LT"]),
    ("US", ["New York,US", "Los Angeles,US", "Chicago,US"]),
    ("GB", ["London,GB", "Birmingham,GB", "Manchester,GB"]),
    ("DE", ["Berlin,DE", "Hamburg,DE", "Munich,DE"]),
    ("FR", ["Paris,FR", "Marseille,FR", "Lyon,FR"]),
    ("ES", ["Madrid,ES", "Barcelona,ES", "Valencia,ES"]),
    ("IT", ["Rome,IT", "Milan,IT", "Naples,IT"]),
    ("CA", ["Toronto,CA", "Vancouver,CA", "Montreal,CA"]),
    ("AU", ["Sydney,AU", "Melbourne,AU", "Brisbane,AU"]),
    ("IN", ["Mumbai,IN", "Delhi,IN", "Bangalore,IN"]),
    ("CN", ["Beijing,CN", "Shanghai,CN", "Shenzhen,CN"]),
    ("JP", ["Tokyo,JP", "Osaka,JP", "Kyoto,JP"]),
    ("BR", ["São Paulo,BR", "Rio de Janeiro,BR", "Brasília,BR"]),
    ("RU", ["Moscow,RU", "Saint Petersburg,RU", "Novosibirsk,RU"]),
    ("ZA", ["Cape Town,ZA", "Johannesburg,ZA", "Durban,ZA"]),
    ("NL", ["Amsterdam,NL", "Rotterdam,NL", "The Hague,NL"]),
    ("SE", ["Stockholm,SE", "Gothenburg,SE", "Malmö,SE"]),
    ("NO", ["Oslo,NO", "Bergen,NO", "Trondheim,NO"]),
    ("DK", ["Copenhagen,DK", "Aarhus,DK", "Odense,DK"]),
    ("GR", ["Athens,GR", "Thessaloniki,GR", "Patras,GR"]),
    ("TR", ["Istanbul,TR", "Ankara,TR", "Izmir,TR"]),
    ("SA", ["Riyadh,SA", "Jeddah,SA", "Mecca,SA"]),
    ("KR", ["Seoul,KR", "Busan,KR", "Incheon,KR"]),
    ("MX", ["Mexico City,MX", "Guadalajara,MX", "Monterrey,MX"]),
    ("AR", ["Buenos Aires,AR", "Córdoba,AR", "Rosario,AR"]),
    ("PL", ["Warsaw,PL", "Krakow,PL", "Wrocław,PL"]),
    ("CH", ["Zurich,CH", "Geneva,CH", "Basel,CH"]),
    ("BE", ["Brussels,BE", "Antwerp,BE", "Ghent,BE"]),
    ("AT", ["Vienna,AT", "Salzburg,AT", "Innsbruck,AT"]),
    ("PT", ["Lisbon,PT", "Porto,PT", "Faro,PT"]),
    ("NZ", ["Auckland,NZ", "Wellington,NZ", "Christchurch,NZ"]),
    ("TH", ["Bangkok,TH", "Chiang Mai,TH", "Phuket,TH"]),
    ("LV", ["Riga,LV", "Daugavpils,LV", "Liepāja,LV"]),
];

/// Largest cities of the location's country, falling back to
/// [`DEFAULT_COUNTRY`] for unknown or missing codes.
pub fn cities_for(location: &Location) -> Vec<Location> {
    let code = location
        .country_code()
        .map(str::to_uppercase)
        .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());

    let cities = CITIES_BY_COUNTRY
        .iter()
        .find(|(c, _)| *c == code)
        .or_else(|| CITIES_BY_COUNTRY.iter().find(|(c, _)| *c == DEFAULT_COUNTRY))
        .map(|(_, cities)| cities.as_slice())
        .unwrap_or_default();

    cities
        .iter()
        .filter_map(|c| Location::new(*c).ok())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityTile {
    pub city: String,
    pub temperature: String,
    pub icon: &'static str,
}

/// Outcome of one comparison refresh. There is no partial state: either
/// every tile is ready or the whole panel shows the error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Comparison {
    Ready(Vec<CityTile>),
    Failed(String),
}

/// Fetch every city concurrently and join all-or-nothing.
pub async fn fetch_tiles(
    provider: &dyn WeatherProvider,
    cities: &[Location],
) -> Result<Vec<CityTile>, FetchError> {
    debug!(count = cities.len(), "fetching comparison cities");

    let timelines = try_join_all(cities.iter().map(|city| provider.fetch_weather(city))).await?;

    Ok(cities
        .iter()
        .zip(timelines)
        .map(|(city, timeline)| CityTile {
            city: city.city_name().to_string(),
            temperature: display::temperature(Some(timeline.current.temperature.unwrap_or(0.0))),
            icon: display::condition_icon(timeline.current.condition.as_deref()),
        })
        .collect())
}

pub async fn compare(provider: &dyn WeatherProvider, cities: &[Location]) -> Comparison {
    match fetch_tiles(provider, cities).await {
        Ok(tiles) => Comparison::Ready(tiles),
        Err(err) => {
            warn!(error = %err, "comparison fetch failed");
            Comparison::Failed(COMPARISON_FAILED_MESSAGE.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Conditions, Timeline};
    use async_trait::async_trait;
    use reqwest::StatusCode;

    #[derive(Debug)]
    struct CityProvider {
        failing: Option<&'static str>,
    }

    #[async_trait]
    impl WeatherProvider for CityProvider {
        async fn fetch_weather(&self, location: &Location) -> Result<Timeline, FetchError> {
            if self.failing == Some(location.as_str()) {
                return Err(FetchError::Status {
                    status: StatusCode::BAD_GATEWAY,
                    body: String::new(),
                });
            }
            Ok(Timeline {
                current: Conditions {
                    temperature: Some(location.city_name().len() as f64 + 0.4),
                    condition: Some("Rain".into()),
                    ..Conditions::default()
                },
                forecast: Vec::new(),
            })
        }
    }

    fn loc(s: &str) -> Location {
        Location::new(s).unwrap()
    }

    #[test]
    fn cities_follow_the_country_code() {
        let cities = cities_for(&loc("Hamburg, de"));
        let names: Vec<_> = cities.iter().map(Location::as_str).collect();

        assert_eq!(names, ["Berlin,DE", "Hamburg,DE", "Munich,DE"]);
    }

    #[test]
    fn unknown_country_falls_back_to_lithuania() {
        for location in ["Reykjavik,IS", "Atlantis"] {
            let cities = cities_for(&loc(location));
            assert_eq!(cities[0].as_str(), "Vilnius,LT", "{location}");
            assert_eq!(cities.len(), 3);
        }
    }

    #[tokio::test]
    async fn all_cities_succeed() {
        let provider = CityProvider { failing: None };
        let cities = cities_for(&loc("Vilnius,LT"));

        let comparison = compare(&provider, &cities).await;

        let Comparison::Ready(tiles) = comparison else {
            panic!("expected tiles, got {comparison:?}");
        };
        assert_eq!(tiles.len(), 3);
        assert_eq!(tiles[0].city, "Vilnius");
        assert_eq!(tiles[0].temperature, "7°");
        assert_eq!(tiles[2].city, "Klaipėda");
        assert_eq!(tiles[2].icon, "🌧");
    }

    #[tokio::test]
    async fn one_failure_fails_the_whole_panel() {
        let provider = CityProvider {
            failing: Some("Kaunas,LT"),
        };
        let cities = cities_for(&loc("Vilnius,LT"));

        assert_eq!(
            compare(&provider, &cities).await,
            Comparison::Failed(COMPARISON_FAILED_MESSAGE.to_string())
        );
        assert!(fetch_tiles(&provider, &cities).await.is_err());
    }
}
