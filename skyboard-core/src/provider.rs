use crate::{
    Config, Location, Timeline, error::FetchError, provider::visualcrossing::VisualCrossingProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod visualcrossing;

/// Source of normalized weather timelines.
///
/// Implementations issue one request per call: no caching, no retries. A
/// failed fetch is retried only when the caller asks again.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch_weather(&self, location: &Location) -> Result<Timeline, FetchError>;
}

/// Construct the weather provider from config.
///
/// Fails with [`FetchError::MissingApiKey`] before any request is sent when
/// no key is configured.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, FetchError> {
    let api_key = config.require_api_key()?;

    let provider = VisualCrossingProvider::new(api_key.to_owned(), config.units)
        .with_base_url(config.provider_url.clone());

    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();

        assert!(matches!(err, FetchError::MissingApiKey(_)));
        assert!(err.to_string().contains("API key undefined"));
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(provider_from_config(&cfg).is_ok());
    }
}
