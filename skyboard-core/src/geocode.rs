//! City suggestions for the search box.
//!
//! [`GeocodeClient`] talks to the direct-geocoding endpoint. [`Suggester`]
//! sits in front of any [`SuggestionSource`] and debounces keystrokes.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::{
    fmt::Debug,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    Config,
    config::DEFAULT_GEOCODER_URL,
    error::{FetchError, truncate_body},
    model::Location,
};

/// Inputs shorter than this never reach the network.
pub const MIN_QUERY_CHARS: usize = 3;
pub const SUGGESTION_LIMIT: usize = 5;
pub const DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

impl CitySuggestion {
    /// `"Name,CC"`, the form the weather provider expects.
    pub fn to_location(&self) -> Result<Location, FetchError> {
        Location::new(format!("{},{}", self.name, self.country))
    }
}

#[async_trait]
pub trait SuggestionSource: Send + Sync + Debug {
    async fn suggest(&self, input: &str) -> Result<Vec<CitySuggestion>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct GeocodeClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl GeocodeClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_GEOCODER_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let api_key = config.require_geocoding_api_key()?;
        Ok(Self::new(api_key.to_owned()).with_base_url(config.geocoder_url.clone()))
    }
}

#[async_trait]
impl SuggestionSource for GeocodeClient {
    async fn suggest(&self, input: &str) -> Result<Vec<CitySuggestion>, FetchError> {
        let query = input.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Vec::new());
        }

        let url = format!("{}/direct", self.base_url.trim_end_matches('/'));
        debug!(query, "requesting city suggestions");

        let limit = SUGGESTION_LIMIT.to_string();
        let res = self
            .http
            .get(url)
            .query(&[
                ("q", query),
                ("limit", limit.as_str()),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let mut suggestions: Vec<CitySuggestion> = serde_json::from_str(&body)?;
        suggestions.truncate(SUGGESTION_LIMIT);
        Ok(suggestions)
    }
}

/// Debounced suggestion lookups.
///
/// Each keystroke bumps a generation counter. A lookup starts only after
/// [`DEBOUNCE`] without newer input, and its result is published only if
/// no newer keystroke arrived in the meantime, so a slow response for an
/// old query never replaces a newer one. In-flight requests are not
/// aborted; their results are dropped.
#[derive(Debug)]
pub struct Suggester {
    source: Arc<dyn SuggestionSource>,
    delay: Duration,
    generation: Arc<AtomicU64>,
    results: Arc<watch::Sender<Vec<CitySuggestion>>>,
}

impl Suggester {
    pub fn new(source: Arc<dyn SuggestionSource>) -> (Self, watch::Receiver<Vec<CitySuggestion>>) {
        let (tx, rx) = watch::channel(Vec::new());
        let suggester = Self {
            source,
            delay: DEBOUNCE,
            generation: Arc::new(AtomicU64::new(0)),
            results: Arc::new(tx),
        };
        (suggester, rx)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Register a keystroke. Must be called from within a Tokio runtime.
    pub fn input(&self, text: impl Into<String>) {
        let text = text.into();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let source = Arc::clone(&self.source);
        let latest = Arc::clone(&self.generation);
        let results = Arc::clone(&self.results);
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if latest.load(Ordering::SeqCst) != generation {
                return;
            }

            let suggestions = if text.trim().chars().count() < MIN_QUERY_CHARS {
                Vec::new()
            } else {
                match source.suggest(&text).await {
                    Ok(s) => s,
                    Err(err) => {
                        warn!(query = %text, error = %err, "suggestion lookup failed");
                        return;
                    }
                }
            };

            if latest.load(Ordering::SeqCst) == generation {
                results.send_replace(suggestions);
            } else {
                debug!(query = %text, "dropping stale suggestions");
            }
        });
    }

    /// Drop pending lookups and empty the list, e.g. after a search was
    /// submitted or a suggestion picked.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.results.send_replace(Vec::new());
    }
}
