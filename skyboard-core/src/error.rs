//! Error types shared by the provider, geocoder and dashboard.

pub use reqwest::StatusCode;
use thiserror::Error;

/// Message shown to the user whenever a weather fetch fails.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch weather data. Please try again.";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("API key undefined: set {0} or run `skyboard configure`")]
    MissingApiKey(&'static str),

    #[error("Location must not be empty")]
    EmptyLocation,

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    /// User-facing message for the dashboard's error slot.
    ///
    /// Configuration problems are reported verbatim so the user can fix
    /// them; everything else collapses into the generic fetch message.
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingApiKey(_) | Self::EmptyLocation | Self::InvalidUrl(_) => self.to_string(),
            Self::Network(_) | Self::Status { .. } | Self::Parse(_) => {
                FETCH_FAILED_MESSAGE.to_string()
            }
        }
    }

    /// Whether the error was detected before any request was sent.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingApiKey(_) | Self::InvalidUrl(_))
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
