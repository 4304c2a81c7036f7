//! Error taxonomy shared by the lookup pipeline.
//!
//! Validation, fetch and geolocation errors are surfaced to the user; forecast
//! errors never leave the weather client and only degrade a report.

use thiserror::Error;

/// Why a piece of user input is not an acceptable city name.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a city name")]
    Empty,

    #[error("Please enter a valid city name (letters, spaces, hyphens, and apostrophes only)")]
    InvalidCharacters,

    #[error("City name must be at least 2 characters long")]
    TooShort,

    #[error("City name must be less than 50 characters")]
    TooLong,

    #[error("Please enter a valid city name, not a country, state, or postal code")]
    Disallowed,
}

/// Failure of a current-conditions lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("City not found: {city}")]
    NotFound { city: String },

    #[error("Location not found")]
    LocationUnavailable,

    #[error("Failed to reach the weather service: {0}")]
    Transport(String),

    #[error("Malformed weather response: {0}")]
    MalformedResponse(String),
}

/// Failure of the forecast half of a lookup. Recovered inside the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    #[error("Failed to send forecast request: {0}")]
    Request(String),

    #[error("Forecast request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed forecast response: {0}")]
    Malformed(String),
}

/// Why the device position could not be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Location access denied by user")]
    PermissionDenied,

    #[error("Location information unavailable")]
    PositionUnavailable,

    #[error("Location request timed out")]
    Timeout,

    #[error("Geolocation is not supported by this device")]
    Unsupported,
}

/// Everything that can end a search action in the error state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Weather lookup for {subject} failed: {source}")]
    Fetch {
        subject: String,
        #[source]
        source: FetchError,
    },

    #[error(transparent)]
    Geolocation(#[from] GeolocationError),
}

impl SearchError {
    pub fn fetch(subject: impl Into<String>, source: FetchError) -> Self {
        Self::Fetch { subject: subject.into(), source }
    }

    /// Single message for the error view, naming the query subject on fetch failures.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::Fetch { subject, .. } => format!("Failed to fetch weather data for {subject}"),
            Self::Geolocation(err) => err.to_string(),
        }
    }
}
