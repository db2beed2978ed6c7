//! Centralized error types for usweather.
//!
//! Failures keep their full context for logging. The page only ever shows
//! `FETCH_FAILED_MESSAGE`, whichever step broke.

use thiserror::Error;

/// The one message shown for any failed forecast lookup.
pub const FETCH_FAILED_MESSAGE: &str = "Unable to fetch weather. Please check the location.";

/// Network-related errors (HTTP, connectivity, response decoding).
#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

/// A failed forecast lookup, tagged with the step that failed.
#[derive(Debug, Clone, Error)]
pub enum WeatherError {
    #[error("Geocoding request failed: {0}")]
    Geocode(NetworkError),

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Forecast grid lookup failed: {0}")]
    PointLookup(NetworkError),

    #[error("Hourly forecast request failed: {0}")]
    HourlyForecast(NetworkError),
}

impl WeatherError {
    /// Short name of the failing step, for logs.
    pub fn step(&self) -> &'static str {
        match self {
            WeatherError::Geocode(_) | WeatherError::LocationNotFound(_) => "geocode",
            WeatherError::PointLookup(_) => "points",
            WeatherError::HourlyForecast(_) => "hourly_forecast",
        }
    }

    /// Always the same message; the variant is for diagnostics only.
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILED_MESSAGE
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}
