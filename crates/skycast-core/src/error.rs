//! Centralized error types for the SkyCast application.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling throughout the codebase
//! - Provides user-friendly messages suitable for UI display
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// All errors in the SkyCast application should be convertible to this type.
/// Use `user_message()` to get a UI-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error("Data load error: {0}")]
    Data(#[from] DataError),

    /// Input rejected before any request was made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(e) => e.user_message().to_string(),
            AppError::Config(e) => e.user_message().to_string(),
            AppError::Weather(e) => e.user_message(),
            AppError::Location(e) => e.user_message().to_string(),
            AppError::Data(e) => e.user_message().to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) | NetworkError::Timeout => {
                "Network connection error."
            }
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Weather service errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// At least one endpoint answered with a non-200 status.
    #[error("City '{city}' not found (weather: {weather_status}, forecast: {forecast_status})")]
    CityNotFound {
        city: String,
        weather_status: u16,
        forecast_status: u16,
    },

    #[error("Service unavailable")]
    ServiceUnavailable,
}

impl WeatherError {
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::CityNotFound {
                city,
                weather_status,
                forecast_status,
            } => format!(
                "'{}' not found (weather: {}, forecast: {}).",
                city, weather_status, forecast_status
            ),
            WeatherError::ServiceUnavailable => {
                "Weather service unavailable. Please try again later.".to_string()
            }
        }
    }
}

/// Location resolution errors.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("No city in geolocation response")]
    NotFound,

    #[error("Geolocation service failed: {0}")]
    ServiceFailed(String),
}

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::NotFound => "Automatic location not found.",
            LocationError::ServiceFailed(_) => "Location service error.",
        }
    }
}

/// Static data loading errors (city list, icons). Never fatal.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("City list unavailable: {0}")]
    CityList(String),

    #[error("Icon unavailable: {0}")]
    Icon(String),
}

impl DataError {
    pub fn user_message(&self) -> &'static str {
        match self {
            DataError::CityList(_) => "City suggestions are unavailable.",
            DataError::Icon(_) => "Some weather icons are missing.",
        }
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
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = vec![
            AppError::Network(NetworkError::Timeout),
            AppError::Config(ConfigError::Invalid("test".into())),
            AppError::Weather(WeatherError::ServiceUnavailable),
            AppError::Location(LocationError::NotFound),
            AppError::Data(DataError::CityList("missing".into())),
            AppError::InvalidInput("Please enter a city name.".into()),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "empty message for {:?}", err);
        }
    }

    #[test]
    fn test_city_not_found_message_names_both_statuses() {
        let err = AppError::Weather(WeatherError::CityNotFound {
            city: "Atlantis".into(),
            weather_status: 404,
            forecast_status: 200,
        });
        assert_eq!(
            err.user_message(),
            "'Atlantis' not found (weather: 404, forecast: 200)."
        );
    }

    #[test]
    fn test_timeout_and_connection_share_message() {
        assert_eq!(
            NetworkError::Timeout.user_message(),
            NetworkError::ConnectionFailed("refused".into()).user_message()
        );
    }

    #[test]
    fn test_location_messages() {
        assert_eq!(
            AppError::Location(LocationError::NotFound).user_message(),
            "Automatic location not found."
        );
        assert_eq!(
            AppError::Location(LocationError::ServiceFailed("dns".into())).user_message(),
            "Location service error."
        );
    }

    #[test]
    fn test_app_error_conversion() {
        let err: AppError = LocationError::NotFound.into();
        assert!(matches!(err, AppError::Location(LocationError::NotFound)));
        let data: AppError = DataError::Icon("rain.png".into()).into();
        assert_eq!(data.user_message(), "Some weather icons are missing.");
    }
}
