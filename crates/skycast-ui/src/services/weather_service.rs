//! Weather backend: async weather fetching.
//! All network work runs off the UI thread; results sent via mpsc.

use skycast_core::error::ReqwestErrorExt;
use skycast_core::NetworkError;
use skycast_weather::WeatherError as ProviderError;

use super::ServiceMessage;
use crate::app_services::{AppServices, RequestTicket};

/// Error type for weather operations
#[derive(Debug)]
pub enum WeatherError {
    NotFound {
        city: String,
        weather_status: u16,
        forecast_status: u16,
    },
    Network(NetworkError),
    InvalidResponse(String),
    NotInitialized,
}

impl std::fmt::Display for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherError::NotFound {
                city,
                weather_status,
                forecast_status,
            } => write!(
                f,
                "City '{}' not found (weather: {}, forecast: {})",
                city, weather_status, forecast_status
            ),
            WeatherError::Network(e) => write!(f, "Weather error: {}", e),
            WeatherError::InvalidResponse(s) => write!(f, "Weather error: {}", s),
            WeatherError::NotInitialized => write!(f, "Weather service not initialized"),
        }
    }
}

impl std::error::Error for WeatherError {}

impl From<ProviderError> for WeatherError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::NotFound {
                city,
                weather_status,
                forecast_status,
            } => WeatherError::NotFound {
                city,
                weather_status,
                forecast_status,
            },
            ProviderError::Network(e) => WeatherError::Network(e.into_network_error()),
            ProviderError::InvalidResponse(s) => WeatherError::InvalidResponse(s),
        }
    }
}

/// Request to fetch weather data for `city` asynchronously.
/// Sends `FetchDone` on the channel when complete; nothing if cancelled.
pub fn request_fetch(services: &AppServices, ticket: RequestTicket, city: String) {
    let tx = services.sender();
    let generation = ticket.generation;

    let provider = match services.weather_provider() {
        Some(p) => p,
        None => {
            let _ = tx.send(ServiceMessage::FetchDone {
                generation,
                result: Err(WeatherError::NotInitialized),
            });
            return;
        }
    };

    let mut shutdown = services.subscribe_shutdown();
    services.runtime().spawn(async move {
        tokio::select! {
            _ = ticket.token.cancelled() => {
                tracing::debug!("Weather fetch for '{}' cancelled", city);
            }
            _ = shutdown.recv() => {
                tracing::debug!("Weather fetch for '{}' stopped by shutdown", city);
            }
            result = provider.fetch(&city) => {
                let result = result.map_err(WeatherError::from);
                if let Err(e) = &result {
                    tracing::warn!("Weather fetch failed: {}", e);
                }
                let _ = tx.send(ServiceMessage::FetchDone { generation, result });
            }
        }
    });
}
