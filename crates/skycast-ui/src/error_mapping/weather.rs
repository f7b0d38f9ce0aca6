use crate::services::weather_service::WeatherError as UiWeatherError;
use skycast_core::{AppError, NetworkError, WeatherError};

impl From<UiWeatherError> for AppError {
    fn from(e: UiWeatherError) -> Self {
        match e {
            UiWeatherError::NotFound {
                city,
                weather_status,
                forecast_status,
            } => AppError::Weather(WeatherError::CityNotFound {
                city,
                weather_status,
                forecast_status,
            }),
            UiWeatherError::Network(e) => AppError::Network(e),
            UiWeatherError::InvalidResponse(s) => {
                AppError::Network(NetworkError::InvalidResponse(s))
            }
            UiWeatherError::NotInitialized => AppError::Weather(WeatherError::ServiceUnavailable),
        }
    }
}
