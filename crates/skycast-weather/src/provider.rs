//! OpenWeatherMap client: current conditions + 5 day / 3 hour forecast.

use chrono::Utc;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::types::{
    ApiCurrentResponse, ApiForecastResponse, CurrentConditions, ForecastEntry, WeatherError,
    WeatherReport,
};

pub const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT_SECS: u64 = 7;

/// Units are fixed: temperatures in °C, wind in m/s.
const UNITS: &str = "metric";

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
    language: String,
}

impl WeatherProvider {
    pub fn new(
        api_key: impl Into<String>,
        language: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: OPENWEATHER_API_BASE.to_string(),
            api_key: api_key.into(),
            language: language.into(),
        })
    }

    /// Point the provider at another server (mirrors, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Fetch current conditions and the forecast for `city`.
    ///
    /// Both requests must answer 200; anything else is reported as
    /// [`WeatherError::NotFound`] with both status codes. Transport failures
    /// and timeouts surface as [`WeatherError::Network`]. Nothing is retried.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let weather_url = format!("{}/weather", self.base_url);
        let forecast_url = format!("{}/forecast", self.base_url);
        let params = [
            ("q", city),
            ("appid", self.api_key.as_str()),
            ("units", UNITS),
            ("lang", self.language.as_str()),
        ];

        let (weather_res, forecast_res) = tokio::join!(
            self.client.get(&weather_url).query(&params).send(),
            self.client.get(&forecast_url).query(&params).send(),
        );
        let weather_res = weather_res?;
        let forecast_res = forecast_res?;

        let weather_status = weather_res.status();
        let forecast_status = forecast_res.status();
        if weather_status != StatusCode::OK || forecast_status != StatusCode::OK {
            tracing::info!(
                "Weather lookup for '{}' rejected (weather: {}, forecast: {})",
                city,
                weather_status,
                forecast_status
            );
            return Err(WeatherError::NotFound {
                city: city.to_string(),
                weather_status: weather_status.as_u16(),
                forecast_status: forecast_status.as_u16(),
            });
        }

        let current: ApiCurrentResponse = weather_res.json().await.map_err(body_error)?;
        let forecast: ApiForecastResponse = forecast_res.json().await.map_err(body_error)?;

        let report = WeatherReport {
            current: CurrentConditions::from(current),
            forecast: forecast.list.into_iter().map(ForecastEntry::from).collect(),
            fetched_at: Utc::now(),
        };

        tracing::info!(
            "Fetched weather for {} ({} forecast entries)",
            report.current.city,
            report.forecast.len()
        );
        Ok(report)
    }
}

/// A body that fails to decode is the server's fault; anything else is transport.
fn body_error(e: reqwest::Error) -> WeatherError {
    if e.is_decode() {
        WeatherError::InvalidResponse(e.to_string())
    } else {
        WeatherError::Network(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn current_body() -> serde_json::Value {
        serde_json::json!({
            "name": "Ankara",
            "sys": {"country": "TR"},
            "main": {"temp": 18.4, "feels_like": 17.2, "humidity": 52},
            "weather": [{"description": "scattered clouds", "icon": "03d"}],
            "wind": {"speed": 4.6},
            "timezone": 10800
        })
    }

    fn forecast_body() -> serde_json::Value {
        serde_json::json!({
            "list": [
                {
                    "dt": 1_710_100_800,
                    "main": {"temp": 12.0, "temp_min": 11.0, "temp_max": 13.0, "humidity": 60},
                    "weather": [{"description": "light rain", "icon": "10n"}]
                },
                {
                    "dt": 1_710_111_600,
                    "main": {"temp": 14.0, "temp_min": 13.5, "temp_max": 15.0, "humidity": 55},
                    "weather": [{"description": "clear sky", "icon": "01d"}]
                }
            ]
        })
    }

    fn provider(server: &MockServer) -> WeatherProvider {
        WeatherProvider::new("test_key", "en", Duration::from_secs(5))
            .unwrap()
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "Ankara"))
            .and(query_param("appid", "test_key"))
            .and(query_param("units", "metric"))
            .and(query_param("lang", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("q", "Ankara"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&mock_server)
            .await;

        let report = provider(&mock_server).fetch("Ankara").await.unwrap();

        assert_eq!(report.current.city, "Ankara");
        assert_eq!(report.current.country, "TR");
        assert_eq!(report.current.humidity, 52);
        assert_eq!(report.current.utc_offset_secs, 10800);
        assert_eq!(report.forecast.len(), 2);
        assert_eq!(report.forecast[0].icon, "10n");
        assert_eq!(report.forecast[1].temp_max, 15.0);
    }

    #[tokio::test]
    async fn test_city_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "cod": "404", "message": "city not found"
            })))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server).fetch("Atlantis").await.unwrap_err();
        match err {
            WeatherError::NotFound {
                city,
                weather_status,
                forecast_status,
            } => {
                assert_eq!(city, "Atlantis");
                assert_eq!(weather_status, 404);
                assert_eq!(forecast_status, 404);
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_one_failing_endpoint_fails_the_call() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server).fetch("Ankara").await.unwrap_err();
        assert!(matches!(
            err,
            WeatherError::NotFound {
                weather_status: 200,
                forecast_status: 500,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_invalid_api_key_is_not_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server).fetch("Ankara").await.unwrap_err();
        assert!(matches!(err, WeatherError::NotFound { weather_status: 401, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server).fetch("Ankara").await.unwrap_err();
        assert!(matches!(err, WeatherError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_network_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(current_body())
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let provider = WeatherProvider::new("test_key", "en", Duration::from_millis(200))
            .unwrap()
            .with_base_url(mock_server.uri());
        let err = provider.fetch("Ankara").await.unwrap_err();
        assert!(matches!(err, WeatherError::Network(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let provider = WeatherProvider::new("test_key", "en", Duration::from_secs(1))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");
        let err = provider.fetch("Ankara").await.unwrap_err();
        assert!(matches!(err, WeatherError::Network(_)));
    }
}
