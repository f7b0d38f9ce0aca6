//! Approximate location of the caller via IP geolocation.
//! Defaults to ipinfo.io, which needs no API key for city-level lookups.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use crate::types::LocationError;

pub const IPINFO_URL: &str = "https://ipinfo.io/json";
const USER_AGENT: &str = concat!("SkyCast/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct GeoIpResponse {
    city: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LocationResolver {
    client: Client,
    url: String,
}

impl LocationResolver {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LocationError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LocationError::ServiceUnavailable(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Resolve the caller's city name.
    #[instrument(skip(self), level = "info")]
    pub async fn resolve_city(&self) -> Result<String, LocationError> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            tracing::debug!("Geolocation request failed: {}", e);
            LocationError::ServiceUnavailable(e.to_string())
        })?;

        if !response.status().is_success() {
            tracing::debug!("Geolocation returned status {}", response.status());
            return Err(LocationError::ServiceUnavailable(format!(
                "status {}",
                response.status()
            )));
        }

        let body: GeoIpResponse = response.json().await.map_err(|e| {
            tracing::debug!("Geolocation parse error: {}", e);
            LocationError::ServiceUnavailable(e.to_string())
        })?;

        let city = body
            .city
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(LocationError::NotFound)?;

        tracing::info!("Geolocated to: {}", city);
        Ok(city)
    }
}
