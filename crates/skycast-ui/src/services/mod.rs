//! Background request runners. Each spawns one task on the shared runtime and
//! posts exactly one [`ServiceMessage`] when it completes.

pub mod location_service;
pub mod weather_service;

use skycast_weather::WeatherReport;

pub use location_service::{request_locate, LocationError};
pub use weather_service::{request_fetch, WeatherError};

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum ServiceMessage {
    /// Result of IP geolocation
    LocateDone {
        generation: u64,
        result: Result<String, LocationError>,
    },
    /// Result of fetching weather data for one city
    FetchDone {
        generation: u64,
        result: Result<WeatherReport, WeatherError>,
    },
}

impl ServiceMessage {
    /// Generation of the request that produced this message
    pub fn generation(&self) -> u64 {
        match self {
            ServiceMessage::LocateDone { generation, .. }
            | ServiceMessage::FetchDone { generation, .. } => *generation,
        }
    }
}
