//! Weather services for SkyCast
//!
//! Provides current conditions and the 5-day forecast from OpenWeatherMap,
//! day bucketing of the 3-hourly forecast, IP based location detection and
//! the city-name directory used for autocomplete.

pub mod cities;
pub mod forecast;
pub mod location;
pub mod provider;
pub mod types;

pub use cities::CityDirectory;
pub use forecast::{daily_summaries, group_by_local_day, DailyBucket, MAX_FORECAST_DAYS};
pub use location::LocationResolver;
pub use provider::WeatherProvider;
pub use types::*;
