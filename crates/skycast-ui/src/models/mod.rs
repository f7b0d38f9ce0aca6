//! View state owned by the UI thread.

pub mod app_model;
pub mod search_model;
pub mod weather_model;

pub use app_model::{AppModel, UiAction};
pub use search_model::SearchModel;
pub use weather_model::{ForecastCard, WeatherModel};
