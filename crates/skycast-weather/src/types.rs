use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Weather condition categories mapped from OpenWeatherMap icon codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    Snow,
    Mist,
    Thunderstorm,
    #[default]
    Unknown,
}

impl WeatherCondition {
    /// Classify an icon code such as `10d` or `01n`.
    /// See: https://openweathermap.org/weather-conditions
    pub fn from_icon_code(code: &str) -> Self {
        match code.get(..2) {
            Some("01") => Self::Clear,
            Some("02" | "03" | "04") => Self::Clouds,
            Some("09" | "10") => Self::Rain,
            Some("11") => Self::Thunderstorm,
            Some("13") => Self::Snow,
            Some("50") => Self::Mist,
            _ => Self::Unknown,
        }
    }
}

/// Whether an icon code describes daytime conditions (`d` suffix).
pub fn is_day_icon(code: &str) -> bool {
    code.contains('d')
}

/// Normalize a night icon code (`10n`) to its day variant (`10d`).
pub fn day_variant(code: &str) -> String {
    code.replace('n', "d")
}

/// Bundled pictogram for an icon code. Each kind maps to `<file_stem>.png`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconKind {
    DayClear,
    NightClear,
    PartlyCloudyDay,
    PartlyCloudyNight,
    Cloudy,
    Rain,
    Snow,
    Mist,
    Thunderstorm,
    Unknown,
}

impl IconKind {
    pub const ALL: [IconKind; 10] = [
        IconKind::DayClear,
        IconKind::NightClear,
        IconKind::PartlyCloudyDay,
        IconKind::PartlyCloudyNight,
        IconKind::Cloudy,
        IconKind::Rain,
        IconKind::Snow,
        IconKind::Mist,
        IconKind::Thunderstorm,
        IconKind::Unknown,
    ];

    /// Pick the pictogram for an API icon code; the first matching rule wins.
    pub fn from_icon_code(code: &str) -> Self {
        if code.contains("11") {
            Self::Thunderstorm
        } else if code.contains("01d") {
            Self::DayClear
        } else if code.contains("01n") {
            Self::NightClear
        } else if code.contains("02d") {
            Self::PartlyCloudyDay
        } else if code.contains("02n") {
            Self::PartlyCloudyNight
        } else if code.contains("03") || code.contains("04") {
            Self::Cloudy
        } else if code.contains("09") || code.contains("10") {
            Self::Rain
        } else if code.contains("13") {
            Self::Snow
        } else if code.contains("50") {
            Self::Mist
        } else {
            Self::Unknown
        }
    }

    /// File name (without extension) of the bundled PNG
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::DayClear => "day_clear",
            Self::NightClear => "night_clear",
            Self::PartlyCloudyDay => "partly_cloudy_day",
            Self::PartlyCloudyNight => "partly_cloudy_night",
            Self::Cloudy => "cloudy",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Mist => "mist",
            Self::Thunderstorm => "thunderstorm",
            Self::Unknown => "unknown",
        }
    }

    /// Text fallback drawn when the PNG is missing
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::DayClear => "☀",
            Self::NightClear => "☾",
            Self::PartlyCloudyDay | Self::PartlyCloudyNight => "⛅",
            Self::Cloudy => "☁",
            Self::Rain => "☂",
            Self::Snow => "❄",
            Self::Mist => "≡",
            Self::Thunderstorm => "⚡",
            Self::Unknown => "?",
        }
    }
}

/// One 3-hourly forecast entry, as received from the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Seconds since the epoch, UTC
    pub timestamp: i64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub temp: f64,
    pub icon: String,
}

/// Current weather conditions for the queried city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub city: String,
    /// ISO 3166 alpha-2 code, empty when the API omits it
    pub country: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    /// Meters per second (metric units)
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
    /// City's current offset from UTC, in seconds
    pub utc_offset_secs: i32,
}

impl CurrentConditions {
    pub fn condition(&self) -> WeatherCondition {
        WeatherCondition::from_icon_code(&self.icon)
    }

    pub fn is_day(&self) -> bool {
        is_day_icon(&self.icon)
    }
}

/// Complete result of one city query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastEntry>,
    pub fetched_at: DateTime<Utc>,
}

/// One forecast day (city local calendar date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub min: f64,
    pub max: f64,
    /// Most frequent icon code of the day, day variant
    pub icon: String,
}

impl DaySummary {
    pub fn icon_kind(&self) -> IconKind {
        IconKind::from_icon_code(&self.icon)
    }
}

// Wire format of api.openweathermap.org/data/2.5

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCurrentResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sys: ApiSys,
    pub main: ApiMain,
    #[serde(default)]
    pub weather: Vec<ApiCondition>,
    #[serde(default)]
    pub wind: ApiWind,
    #[serde(default)]
    pub timezone: i32,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiSys {
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMain {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub temp_min: Option<f64>,
    #[serde(default)]
    pub temp_max: Option<f64>,
    #[serde(default)]
    pub humidity: u8,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCondition {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiWind {
    #[serde(default)]
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiForecastResponse {
    #[serde(default)]
    pub list: Vec<ApiForecastItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiForecastItem {
    pub dt: i64,
    pub main: ApiMain,
    #[serde(default)]
    pub weather: Vec<ApiCondition>,
}

/// Icon shown when the API sends no condition block.
const FALLBACK_ICON: &str = "01d";

impl From<ApiCurrentResponse> for CurrentConditions {
    fn from(api: ApiCurrentResponse) -> Self {
        let (description, icon) = api
            .weather
            .into_iter()
            .next()
            .map(|w| (w.description, w.icon))
            .unwrap_or_else(|| (String::new(), FALLBACK_ICON.to_string()));

        Self {
            city: api.name,
            country: api.sys.country.unwrap_or_default(),
            temperature: api.main.temp,
            feels_like: api.main.feels_like.unwrap_or(api.main.temp),
            humidity: api.main.humidity,
            wind_speed: api.wind.speed,
            description,
            icon,
            utc_offset_secs: api.timezone,
        }
    }
}

impl From<ApiForecastItem> for ForecastEntry {
    fn from(api: ApiForecastItem) -> Self {
        let icon = api
            .weather
            .into_iter()
            .next()
            .map(|w| w.icon)
            .unwrap_or_default();

        Self {
            timestamp: api.dt,
            temp_min: api.main.temp_min.unwrap_or(api.main.temp),
            temp_max: api.main.temp_max.unwrap_or(api.main.temp),
            temp: api.main.temp,
            icon,
        }
    }
}

/// Location service errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Geolocation response did not contain a city")]
    NotFound,
    #[error("Location service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("City '{city}' not found (weather: {weather_status}, forecast: {forecast_status})")]
    NotFound {
        city: String,
        weather_status: u16,
        forecast_status: u16,
    },
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// City dataset errors
#[derive(Debug, thiserror::Error)]
pub enum CityDataError {
    #[error("Failed to read city dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("City dataset has no '{0}' column")]
    MissingColumn(&'static str),
}
