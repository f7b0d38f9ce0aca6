use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Environment variable that overrides `weather.api_key`.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Placeholder written into freshly created config files.
const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory (also holds the log file)
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Weather API settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// UI preferences
    #[serde(default)]
    pub ui: UiConfig,

    /// Static data locations
    #[serde(default)]
    pub data: DataConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key (overridden by `OPENWEATHER_API_KEY`)
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Base URL for the `weather` and `forecast` endpoints
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// IP geolocation endpoint, must answer JSON with a `city` field
    #[serde(default = "default_geolocation_url")]
    pub geolocation_url: String,

    /// Language for condition descriptions
    #[serde(default = "default_language")]
    pub language: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_key() -> String {
    API_KEY_PLACEHOLDER.to_string()
}

fn default_api_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_geolocation_url() -> String {
    "https://ipinfo.io/json".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_request_timeout_secs() -> u64 {
    7
}

impl WeatherConfig {
    /// Check if an API key is configured (not the placeholder)
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty() && self.api_key != API_KEY_PLACEHOLDER
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: default_api_key(),
            api_base_url: default_api_base_url(),
            geolocation_url: default_geolocation_url(),
            language: default_language(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Dark theme enabled
    #[serde(default = "default_dark_mode")]
    pub dark_mode: bool,

    /// How long an error stays highlighted, in seconds
    #[serde(default = "default_error_display_secs")]
    pub error_display_secs: u64,

    /// Number of steps in the background color transition
    #[serde(default = "default_animation_steps")]
    pub animation_steps: u32,

    /// Delay between two animation steps, in milliseconds
    #[serde(default = "default_animation_frame_ms")]
    pub animation_frame_ms: u64,
}

fn default_dark_mode() -> bool {
    true
}

fn default_error_display_secs() -> u64 {
    4
}

fn default_animation_steps() -> u32 {
    20
}

fn default_animation_frame_ms() -> u64 {
    20
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            dark_mode: default_dark_mode(),
            error_display_secs: default_error_display_secs(),
            animation_steps: default_animation_steps(),
            animation_frame_ms: default_animation_frame_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV file with a `city` column
    #[serde(default = "default_cities_csv")]
    pub cities_csv: PathBuf,

    /// Directory holding the weather PNG icons
    #[serde(default = "default_icons_dir")]
    pub icons_dir: PathBuf,
}

fn default_cities_csv() -> PathBuf {
    PathBuf::from("assets").join("worldcities.csv")
}

fn default_icons_dir() -> PathBuf {
    PathBuf::from("assets").join("icons")
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            cities_csv: default_cities_csv(),
            icons_dir: default_icons_dir(),
        }
    }
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skycast")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            weather: WeatherConfig::default(),
            ui: UiConfig::default(),
            data: DataConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file, creating a default one if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .context("Failed to read config file")?;

            toml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(e.to_string()))
                .with_context(|| format!("Failed to parse config file {}", config_path.display()))?
        } else {
            let mut config = Self::default();
            if let Some(parent) = config_path.parent() {
                if !parent.as_os_str().is_empty() {
                    config.config_dir = parent.to_path_buf();
                }
            }
            config.save_to(config_path)?;
            tracing::info!("Created default config at {}", config_path.display());
            config
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated(config_path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match config_path {
            Some(path) => Self::load_from(path)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        Ok((config, validation))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.weather.api_key = key;
            }
        }
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(
            &self.weather.api_base_url,
            "weather.api_base_url",
            &mut result,
        );
        self.validate_url(
            &self.weather.geolocation_url,
            "weather.geolocation_url",
            &mut result,
        );

        if !self.weather.has_api_key() {
            result.add_warning(
                "weather.api_key",
                format!("API key not configured - set it in the config file or {}", API_KEY_ENV),
            );
        }

        if self.weather.language.trim().is_empty() {
            result.add_error("weather.language", "Language must not be empty");
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        } else if self.weather.request_timeout_secs > 60 {
            result.add_warning(
                "weather.request_timeout_secs",
                "Request timeout is unusually long (>60s)",
            );
        }

        if self.ui.animation_steps == 0 {
            result.add_error("ui.animation_steps", "Animation needs at least one step");
        }

        if self.ui.error_display_secs == 0 {
            result.add_warning(
                "ui.error_display_secs",
                "Errors will not stay highlighted (0 seconds)",
            );
        }

        if !self.data.cities_csv.exists() {
            result.add_warning(
                "data.cities_csv",
                format!(
                    "File does not exist: {} - city suggestions disabled",
                    self.data.cities_csv.display()
                ),
            );
        }

        if !self.data.icons_dir.is_dir() {
            result.add_warning(
                "data.icons_dir",
                format!(
                    "Directory does not exist: {} - icons disabled",
                    self.data.icons_dir.display()
                ),
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if let Some(port) = url.port() {
                    if port == 0 {
                        result.add_error(field_name, "Port cannot be 0");
                    }
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to an explicit file
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skycast");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        // Missing key and assets are warnings, never errors
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.weather.api_base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.api_base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.weather.geolocation_url = "ftp://ipinfo.io/json".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_timeout_is_error() {
        let mut config = Config::default();
        config.weather.request_timeout_secs = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result
            .errors
            .iter()
            .any(|e| e.field == "weather.request_timeout_secs"));
    }

    #[test]
    fn test_zero_animation_steps_is_error() {
        let mut config = Config::default();
        config.ui.animation_steps = 0;
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn test_placeholder_api_key_is_warning() {
        let mut config = Config::default();
        config.weather.api_key = API_KEY_PLACEHOLDER.to_string();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.api_key"));
    }

    #[test]
    fn test_has_api_key() {
        let mut weather = WeatherConfig::default();
        assert!(!weather.has_api_key());
        weather.api_key = "  ".to_string();
        assert!(!weather.has_api_key());
        weather.api_key = "abc123".to_string();
        assert!(weather.has_api_key());
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.config_dir, dir.path().join("nested"));
        assert_eq!(config.weather.request_timeout_secs, 7);
        assert_eq!(config.ui.animation_steps, 20);
    }

    #[test]
    fn test_load_from_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
config_dir = "/tmp/skycast"

[weather]
api_key = "secret"
language = "tr"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.weather.language, "tr");
        assert_eq!(config.weather.api_base_url, default_api_base_url());
        assert!(config.ui.dark_mode);
        assert_eq!(config.ui.error_display_secs, 4);
    }

    #[test]
    fn test_load_from_malformed_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("parse"));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
