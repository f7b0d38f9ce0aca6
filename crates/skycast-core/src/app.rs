use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::{Config, ValidationResult};

/// Main application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
    validation: ValidationResult,
}

impl App {
    /// Create a new application instance from the default or an explicit config file
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let (config, validation) = Config::load_validated(config_path)?;

        Ok(Self {
            config: Arc::new(config),
            validation,
        })
    }

    /// Wrap an already loaded config (tests, embedding)
    pub fn with_config(config: Config) -> Self {
        let validation = config.validate();
        Self {
            config: Arc::new(config),
            validation,
        }
    }

    /// Report configuration warnings once logging is up
    pub fn initialize(&mut self) -> Result<()> {
        for warning in &self.validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        if !self.validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                self.validation.error_summary()
            );
        }

        tracing::info!(
            "Application initialized (language: {}, timeout: {}s)",
            self.config.weather.language,
            self.config.weather.request_timeout_secs
        );
        Ok(())
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the config for long-lived services
    pub fn shared_config(&self) -> Arc<Config> {
        self.config.clone()
    }
}
