//! Configuration management for the `Tempo` application
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings. The weather
//! endpoint credentials are also recognized through the plain `API_KEY`
//! and `API_URL` environment variables.

use crate::TempoError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `Tempo` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TempoConfig {
    /// Weather endpoint configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Region directory (municipality listing) configuration
    #[serde(default)]
    pub regions: RegionsConfig,
    /// Device position stand-in for hosts without a geolocation capability
    #[serde(default)]
    pub geolocation: GeolocationConfig,
    /// Last-location store configuration
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Weather API key
    #[serde(default)]
    pub api_key: String,
    /// Base URL for the weather endpoint
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Region directory endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionsConfig {
    /// Base URL for the municipality directory (no key required)
    #[serde(default = "default_regions_base_url")]
    pub base_url: String,
    /// Upstream providers forwarded to the directory
    #[serde(default = "default_regions_providers")]
    pub providers: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
}

/// Fixed device position; permission is granted only when both are set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeolocationConfig {
    /// Latitude in decimal degrees
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Last-location store settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store directory; empty means the platform cache directory
    #[serde(default)]
    pub location: String,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_weather_base_url() -> String {
    "https://api.hgbrasil.com".to_string()
}

fn default_regions_base_url() -> String {
    "https://brasilapi.com.br".to_string()
}

fn default_regions_providers() -> String {
    "dados-abertos-br,gov,wikipedia".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_weather_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for RegionsConfig {
    fn default() -> Self {
        Self {
            base_url: default_regions_base_url(),
            providers: default_regions_providers(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl TempoConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with TEMPO_ prefix
        builder = builder.add_source(
            Environment::with_prefix("TEMPO")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: TempoConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_env_credentials();
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("tempo").join("config.toml"))
    }

    /// Recognize the bare `API_KEY` / `API_URL` environment variables
    /// for the weather endpoint.
    pub fn apply_env_credentials(&mut self) {
        if let Ok(key) = std::env::var("API_KEY") {
            if !key.is_empty() {
                self.weather.api_key = key;
            }
        }
        if let Ok(url) = std::env::var("API_URL") {
            if !url.is_empty() {
                self.weather.base_url = url;
            }
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_timeout();
        }
        if self.regions.base_url.is_empty() {
            self.regions.base_url = default_regions_base_url();
        }
        if self.regions.providers.is_empty() {
            self.regions.providers = default_regions_providers();
        }
        if self.regions.timeout_seconds == 0 {
            self.regions.timeout_seconds = default_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        for base_url in [&self.weather.base_url, &self.regions.base_url] {
            if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
                return Err(TempoError::config(format!(
                    "Base URL '{base_url}' must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.weather.timeout_seconds > 300 || self.regions.timeout_seconds > 300 {
            return Err(TempoError::config("Request timeout cannot exceed 300 seconds").into());
        }

        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(TempoError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        match (self.geolocation.latitude, self.geolocation.longitude) {
            (Some(lat), _) if !(-90.0..=90.0).contains(&lat) => {
                Err(TempoError::config("Latitude must be between -90 and 90").into())
            }
            (_, Some(lon)) if !(-180.0..=180.0).contains(&lon) => {
                Err(TempoError::config("Longitude must be between -180 and 180").into())
            }
            _ => Ok(()),
        }
    }

    /// Resolve the directory backing the last-location store
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        if self.store.location.is_empty() {
            return dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tempo");
        }
        if let Some(rest) = self.store.location.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(&self.store.location)
    }
}
