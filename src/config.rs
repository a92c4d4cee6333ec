//! Configuration management for the `AirWatch` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AirWatchError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for the `AirWatch` application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AirWatchConfig {
    /// Geocoding API configuration
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Air quality API configuration
    #[serde(default)]
    pub air_quality: AirQualityConfig,
    /// Shared HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Web server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Form defaults
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Geocoding API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Search endpoint
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// User-Agent sent with every request; Nominatim rejects anonymous clients
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Air quality API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirQualityConfig {
    /// Current-conditions endpoint
    #[serde(default = "default_air_quality_base_url")]
    pub base_url: String,
}

/// HTTP client settings shared by both upstreams
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HttpConfig {
    /// Request timeout in seconds; no timeout when unset
    #[serde(default)]
    pub timeout_seconds: Option<u32>,
    /// Retries for transient failures; 0 disables retrying
    #[serde(default)]
    pub max_retries: u32,
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Default form values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Country used when the form leaves it blank
    #[serde(default = "default_country")]
    pub country: String,
}

// Default value functions
fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_user_agent() -> String {
    format!("airwatch/{}", env!("CARGO_PKG_VERSION"))
}

fn default_air_quality_base_url() -> String {
    "https://air-quality-api.open-meteo.com/v1/air-quality".to_string()
}

fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_country() -> String {
    "United States".to_string()
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for AirQualityConfig {
    fn default() -> Self {
        Self {
            base_url: default_air_quality_base_url(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            country: default_country(),
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds
            .map(|seconds| Duration::from_secs(seconds.into()))
    }
}

impl AirWatchConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. AIRWATCH_SERVER__PORT=8080
        builder = builder.add_source(
            Environment::with_prefix("AIRWATCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AirWatchConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("airwatch").join("config.toml"))
    }

    /// Apply default values to blank configuration fields
    pub fn apply_defaults(&mut self) {
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.user_agent.is_empty() {
            self.geocoding.user_agent = default_user_agent();
        }
        if self.air_quality.base_url.is_empty() {
            self.air_quality.base_url = default_air_quality_base_url();
        }
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.defaults.country.trim().is_empty() {
            self.defaults.country = default_country();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_urls()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_urls(&self) -> Result<()> {
        for (name, url) in [
            ("Geocoding", &self.geocoding.base_url),
            ("Air quality", &self.air_quality.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AirWatchError::config(format!(
                    "{name} API base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if let Some(timeout) = self.http.timeout_seconds {
            if timeout == 0 || timeout > 300 {
                return Err(AirWatchError::config(
                    "HTTP timeout must be between 1 and 300 seconds",
                )
                .into());
            }
        }

        if self.http.max_retries > 10 {
            return Err(AirWatchError::config("HTTP max retries cannot exceed 10").into());
        }

        if self.server.port == 0 {
            return Err(AirWatchError::config("Server port cannot be 0").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AirWatchError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AirWatchError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}
