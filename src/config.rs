//! Configuration management for `RecFinder`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::RecFinderError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for `RecFinder`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecFinderConfig {
    /// Recreation API configuration
    #[serde(default)]
    pub api: ApiConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default query settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Position lookup settings
    #[serde(default)]
    pub geolocation: GeolocationConfig,
}

/// Recreation API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the `/api/...` paths are appended to
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_api_timeout")]
    pub timeout_seconds: u32,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
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

/// Default query settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// How many activities the option list asks for
    #[serde(default = "default_activities_limit")]
    pub activities_limit: u32,
    /// Maximum programs returned by a search
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
    /// Radius for "near me" lookups
    #[serde(default = "default_nearby_radius")]
    pub nearby_radius_km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    #[serde(default = "default_geolocation_timeout")]
    pub timeout_seconds: u32,
}

// Default value functions
fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_api_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("RecFinder/{}", env!("CARGO_PKG_VERSION"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_activities_limit() -> u32 {
    100
}

fn default_search_limit() -> u32 {
    200
}

fn default_nearby_radius() -> f64 {
    5.0
}

fn default_geolocation_timeout() -> u32 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_seconds: default_api_timeout(),
            user_agent: default_user_agent(),
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
            activities_limit: default_activities_limit(),
            search_limit: default_search_limit(),
            nearby_radius_km: default_nearby_radius(),
        }
    }
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_geolocation_timeout(),
        }
    }
}

impl ApiConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl GeolocationConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl RecFinderConfig {
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

        // RECFINDER_API__BASE_URL, RECFINDER_LOGGING__LEVEL, ...
        builder = builder.add_source(
            Environment::with_prefix("RECFINDER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: RecFinderConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("recfinder").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.api.base_url.is_empty() {
            self.api.base_url = default_api_base_url();
        }
        if self.api.timeout_seconds == 0 {
            self.api.timeout_seconds = default_api_timeout();
        }
        if self.api.user_agent.is_empty() {
            self.api.user_agent = default_user_agent();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.defaults.activities_limit == 0 {
            self.defaults.activities_limit = default_activities_limit();
        }
        if self.defaults.search_limit == 0 {
            self.defaults.search_limit = default_search_limit();
        }
        if self.defaults.nearby_radius_km <= 0.0 {
            self.defaults.nearby_radius_km = default_nearby_radius();
        }
        if self.geolocation.timeout_seconds == 0 {
            self.geolocation.timeout_seconds = default_geolocation_timeout();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.api.timeout_seconds > 300 {
            return Err(RecFinderError::config("API timeout cannot exceed 300 seconds").into());
        }

        if self.defaults.activities_limit > 200 {
            return Err(RecFinderError::config("Activities limit cannot exceed 200").into());
        }

        if self.defaults.search_limit > 500 {
            return Err(RecFinderError::config("Search limit cannot exceed 500").into());
        }

        if !(0.1..=50.0).contains(&self.defaults.nearby_radius_km) {
            return Err(RecFinderError::config(
                "Nearby radius must be between 0.1 and 50 km",
            )
            .into());
        }

        if self.geolocation.timeout_seconds > 120 {
            return Err(
                RecFinderError::config("Geolocation timeout cannot exceed 120 seconds").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(RecFinderError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(RecFinderError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://")
        {
            return Err(
                RecFinderError::config("API base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = RecFinderConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.defaults.activities_limit, 100);
        assert_eq!(config.geolocation.timeout_seconds, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = RecFinderConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = RecFinderConfig::default();
        config.api.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_base_url_scheme() {
        let mut config = RecFinderConfig::default();
        config.api.base_url = "ftp://example.org".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_zeroes() {
        let mut config = RecFinderConfig::default();
        config.api.base_url.clear();
        config.defaults.search_limit = 0;
        config.defaults.nearby_radius_km = 0.0;
        config.apply_defaults();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.defaults.search_limit, 200);
        assert_eq!(config.defaults.nearby_radius_km, 5.0);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(
            file,
            "[api]\nbase_url = \"https://rec.example.org\"\ntimeout_seconds = 12\n\n[logging]\nformat = \"json\""
        )
        .expect("write config");

        let config = RecFinderConfig::load_from_path(Some(file.path().to_path_buf()))
            .expect("config should load");
        assert_eq!(config.api.base_url, "https://rec.example.org");
        assert_eq!(config.api.timeout_seconds, 12);
        assert_eq!(config.logging.format, "json");
        // untouched sections keep their defaults
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.defaults.search_limit, 200);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = RecFinderConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("recfinder"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
