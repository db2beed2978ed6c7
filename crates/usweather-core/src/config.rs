use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Plain environment variable accepted for the geocoding key, matching how
/// the key is usually supplied at deploy time.
pub const GEOCODING_API_KEY_ENV: &str = "GEOCODING_API_KEY";

/// Prefix for layered overrides, e.g. `USWEATHER_NWS__USER_AGENT`.
const ENV_PREFIX: &str = "USWEATHER";

/// Highest zoom level OpenStreetMap tiles are served at.
const MAX_MAP_ZOOM: u8 = 19;

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

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    #[serde(default)]
    pub nws: NwsConfig,

    #[serde(default)]
    pub map: MapConfig,
}

/// OpenCage geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// API key sent as the `key` query parameter
    pub api_key: Option<String>,

    /// Full URL of the JSON geocode endpoint
    pub base_url: String,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.opencagedata.com/geocode/v1/json".to_string(),
        }
    }
}

impl GeocodingConfig {
    /// Check if a key is configured (not empty or a placeholder)
    pub fn is_configured(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty() && !k.starts_with("YOUR_"))
    }
}

/// National Weather Service API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NwsConfig {
    pub base_url: String,

    /// api.weather.gov rejects requests without a User-Agent
    pub user_agent: String,
}

impl Default for NwsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.weather.gov".to_string(),
            user_agent: format!(
                "usweather/{} (https://github.com/usweather/usweather)",
                env!("CARGO_PKG_VERSION")
            ),
        }
    }
}

/// Map display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            zoom: 10,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap contributors".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default file location and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path().as_deref())
    }

    /// Load configuration from an optional TOML file, then apply
    /// `USWEATHER_*` environment overrides.
    ///
    /// A missing file is not an error; defaults fill every unset field.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            if path.exists() {
                tracing::debug!("Loading config file {}", path.display());
                builder = builder.add_source(
                    ::config::File::from(path)
                        .required(false)
                        .format(::config::FileFormat::Toml),
                );
            }
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut config: Config = builder
            .build()
            .and_then(|c| c.try_deserialize::<Config>())
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .context("Failed to load configuration")?;

        if config.geocoding.api_key.is_none() {
            config.geocoding.api_key = std::env::var(GEOCODING_API_KEY_ENV)
                .ok()
                .filter(|k| !k.trim().is_empty());
        }

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; errors abort loading.
    pub fn load_validated(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::load_from(Some(p))?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()))
                .context("Configuration validation failed");
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.geocoding.base_url, "geocoding.base_url", &mut result);
        self.validate_url(&self.nws.base_url, "nws.base_url", &mut result);

        if !self.geocoding.is_configured() {
            result.add_warning(
                "geocoding.api_key",
                format!(
                    "Geocoding API key not configured (set {} or geocoding.api_key) - lookups will fail",
                    GEOCODING_API_KEY_ENV
                ),
            );
        }

        if self.nws.user_agent.trim().is_empty() {
            result.add_error("nws.user_agent", "User agent must not be empty");
        }

        if self.map.zoom > MAX_MAP_ZOOM {
            result.add_error(
                "map.zoom",
                format!("Zoom must be between 0 and {}, got: {}", MAX_MAP_ZOOM, self.map.zoom),
            );
        }

        if !self.map.tile_url.contains("{z}") {
            result.add_warning("map.tile_url", "Tile URL has no {z} placeholder");
        }

        result
    }

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
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Default config file location, e.g. `~/.config/usweather/config.toml`
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("usweather").join("config.toml"))
    }
}
