pub mod config;
pub mod error;

pub use self::config::{
    Config, ConfigValidationError, GeocodingConfig, MapConfig, NwsConfig, ValidationResult,
    GEOCODING_API_KEY_ENV,
};
pub use error::{
    ConfigError, NetworkError, ReqwestErrorExt, WeatherError, FETCH_FAILED_MESSAGE,
};

use anyhow::Result;

/// Initialize logging.
///
/// Logs go to stderr so rendered forecasts on stdout stay clean.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    tracing::info!("usweather core initialized");
    Ok(())
}
