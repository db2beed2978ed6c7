//! Forecast lookup for usweather
//!
//! Geocodes free-text U.S. locations via OpenCage and fetches the hourly
//! forecast for the resulting point from the National Weather Service.

pub mod geocode;
pub mod nws;
pub mod provider;
pub mod types;

pub use geocode::Geocoder;
pub use nws::NwsClient;
pub use provider::WeatherProvider;
pub use types::*;
