use serde::{Deserialize, Serialize};

/// Number of hourly periods kept from the upstream forecast
pub const FORECAST_HOURS: usize = 12;

/// Geographic point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// One candidate returned by the geocoder
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeMatch {
    pub coordinates: Coordinates,
    /// Geocoder's formatted place name, when it sends one
    pub formatted: Option<String>,
}

/// One hourly slot from the NWS hourly forecast.
///
/// Passed through as received; nothing here is validated or normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub number: u32,
    /// ISO-8601 timestamp with offset, e.g. `2025-06-01T14:00:00-04:00`
    pub start_time: String,
    pub temperature: f64,
    pub temperature_unit: String,
    /// NWS sends null here now and then
    #[serde(default)]
    pub short_forecast: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}
