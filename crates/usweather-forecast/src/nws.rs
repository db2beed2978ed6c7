//! National Weather Service (api.weather.gov) client.
//!
//! Two calls: `/points/{lat},{lon}` resolves the forecast grid for a point and
//! hands back the hourly forecast URL, which is then fetched as-is.

use crate::types::{Coordinates, ForecastPeriod};
use reqwest::Client;
use serde::Deserialize;
use usweather_core::{NetworkError, ReqwestErrorExt};

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: PointsProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointsProperties {
    forecast_hourly: String,
}

#[derive(Debug, Deserialize)]
struct HourlyForecastResponse {
    properties: HourlyForecastProperties,
}

#[derive(Debug, Deserialize)]
struct HourlyForecastProperties {
    periods: Vec<ForecastPeriod>,
}

#[derive(Debug, Clone)]
pub struct NwsClient {
    client: Client,
    base_url: String,
}

impl NwsClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// URL of the points endpoint. NWS only accepts four decimal places and
    /// redirects anything finer.
    pub fn points_url(&self, coords: Coordinates) -> String {
        format!(
            "{}/points/{:.4},{:.4}",
            self.base_url, coords.latitude, coords.longitude
        )
    }

    /// Resolve the hourly forecast URL serving `coords`.
    pub async fn forecast_hourly_url(&self, coords: Coordinates) -> Result<String, NetworkError> {
        let url = self.points_url(coords);
        tracing::debug!("NWS points request: {}", url);

        let body: PointsResponse = self.get_json(&url).await?;
        tracing::debug!("Hourly forecast URL: {}", body.properties.forecast_hourly);
        Ok(body.properties.forecast_hourly)
    }

    /// Fetch every period from an hourly forecast URL, in upstream order.
    pub async fn hourly_periods(&self, url: &str) -> Result<Vec<ForecastPeriod>, NetworkError> {
        tracing::debug!("NWS hourly forecast request: {}", url);

        let body: HourlyForecastResponse = self.get_json(url).await?;
        Ok(body.properties.periods)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, NetworkError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/geo+json")
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(ReqwestErrorExt::into_network_error)?;

        response
            .json()
            .await
            .map_err(ReqwestErrorExt::into_network_error)
    }
}
