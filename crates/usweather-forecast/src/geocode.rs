//! Forward geocoding: free-text place name to coordinates.
//! Uses OpenCage, which needs an API key.

use crate::types::{Coordinates, GeocodeMatch};
use reqwest::Client;
use serde::Deserialize;
use usweather_core::{NetworkError, ReqwestErrorExt};

#[derive(Debug, Deserialize)]
struct OpenCageResponse {
    #[serde(default)]
    results: Vec<OpenCageResult>,
}

#[derive(Debug, Deserialize)]
struct OpenCageResult {
    geometry: OpenCageGeometry,
    formatted: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenCageGeometry {
    lat: f64,
    lng: f64,
}

impl From<OpenCageResult> for GeocodeMatch {
    fn from(result: OpenCageResult) -> Self {
        Self {
            coordinates: Coordinates::new(result.geometry.lat, result.geometry.lng),
            formatted: result.formatted,
        }
    }
}

/// OpenCage geocoding client
#[derive(Debug, Clone)]
pub struct Geocoder {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl Geocoder {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Look up `query` and return candidates in the geocoder's order.
    ///
    /// An empty list is a valid "no match" answer, not an error.
    pub async fn search(&self, query: &str) -> Result<Vec<GeocodeMatch>, NetworkError> {
        let mut request = self.client.get(&self.base_url).query(&[("q", query)]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(ReqwestErrorExt::into_network_error)?;

        let body: OpenCageResponse = response
            .json()
            .await
            .map_err(ReqwestErrorExt::into_network_error)?;

        let matches: Vec<GeocodeMatch> = body.results.into_iter().map(Into::into).collect();

        match matches.first() {
            Some(first) => tracing::info!(
                "Geocoded '{}' to {} ({} candidates, best: {})",
                query,
                first.coordinates,
                matches.len(),
                first.formatted.as_deref().unwrap_or("unnamed")
            ),
            None => tracing::warn!("No geocoding results for '{}'", query),
        }

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opencage_result_conversion() {
        let body: OpenCageResponse = serde_json::from_str(
            r#"{
                "results": [
                    { "geometry": { "lat": 38.88, "lng": -77.10 }, "formatted": "Arlington, VA, United States of America" },
                    { "geometry": { "lat": 32.73, "lng": -97.10 } }
                ],
                "total_results": 2
            }"#,
        )
        .unwrap();

        let matches: Vec<GeocodeMatch> = body.results.into_iter().map(Into::into).collect();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].coordinates, Coordinates::new(38.88, -77.10));
        assert!(matches[0].formatted.as_deref().unwrap().starts_with("Arlington"));
        assert_eq!(matches[1].formatted, None);
    }

    #[test]
    fn test_opencage_missing_results_is_empty() {
        let body: OpenCageResponse = serde_json::from_str(r#"{ "total_results": 0 }"#).unwrap();
        assert!(body.results.is_empty());
    }
}
