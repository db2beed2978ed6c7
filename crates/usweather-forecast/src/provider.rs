use crate::geocode::Geocoder;
use crate::nws::NwsClient;
use crate::types::{Coordinates, ForecastPeriod, FORECAST_HOURS};
use reqwest::Client;
use usweather_core::{Config, NetworkError, ReqwestErrorExt, WeatherError};

/// Geocoder plus NWS client sharing one HTTP connection pool.
///
/// No client-side timeout is set; requests use reqwest's defaults.
#[derive(Debug, Clone)]
pub struct WeatherProvider {
    geocoder: Geocoder,
    nws: NwsClient,
}

impl WeatherProvider {
    pub fn new(config: &Config) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .user_agent(config.nws.user_agent.as_str())
            .build()
            .map_err(ReqwestErrorExt::into_network_error)?;

        Ok(Self {
            geocoder: Geocoder::new(
                client.clone(),
                config.geocoding.base_url.as_str(),
                config.geocoding.api_key.clone(),
            ),
            nws: NwsClient::new(client, config.nws.base_url.as_str()),
        })
    }

    /// Geocode `query` and keep the first match.
    pub async fn locate(&self, query: &str) -> Result<Coordinates, WeatherError> {
        if query.trim().is_empty() {
            return Err(WeatherError::LocationNotFound(query.to_string()));
        }

        self.geocoder
            .search(query)
            .await
            .map_err(WeatherError::Geocode)?
            .into_iter()
            .next()
            .map(|m| m.coordinates)
            .ok_or_else(|| WeatherError::LocationNotFound(query.to_string()))
    }

    /// Resolve the grid for `coords` and return the first
    /// [`FORECAST_HOURS`] hourly periods in upstream order.
    pub async fn hourly_forecast(
        &self,
        coords: Coordinates,
    ) -> Result<Vec<ForecastPeriod>, WeatherError> {
        let url = self
            .nws
            .forecast_hourly_url(coords)
            .await
            .map_err(WeatherError::PointLookup)?;

        let mut periods = self
            .nws
            .hourly_periods(&url)
            .await
            .map_err(WeatherError::HourlyForecast)?;
        periods.truncate(FORECAST_HOURS);
        Ok(periods)
    }

    /// Run the whole lookup: geocode, resolve the grid, fetch the forecast.
    ///
    /// `on_located` fires as soon as geocoding succeeds, before the NWS
    /// calls, so the caller can show the point even if a later step fails.
    pub async fn fetch_forecast<F>(
        &self,
        query: &str,
        on_located: F,
    ) -> Result<Vec<ForecastPeriod>, WeatherError>
    where
        F: FnOnce(Coordinates),
    {
        let coords = self.locate(query).await?;
        on_located(coords);

        let periods = self.hourly_forecast(coords).await?;
        tracing::info!("Fetched {} hourly periods for '{}'", periods.len(), query);
        Ok(periods)
    }
}
