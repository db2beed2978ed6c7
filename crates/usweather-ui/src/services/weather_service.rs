//! Weather backend: async forecast lookup.
//! All network work runs off the UI thread; progress is sent via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use tokio::task::JoinHandle;

use usweather_core::WeatherError;
use usweather_forecast::{Coordinates, ForecastPeriod, WeatherProvider};

/// Messages sent from a running lookup back to the UI thread.
///
/// `request_id` identifies the trigger that started the lookup; it is only
/// used for logging.
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// Geocoding succeeded; sent before the NWS calls start
    Located { request_id: u64, coords: Coordinates },
    /// The lookup settled, successfully or not
    FetchDone {
        request_id: u64,
        result: Result<Vec<ForecastPeriod>, WeatherError>,
    },
}

/// Start a forecast lookup for `query` on `runtime`.
///
/// Sends exactly one `FetchDone` unless the task is cancelled first.
/// Overlapping requests are not cancelled; their messages arrive in settle
/// order.
pub fn request_fetch(
    tx: &Sender<WeatherServiceMessage>,
    runtime: &tokio::runtime::Handle,
    provider: Arc<WeatherProvider>,
    request_id: u64,
    query: String,
) -> JoinHandle<()> {
    let tx = tx.clone();

    runtime.spawn(async move {
        let located_tx = tx.clone();
        let result = provider
            .fetch_forecast(&query, move |coords| {
                tracing::info!(request_id, "Got location: {}", coords);
                let _ = located_tx.send(WeatherServiceMessage::Located { request_id, coords });
            })
            .await;

        match &result {
            Ok(periods) => tracing::info!(
                request_id,
                "Weather data fetched successfully ({} periods)",
                periods.len()
            ),
            Err(e) => tracing::error!(
                request_id,
                step = e.step(),
                "Failed to fetch weather for '{}': {}",
                query,
                e
            ),
        }

        let _ = tx.send(WeatherServiceMessage::FetchDone { request_id, result });
    })
}
