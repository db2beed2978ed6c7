use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use usweather_core::FETCH_FAILED_MESSAGE;
use usweather_forecast::{Coordinates, ForecastPeriod, WeatherProvider};

use crate::services::{request_weather_fetch, WeatherServiceMessage};

/// Request status derived from the `loading` and error fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Idle,
    Loading,
    Failed,
}

/// Everything the page shows, held in memory only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastState {
    location: String,
    forecast: Vec<ForecastPeriod>,
    coords: Option<Coordinates>,
    error_message: String,
    loading: bool,
}

impl ForecastState {
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn forecast(&self) -> &[ForecastPeriod] {
        &self.forecast
    }

    pub fn coords(&self) -> Option<Coordinates> {
        self.coords
    }

    /// Empty when there is no error to show
    pub fn error_message(&self) -> &str {
        &self.error_message
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn status(&self) -> RequestStatus {
        if self.loading {
            RequestStatus::Loading
        } else if !self.error_message.is_empty() {
            RequestStatus::Failed
        } else {
            RequestStatus::Idle
        }
    }

    /// Only user edits change the query.
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = location.into();
    }

    /// Reset for a new lookup.
    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error_message.clear();
        self.forecast.clear();
        self.coords = None;
    }

    /// Apply a message from a running lookup.
    ///
    /// Messages from overlapping lookups are applied in arrival order, so the
    /// last lookup to settle decides what is shown.
    pub fn apply(&mut self, msg: WeatherServiceMessage) {
        match msg {
            WeatherServiceMessage::Located { request_id, coords } => {
                tracing::debug!(request_id, "Showing map at {}", coords);
                self.coords = Some(coords);
            }
            WeatherServiceMessage::FetchDone { request_id, result } => {
                tracing::debug!(request_id, ok = result.is_ok(), "Lookup settled");
                match result {
                    Ok(periods) => self.forecast = periods,
                    Err(e) => self.error_message = e.user_message().to_string(),
                }
                self.loading = false;
            }
        }
    }

    /// Settle a lookup that ended without reporting a result.
    pub fn abandon(&mut self) {
        if self.loading {
            self.loading = false;
            self.error_message = FETCH_FAILED_MESSAGE.to_string();
        }
    }
}

/// How often `wait_until_settled` checks for lookups that died silently
const SETTLE_CHECK_INTERVAL: Duration = Duration::from_millis(100);

/// Owns the page state and runs lookups for it.
///
/// Lookups run on the tokio runtime; their results are applied on whichever
/// thread owns the model, through `poll_channel` or `wait_until_settled`.
pub struct ForecastModel {
    state: ForecastState,
    provider: Arc<WeatherProvider>,
    runtime: tokio::runtime::Handle,
    tx: Sender<WeatherServiceMessage>,
    rx: Receiver<WeatherServiceMessage>,
    in_flight: Vec<JoinHandle<()>>,
    next_request_id: u64,
}

impl ForecastModel {
    pub fn new(provider: Arc<WeatherProvider>, runtime: tokio::runtime::Handle) -> Self {
        let (tx, rx) = channel();
        Self {
            state: ForecastState::default(),
            provider,
            runtime,
            tx,
            rx,
            in_flight: Vec::new(),
            next_request_id: 1,
        }
    }

    pub fn state(&self) -> &ForecastState {
        &self.state
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.state.set_location(location);
    }

    /// Start a lookup for the current location and return its request id.
    ///
    /// `loading` is true as soon as this returns. A lookup already in flight
    /// keeps running.
    pub fn fetch_weather(&mut self) -> u64 {
        let request_id = self.next_request_id;
        self.next_request_id += 1;

        self.state.begin_fetch();
        tracing::info!(request_id, "Fetching weather for '{}'", self.state.location);

        self.in_flight.retain(|task| !task.is_finished());
        self.in_flight.push(request_weather_fetch(
            &self.tx,
            &self.runtime,
            self.provider.clone(),
            request_id,
            self.state.location.clone(),
        ));
        request_id
    }

    /// Apply every pending message without blocking.
    /// Returns true if the state changed.
    pub fn poll_channel(&mut self) -> bool {
        let mut changed = false;
        while let Ok(msg) = self.rx.try_recv() {
            self.state.apply(msg);
            changed = true;
        }
        changed
    }

    /// Block until `loading` is false, calling `on_change` after each
    /// state change.
    ///
    /// A lookup task that ends without sending `FetchDone` (panic, runtime
    /// shutdown) settles as a failure instead of leaving `loading` stuck.
    pub fn wait_until_settled<F>(&mut self, mut on_change: F)
    where
        F: FnMut(&ForecastState),
    {
        while self.state.loading {
            if let Ok(msg) = self.rx.recv_timeout(SETTLE_CHECK_INTERVAL) {
                self.state.apply(msg);
                on_change(&self.state);
                continue;
            }

            self.in_flight.retain(|task| !task.is_finished());
            if !self.in_flight.is_empty() {
                continue;
            }

            // Every task has ended; pick up anything sent just before it did
            if !self.poll_channel() {
                tracing::warn!("Lookup ended without a result");
                self.state.abandon();
            }
            on_change(&self.state);
        }
    }
}
