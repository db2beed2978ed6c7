//! Page view: a pure function of [`ForecastState`] into a view tree.
//!
//! Nothing here touches the network or mutates state. Renderers
//! (`render_text`, JSON via serde) only read the tree.

use chrono::{DateTime, Local, TimeZone};
use serde::Serialize;
use usweather_core::MapConfig;
use usweather_forecast::{Coordinates, ForecastPeriod};

use crate::models::ForecastState;

pub const TITLE: &str = "U.S. Weather App (NWS)";
pub const INPUT_PLACEHOLDER: &str = "Enter U.S. City (e.g., Arlington, VA)";
pub const BUTTON_LABEL: &str = "Get Forecast";
pub const LOADING_TEXT: &str = "Loading forecast...";
pub const FORECAST_HEADING: &str = "Next 12 Hours Forecast:";
pub const MAP_HEADING: &str = "Location Map";

const ICON_WIDTH: u32 = 40;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub title: &'static str,
    pub input: InputView,
    pub button_label: &'static str,
    pub loading: Option<&'static str>,
    pub error: Option<String>,
    pub forecast: Option<ForecastGrid>,
    pub map: Option<MapView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputView {
    pub value: String,
    pub placeholder: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastGrid {
    pub heading: &'static str,
    pub cards: Vec<ForecastCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastCard {
    /// Upstream period number
    pub key: u32,
    pub time: String,
    pub temperature: String,
    pub description: String,
    /// Absent when NWS sends no icon
    pub icon: Option<IconView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconView {
    pub src: String,
    pub alt: String,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub heading: &'static str,
    pub center: Coordinates,
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    pub marker: MarkerView,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerView {
    pub position: Coordinates,
    pub popup: String,
}

impl MapView {
    /// openstreetmap.org link with the marker dropped at the center
    pub fn permalink(&self) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={lat:.4}&mlon={lon:.4}#map={zoom}/{lat:.4}/{lon:.4}",
            lat = self.marker.position.latitude,
            lon = self.marker.position.longitude,
            zoom = self.zoom,
        )
    }
}

/// Build the page for `state`, showing times in the system's local zone.
pub fn view(state: &ForecastState, map: &MapConfig) -> PageView {
    view_in(state, map, &Local)
}

/// Build the page for `state`, showing times in `tz`.
pub fn view_in<Tz>(state: &ForecastState, map: &MapConfig, tz: &Tz) -> PageView
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let error = Some(state.error_message())
        .filter(|e| !e.is_empty())
        .map(str::to_string);

    let forecast = (!state.forecast().is_empty()).then(|| ForecastGrid {
        heading: FORECAST_HEADING,
        cards: state
            .forecast()
            .iter()
            .map(|p| forecast_card(p, tz))
            .collect(),
    });

    let map = state.coords().map(|center| MapView {
        heading: MAP_HEADING,
        center,
        zoom: map.zoom,
        tile_url: map.tile_url.clone(),
        attribution: map.attribution.clone(),
        marker: MarkerView {
            position: center,
            popup: format!("Weather location: {}", state.location()),
        },
    });

    PageView {
        title: TITLE,
        input: InputView {
            value: state.location().to_string(),
            placeholder: INPUT_PLACEHOLDER,
        },
        button_label: BUTTON_LABEL,
        loading: state.loading().then_some(LOADING_TEXT),
        error,
        forecast,
        map,
    }
}

fn forecast_card<Tz>(period: &ForecastPeriod, tz: &Tz) -> ForecastCard
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let description = period.short_forecast.clone().unwrap_or_default();
    let icon = period.icon.as_ref().map(|src| IconView {
        src: src.clone(),
        alt: description.clone(),
        width: ICON_WIDTH,
    });

    ForecastCard {
        key: period.number,
        time: format_start_time(&period.start_time, tz),
        temperature: format_temperature(period.temperature, &period.temperature_unit),
        description,
        icon,
    }
}

/// `hh:mm AM/PM` in `tz`. Unparseable timestamps are shown as received.
pub fn format_start_time<Tz>(raw: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match DateTime::parse_from_rfc3339(raw) {
        Ok(start) => start.with_timezone(tz).format("%I:%M %p").to_string(),
        Err(e) => {
            tracing::debug!("Unparseable start time '{}': {}", raw, e);
            raw.to_string()
        }
    }
}

/// Whole temperatures print without a decimal point, e.g. `72°F`.
pub fn format_temperature(temperature: f64, unit: &str) -> String {
    format!("{}°{}", temperature, unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use usweather_core::WeatherError;

    use crate::services::WeatherServiceMessage;

    fn eastern() -> FixedOffset {
        FixedOffset::west_opt(4 * 3600).unwrap()
    }

    fn period(number: u32, start: &str) -> ForecastPeriod {
        ForecastPeriod {
            number,
            start_time: start.to_string(),
            temperature: 84.0,
            temperature_unit: "F".to_string(),
            short_forecast: Some("Mostly Sunny".to_string()),
            icon: Some("https://api.weather.gov/icons/land/day/few?size=small".to_string()),
        }
    }

    fn settled_state(periods: Vec<ForecastPeriod>) -> ForecastState {
        let mut state = ForecastState::default();
        state.set_location("Arlington, VA");
        state.begin_fetch();
        state.apply(WeatherServiceMessage::Located {
            request_id: 1,
            coords: Coordinates::new(38.88, -77.10),
        });
        state.apply(WeatherServiceMessage::FetchDone {
            request_id: 1,
            result: Ok(periods),
        });
        state
    }

    #[test]
    fn test_idle_page_shows_only_controls() {
        let page = view_in(&ForecastState::default(), &MapConfig::default(), &Utc);
        assert_eq!(page.title, TITLE);
        assert_eq!(page.input.value, "");
        assert_eq!(page.input.placeholder, INPUT_PLACEHOLDER);
        assert_eq!(page.button_label, BUTTON_LABEL);
        assert!(page.loading.is_none());
        assert!(page.error.is_none());
        assert!(page.forecast.is_none());
        assert!(page.map.is_none());
    }

    #[test]
    fn test_loading_page() {
        let mut state = ForecastState::default();
        state.begin_fetch();
        let page = view_in(&state, &MapConfig::default(), &Utc);
        assert_eq!(page.loading, Some(LOADING_TEXT));
        assert!(page.forecast.is_none());
    }

    #[test]
    fn test_success_page_has_cards_and_map() {
        let state = settled_state(vec![
            period(1, "2025-06-01T14:00:00-04:00"),
            period(2, "2025-06-01T15:00:00-04:00"),
        ]);
        let page = view_in(&state, &MapConfig::default(), &eastern());

        let grid = page.forecast.unwrap();
        assert_eq!(grid.heading, FORECAST_HEADING);
        assert_eq!(grid.cards.len(), 2);
        assert_eq!(grid.cards[0].key, 1);
        assert_eq!(grid.cards[0].time, "02:00 PM");
        assert_eq!(grid.cards[1].time, "03:00 PM");
        assert_eq!(grid.cards[0].temperature, "84°F");
        assert_eq!(grid.cards[0].description, "Mostly Sunny");
        let icon = grid.cards[0].icon.as_ref().unwrap();
        assert_eq!(icon.alt, "Mostly Sunny");
        assert_eq!(icon.width, 40);

        let map = page.map.unwrap();
        assert_eq!(map.center, Coordinates::new(38.88, -77.10));
        assert_eq!(map.zoom, 10);
        assert_eq!(map.marker.popup, "Weather location: Arlington, VA");
        assert!(page.error.is_none());
    }

    #[test]
    fn test_card_without_icon_or_description() {
        let mut bare = period(4, "2025-06-01T17:00:00-04:00");
        bare.short_forecast = None;
        bare.icon = None;
        let page = view_in(&settled_state(vec![bare]), &MapConfig::default(), &eastern());

        let card = &page.forecast.unwrap().cards[0];
        assert_eq!(card.time, "05:00 PM");
        assert_eq!(card.description, "");
        assert!(card.icon.is_none());
    }

    #[test]
    fn test_failed_lookup_after_geocode_shows_error_and_map() {
        let mut state = ForecastState::default();
        state.set_location("Arlington, VA");
        state.begin_fetch();
        state.apply(WeatherServiceMessage::Located {
            request_id: 1,
            coords: Coordinates::new(38.88, -77.10),
        });
        state.apply(WeatherServiceMessage::FetchDone {
            request_id: 1,
            result: Err(WeatherError::LocationNotFound("x".into())),
        });

        let page = view_in(&state, &MapConfig::default(), &Utc);
        assert_eq!(
            page.error.as_deref(),
            Some("Unable to fetch weather. Please check the location.")
        );
        assert!(page.forecast.is_none());
        assert!(page.map.is_some());
        assert!(page.loading.is_none());
    }

    #[test]
    fn test_popup_follows_edited_location() {
        let mut state = settled_state(vec![period(1, "2025-06-01T14:00:00-04:00")]);
        state.set_location("Arlington, TX");
        let page = view_in(&state, &MapConfig::default(), &Utc);
        assert_eq!(page.map.unwrap().marker.popup, "Weather location: Arlington, TX");
    }

    #[test]
    fn test_format_start_time_converts_zone() {
        assert_eq!(format_start_time("2025-06-01T14:00:00-04:00", &Utc), "06:00 PM");
        assert_eq!(format_start_time("2025-06-01T09:30:00-04:00", &eastern()), "09:30 AM");
    }

    #[test]
    fn test_format_start_time_passes_through_garbage() {
        assert_eq!(format_start_time("tomorrow-ish", &Utc), "tomorrow-ish");
    }

    #[test]
    fn test_format_temperature() {
        assert_eq!(format_temperature(72.0, "F"), "72°F");
        assert_eq!(format_temperature(-3.5, "C"), "-3.5°C");
    }

    #[test]
    fn test_map_permalink() {
        let state = settled_state(vec![]);
        let page = view_in(&state, &MapConfig::default(), &Utc);
        assert_eq!(
            page.map.unwrap().permalink(),
            "https://www.openstreetmap.org/?mlat=38.8800&mlon=-77.1000#map=10/38.8800/-77.1000"
        );
    }

    #[test]
    fn test_view_serializes_to_json() {
        let state = settled_state(vec![period(7, "2025-06-01T14:00:00-04:00")]);
        let page = view_in(&state, &MapConfig::default(), &Utc);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["forecast"]["cards"][0]["key"], 7);
        assert_eq!(json["map"]["center"]["latitude"], 38.88);
        assert!(json["loading"].is_null());
    }
}
