//! Plain-text rendering of a [`PageView`] for the terminal.

use std::fmt::Write;

use crate::view::PageView;

pub fn render_text(page: &PageView) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_page(&mut out, page);
    out
}

fn write_page(out: &mut String, page: &PageView) -> std::fmt::Result {
    writeln!(out, "{}", page.title)?;
    writeln!(out)?;

    let input = if page.input.value.is_empty() {
        format!("({})", page.input.placeholder)
    } else {
        page.input.value.clone()
    };
    writeln!(out, "> {}  [{}]", input, page.button_label)?;

    if let Some(loading) = page.loading {
        writeln!(out, "{}", loading)?;
    }
    if let Some(error) = &page.error {
        writeln!(out, "{}", error)?;
    }

    if let Some(grid) = &page.forecast {
        writeln!(out)?;
        writeln!(out, "{}", grid.heading)?;
        for card in &grid.cards {
            writeln!(
                out,
                "  {:<8}  {:>7}  {:<28}  {}",
                card.time,
                card.temperature,
                card.description,
                card.icon.as_ref().map_or("", |icon| icon.src.as_str())
            )?;
        }
    }

    if let Some(map) = &page.map {
        writeln!(out)?;
        writeln!(out, "{}", map.heading)?;
        writeln!(out, "  Center: {} (zoom {})", map.center, map.zoom)?;
        writeln!(out, "  {}", map.marker.popup)?;
        writeln!(out, "  {}", map.permalink())?;
        writeln!(out, "  Map data {}", map.attribution)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use usweather_core::MapConfig;
    use usweather_forecast::{Coordinates, ForecastPeriod};

    use crate::models::ForecastState;
    use crate::services::WeatherServiceMessage;
    use crate::view::{view_in, FORECAST_HEADING, INPUT_PLACEHOLDER, LOADING_TEXT, MAP_HEADING};

    #[test]
    fn test_idle_render_shows_placeholder_and_button() {
        let page = view_in(&ForecastState::default(), &MapConfig::default(), &Utc);
        let text = render_text(&page);
        assert!(text.starts_with("U.S. Weather App (NWS)\n"));
        assert!(text.contains(INPUT_PLACEHOLDER));
        assert!(text.contains("[Get Forecast]"));
        assert!(!text.contains(FORECAST_HEADING));
        assert!(!text.contains(MAP_HEADING));
    }

    #[test]
    fn test_loading_render() {
        let mut state = ForecastState::default();
        state.set_location("Arlington, VA");
        state.begin_fetch();
        let text = render_text(&view_in(&state, &MapConfig::default(), &Utc));
        assert!(text.contains("> Arlington, VA"));
        assert!(text.contains(LOADING_TEXT));
    }

    #[test]
    fn test_forecast_render_lists_cards_in_order() {
        let mut state = ForecastState::default();
        state.set_location("Arlington, VA");
        state.begin_fetch();
        state.apply(WeatherServiceMessage::Located {
            request_id: 1,
            coords: Coordinates::new(38.88, -77.10),
        });
        state.apply(WeatherServiceMessage::FetchDone {
            request_id: 1,
            result: Ok(vec![
                ForecastPeriod {
                    number: 1,
                    start_time: "2025-06-01T18:00:00+00:00".to_string(),
                    temperature: 84.0,
                    temperature_unit: "F".to_string(),
                    short_forecast: Some("Mostly Sunny".to_string()),
                    icon: Some("https://example.test/few.png".to_string()),
                },
                ForecastPeriod {
                    number: 2,
                    start_time: "2025-06-01T19:00:00+00:00".to_string(),
                    temperature: 81.0,
                    temperature_unit: "F".to_string(),
                    short_forecast: Some("Chance Showers".to_string()),
                    icon: None,
                },
            ]),
        });

        let text = render_text(&view_in(&state, &MapConfig::default(), &Utc));
        let first = text.find("06:00 PM").unwrap();
        let second = text.find("07:00 PM").unwrap();
        assert!(first < second);
        assert!(text.contains("84°F"));
        assert!(text.contains("Chance Showers"));
        assert!(text.contains("Weather location: Arlington, VA"));
        assert!(text.contains("Center: 38.8800, -77.1000 (zoom 10)"));
        assert!(!text.contains(LOADING_TEXT));
    }
}
