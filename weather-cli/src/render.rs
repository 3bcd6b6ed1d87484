use chrono::Local;
use colored::{Color, Colorize};
use weather_core::{PresentationToken, ViewState, WeatherResult};

/// Blue, red, yellow, green, cycled per character.
const PALETTE: [(u8, u8, u8); 4] =
    [(0x42, 0x85, 0xF4), (0xEA, 0x43, 0x35), (0xF7, 0xE0, 0x1A), (0x34, 0xA8, 0x53)];

const WELCOME: &str = "Welcome! Enter the city you'd like weather for, \
and the current conditions for that location will be shown here.";

const FRAME_WIDTH: usize = 44;

pub fn colorize(text: &str) -> String {
    text.chars()
        .enumerate()
        .map(|(i, ch)| {
            let (r, g, b) = PALETTE[i % PALETTE.len()];
            ch.to_string().truecolor(r, g, b).to_string()
        })
        .collect()
}

fn accent(token: PresentationToken) -> Color {
    match token {
        PresentationToken::Sunny => Color::TrueColor { r: 0xF9, g: 0x73, b: 0x16 },
        PresentationToken::Cloudy => Color::TrueColor { r: 0x4B, g: 0x55, b: 0x63 },
        PresentationToken::Rain => Color::TrueColor { r: 0x25, g: 0x63, b: 0xEB },
        PresentationToken::Snow => Color::BrightWhite,
        PresentationToken::Thunderstorm => Color::TrueColor { r: 0x11, g: 0x18, b: 0x27 },
        PresentationToken::Mist => Color::TrueColor { r: 0x94, g: 0xA3, b: 0xB8 },
        PresentationToken::Default => Color::BrightBlack,
    }
}

pub fn render_view(view: &ViewState) -> String {
    let mut out = vec![colorize("Weather").bold().to_string()];

    if view.show_welcome {
        out.push(WELCOME.to_string());
    }

    if let Some(weather) = &view.weather {
        out.extend(render_card(weather, view.presentation));
    }

    if view.show_suggestions {
        out.push("Suggestions:".dimmed().to_string());
        out.extend(view.suggestions.iter().map(|s| format!("  {s}")));
    }

    out.join("\n")
}

fn render_card(weather: &WeatherResult, token: PresentationToken) -> Vec<String> {
    let frame = "━".repeat(FRAME_WIDTH).color(accent(token)).to_string();
    let stops = token.background().stops.join(" → ");

    let mut lines = vec![
        frame.clone(),
        weather.display_location().bold().to_string(),
        format!("Icon: {}", weather.icon_url),
        format!("Temp: {}°C", weather.temperature_c).bold().to_string(),
        colorize(&weather.condition_text),
        format!(
            "Humidity: {}%  Wind: {} mph  Visibility: {} miles  Gust: {} mph",
            weather.humidity_pct, weather.wind_mph, weather.visibility_miles, weather.gust_mph
        )
        .dimmed()
        .to_string(),
    ];

    if let Some(observed) = weather.observed_at {
        let local = observed.with_timezone(&Local);
        lines.push(format!("Updated: {}", local.format("%Y-%m-%d %H:%M")).dimmed().to_string());
    }

    lines.push(format!("Background: {token} ({stops})").dimmed().to_string());
    lines.push(frame);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::Phase;

    fn plain() {
        colored::control::set_override(false);
    }

    fn delhi() -> WeatherResult {
        WeatherResult {
            city: "Delhi".into(),
            country: Some("India".into()),
            temperature_c: 22.0,
            humidity_pct: 30,
            wind_mph: 4.5,
            gust_mph: 6.0,
            visibility_miles: 3.0,
            condition_text: "Sunny".into(),
            icon_url: "https://cdn.weatherapi.com/weather/64x64/day/113.png".into(),
            observed_at: None,
        }
    }

    #[test]
    fn colorize_keeps_text() {
        plain();
        assert_eq!(colorize("Weather"), "Weather");
    }

    #[test]
    fn welcome_shown_before_first_result() {
        plain();
        let view = ViewState { show_welcome: true, ..ViewState::default() };
        let out = render_view(&view);

        assert!(out.contains("Welcome!"));
        assert!(!out.contains("Temp:"));
    }

    #[test]
    fn card_lists_all_fields() {
        plain();
        let view = ViewState {
            weather: Some(delhi()),
            presentation: PresentationToken::Sunny,
            phase: Phase::Displaying,
            ..ViewState::default()
        };
        let out = render_view(&view);

        assert!(!out.contains("Welcome!"));
        assert!(out.contains("Delhi, India"));
        assert!(out.contains("Temp: 22°C"));
        assert!(out.contains("Sunny"));
        assert!(out.contains("Humidity: 30%"));
        assert!(out.contains("Wind: 4.5 mph"));
        assert!(out.contains("Visibility: 3 miles"));
        assert!(out.contains("Gust: 6 mph"));
        assert!(out.contains("Icon: https://cdn.weatherapi.com"));
        assert!(out.contains("Background: sunny"));
    }

    #[test]
    fn suggestions_listed_only_when_visible() {
        plain();
        let mut view = ViewState {
            suggestions: vec!["San Diego".into(), "San Jose".into()],
            ..ViewState::default()
        };
        assert!(!render_view(&view).contains("San Diego"));

        view.show_suggestions = true;
        let out = render_view(&view);
        assert!(out.contains("  San Diego"));
        assert!(out.contains("  San Jose"));
    }
}
