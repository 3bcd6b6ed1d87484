use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::presentation::PresentationToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRequest {
    pub query: String,
}

impl WeatherRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into() }
    }
}

/// Normalized snapshot of current conditions for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub city: String,
    pub country: Option<String>,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_mph: f64,
    pub gust_mph: f64,
    pub visibility_miles: f64,
    pub condition_text: String,
    pub icon_url: String,
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherResult {
    /// "City, Country", or just the city when the provider sent no country.
    pub fn display_location(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.city, country),
            None => self.city.clone(),
        }
    }

    pub fn presentation(&self) -> PresentationToken {
        PresentationToken::from_condition(&self.condition_text)
    }
}
