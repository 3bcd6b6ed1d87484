use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{
    error::FetchError,
    model::{WeatherRequest, WeatherResult},
};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http: Client::new() }
    }

    /// Point the provider at another host, e.g. a mock server in tests.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Apply a whole-request timeout. Without one a hung request never resolves.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, reqwest::Error> {
        self.http = Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    fn current_url(&self) -> String {
        format!("{}/v1/current.json", self.base_url)
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    humidity: u8,
    wind_mph: f64,
    gust_mph: f64,
    vis_miles: f64,
    condition: WaCondition,
    last_updated_epoch: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

impl From<WaResponse> for WeatherResult {
    fn from(parsed: WaResponse) -> Self {
        let country = parsed.location.country.filter(|c| !c.trim().is_empty());

        WeatherResult {
            city: parsed.location.name,
            country,
            temperature_c: parsed.current.temp_c,
            humidity_pct: parsed.current.humidity,
            wind_mph: parsed.current.wind_mph,
            gust_mph: parsed.current.gust_mph,
            visibility_miles: parsed.current.vis_miles,
            icon_url: normalize_icon_url(&parsed.current.condition.icon),
            condition_text: parsed.current.condition.text,
            observed_at: parsed.current.last_updated_epoch.and_then(unix_to_utc),
        }
    }
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn current(&self, request: &WeatherRequest) -> Result<WeatherResult, FetchError> {
        if request.query.is_empty() {
            return Err(FetchError::EmptyQuery);
        }

        debug!(query = %request.query, "requesting current conditions from WeatherAPI.com");

        let res = self
            .http
            .get(self.current_url())
            .query(&[("key", self.api_key.as_str()), ("q", request.query.as_str())])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status { status, body: truncate_body(&body) });
        }

        let parsed: WaResponse = serde_json::from_str(&body)?;
        Ok(parsed.into())
    }
}

/// WeatherAPI.com hands out protocol-relative icon paths (`//cdn.weatherapi.com/...`).
fn normalize_icon_url(icon: &str) -> String {
    if icon.starts_with("//") { format!("https:{icon}") } else { icon.to_string() }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
