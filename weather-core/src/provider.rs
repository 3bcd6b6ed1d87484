use crate::{Config, FetchError, WeatherRequest, WeatherResult, provider::weatherapi::WeatherApiProvider};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc, time::Duration};

pub mod weatherapi;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, request: &WeatherRequest) -> Result<WeatherResult, FetchError>;
}

/// Construct the WeatherAPI.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for WeatherAPI.com.\n\
                 Hint: run `weather configure` or pass `--api-key`."
        )
    })?;

    let mut provider = WeatherApiProvider::new(api_key.to_owned());
    if let Some(base_url) = config.base_url() {
        provider = provider.with_base_url(base_url);
    }
    if let Some(secs) = config.timeout_secs() {
        provider = provider.with_timeout(Duration::from_secs(secs))?;
    }

    Ok(Arc::new(provider))
}
