use crate::{Config, FetchError, WeatherSnapshot, provider::weatherapi::WeatherApiClient};
use anyhow::Context;
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

/// One round-trip to a weather backend for the current conditions of `city`.
///
/// Implementations never retry and never cache.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn fetch(&self, api_key: &str, city: &str) -> Result<WeatherSnapshot, FetchError>;
}

/// Construct the WeatherAPI.com client from config.
pub fn client_from_config(config: &Config) -> anyhow::Result<WeatherApiClient> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }

    let http = builder.build().context("Failed to create HTTP client")?;

    Ok(WeatherApiClient::with_http(config.base_url.clone(), http))
}
