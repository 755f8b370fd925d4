use crate::{
    Config,
    error::FetchError,
    location::LocationQuery,
    model::{AstronomyInfo, WeatherSnapshot},
    provider::weatherapi::WeatherApiClient,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::{fmt::Debug, time::Duration};

pub mod weatherapi;

/// Read-only weather data for a location.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Current conditions plus hourly and daily forecast.
    async fn fetch_forecast(&self, query: &LocationQuery) -> Result<WeatherSnapshot, FetchError>;

    /// Moon and sun data for `date`.
    async fn fetch_astronomy(
        &self,
        query: &LocationQuery,
        date: NaiveDate,
    ) -> Result<AstronomyInfo, FetchError>;
}

/// Construct the WeatherAPI.com source from config.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let client = WeatherApiClient::builder(config.api_key()?)
        .base_url(&config.base_url)
        .forecast_days(config.forecast_days())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;

    Ok(Box::new(client))
}
