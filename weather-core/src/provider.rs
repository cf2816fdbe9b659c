use crate::{Config, WeatherResult, provider::weatherapi::WeatherApiProvider};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::Debug;
use thiserror::Error;

pub mod weatherapi;

/// The only text a user ever sees when a lookup fails.
pub const NO_RESULTS_MESSAGE: &str = "No results found...";

/// Why a lookup produced no result.
///
/// The variants exist for logging; callers show [`FetchError::user_message`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to weather service failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("weather service answered {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("failed to parse weather service response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        NO_RESULTS_MESSAGE
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for a city name. One attempt, no retry.
    async fn get_weather(&self, query: &str) -> Result<WeatherResult, FetchError>;
}

/// Construct the WeatherAPI.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;
    let provider = WeatherApiProvider::new(api_key.to_owned()).with_base_url(config.base_url());

    Ok(Box::new(provider))
}
