use crate::{
    CandidateLocation, Config, ForecastPayload,
    error::{FetchError, ResolutionError},
    provider::{openmeteo::OpenMeteoClient, weatherapi::WeatherApiClient},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug, sync::Arc};

pub mod openmeteo;
pub mod weatherapi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    WeatherApi,
    OpenMeteo,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::WeatherApi => "weatherapi",
            ProviderId::OpenMeteo => "openmeteo",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::WeatherApi, ProviderId::OpenMeteo]
    }

    /// Open-Meteo is keyless; weatherapi.com is not.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::WeatherApi)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "weatherapi" => Ok(ProviderId::WeatherApi),
            "openmeteo" | "open-meteo" => Ok(ProviderId::OpenMeteo),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: weatherapi, openmeteo."
            )),
        }
    }
}

/// Turns a partial place name into candidate locations.
#[async_trait]
pub trait LocationResolver: Send + Sync + Debug {
    async fn resolve(&self, partial_name: &str)
    -> Result<Vec<CandidateLocation>, ResolutionError>;
}

/// Fetches a multi-day forecast for a city name.
#[async_trait]
pub trait ForecastClient: Send + Sync + Debug {
    async fn get_forecast(&self, city_name: &str, days: u8)
    -> Result<ForecastPayload, FetchError>;
}

/// A backend that can both search locations and fetch forecasts.
pub trait WeatherProvider: LocationResolver + ForecastClient {
    fn into_resolver(self: Arc<Self>) -> Arc<dyn LocationResolver>;
    fn into_forecast_client(self: Arc<Self>) -> Arc<dyn ForecastClient>;
}

impl<T> WeatherProvider for T
where
    T: LocationResolver + ForecastClient + 'static,
{
    fn into_resolver(self: Arc<Self>) -> Arc<dyn LocationResolver> {
        self
    }

    fn into_forecast_client(self: Arc<Self>) -> Arc<dyn ForecastClient> {
        self
    }
}

/// Construct a provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let provider: Arc<dyn WeatherProvider> = match id {
        ProviderId::WeatherApi => {
            let api_key = config.provider_api_key(id).ok_or_else(|| {
                anyhow::anyhow!(
                    "No API key configured for provider '{id}'.\n\
                     Hint: run `daycast configure {id}` and enter your API key."
                )
            })?;
            Arc::new(WeatherApiClient::new(api_key.to_owned()))
        }
        ProviderId::OpenMeteo => Arc::new(OpenMeteoClient::new()),
    };

    Ok(provider)
}

/// Construct the default provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}
