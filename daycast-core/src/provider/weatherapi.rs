use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    error::{FetchError, ResolutionError, truncate_body},
    model::{CandidateLocation, ForecastDay, ForecastPayload, ResolvedLocation},
};

use super::{ForecastClient, LocationResolver};

const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// weatherapi.com reports "No matching location found." with this code.
const NO_MATCHING_LOCATION: i64 = 1006;

#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self { api_key, base_url: base_url.into(), http: Client::new() }
    }
}

#[derive(Debug, Deserialize)]
struct WaSearchHit {
    id: i64,
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaDay {
    avgtemp_c: f64,
    maxwind_kph: f64,
    avghumidity: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaAstro {
    sunrise: String,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: String,
    day: WaDay,
    astro: WaAstro,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    location: WaLocation,
    forecast: WaForecast,
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    code: i64,
}

#[derive(Debug, Deserialize)]
struct WaErrorResponse {
    error: WaErrorBody,
}

impl TryFrom<WaForecastDay> for ForecastDay {
    type Error = FetchError;

    fn try_from(day: WaForecastDay) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&day.date, "%Y-%m-%d")
            .map_err(|e| FetchError::Parse(format!("bad forecast date '{}': {e}", day.date)))?;

        Ok(ForecastDay {
            date,
            avg_temp_c: day.day.avgtemp_c,
            max_wind_kph: day.day.maxwind_kph,
            avg_humidity_pct: day.day.avghumidity,
            condition: day.day.condition.text,
            sunrise: day.astro.sunrise,
        })
    }
}

#[async_trait]
impl LocationResolver for WeatherApiClient {
    #[instrument(skip(self))]
    async fn resolve(&self, partial_name: &str) -> Result<Vec<CandidateLocation>, ResolutionError> {
        let url = format!("{}/search.json", self.base_url);

        let res = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str()), ("q", partial_name)])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ResolutionError::Service {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let hits: Vec<WaSearchHit> =
            serde_json::from_str(&body).map_err(|e| ResolutionError::Parse(e.to_string()))?;
        debug!(count = hits.len(), "weatherapi search returned candidates");

        Ok(hits
            .into_iter()
            .map(|hit| CandidateLocation {
                id: hit.id.to_string(),
                name: hit.name,
                country: hit.country,
            })
            .collect())
    }
}

#[async_trait]
impl ForecastClient for WeatherApiClient {
    #[instrument(skip(self))]
    async fn get_forecast(&self, city_name: &str, days: u8) -> Result<ForecastPayload, FetchError> {
        let url = format!("{}/forecast.json", self.base_url);
        let days_param = days.to_string();

        let res = self
            .http
            .get(url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("q", city_name),
                ("days", days_param.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            let unknown_city = serde_json::from_str::<WaErrorResponse>(&body)
                .is_ok_and(|e| e.error.code == NO_MATCHING_LOCATION);
            if unknown_city {
                return Err(FetchError::UnknownCity(city_name.to_string()));
            }
            return Err(FetchError::Service { status: status.as_u16(), body: truncate_body(&body) });
        }

        let parsed: WaForecastResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        let days = parsed
            .forecast
            .forecastday
            .into_iter()
            .map(ForecastDay::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        if days.is_empty() {
            return Err(FetchError::Parse("response contained no forecastday data".into()));
        }

        Ok(ForecastPayload {
            location: ResolvedLocation {
                name: parsed.location.name,
                country: parsed.location.country,
            },
            days,
        })
    }
}
