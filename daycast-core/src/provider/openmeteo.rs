//! Open-Meteo backend. Keyless; forecasts by name go through the geocoding API first.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    error::{FetchError, ResolutionError, truncate_body},
    model::{CandidateLocation, ForecastDay, ForecastPayload, ResolvedLocation},
};

use super::{ForecastClient, LocationResolver};

const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1";
const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1";
const SEARCH_LIMIT: &str = "10";
const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_mean,wind_speed_10m_max,relative_humidity_2m_mean,sunrise";

#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    geocoding_url: String,
    forecast_url: String,
    http: Client,
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteoClient {
    pub fn new() -> Self {
        Self::with_base_urls(DEFAULT_GEOCODING_URL, DEFAULT_FORECAST_URL)
    }

    pub fn with_base_urls(geocoding_url: impl Into<String>, forecast_url: impl Into<String>) -> Self {
        Self {
            geocoding_url: geocoding_url.into(),
            forecast_url: forecast_url.into(),
            http: Client::new(),
        }
    }

    async fn geocode(&self, name: &str) -> Result<Vec<OmPlace>, GeocodeFailure> {
        let url = format!("{}/search", self.geocoding_url);

        let res = self
            .http
            .get(url)
            .query(&[("name", name), ("count", SEARCH_LIMIT), ("language", "en"), ("format", "json")])
            .send()
            .await
            .map_err(GeocodeFailure::Transport)?;

        let status = res.status();
        let body = res.text().await.map_err(GeocodeFailure::Transport)?;

        if !status.is_success() {
            return Err(GeocodeFailure::Service { status: status.as_u16(), body: truncate_body(&body) });
        }

        let parsed: OmGeocodeResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeFailure::Parse(e.to_string()))?;

        // The API omits `results` entirely when nothing matches.
        Ok(parsed.results.unwrap_or_default())
    }
}

/// Shared failure shape for the geocoding call, converted per caller.
#[derive(Debug)]
enum GeocodeFailure {
    Transport(reqwest::Error),
    Service { status: u16, body: String },
    Parse(String),
}

impl From<GeocodeFailure> for ResolutionError {
    fn from(f: GeocodeFailure) -> Self {
        match f {
            GeocodeFailure::Transport(e) => ResolutionError::Transport(e),
            GeocodeFailure::Service { status, body } => ResolutionError::Service { status, body },
            GeocodeFailure::Parse(msg) => ResolutionError::Parse(msg),
        }
    }
}

impl From<GeocodeFailure> for FetchError {
    fn from(f: GeocodeFailure) -> Self {
        match f {
            GeocodeFailure::Transport(e) => FetchError::Transport(e),
            GeocodeFailure::Service { status, body } => FetchError::Service { status, body },
            GeocodeFailure::Parse(msg) => FetchError::Parse(msg),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    id: i64,
    name: String,
    #[serde(default)]
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct OmGeocodeResponse {
    results: Option<Vec<OmPlace>>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    weather_code: Vec<Option<u8>>,
    temperature_2m_mean: Vec<Option<f64>>,
    wind_speed_10m_max: Vec<Option<f64>>,
    relative_humidity_2m_mean: Vec<Option<f64>>,
    sunrise: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    daily: OmDaily,
}

/// Human-readable text for a WMO weather interpretation code.
///
/// See: <https://open-meteo.com/en/docs> for the code table.
pub fn wmo_condition_text(code: u8) -> &'static str {
    match code {
        0 => "Clear",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 | 63 => "Moderate rain",
        65 => "Heavy rain",
        66 | 67 => "Freezing rain",
        71 | 73 | 75 => "Snow",
        77 => "Snow grains",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown",
    }
}

/// "2024-01-15T07:58" -> "07:58 AM", matching weatherapi's astro format.
fn format_sunrise(iso: &str) -> Result<String, FetchError> {
    let parsed = NaiveDateTime::parse_from_str(iso, "%Y-%m-%dT%H:%M")
        .map_err(|e| FetchError::Parse(format!("bad sunrise '{iso}': {e}")))?;
    Ok(parsed.format("%I:%M %p").to_string())
}

fn parse_daily(daily: OmDaily) -> Result<Vec<ForecastDay>, FetchError> {
    let len = daily.time.len();
    let columns_match = [
        daily.weather_code.len(),
        daily.temperature_2m_mean.len(),
        daily.wind_speed_10m_max.len(),
        daily.relative_humidity_2m_mean.len(),
        daily.sunrise.len(),
    ]
    .iter()
    .all(|&n| n == len);

    if !columns_match {
        return Err(FetchError::Parse("daily columns have mismatched lengths".into()));
    }

    let mut days = Vec::with_capacity(len);
    for i in 0..len {
        let date = NaiveDate::parse_from_str(&daily.time[i], "%Y-%m-%d")
            .map_err(|e| FetchError::Parse(format!("bad forecast date '{}': {e}", daily.time[i])))?;
        let missing = || FetchError::Parse(format!("missing daily value for {date}"));

        days.push(ForecastDay {
            date,
            avg_temp_c: daily.temperature_2m_mean[i].ok_or_else(missing)?,
            max_wind_kph: daily.wind_speed_10m_max[i].ok_or_else(missing)?,
            avg_humidity_pct: daily.relative_humidity_2m_mean[i].ok_or_else(missing)?,
            condition: wmo_condition_text(daily.weather_code[i].ok_or_else(missing)?).to_string(),
            sunrise: format_sunrise(&daily.sunrise[i])?,
        });
    }

    Ok(days)
}

#[async_trait]
impl LocationResolver for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn resolve(&self, partial_name: &str) -> Result<Vec<CandidateLocation>, ResolutionError> {
        let places = self.geocode(partial_name).await?;
        debug!(count = places.len(), "open-meteo geocoding returned candidates");

        Ok(places
            .into_iter()
            .map(|p| CandidateLocation {
                id: p.id.to_string(),
                name: p.name,
                country: p.country.unwrap_or_default(),
            })
            .collect())
    }
}

#[async_trait]
impl ForecastClient for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn get_forecast(&self, city_name: &str, days: u8) -> Result<ForecastPayload, FetchError> {
        let place = self
            .geocode(city_name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::UnknownCity(city_name.to_string()))?;

        let url = format!("{}/forecast", self.forecast_url);
        let latitude = place.latitude.to_string();
        let longitude = place.longitude.to_string();
        let forecast_days = days.to_string();

        let res = self
            .http
            .get(url)
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("daily", DAILY_FIELDS),
                ("timezone", "auto"),
                ("forecast_days", forecast_days.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::Service { status: status.as_u16(), body: truncate_body(&body) });
        }

        let parsed: OmForecastResponse =
            serde_json::from_str(&body).map_err(|e| FetchError::Parse(e.to_string()))?;
        let days = parse_daily(parsed.daily)?;

        if days.is_empty() {
            return Err(FetchError::Parse("response contained no daily data".into()));
        }

        Ok(ForecastPayload {
            location: ResolvedLocation { name: place.name, country: place.country.unwrap_or_default() },
            days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily(codes: Vec<Option<u8>>) -> OmDaily {
        let n = codes.len();
        OmDaily {
            time: (0..n).map(|i| format!("2024-01-{:02}", 15 + i)).collect(),
            weather_code: codes,
            temperature_2m_mean: vec![Some(4.5); n],
            wind_speed_10m_max: vec![Some(18.0); n],
            relative_humidity_2m_mean: vec![Some(81.0); n],
            sunrise: vec!["2024-01-15T07:58".to_string(); n],
        }
    }

    #[test]
    fn wmo_codes_map_to_text() {
        assert_eq!(wmo_condition_text(0), "Clear");
        assert_eq!(wmo_condition_text(3), "Overcast");
        assert_eq!(wmo_condition_text(81), "Rain showers");
        assert_eq!(wmo_condition_text(99), "Thunderstorm with hail");
        assert_eq!(wmo_condition_text(200), "Unknown");
    }

    #[test]
    fn sunrise_is_formatted_as_twelve_hour_time() {
        assert_eq!(format_sunrise("2024-01-15T07:58").unwrap(), "07:58 AM");
        assert_eq!(format_sunrise("2024-06-21T13:05").unwrap(), "01:05 PM");
        assert!(format_sunrise("sometime").is_err());
    }

    #[test]
    fn parse_daily_passes_values_through() {
        let days = parse_daily(daily(vec![Some(0), Some(61)])).unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(days[0].avg_temp_c, 4.5);
        assert_eq!(days[0].max_wind_kph, 18.0);
        assert_eq!(days[0].avg_humidity_pct, 81.0);
        assert_eq!(days[1].condition, "Moderate rain");
    }

    #[test]
    fn parse_daily_rejects_null_values() {
        let err = parse_daily(daily(vec![Some(0), None])).unwrap_err();
        assert!(err.to_string().contains("missing daily value"));
    }

    #[test]
    fn parse_daily_rejects_ragged_columns() {
        let mut d = daily(vec![Some(0), Some(1)]);
        d.sunrise.pop();
        assert!(parse_daily(d).is_err());
    }
}
