use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An unconfirmed place returned by a location search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateLocation {
    /// Provider-specific identifier, only meaningful to the provider that issued it.
    pub id: String,
    pub name: String,
    pub country: String,
}

impl std::fmt::Display for CandidateLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.name, self.country)
    }
}

/// The place a forecast was actually produced for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub name: String,
    pub country: String,
}

/// One day of a forecast. Values are passed through from the provider unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub avg_temp_c: f64,
    pub max_wind_kph: f64,
    pub avg_humidity_pct: f64,
    pub condition: String,
    /// Local sunrise time as reported by the provider, e.g. "06:41 AM".
    pub sunrise: String,
}

/// A complete forecast; replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPayload {
    pub location: ResolvedLocation,
    /// Chronological, index 0 is today.
    pub days: Vec<ForecastDay>,
}
