//! The search, resolve, fetch and select pipeline behind the weather screen.
//!
//! Everything here runs on one owner. Asynchronous work is spawned onto tokio
//! and reports back as a [`Message`] over an mpsc channel; the owner applies
//! messages one at a time with [`WeatherScreen::handle`]. Each message carries
//! the [`Ticket`] it was issued with, and completions whose ticket is no longer
//! current are dropped. The underlying clients are never cancelled.

use std::time::Duration;

use crate::{
    error::{FetchError, ResolutionError},
    model::{CandidateLocation, ForecastPayload},
};

pub mod debounce;
pub mod generation;
pub mod screen;
pub mod search;
pub mod selection;
pub mod session;

pub use debounce::Debouncer;
pub use generation::{Generation, Ticket};
pub use screen::{ScreenView, WeatherScreen};
pub use search::SearchController;
pub use selection::{DaySelection, active_day};
pub use session::{CommitOrigin, ForecastSession, SessionState};

/// Quiet period a query must survive before it is resolved.
pub const QUIET_WINDOW: Duration = Duration::from_millis(1200);
/// Queries with fewer characters are never resolved.
pub const MIN_QUERY_LEN: usize = 3;
/// Days requested per forecast.
pub const FORECAST_DAYS: u8 = 7;
/// City shown when no location has ever been picked.
pub const DEFAULT_CITY: &str = "Viet Nam";

/// Completion of some piece of asynchronous work.
#[derive(Debug)]
pub enum Message {
    QuerySettled {
        ticket: Ticket,
        query: String,
    },
    CandidatesResolved {
        ticket: Ticket,
        result: Result<Vec<CandidateLocation>, ResolutionError>,
    },
    ForecastFetched {
        ticket: Ticket,
        origin: CommitOrigin,
        result: Result<ForecastPayload, FetchError>,
    },
}

/// What applying a [`Message`] did to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Superseded by newer work; state untouched.
    Stale,
    /// A settled query was handed to the location resolver.
    SearchDispatched,
    CandidatesChanged,
    /// Resolution failed; the previous candidates stay.
    CandidatesKept,
    ForecastReady,
    ForecastFailed,
}

#[derive(Debug, Clone)]
pub struct ScreenSettings {
    pub quiet_window: Duration,
    pub min_query_len: usize,
    pub forecast_days: u8,
    pub default_city: String,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            quiet_window: QUIET_WINDOW,
            min_query_len: MIN_QUERY_LEN,
            forecast_days: FORECAST_DAYS,
            default_city: DEFAULT_CITY.to_string(),
        }
    }
}

impl ScreenSettings {
    pub fn with_default_city(mut self, city: impl Into<String>) -> Self {
        self.default_city = city.into();
        self
    }
}
