use std::sync::Arc;
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    error::FetchError,
    model::{ForecastDay, ForecastPayload},
    preferences::{LAST_CITY_KEY, PreferenceStore},
    provider::ForecastClient,
};

use super::{DaySelection, Generation, Message, Ticket, Transition, active_day};

/// Why a city was committed. Only user picks are remembered across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOrigin {
    Startup,
    User,
}

/// Forecast session and day selection seen as one state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Loading,
    Ready { selected_day_index: usize },
}

/// Holds the forecast for exactly one committed city, with at most one
/// fetch whose result may still land.
#[derive(Debug)]
pub struct ForecastSession {
    committed_city: Option<String>,
    payload: Option<ForecastPayload>,
    is_loading: bool,
    selection: DaySelection,
    fetches: Generation,
    days: u8,
    default_city: String,
    client: Arc<dyn ForecastClient>,
    preferences: Arc<dyn PreferenceStore>,
    pending_write: Option<JoinHandle<()>>,
    tx: UnboundedSender<Message>,
}

impl ForecastSession {
    pub fn new(
        client: Arc<dyn ForecastClient>,
        preferences: Arc<dyn PreferenceStore>,
        days: u8,
        default_city: impl Into<String>,
        tx: UnboundedSender<Message>,
    ) -> Self {
        Self {
            committed_city: None,
            payload: None,
            is_loading: false,
            selection: DaySelection::default(),
            fetches: Generation::new(),
            days,
            default_city: default_city.into(),
            client,
            preferences,
            pending_write: None,
            tx,
        }
    }

    pub fn committed_city(&self) -> Option<&str> {
        self.committed_city.as_deref()
    }

    pub fn payload(&self) -> Option<&ForecastPayload> {
        self.payload.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn selected_day_index(&self) -> usize {
        self.selection.index()
    }

    pub fn active_day(&self) -> Option<&ForecastDay> {
        active_day(self.payload.as_ref(), self.selection.index())
    }

    pub fn state(&self) -> SessionState {
        match (&self.payload, self.is_loading) {
            (_, true) => SessionState::Loading,
            (Some(_), false) => SessionState::Ready { selected_day_index: self.selection.index() },
            (None, false) => SessionState::Idle,
        }
    }

    /// Start with the remembered city, or the default one if nothing was
    /// remembered or the store could not be read.
    pub async fn initialize(&mut self) -> Ticket {
        self.is_loading = true;

        let remembered = match self.preferences.get(LAST_CITY_KEY).await {
            Ok(city) => city.filter(|c| !c.trim().is_empty()),
            Err(err) => {
                warn!(error = %err, "could not read last city; using default");
                None
            }
        };
        let city = remembered.unwrap_or_else(|| self.default_city.clone());
        info!(%city, "initial forecast");

        self.commit_and_fetch(city, CommitOrigin::Startup)
    }

    /// Commit `city` and fetch its forecast. The previous payload is dropped
    /// right away, and any fetch still in flight loses its right to land.
    pub fn commit_and_fetch(&mut self, city: impl Into<String>, origin: CommitOrigin) -> Ticket {
        let city = city.into();
        let ticket = self.fetches.issue();

        self.committed_city = Some(city.clone());
        self.is_loading = true;
        self.payload = None;

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let days = self.days;
        tokio::spawn(async move {
            let result = client.get_forecast(&city, days).await;
            let _ = tx.send(Message::ForecastFetched { ticket, origin, result });
        });

        ticket
    }

    pub fn on_forecast_fetched(
        &mut self,
        ticket: Ticket,
        origin: CommitOrigin,
        result: Result<ForecastPayload, FetchError>,
    ) -> Transition {
        if !self.fetches.is_current(ticket) {
            debug!("dropping superseded forecast");
            return Transition::Stale;
        }

        self.is_loading = false;
        match result {
            Ok(payload) => {
                info!(
                    location = %payload.location.name,
                    days = payload.days.len(),
                    "forecast ready"
                );
                if origin == CommitOrigin::User {
                    self.remember_city(payload.location.name.clone());
                }
                self.payload = Some(payload);
                self.selection.reset();
                Transition::ForecastReady
            }
            Err(err) => {
                warn!(
                    city = self.committed_city.as_deref().unwrap_or_default(),
                    error = %err,
                    "forecast fetch failed"
                );
                self.payload = None;
                Transition::ForecastFailed
            }
        }
    }

    /// Select a day of the current payload; out-of-range indices are ignored.
    pub fn select_day(&mut self, index: usize) -> bool {
        let day_count = self.payload.as_ref().map_or(0, |p| p.days.len());
        self.selection.select(index, day_count)
    }

    /// Wait for the most recent preference write, if any.
    pub async fn flush_preferences(&mut self) {
        if let Some(write) = self.pending_write.take() {
            let _ = write.await;
        }
    }

    // Writes are chained so they land in the order they were issued.
    fn remember_city(&mut self, city: String) {
        let previous = self.pending_write.take();
        let preferences = Arc::clone(&self.preferences);
        self.pending_write = Some(tokio::spawn(async move {
            if let Some(previous) = previous {
                let _ = previous.await;
            }
            match preferences.set(LAST_CITY_KEY, &city).await {
                Ok(()) => debug!(%city, "remembered last city"),
                Err(err) => warn!(%city, error = %err, "could not remember last city"),
            }
        }));
    }
}
