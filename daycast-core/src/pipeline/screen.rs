use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::info;

use crate::{
    model::{CandidateLocation, ForecastDay, ForecastPayload, ResolvedLocation},
    preferences::PreferenceStore,
    provider::{ForecastClient, LocationResolver},
};

use super::{
    CommitOrigin, ForecastSession, Message, ScreenSettings, SearchController, SessionState,
    Ticket, Transition,
};

/// Everything the presentation layer reads to draw the screen.
#[derive(Debug, Clone, Copy)]
pub struct ScreenView<'a> {
    pub search_visible: bool,
    pub candidates: &'a [CandidateLocation],
    pub is_loading: bool,
    pub committed_location: Option<&'a ResolvedLocation>,
    pub active_day: Option<&'a ForecastDay>,
    pub days: &'a [ForecastDay],
    pub selected_day_index: usize,
}

/// Single-screen weather state: search box, forecast session and day selection,
/// driven by the completion messages of their own background work.
#[derive(Debug)]
pub struct WeatherScreen {
    search: SearchController,
    session: ForecastSession,
    rx: UnboundedReceiver<Message>,
}

impl WeatherScreen {
    pub fn new(
        resolver: Arc<dyn LocationResolver>,
        forecasts: Arc<dyn ForecastClient>,
        preferences: Arc<dyn PreferenceStore>,
        settings: ScreenSettings,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let search = SearchController::new(
            resolver,
            settings.quiet_window,
            settings.min_query_len,
            tx.clone(),
        );
        let session = ForecastSession::new(
            forecasts,
            preferences,
            settings.forecast_days,
            settings.default_city,
            tx,
        );

        Self { search, session, rx }
    }

    pub async fn initialize(&mut self) -> Ticket {
        self.session.initialize().await
    }

    pub fn toggle_search(&mut self) {
        self.search.toggle_search();
    }

    pub fn on_query_changed(&mut self, text: impl Into<String>) -> bool {
        self.search.on_query_changed(text)
    }

    pub fn commit(&mut self, candidate: CandidateLocation) -> Ticket {
        let candidate = self.search.commit(candidate);
        info!(name = %candidate.name, country = %candidate.country, "location committed");
        self.session.commit_and_fetch(candidate.name, CommitOrigin::User)
    }

    pub fn select_day(&mut self, index: usize) -> bool {
        self.session.select_day(index)
    }

    pub fn search(&self) -> &SearchController {
        &self.search
    }

    pub fn session(&self) -> &ForecastSession {
        &self.session
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn payload(&self) -> Option<&ForecastPayload> {
        self.session.payload()
    }

    pub fn view(&self) -> ScreenView<'_> {
        let payload = self.session.payload();
        ScreenView {
            search_visible: self.search.is_visible(),
            candidates: self.search.candidates(),
            is_loading: self.session.is_loading(),
            committed_location: payload.map(|p| &p.location),
            active_day: self.session.active_day(),
            days: payload.map(|p| p.days.as_slice()).unwrap_or_default(),
            selected_day_index: self.session.selected_day_index(),
        }
    }

    /// Apply one completion to the screen.
    pub fn handle(&mut self, message: Message) -> Transition {
        match message {
            Message::QuerySettled { ticket, query } => self.search.on_query_settled(ticket, query),
            Message::CandidatesResolved { ticket, result } => {
                self.search.on_candidates_resolved(ticket, result)
            }
            Message::ForecastFetched { ticket, origin, result } => {
                self.session.on_forecast_fetched(ticket, origin, result)
            }
        }
    }

    /// Wait for the next completion and apply it.
    ///
    /// Waits forever if nothing is in flight; callers should know that
    /// something was started.
    pub async fn pump(&mut self) -> Option<Transition> {
        let message = self.rx.recv().await?;
        Some(self.handle(message))
    }

    /// Pump until the current forecast fetch has landed or failed.
    pub async fn wait_for_forecast(&mut self) -> Transition {
        while self.session.is_loading() {
            match self.pump().await {
                Some(t @ (Transition::ForecastReady | Transition::ForecastFailed)) => return t,
                Some(_) => {}
                None => break,
            }
        }
        if self.session.payload().is_some() {
            Transition::ForecastReady
        } else {
            Transition::ForecastFailed
        }
    }

    /// Pump until the latest settled query has been resolved, one way or the other.
    pub async fn wait_for_candidates(&mut self) -> Option<Transition> {
        loop {
            match self.pump().await? {
                t @ (Transition::CandidatesChanged | Transition::CandidatesKept) => return Some(t),
                _ => {}
            }
        }
    }

    pub async fn flush_preferences(&mut self) {
        self.session.flush_preferences().await;
    }
}
