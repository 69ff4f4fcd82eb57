use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::{error::ResolutionError, model::CandidateLocation, provider::LocationResolver};

use super::{Debouncer, Generation, Message, Ticket, Transition};

/// Owns the search box: its visibility and the candidates shown under it.
#[derive(Debug)]
pub struct SearchController {
    candidates: Vec<CandidateLocation>,
    visible: bool,
    debouncer: Debouncer,
    resolutions: Generation,
    resolver: Arc<dyn LocationResolver>,
    tx: UnboundedSender<Message>,
}

impl SearchController {
    pub fn new(
        resolver: Arc<dyn LocationResolver>,
        quiet: Duration,
        min_query_len: usize,
        tx: UnboundedSender<Message>,
    ) -> Self {
        Self {
            candidates: Vec::new(),
            visible: false,
            debouncer: Debouncer::new(quiet, min_query_len, tx.clone()),
            resolutions: Generation::new(),
            resolver,
            tx,
        }
    }

    pub fn candidates(&self) -> &[CandidateLocation] {
        &self.candidates
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Open or close the search box. Closing drops the candidates and any
    /// query or resolution still in flight.
    pub fn toggle_search(&mut self) {
        self.visible = !self.visible;
        if !self.visible {
            self.close();
        }
    }

    /// Route the current search text through the debouncer. Returns whether
    /// the text will be resolved once typing pauses; a closed search box
    /// ignores text altogether.
    pub fn on_query_changed(&mut self, text: impl Into<String>) -> bool {
        if !self.visible {
            debug!("search box closed; ignoring query");
            return false;
        }
        self.debouncer.submit(text)
    }

    pub fn on_query_settled(&mut self, ticket: Ticket, query: String) -> Transition {
        if !self.debouncer.accept(ticket) {
            debug!(%query, "dropping superseded query");
            return Transition::Stale;
        }

        let ticket = self.resolutions.issue();
        let resolver = Arc::clone(&self.resolver);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = resolver.resolve(&query).await;
            let _ = tx.send(Message::CandidatesResolved { ticket, result });
        });
        Transition::SearchDispatched
    }

    pub fn on_candidates_resolved(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<CandidateLocation>, ResolutionError>,
    ) -> Transition {
        if !self.resolutions.is_current(ticket) {
            debug!("dropping out-of-date location results");
            return Transition::Stale;
        }

        match result {
            Ok(candidates) => {
                debug!(count = candidates.len(), "candidates updated");
                self.candidates = candidates;
                Transition::CandidatesChanged
            }
            Err(err) => {
                warn!(error = %err, "location search failed; keeping previous candidates");
                Transition::CandidatesKept
            }
        }
    }

    /// Accept `candidate` as the user's pick: clears the list, closes the box
    /// and hands the candidate back for the forecast session.
    pub fn commit(&mut self, candidate: CandidateLocation) -> CandidateLocation {
        self.visible = false;
        self.close();
        candidate
    }

    fn close(&mut self) {
        self.candidates.clear();
        self.debouncer.cancel();
        self.resolutions.invalidate();
    }
}
