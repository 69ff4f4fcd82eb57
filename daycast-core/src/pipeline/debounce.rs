//! Trailing-edge debounce for search-box input.

use std::time::Duration;
use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};
use tracing::debug;

use super::{Generation, Message, Ticket};

/// Emits the last query of a typing burst once input has been quiet for `quiet`.
///
/// Every [`submit`](Self::submit) restarts the window, so a sustained burst
/// emits nothing until typing pauses. Queries shorter than `min_len`
/// characters still restart the window but are never emitted.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    min_len: usize,
    generation: Generation,
    timer: Option<JoinHandle<()>>,
    tx: UnboundedSender<Message>,
}

impl Debouncer {
    pub fn new(quiet: Duration, min_len: usize, tx: UnboundedSender<Message>) -> Self {
        Self { quiet, min_len, generation: Generation::new(), timer: None, tx }
    }

    /// Feed the current text of the search box. Returns whether it will be emitted
    /// if nothing newer arrives.
    pub fn submit(&mut self, text: impl Into<String>) -> bool {
        let query = text.into();
        let ticket = self.generation.issue();
        self.stop_timer();

        if query.chars().count() < self.min_len {
            debug!(%query, "query too short to resolve");
            return false;
        }

        let tx = self.tx.clone();
        let quiet = self.quiet;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            // The receiver only disappears with the screen itself.
            let _ = tx.send(Message::QuerySettled { ticket, query });
        }));
        true
    }

    /// Drop whatever is pending; nothing will be emitted for it.
    pub fn cancel(&mut self) {
        self.generation.invalidate();
        self.stop_timer();
    }

    /// Whether a `QuerySettled` message is the latest submission.
    pub fn accept(&mut self, ticket: Ticket) -> bool {
        if self.generation.is_current(ticket) {
            self.timer = None;
            true
        } else {
            false
        }
    }

    pub fn is_pending(&self) -> bool {
        self.timer.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.stop_timer();
    }
}
