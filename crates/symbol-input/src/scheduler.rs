//! Debounce scheduler.
//!
//! Turns the keystroke stream into two independently paced trigger
//! streams: searches after a short quiet period, validations after a
//! longer one. A burst of keystrokes inside the window yields at most one
//! request of each kind, carrying the text of the last keystroke.

use log::debug;
use tokio::time::Instant;

use crate::config::SymbolInputConfig;
use crate::session::{InputSession, PendingRequest, RequestKind, SessionToken};
use crate::timer::DebounceTimer;

/// What a text edit requires from the visible state, beyond the reset to
/// `Idle` every edit implies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextChange {
    pub token: SessionToken,
    /// Query too short to search: drop candidates now instead of waiting.
    pub clear_candidates: bool,
    /// Field is empty after trimming.
    pub is_empty: bool,
}

pub struct DebounceScheduler {
    session: InputSession,
    search: DebounceTimer,
    validate: DebounceTimer,
    min_search_len: usize,
    min_validate_len: usize,
}

impl DebounceScheduler {
    pub fn new(config: &SymbolInputConfig) -> Self {
        Self {
            session: InputSession::new(),
            search: DebounceTimer::new(RequestKind::Search, config.search_delay),
            validate: DebounceTimer::new(RequestKind::Validate, config.validate_delay),
            min_search_len: config.min_search_len,
            min_validate_len: config.min_validate_len,
        }
    }

    pub fn session(&self) -> &InputSession {
        &self.session
    }

    /// Record a keystroke and re-arm the timers.
    pub fn on_text_changed(&mut self, new_text: &str) -> TextChange {
        let token = self.session.replace(new_text);
        self.cancel_all();

        let query = self.session.query();
        let len = self.session.query_len();

        self.search.arm(token, query);
        if len >= self.min_validate_len {
            self.validate.arm(token, query);
        }

        TextChange {
            token,
            clear_candidates: len < self.min_search_len,
            is_empty: len == 0,
        }
    }

    /// Explicit pick from the candidate list: no debounce.
    ///
    /// Returns the validation to dispatch right away, or `None` when the
    /// picked symbol is blank.
    pub fn on_commit_selection(&mut self, symbol: &str) -> Option<PendingRequest> {
        let token = self.session.replace(symbol);
        self.cancel_all();

        let query = self.session.query();
        if query.is_empty() {
            return None;
        }
        Some(PendingRequest::new(RequestKind::Validate, token, query))
    }

    pub fn cancel_all(&mut self) {
        self.search.cancel();
        self.validate.cancel();
    }

    /// Earliest armed deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.search.deadline(), self.validate.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn is_armed(&self, kind: RequestKind) -> bool {
        match kind {
            RequestKind::Search => self.search.is_armed(),
            RequestKind::Validate => self.validate.is_armed(),
        }
    }

    /// Fire every timer whose deadline has passed.
    ///
    /// Searches for queries shorter than the minimum are dropped here.
    pub fn take_due(&mut self, now: Instant) -> Vec<PendingRequest> {
        let mut due = Vec::with_capacity(2);

        if let Some(request) = self.search.fire_if_due(now) {
            if request.query.chars().count() >= self.min_search_len {
                due.push(request);
            } else {
                debug!("Search for '{}' skipped: query too short", request.query);
            }
        }
        if let Some(request) = self.validate.fire_if_due(now) {
            due.push(request);
        }

        due
    }
}
