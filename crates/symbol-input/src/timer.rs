//! Owned debounce timer.
//!
//! A timer is a deadline plus the text and token it was armed for. It does
//! not spawn anything: the input's event loop sleeps until the earliest
//! deadline and then asks each timer whether it is due. Re-arming replaces
//! the previous deadline, so a cancelled arming can never fire.

use std::time::Duration;

use tokio::time::Instant;

use crate::session::{PendingRequest, RequestKind, SessionToken};

#[derive(Clone, Debug)]
struct Armed {
    deadline: Instant,
    token: SessionToken,
    query: String,
}

#[derive(Clone, Debug)]
pub struct DebounceTimer {
    kind: RequestKind,
    delay: Duration,
    armed: Option<Armed>,
}

impl DebounceTimer {
    pub fn new(kind: RequestKind, delay: Duration) -> Self {
        Self {
            kind,
            delay,
            armed: None,
        }
    }

    /// Arm for `delay` from now, replacing any earlier arming.
    pub fn arm(&mut self, token: SessionToken, query: &str) {
        self.armed = Some(Armed {
            deadline: Instant::now() + self.delay,
            token,
            query: query.to_string(),
        });
    }

    /// Returns true if the timer was armed.
    pub fn cancel(&mut self) -> bool {
        self.armed.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.armed.as_ref().map(|a| a.deadline)
    }

    /// Disarm and produce the request if the deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> Option<PendingRequest> {
        let due = self.armed.as_ref().is_some_and(|a| a.deadline <= now);
        if !due {
            return None;
        }
        let kind = self.kind;
        self.armed
            .take()
            .map(|a| PendingRequest::new(kind, a.token, a.query))
    }
}
