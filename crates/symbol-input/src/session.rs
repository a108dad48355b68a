//! Input session and request identity.
//!
//! Every text event produces a new [`SessionToken`]. Requests carry the
//! token that was current when they were dispatched; a response is only
//! relevant while its token is still the session's token.

use std::fmt;

/// Monotonic generation counter for the input text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionToken(u64);

impl SessionToken {
    pub fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The evolving text of the symbol field.
///
/// Owned by the scheduler and only mutated by text events.
#[derive(Clone, Debug, Default)]
pub struct InputSession {
    raw_text: String,
    token: SessionToken,
}

impl InputSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    /// Text as sent to the lookup service.
    pub fn query(&self) -> &str {
        self.raw_text.trim()
    }

    /// Number of characters in the trimmed text.
    pub fn query_len(&self) -> usize {
        self.query().chars().count()
    }

    pub fn is_current(&self, token: SessionToken) -> bool {
        self.token == token
    }

    /// Replace the text and start a new generation.
    pub(crate) fn replace(&mut self, text: impl Into<String>) -> SessionToken {
        self.raw_text = text.into();
        self.token = self.token.next();
        self.token
    }
}

/// The two kinds of lookup the input issues.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Search,
    Validate,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search => write!(f, "search"),
            Self::Validate => write!(f, "validate"),
        }
    }
}

/// An in-flight search or validation call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingRequest {
    /// Session token at dispatch time
    pub token: SessionToken,
    pub kind: RequestKind,
    /// Trimmed text the request was issued for
    pub query: String,
}

impl PendingRequest {
    pub fn new(kind: RequestKind, token: SessionToken, query: impl Into<String>) -> Self {
        Self {
            token,
            kind,
            query: query.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_bumps_token() {
        let mut session = InputSession::new();
        let first = session.replace("TC");
        let second = session.replace("TCS");
        assert!(second > first);
        assert_eq!(session.token(), second);
        assert!(session.is_current(second));
        assert!(!session.is_current(first));
    }

    #[test]
    fn test_same_text_still_bumps_token() {
        let mut session = InputSession::new();
        let first = session.replace("TCS");
        let second = session.replace("TCS");
        assert_ne!(first, second);
    }

    #[test]
    fn test_query_is_trimmed() {
        let mut session = InputSession::new();
        session.replace("  INFY ");
        assert_eq!(session.raw_text(), "  INFY ");
        assert_eq!(session.query(), "INFY");
        assert_eq!(session.query_len(), 4);
    }
}
