//! Staleness guard and visible state.
//!
//! Responses are applied only when their request token is both the
//! session's current token and the token of the request still marked in
//! flight for that kind. Anything else is dropped without touching state.
//!
//! Validation status:
//!
//! ```text
//!   Idle --(validate dispatched)--> Checking --(Valid)----> Confirmed
//!                                            --(Invalid)--> Rejected
//!                                            --(blank)----> Idle
//!   any --(text edited)--> Idle
//! ```

use tradejournal_market_data::SearchCandidate;

use crate::engine::{ValidSymbol, ValidationResult};
use crate::session::{PendingRequest, RequestKind, SessionToken};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ValidationStatus {
    #[default]
    Idle,
    Checking,
    Confirmed(ValidSymbol),
    Rejected {
        message: String,
    },
}

impl ValidationStatus {
    /// The status as a validation outcome; `None` while idle.
    pub fn as_result(&self) -> Option<ValidationResult> {
        match self {
            Self::Idle => None,
            Self::Checking => Some(ValidationResult::Pending),
            Self::Confirmed(valid) => Some(ValidationResult::Valid(valid.clone())),
            Self::Rejected { message } => Some(ValidationResult::invalid(message.clone())),
        }
    }

    pub fn confirmed(&self) -> Option<&ValidSymbol> {
        match self {
            Self::Confirmed(valid) => Some(valid),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message } => Some(message),
            _ => None,
        }
    }
}

/// What applying a validation response did.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationApplied {
    /// Superseded by a newer text event; state untouched.
    Stale,
    /// Transition into `Confirmed`. Happens once per dispatched request.
    Confirmed(ValidSymbol),
    Rejected,
    /// Nothing to validate; back to `Idle` without an error.
    Cleared,
    /// `Pending` answer; still checking.
    Unchanged,
}

#[derive(Clone, Debug, Default)]
pub struct InputState {
    candidates: Vec<SearchCandidate>,
    dropdown_open: bool,
    status: ValidationStatus,
    in_flight_search: Option<PendingRequest>,
    in_flight_validate: Option<PendingRequest>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidates(&self) -> &[SearchCandidate] {
        &self.candidates
    }

    pub fn dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    pub fn status(&self) -> &ValidationStatus {
        &self.status
    }

    pub fn is_searching(&self) -> bool {
        self.in_flight_search.is_some()
    }

    pub fn is_validating(&self) -> bool {
        self.in_flight_validate.is_some()
    }

    /// A text edit: status back to `Idle`, earlier requests forgotten.
    pub fn on_edit(&mut self, clear_candidates: bool) {
        self.status = ValidationStatus::Idle;
        self.in_flight_search = None;
        self.in_flight_validate = None;
        if clear_candidates {
            self.clear_candidates();
        }
    }

    /// A pick from the list: like an edit, and the list goes away.
    pub fn on_commit(&mut self) {
        self.on_edit(true);
    }

    /// Close the list without discarding it (click outside).
    pub fn dismiss(&mut self) {
        self.dropdown_open = false;
    }

    pub fn clear_candidates(&mut self) {
        self.candidates.clear();
        self.dropdown_open = false;
    }

    /// Mark `request` in flight. Validation moves to `Checking`.
    pub fn begin(&mut self, request: &PendingRequest) {
        match request.kind {
            RequestKind::Search => self.in_flight_search = Some(request.clone()),
            RequestKind::Validate => {
                self.in_flight_validate = Some(request.clone());
                self.status = ValidationStatus::Checking;
            }
        }
    }

    fn is_fresh(
        slot: &Option<PendingRequest>,
        current: SessionToken,
        request: &PendingRequest,
    ) -> bool {
        request.token == current && slot.as_ref().is_some_and(|p| p.token == request.token)
    }

    /// Apply a search response. Returns false if it was stale.
    pub fn apply_search(
        &mut self,
        current: SessionToken,
        request: &PendingRequest,
        candidates: Vec<SearchCandidate>,
    ) -> bool {
        if !Self::is_fresh(&self.in_flight_search, current, request) {
            return false;
        }
        self.in_flight_search = None;
        self.dropdown_open = !candidates.is_empty();
        self.candidates = candidates;
        true
    }

    /// Apply a validation response. `None` means there was nothing to
    /// validate.
    pub fn apply_validation(
        &mut self,
        current: SessionToken,
        request: &PendingRequest,
        result: Option<ValidationResult>,
    ) -> ValidationApplied {
        if !Self::is_fresh(&self.in_flight_validate, current, request) {
            return ValidationApplied::Stale;
        }

        let Some(result) = result else {
            self.in_flight_validate = None;
            self.status = ValidationStatus::Idle;
            return ValidationApplied::Cleared;
        };

        match result {
            ValidationResult::Pending => ValidationApplied::Unchanged,
            ValidationResult::Valid(valid) => {
                self.in_flight_validate = None;
                self.status = ValidationStatus::Confirmed(valid.clone());
                ValidationApplied::Confirmed(valid)
            }
            ValidationResult::Invalid { reason_message } => {
                self.in_flight_validate = None;
                self.status = ValidationStatus::Rejected {
                    message: reason_message,
                };
                ValidationApplied::Rejected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn token(n: u64) -> SessionToken {
        (0..n).fold(crate::session::InputSession::new(), |mut s, _| {
            s.replace("x");
            s
        })
        .token()
    }

    fn valid(symbol: &str) -> ValidSymbol {
        ValidSymbol {
            symbol: symbol.to_string(),
            display_name: "Infosys Ltd".to_string(),
            exchange: "NSE".to_string(),
            price: dec!(1452.30),
            change_abs: dec!(0),
            change_pct: dec!(0),
            currency: Some("INR".to_string()),
        }
    }

    fn candidates() -> Vec<SearchCandidate> {
        vec![SearchCandidate::new("INFY", "Infosys Ltd", "NSE", "INR")]
    }

    #[test]
    fn test_fresh_search_is_applied() {
        let mut state = InputState::new();
        let request = PendingRequest::new(RequestKind::Search, token(1), "IN");
        state.begin(&request);
        assert!(state.is_searching());

        assert!(state.apply_search(token(1), &request, candidates()));
        assert!(!state.is_searching());
        assert!(state.dropdown_open());
        assert_eq!(state.candidates().len(), 1);
    }

    #[test]
    fn test_stale_search_is_a_no_op() {
        let mut state = InputState::new();
        let old = PendingRequest::new(RequestKind::Search, token(1), "IN");
        state.begin(&old);
        state.on_edit(false);
        let new = PendingRequest::new(RequestKind::Search, token(2), "INF");
        state.begin(&new);

        assert!(!state.apply_search(token(2), &old, candidates()));
        assert!(state.candidates().is_empty());
        assert!(state.is_searching());
    }

    #[test]
    fn test_empty_search_closes_dropdown() {
        let mut state = InputState::new();
        let request = PendingRequest::new(RequestKind::Search, token(1), "ZZ");
        state.begin(&request);
        assert!(state.apply_search(token(1), &request, Vec::new()));
        assert!(!state.dropdown_open());
    }

    #[test]
    fn test_validation_state_machine() {
        let mut state = InputState::new();
        assert_eq!(state.status(), &ValidationStatus::Idle);

        let request = PendingRequest::new(RequestKind::Validate, token(1), "INFY");
        state.begin(&request);
        assert_eq!(state.status(), &ValidationStatus::Checking);
        assert_eq!(state.status().as_result(), Some(ValidationResult::Pending));

        let applied = state.apply_validation(
            token(1),
            &request,
            Some(ValidationResult::Valid(valid("INFY"))),
        );
        assert_eq!(applied, ValidationApplied::Confirmed(valid("INFY")));
        assert_eq!(state.status().confirmed().unwrap().symbol, "INFY");

        // Same response again: request already consumed
        let applied = state.apply_validation(
            token(1),
            &request,
            Some(ValidationResult::Valid(valid("INFY"))),
        );
        assert_eq!(applied, ValidationApplied::Stale);

        state.on_edit(false);
        assert_eq!(state.status(), &ValidationStatus::Idle);
    }

    #[test]
    fn test_rejection() {
        let mut state = InputState::new();
        let request = PendingRequest::new(RequestKind::Validate, token(1), "BADSYM");
        state.begin(&request);

        let applied = state.apply_validation(
            token(1),
            &request,
            Some(ValidationResult::invalid("Invalid stock symbol")),
        );
        assert_eq!(applied, ValidationApplied::Rejected);
        assert_eq!(state.status().error_message(), Some("Invalid stock symbol"));
        assert!(!state.is_validating());
    }

    #[test]
    fn test_stale_validation_keeps_status() {
        let mut state = InputState::new();
        let old = PendingRequest::new(RequestKind::Validate, token(1), "TCS");
        state.begin(&old);
        state.on_edit(false);

        let applied =
            state.apply_validation(token(2), &old, Some(ValidationResult::Valid(valid("TCS"))));
        assert_eq!(applied, ValidationApplied::Stale);
        assert_eq!(state.status(), &ValidationStatus::Idle);
    }

    #[test]
    fn test_blank_answer_returns_to_idle() {
        let mut state = InputState::new();
        let request = PendingRequest::new(RequestKind::Validate, token(1), "");
        state.begin(&request);

        let applied = state.apply_validation(token(1), &request, None);
        assert_eq!(applied, ValidationApplied::Cleared);
        assert_eq!(state.status(), &ValidationStatus::Idle);
        assert!(state.status().error_message().is_none());
        assert!(!state.is_validating());
    }

    #[test]
    fn test_pending_answer_keeps_checking() {
        let mut state = InputState::new();
        let request = PendingRequest::new(RequestKind::Validate, token(1), "TCS");
        state.begin(&request);
        let applied = state.apply_validation(token(1), &request, Some(ValidationResult::Pending));
        assert_eq!(applied, ValidationApplied::Unchanged);
        assert_eq!(state.status(), &ValidationStatus::Checking);
        assert!(state.is_validating());
    }

    #[test]
    fn test_dismiss_keeps_candidates() {
        let mut state = InputState::new();
        let request = PendingRequest::new(RequestKind::Search, token(1), "IN");
        state.begin(&request);
        state.apply_search(token(1), &request, candidates());

        state.dismiss();
        assert!(!state.dropdown_open());
        assert_eq!(state.candidates().len(), 1);

        state.on_commit();
        assert!(state.candidates().is_empty());
    }
}
