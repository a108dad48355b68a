//! Search result models for symbol lookup.

use serde::{Deserialize, Serialize};

/// One entry of the symbol directory, as returned by a search.
///
/// Candidates are not validated; picking one still goes through
/// `validate_stock` before a price is shown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCandidate {
    /// Symbol/ticker (e.g., "RELIANCE", "AAPL")
    pub symbol: String,

    /// Display name (e.g., "Reliance Industries Ltd")
    #[serde(rename = "name")]
    pub display_name: String,

    /// Exchange name (e.g., "NSE", "NASDAQ")
    pub exchange: String,

    /// Trading currency (e.g., "INR", "USD")
    #[serde(rename = "currency")]
    pub currency_code: String,
}

impl SearchCandidate {
    /// Create a new candidate with all fields.
    pub fn new(
        symbol: impl Into<String>,
        display_name: impl Into<String>,
        exchange: impl Into<String>,
        currency_code: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            display_name: display_name.into(),
            exchange: exchange.into(),
            currency_code: currency_code.into(),
        }
    }
}
