//! Error types and failure classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all lookup operations
//! - [`FailureKind`]: Classification used by callers that fold errors into outcomes

mod kind;

pub use kind::FailureKind;

use thiserror::Error;

/// Errors that can occur while searching or validating stock symbols.
///
/// Each variant is classified into a [`FailureKind`] via the [`kind`](Self::kind)
/// method, which tells the caller whether the service rejected the symbol or
/// simply could not be reached.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol does not exist at the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The query cannot be sent as-is (empty, malformed).
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the failure classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use tradejournal_market_data::errors::{FailureKind, MarketDataError};
    ///
    /// let error = MarketDataError::SymbolNotFound("BADSYM".to_string());
    /// assert_eq!(error.kind(), FailureKind::SemanticInvalid);
    ///
    /// let error = MarketDataError::Timeout { provider: "YAHOO".to_string() };
    /// assert_eq!(error.kind(), FailureKind::Transport);
    /// ```
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::SymbolNotFound(_) | Self::InvalidQuery(_) => FailureKind::SemanticInvalid,

            Self::RateLimited { .. }
            | Self::Timeout { .. }
            | Self::ProviderError { .. }
            | Self::Network(_) => FailureKind::Transport,
        }
    }

    /// Classify a failed HTTP exchange with `provider`.
    ///
    /// Timeouts keep the provider name; everything else is a network error.
    pub fn from_transport(provider: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                provider: provider.to_string(),
            }
        } else {
            Self::Network(error)
        }
    }

    /// Human readable message without the variant prefix.
    ///
    /// Used when the failure is shown next to the input field.
    pub fn user_message(&self) -> String {
        match self {
            Self::SymbolNotFound(_) => "Invalid stock symbol".to_string(),
            Self::InvalidQuery(message) => message.clone(),
            Self::ProviderError { message, .. } if !message.trim().is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_not_found_is_semantic() {
        let error = MarketDataError::SymbolNotFound("BADSYM".to_string());
        assert_eq!(error.kind(), FailureKind::SemanticInvalid);
    }

    #[test]
    fn test_invalid_query_is_semantic() {
        let error = MarketDataError::InvalidQuery("empty symbol".to_string());
        assert_eq!(error.kind(), FailureKind::SemanticInvalid);
    }

    #[test]
    fn test_transport_failures() {
        let errors = [
            MarketDataError::RateLimited {
                provider: "YAHOO".to_string(),
            },
            MarketDataError::Timeout {
                provider: "YAHOO".to_string(),
            },
            MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: "Internal server error".to_string(),
            },
        ];
        for error in errors {
            assert_eq!(error.kind(), FailureKind::Transport, "{}", error);
        }
    }

    #[tokio::test]
    async fn test_malformed_request_is_network_error() {
        let error = reqwest::Client::new()
            .get("not a url")
            .send()
            .await
            .unwrap_err();

        let error = MarketDataError::from_transport("YAHOO", error);
        assert!(matches!(error, MarketDataError::Network(_)));
        assert_eq!(error.kind(), FailureKind::Transport);
    }

    #[tokio::test]
    async fn test_silent_server_is_timeout() {
        // Accepts connections through the backlog but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(50))
            .build()
            .unwrap();
        let error = client.get(&url).send().await.unwrap_err();

        let error = MarketDataError::from_transport("YAHOO", error);
        assert!(matches!(error, MarketDataError::Timeout { ref provider } if provider == "YAHOO"));
        assert_eq!(error.kind(), FailureKind::Transport);
        drop(listener);
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::SymbolNotFound("BADSYM".to_string());
        assert_eq!(format!("{}", error), "Symbol not found: BADSYM");

        let error = MarketDataError::ProviderError {
            provider: "YAHOO".to_string(),
            message: "Service unavailable".to_string(),
        };
        assert_eq!(
            format!("{}", error),
            "Provider error: YAHOO - Service unavailable"
        );
    }

    #[test]
    fn test_user_message() {
        let error = MarketDataError::SymbolNotFound("BADSYM".to_string());
        assert_eq!(error.user_message(), "Invalid stock symbol");

        let error = MarketDataError::ProviderError {
            provider: "YAHOO".to_string(),
            message: "Service unavailable".to_string(),
        };
        assert_eq!(error.user_message(), "Service unavailable");

        let error = MarketDataError::ProviderError {
            provider: "YAHOO".to_string(),
            message: String::new(),
        };
        assert!(error.user_message().starts_with("Provider error: YAHOO"));

        let error = MarketDataError::Timeout {
            provider: "YAHOO".to_string(),
        };
        assert_eq!(error.user_message(), "Timeout: YAHOO");
    }
}
