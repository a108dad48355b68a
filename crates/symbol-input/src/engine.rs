//! Symbol resolution engine.
//!
//! Wraps a [`StockLookupService`] and shapes its answers for the input:
//! searches never fail (errors become an empty list) and validations of
//! a non-blank symbol always resolve to a [`ValidationResult`].

use std::sync::Arc;

use log::{debug, warn};
use rust_decimal::Decimal;
use tradejournal_market_data::{
    MarketDataError, SearchCandidate, StockData, StockLookupService, StockValidation, Trend,
};

/// Shown when an unknown symbol comes back without a message.
pub const INVALID_SYMBOL_MESSAGE: &str = "Invalid stock symbol";

/// Shown when a failure carries no usable message.
pub const VALIDATION_FAILED_MESSAGE: &str = "Unable to validate stock symbol";

/// A symbol the quote source recognised, with its price.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidSymbol {
    pub symbol: String,
    pub display_name: String,
    pub exchange: String,
    pub price: Decimal,
    pub change_abs: Decimal,
    pub change_pct: Decimal,
    pub currency: Option<String>,
}

impl ValidSymbol {
    fn from_stock_data(symbol: &str, data: StockData) -> Self {
        Self {
            symbol: symbol.to_string(),
            display_name: data.name,
            exchange: data.exchange,
            price: data.price,
            change_abs: data.change,
            change_pct: data.change_percent,
            currency: data.currency,
        }
    }

    pub fn trend(&self) -> Trend {
        Trend::from_change(self.change_pct)
    }

    /// Payload handed to the change listener.
    pub fn to_stock_data(&self) -> StockData {
        let data = StockData::new(
            self.display_name.clone(),
            self.exchange.clone(),
            self.price,
            self.change_abs,
            self.change_pct,
        );
        match &self.currency {
            Some(currency) => data.with_currency(currency.clone()),
            None => data,
        }
    }
}

/// Outcome of validating one symbol.
#[derive(Clone, Debug, PartialEq)]
pub enum ValidationResult {
    Valid(ValidSymbol),
    Invalid { reason_message: String },
    Pending,
}

impl ValidationResult {
    pub fn invalid(reason_message: impl Into<String>) -> Self {
        Self::Invalid {
            reason_message: reason_message.into(),
        }
    }

    fn from_validation(symbol: &str, validation: StockValidation) -> Self {
        match validation {
            StockValidation {
                is_valid: true,
                stock_data: Some(data),
                ..
            } => Self::Valid(ValidSymbol::from_stock_data(symbol, data)),
            StockValidation { is_valid: true, .. } => {
                warn!("Validation of '{}' succeeded without price data", symbol);
                Self::invalid(VALIDATION_FAILED_MESSAGE)
            }
            StockValidation { error, .. } => Self::invalid(
                error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| INVALID_SYMBOL_MESSAGE.to_string()),
            ),
        }
    }

    fn from_error(symbol: &str, error: &MarketDataError) -> Self {
        debug!(
            "Validation of '{}' failed ({}): {}",
            symbol,
            error.kind(),
            error
        );
        let message = error.user_message();
        if message.trim().is_empty() {
            Self::invalid(VALIDATION_FAILED_MESSAGE)
        } else {
            Self::invalid(message)
        }
    }
}

/// Performs the two external queries for the input.
pub struct ResolutionEngine {
    service: Arc<dyn StockLookupService>,
}

impl ResolutionEngine {
    pub fn new(service: Arc<dyn StockLookupService>) -> Self {
        Self { service }
    }

    pub fn service_id(&self) -> &'static str {
        self.service.id()
    }

    /// Ranked candidates for `query`; empty on any failure.
    pub async fn search(&self, query: &str) -> Vec<SearchCandidate> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        match self.service.search_stocks(query).await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(
                    "Search for '{}' via {} failed: {}",
                    query,
                    self.service.id(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Validate and price `symbol`.
    ///
    /// A blank symbol has nothing to validate: the service is not called
    /// and the answer is `None`, which leaves the field `Idle`.
    pub async fn validate(&self, symbol: &str) -> Option<ValidationResult> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return None;
        }

        let result = match self.service.validate_stock(symbol).await {
            Ok(validation) => ValidationResult::from_validation(symbol, validation),
            Err(e) => ValidationResult::from_error(symbol, &e),
        };
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Mode {
        Ok,
        Transport,
        NotFound,
        ValidWithoutData,
    }

    struct MockService {
        mode: Mode,
        calls: AtomicUsize,
    }

    impl MockService {
        fn new(mode: Mode) -> Arc<Self> {
            Arc::new(Self {
                mode,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl StockLookupService for MockService {
        fn id(&self) -> &'static str {
            "MOCK"
        }

        async fn search_stocks(
            &self,
            query: &str,
        ) -> Result<Vec<SearchCandidate>, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.mode {
                Mode::Transport => Err(MarketDataError::Timeout {
                    provider: "MOCK".to_string(),
                }),
                _ => Ok(vec![SearchCandidate::new(query, "Mock Corp", "NSE", "INR")]),
            }
        }

        async fn validate_stock(&self, symbol: &str) -> Result<StockValidation, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.mode {
                Mode::Ok => Ok(StockValidation::valid(
                    StockData::new("Mock Corp", "NSE", dec!(101.5), dec!(0), dec!(0))
                        .with_currency("INR"),
                )),
                Mode::Transport => Err(MarketDataError::ProviderError {
                    provider: "MOCK".to_string(),
                    message: "Service unavailable".to_string(),
                }),
                Mode::NotFound => Err(MarketDataError::SymbolNotFound(symbol.to_string())),
                Mode::ValidWithoutData => Ok(StockValidation {
                    is_valid: true,
                    stock_data: None,
                    error: None,
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_search_returns_candidates() {
        let engine = ResolutionEngine::new(MockService::new(Mode::Ok));
        let results = engine.search(" TCS ").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "TCS");
    }

    #[tokio::test]
    async fn test_search_swallows_errors() {
        let engine = ResolutionEngine::new(MockService::new(Mode::Transport));
        assert!(engine.search("TCS").await.is_empty());
    }

    #[tokio::test]
    async fn test_search_blank_query_skips_service() {
        let service = MockService::new(Mode::Ok);
        let engine = ResolutionEngine::new(service.clone());
        assert!(engine.search("  ").await.is_empty());
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_validate_success() {
        let engine = ResolutionEngine::new(MockService::new(Mode::Ok));
        match engine.validate("TCS").await {
            Some(ValidationResult::Valid(valid)) => {
                assert_eq!(valid.symbol, "TCS");
                assert_eq!(valid.display_name, "Mock Corp");
                assert_eq!(valid.price, dec!(101.5));
                // Zero change is a gain
                assert_eq!(valid.trend(), Trend::Gain);
                assert_eq!(valid.to_stock_data().currency.as_deref(), Some("INR"));
            }
            other => panic!("expected Valid, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_validate_transport_error_uses_message() {
        let engine = ResolutionEngine::new(MockService::new(Mode::Transport));
        assert_eq!(
            engine.validate("TCS").await,
            Some(ValidationResult::invalid("Service unavailable"))
        );
    }

    #[tokio::test]
    async fn test_validate_not_found() {
        let engine = ResolutionEngine::new(MockService::new(Mode::NotFound));
        assert_eq!(
            engine.validate("BADSYM").await,
            Some(ValidationResult::invalid("Invalid stock symbol"))
        );
    }

    #[tokio::test]
    async fn test_validate_without_data_is_invalid() {
        let engine = ResolutionEngine::new(MockService::new(Mode::ValidWithoutData));
        assert_eq!(
            engine.validate("TCS").await,
            Some(ValidationResult::invalid(VALIDATION_FAILED_MESSAGE))
        );
    }

    #[tokio::test]
    async fn test_validate_blank_is_neutral() {
        let service = MockService::new(Mode::NotFound);
        let engine = ResolutionEngine::new(service.clone());
        assert_eq!(engine.validate("").await, None);
        assert_eq!(engine.validate("   ").await, None);
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_upstream_error_message_is_kept() {
        let result = ValidationResult::from_validation(
            "BADSYM",
            StockValidation::invalid("Invalid stock symbol"),
        );
        assert_eq!(result, ValidationResult::invalid("Invalid stock symbol"));

        let result = ValidationResult::from_validation(
            "BADSYM",
            StockValidation {
                is_valid: false,
                stock_data: None,
                error: Some(" ".to_string()),
            },
        );
        assert_eq!(result, ValidationResult::invalid(INVALID_SYMBOL_MESSAGE));
    }
}
