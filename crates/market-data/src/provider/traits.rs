//! Stock lookup trait definitions.
//!
//! This module defines the `StockLookupService` trait that every
//! symbol directory / quote source implements.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{SearchCandidate, StockValidation};

/// Capability consumed by the symbol input: a searchable symbol directory
/// plus a validation/pricing endpoint.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use tradejournal_market_data::{MarketDataError, SearchCandidate, StockLookupService, StockValidation};
///
/// struct MyDirectory;
///
/// #[async_trait]
/// impl StockLookupService for MyDirectory {
///     fn id(&self) -> &'static str {
///         "MY_DIRECTORY"
///     }
///
///     async fn search_stocks(&self, query: &str) -> Result<Vec<SearchCandidate>, MarketDataError> {
///         // ...
///     }
///
///     async fn validate_stock(&self, symbol: &str) -> Result<StockValidation, MarketDataError> {
///         // ...
///     }
/// }
/// ```
#[async_trait]
pub trait StockLookupService: Send + Sync {
    /// Unique identifier for this service, used for logging.
    fn id(&self) -> &'static str;

    /// Search the directory for symbols matching `query`.
    ///
    /// Results are relevance-ranked, best match first. Callers treat
    /// the first entry as the most likely pick.
    async fn search_stocks(&self, query: &str) -> Result<Vec<SearchCandidate>, MarketDataError>;

    /// Check that `symbol` exists and fetch its current price.
    ///
    /// An unknown symbol is reported either as `Ok` with
    /// `is_valid == false` or as [`MarketDataError::SymbolNotFound`];
    /// both mean the same thing to callers.
    async fn validate_stock(&self, symbol: &str) -> Result<StockValidation, MarketDataError>;
}
