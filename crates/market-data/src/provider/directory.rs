//! In-memory symbol directory.
//!
//! Serves search and validation from a fixed listing. Used when no network
//! provider is configured and as a deterministic source in tests.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::{SearchCandidate, StockData, StockValidation};
use crate::provider::StockLookupService;

const PROVIDER_ID: &str = "DIRECTORY";

/// Default number of candidates returned by a search.
const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Message returned for symbols missing from the directory.
pub const UNKNOWN_SYMBOL_MESSAGE: &str = "Invalid stock symbol";

/// A listed symbol together with its last known price movement.
#[derive(Clone, Debug)]
pub struct Listing {
    pub candidate: SearchCandidate,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
}

impl Listing {
    fn stock_data(&self) -> StockData {
        StockData::new(
            self.candidate.display_name.clone(),
            self.candidate.exchange.clone(),
            self.price,
            self.change,
            self.change_percent,
        )
        .with_currency(self.candidate.currency_code.clone())
    }
}

/// Search rank of a listing for a query; lower is better.
fn rank(listing: &Listing, query: &str) -> Option<u8> {
    let symbol = listing.candidate.symbol.to_uppercase();
    if symbol == query {
        Some(0)
    } else if symbol.starts_with(query) {
        Some(1)
    } else if listing.candidate.display_name.to_uppercase().contains(query) {
        Some(2)
    } else {
        None
    }
}

/// In-memory stock lookup service.
pub struct DirectoryProvider {
    listings: Vec<Listing>,
    by_symbol: HashMap<String, usize>,
    search_limit: usize,
    latency: Duration,
}

impl Default for DirectoryProvider {
    fn default() -> Self {
        Self::new(default_listings())
    }
}

impl DirectoryProvider {
    /// Create a directory over the given listings. Later duplicates of a
    /// symbol replace earlier ones.
    pub fn new(listings: Vec<Listing>) -> Self {
        let mut by_symbol = HashMap::new();
        let mut unique: Vec<Listing> = Vec::with_capacity(listings.len());
        for listing in listings {
            let key = listing.candidate.symbol.to_uppercase();
            match by_symbol.get(&key) {
                Some(&index) => unique[index] = listing,
                None => {
                    by_symbol.insert(key, unique.len());
                    unique.push(listing);
                }
            }
        }
        Self {
            listings: unique,
            by_symbol,
            search_limit: DEFAULT_SEARCH_LIMIT,
            latency: Duration::ZERO,
        }
    }

    /// Cap the number of search results.
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit;
        self
    }

    /// Delay every answer by `latency`, to mimic a remote service.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl StockLookupService for DirectoryProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn search_stocks(&self, query: &str) -> Result<Vec<SearchCandidate>, MarketDataError> {
        let query = query.trim().to_uppercase();
        if query.is_empty() {
            return Err(MarketDataError::InvalidQuery(
                "Search query is empty".to_string(),
            ));
        }

        self.simulate_latency().await;

        let mut ranked: Vec<(u8, usize)> = self
            .listings
            .iter()
            .enumerate()
            .filter_map(|(index, listing)| rank(listing, &query).map(|r| (r, index)))
            .collect();
        // Stable: ties keep listing order
        ranked.sort_by_key(|(r, _)| *r);

        debug!("Directory search '{}' matched {} listing(s)", query, ranked.len());

        Ok(ranked
            .into_iter()
            .take(self.search_limit)
            .map(|(_, index)| self.listings[index].candidate.clone())
            .collect())
    }

    async fn validate_stock(&self, symbol: &str) -> Result<StockValidation, MarketDataError> {
        let key = symbol.trim().to_uppercase();
        if key.is_empty() {
            return Err(MarketDataError::InvalidQuery(
                "Stock symbol is empty".to_string(),
            ));
        }

        self.simulate_latency().await;

        Ok(match self.by_symbol.get(&key) {
            Some(&index) => StockValidation::valid(self.listings[index].stock_data()),
            None => StockValidation::invalid(UNKNOWN_SYMBOL_MESSAGE),
        })
    }
}

fn listing(
    symbol: &str,
    name: &str,
    exchange: &str,
    currency: &str,
    price: Decimal,
    change: Decimal,
    change_percent: Decimal,
) -> Listing {
    Listing {
        candidate: SearchCandidate::new(symbol, name, exchange, currency),
        price,
        change,
        change_percent,
    }
}

/// Built-in listing of frequently traded NSE and NASDAQ symbols.
///
/// Prices, changes and percentages are in hundredths.
#[rustfmt::skip]
pub fn default_listings() -> Vec<Listing> {
    let nse = |symbol: &str, name: &str, price: i64, change: i64, pct: i64| {
        listing(symbol, name, "NSE", "INR", cents(price), cents(change), cents(pct))
    };
    let nasdaq = |symbol: &str, name: &str, price: i64, change: i64, pct: i64| {
        listing(symbol, name, "NASDAQ", "USD", cents(price), cents(change), cents(pct))
    };
    vec![
        nse("RELIANCE", "Reliance Industries Ltd", 245055, 1020, 42),
        nse("TCS", "Tata Consultancy Services Ltd", 352040, -1250, -35),
        nse("INFY", "Infosys Ltd", 145230, 0, 0),
        nse("HDFCBANK", "HDFC Bank Ltd", 153575, 825, 54),
        nse("ICICIBANK", "ICICI Bank Ltd", 98210, -430, -44),
        nse("SBIN", "State Bank of India", 61245, 315, 52),
        nse("ITC", "ITC Ltd", 43870, -95, -22),
        nse("WIPRO", "Wipro Ltd", 46815, 210, 45),
        nse("TATAMOTORS", "Tata Motors Ltd", 94560, 1275, 137),
        nse("TATASTEEL", "Tata Steel Ltd", 14820, -110, -74),
        nasdaq("AAPL", "Apple Inc", 19532, 148, 76),
        nasdaq("MSFT", "Microsoft Corp", 42718, -204, -48),
    ]
}

fn cents(units: i64) -> Decimal {
    Decimal::new(units, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_search_ranks_exact_then_prefix_then_name() {
        let directory = DirectoryProvider::default();
        let results = directory.search_stocks("tata").await.unwrap();
        let symbols: Vec<&str> = results.iter().map(|c| c.symbol.as_str()).collect();
        // TATAMOTORS/TATASTEEL are prefix matches, TCS matches by name
        assert_eq!(symbols, vec!["TATAMOTORS", "TATASTEEL", "TCS"]);

        let results = directory.search_stocks("TCS").await.unwrap();
        assert_eq!(results[0].symbol, "TCS");
    }

    #[tokio::test]
    async fn test_search_respects_limit() {
        let directory = DirectoryProvider::default().with_search_limit(1);
        let results = directory.search_stocks("TATA").await.unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_search_empty_query_is_rejected() {
        let directory = DirectoryProvider::default();
        let err = directory.search_stocks("   ").await.unwrap_err();
        assert!(matches!(err, MarketDataError::InvalidQuery(_)));
    }

    #[tokio::test]
    async fn test_validate_known_symbol() {
        let directory = DirectoryProvider::default();
        let validation = directory.validate_stock("reliance").await.unwrap();
        assert!(validation.is_valid);
        let data = validation.stock_data.unwrap();
        assert_eq!(data.name, "Reliance Industries Ltd");
        assert_eq!(data.price, dec!(2450.55));
        assert_eq!(data.currency.as_deref(), Some("INR"));
    }

    #[tokio::test]
    async fn test_validate_unknown_symbol() {
        let directory = DirectoryProvider::default();
        let validation = directory.validate_stock("BADSYM").await.unwrap();
        assert!(!validation.is_valid);
        assert_eq!(validation.error.as_deref(), Some("Invalid stock symbol"));
    }

    #[test]
    fn test_duplicate_symbols_are_replaced() {
        let directory = DirectoryProvider::new(vec![
            listing("ABC", "First", "NSE", "INR", dec!(1), dec!(0), dec!(0)),
            listing("abc", "Second", "NSE", "INR", dec!(2), dec!(0), dec!(0)),
        ]);
        assert_eq!(directory.len(), 1);
        assert_eq!(directory.listings[0].candidate.display_name, "Second");
    }
}
