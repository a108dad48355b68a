//! Trade Journal Market Data Crate
//!
//! This crate provides the stock lookup capability used by the trade
//! journal's symbol input: a searchable symbol directory and a
//! validation/pricing endpoint.
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |  Symbol input    |  (debounce, staleness guard)
//! +------------------+
//!          |
//!          v
//! +--------------------+
//! | StockLookupService |  (search_stocks, validate_stock)
//! +--------------------+
//!          |
//!          +--> YahooProvider      (Yahoo Finance search + quoteSummary)
//!          +--> DirectoryProvider  (in-memory listing)
//! ```
//!
//! # Core Types
//!
//! - [`SearchCandidate`] - One directory entry returned by a search
//! - [`StockData`] - Price and movement of a recognised symbol
//! - [`StockValidation`] - Wire shape of a validation answer
//! - [`Trend`] - Gain/loss classification of a signed change
//! - [`MarketDataError`] - Failure of a lookup call

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::{FailureKind, MarketDataError};

// Re-export all public types from models
pub use models::{SearchCandidate, StockData, StockValidation, Trend};

// Re-export provider types
pub use provider::directory::{DirectoryProvider, Listing};
pub use provider::yahoo::YahooProvider;
pub use provider::StockLookupService;
