//! Market data models
//!
//! This module contains the core data types for symbol lookup:
//! - `search` - Directory entries returned by a symbol search (SearchCandidate)
//! - `quote` - Validation payloads and price movement (StockData, StockValidation, Trend)

mod quote;
mod search;

pub use quote::{StockData, StockValidation, Trend};
pub use search::SearchCandidate;
