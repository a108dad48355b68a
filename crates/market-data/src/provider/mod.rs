//! Stock lookup abstractions and implementations.
//!
//! This module contains:
//! - The `StockLookupService` trait that all lookup sources implement
//! - `YahooProvider`, backed by Yahoo Finance search and quoteSummary
//! - `DirectoryProvider`, an in-memory directory for offline use

mod traits;

pub mod directory;
pub mod yahoo;

// Re-exports
pub use traits::StockLookupService;
