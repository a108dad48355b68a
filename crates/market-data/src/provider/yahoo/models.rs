//! Yahoo Finance API response models.
//!
//! Only the `price` module of the quoteSummary API is parsed; it carries
//! everything needed to confirm a symbol and show its last price.

use serde::Deserialize;

/// Main response wrapper for quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResponse {
    pub quote_summary: YahooQuoteSummary,
}

/// Quote summary container
#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummary {
    #[serde(default)]
    pub result: Option<Vec<YahooQuoteSummaryResult>>,
    #[serde(default)]
    pub error: Option<YahooQuoteSummaryError>,
}

/// Error object Yahoo returns for unknown symbols
/// (e.g. `{"code": "Not Found", "description": "Quote not found for ticker symbol: BADSYM"}`)
#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummaryError {
    pub code: Option<String>,
    pub description: Option<String>,
}

/// Individual result from quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResult {
    pub price: Option<YahooPriceData>,
}

/// Price data from quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooPriceData {
    pub currency: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub exchange_name: Option<String>,
    pub regular_market_price: Option<YahooPriceDetail>,
    pub regular_market_change: Option<YahooPriceDetail>,
    /// Fraction, not percent: 0.0042 means +0.42%
    pub regular_market_change_percent: Option<YahooPriceDetail>,
    pub regular_market_time: Option<i64>,
}

/// Price detail with raw and formatted values
#[derive(Debug, Deserialize, Clone)]
pub struct YahooPriceDetail {
    pub raw: Option<f64>,
}
