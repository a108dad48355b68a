//! Yahoo Finance stock lookup provider.
//!
//! Search goes through the `yahoo_finance_api` connector. Validation uses
//! the quoteSummary `price` module, which needs the crumb/cookie handshake.

mod models;

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use lazy_static::lazy_static;
use reqwest::header;
use rust_decimal::Decimal;
use tracing::{debug, warn};
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{SearchCandidate, StockData, StockValidation};
use crate::provider::StockLookupService;

use models::{YahooPriceData, YahooQuoteSummaryResponse};

const PROVIDER_ID: &str = "YAHOO";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Message shown when Yahoo does not know the symbol.
const UNKNOWN_SYMBOL_MESSAGE: &str = "Invalid stock symbol";

/// Yahoo symbol suffix to trading currency. Unlisted suffixes trade in USD.
const SUFFIX_CURRENCIES: &[(&str, &str)] = &[
    (".NS", "INR"),
    (".BO", "INR"),
    (".L", "GBP"),
    (".TO", "CAD"),
    (".V", "CAD"),
    (".AX", "AUD"),
    (".HK", "HKD"),
    (".T", "JPY"),
    (".PA", "EUR"),
    (".DE", "EUR"),
    (".AS", "EUR"),
    (".MI", "EUR"),
    (".SW", "CHF"),
];

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Global cache for Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance stock lookup provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    client: reqwest::Client,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, MarketDataError> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to initialize Yahoo connector: {}", e),
            })?;
        Ok(Self {
            connector,
            client: reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?,
        })
    }

    fn transport_error(error: reqwest::Error) -> MarketDataError {
        MarketDataError::from_transport(PROVIDER_ID, error)
    }

    fn provider_error(message: String) -> MarketDataError {
        MarketDataError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message,
        }
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        {
            let guard = YAHOO_CRUMB.read().unwrap_or_else(|p| p.into_inner());
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }

        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // Step 1: Get cookie from fc.yahoo.com
        let response = self
            .client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(Self::transport_error)?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| Self::provider_error("Failed to parse Yahoo cookie".to_string()))?;

        // Step 2: Get crumb using cookie
        let crumb = self
            .client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(Self::transport_error)?
            .text()
            .await
            .map_err(Self::transport_error)?;

        let crumb_data = CrumbData { cookie, crumb };

        let mut guard = YAHOO_CRUMB.write().unwrap_or_else(|p| p.into_inner());
        *guard = Some(crumb_data.clone());

        Ok(crumb_data)
    }

    /// Clear the cached crumb (used when authentication fails)
    fn clear_crumb(&self) {
        let mut guard = YAHOO_CRUMB.write().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    // ========================================================================
    // Validation
    // ========================================================================

    async fn fetch_price_module(
        &self,
        symbol: &str,
    ) -> Result<YahooQuoteSummaryResponse, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules=price&crumb={}",
            encode(symbol),
            encode(&crumb.crumb)
        );

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(Self::transport_error)?;

        match response.status() {
            reqwest::StatusCode::UNAUTHORIZED => {
                self.clear_crumb();
                return Err(Self::provider_error(
                    "Yahoo authentication expired".to_string(),
                ));
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => {
                return Err(MarketDataError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                });
            }
            // 404 still carries a quoteSummary body with an error object
            status if status.is_server_error() => {
                return Err(Self::provider_error(format!(
                    "Yahoo returned HTTP {}",
                    status
                )));
            }
            _ => {}
        }

        response
            .json()
            .await
            .map_err(|e| Self::provider_error(format!("Failed to parse quote response: {}", e)))
    }
}

#[async_trait]
impl StockLookupService for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn search_stocks(&self, query: &str) -> Result<Vec<SearchCandidate>, MarketDataError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(MarketDataError::InvalidQuery(
                "Search query is empty".to_string(),
            ));
        }

        debug!("Searching Yahoo for '{}'", query);

        let result = self
            .connector
            .search_ticker(&encode(query))
            .await
            .map_err(|e| Self::provider_error(e.to_string()))?;

        let candidates = result
            .quotes
            .iter()
            .map(|item| {
                SearchCandidate::new(
                    &item.symbol,
                    display_name(&item.long_name, &item.symbol),
                    &item.exchange,
                    currency_for_symbol(&item.symbol),
                )
            })
            .collect();

        Ok(candidates)
    }

    async fn validate_stock(&self, symbol: &str) -> Result<StockValidation, MarketDataError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(MarketDataError::InvalidQuery(
                "Stock symbol is empty".to_string(),
            ));
        }

        debug!("Validating '{}' against Yahoo", symbol);

        let data = self.fetch_price_module(symbol).await?;

        if let Some(error) = data.quote_summary.error {
            debug!(
                "Yahoo rejected '{}': {}",
                symbol,
                error.description.as_deref().unwrap_or("no description")
            );
            return Ok(StockValidation::invalid(UNKNOWN_SYMBOL_MESSAGE));
        }

        let price = data
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .find_map(|r| r.price);

        match price.and_then(|p| price_to_stock_data(symbol, &p)) {
            Some(stock) => Ok(StockValidation::valid(stock)),
            None => {
                warn!("Yahoo returned no usable price for '{}'", symbol);
                Ok(StockValidation::invalid(UNKNOWN_SYMBOL_MESSAGE))
            }
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert the price module into `StockData`. Returns `None` without a price.
fn price_to_stock_data(symbol: &str, price: &YahooPriceData) -> Option<StockData> {
    let raw = |detail: &Option<models::YahooPriceDetail>| {
        detail
            .as_ref()
            .and_then(|d| d.raw)
            .and_then(Decimal::from_f64_retain)
    };

    let last = raw(&price.regular_market_price)?;
    let change = raw(&price.regular_market_change)
        .unwrap_or(Decimal::ZERO)
        .round_dp(2);
    // Yahoo reports a fraction
    let change_percent = raw(&price.regular_market_change_percent)
        .map(|f| (f * Decimal::ONE_HUNDRED).round_dp(2))
        .unwrap_or(Decimal::ZERO);

    let name = price
        .long_name
        .as_deref()
        .or(price.short_name.as_deref())
        .unwrap_or(symbol);

    let currency = price
        .currency
        .clone()
        .unwrap_or_else(|| currency_for_symbol(symbol).to_string());

    let stock = StockData::new(
        name.replace("&amp;", "&"),
        price.exchange_name.clone().unwrap_or_default(),
        last,
        change,
        change_percent,
    )
    .with_currency(currency);

    let as_of = price
        .regular_market_time
        .and_then(|ts| Utc.timestamp_opt(ts, 0).single());

    Some(match as_of {
        Some(as_of) => stock.with_as_of(as_of),
        None => stock,
    })
}

fn display_name(long_name: &str, symbol: &str) -> String {
    let name = long_name.replace("&amp;", "&");
    if name.trim().is_empty() {
        symbol.to_string()
    } else {
        name
    }
}

/// Trading currency implied by a Yahoo symbol suffix.
fn currency_for_symbol(symbol: &str) -> &'static str {
    let upper = symbol.to_uppercase();
    SUFFIX_CURRENCIES
        .iter()
        .find(|(suffix, _)| upper.ends_with(suffix))
        .map(|(_, currency)| *currency)
        .unwrap_or("USD")
}
