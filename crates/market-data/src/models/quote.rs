use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a price movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Gain,
    Loss,
}

impl Trend {
    /// Classify a signed change. Zero counts as a gain.
    pub fn from_change(change: Decimal) -> Self {
        if change >= Decimal::ZERO {
            Self::Gain
        } else {
            Self::Loss
        }
    }
}

/// Price data for a symbol the service recognised.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockData {
    /// Company or fund name
    pub name: String,

    /// Exchange name
    pub exchange: String,

    /// Last traded price
    pub price: Decimal,

    /// Absolute change since previous close (signed)
    pub change: Decimal,

    /// Percent change since previous close (signed)
    pub change_percent: Decimal,

    /// Quote currency, when the provider reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Time of the last trade, when the provider reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<DateTime<Utc>>,
}

impl StockData {
    /// Create price data with the required fields.
    pub fn new(
        name: impl Into<String>,
        exchange: impl Into<String>,
        price: Decimal,
        change: Decimal,
        change_percent: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            exchange: exchange.into(),
            price,
            change,
            change_percent,
            currency: None,
            as_of: None,
        }
    }

    /// Set the currency.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Set the trade timestamp.
    pub fn with_as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = Some(as_of);
        self
    }

    pub fn trend(&self) -> Trend {
        Trend::from_change(self.change_percent)
    }
}

/// Response of a symbol validation call.
///
/// `is_valid == true` implies `stock_data` is present. When the symbol is
/// unknown the provider may attach a human readable `error`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockValidation {
    pub is_valid: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_data: Option<StockData>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StockValidation {
    /// A recognised symbol with its price data.
    pub fn valid(data: StockData) -> Self {
        Self {
            is_valid: true,
            stock_data: Some(data),
            error: None,
        }
    }

    /// An unknown symbol with an explanatory message.
    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            stock_data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trend_boundary_is_gain() {
        assert_eq!(Trend::from_change(dec!(0.00)), Trend::Gain);
        assert_eq!(Trend::from_change(dec!(0.01)), Trend::Gain);
        assert_eq!(Trend::from_change(dec!(-0.01)), Trend::Loss);
    }

    #[test]
    fn test_stock_data_trend_uses_percent() {
        let data = StockData::new(
            "Tata Consultancy Services",
            "NSE",
            dec!(3520.40),
            dec!(-12.5),
            dec!(-0.35),
        );
        assert_eq!(data.trend(), Trend::Loss);
    }

    #[test]
    fn test_validation_wire_shape() {
        let invalid = StockValidation::invalid("Invalid stock symbol");
        let json = serde_json::to_value(&invalid).unwrap();
        assert_eq!(json["isValid"], false);
        assert_eq!(json["error"], "Invalid stock symbol");
        assert!(json.get("stockData").is_none());

        let valid = StockValidation::valid(
            StockData::new(
                "Reliance Industries",
                "NSE",
                dec!(2450.55),
                dec!(10.2),
                dec!(0.42),
            )
            .with_currency("INR"),
        );
        let json = serde_json::to_value(&valid).unwrap();
        assert_eq!(json["isValid"], true);
        assert_eq!(json["stockData"]["name"], "Reliance Industries");
        assert_eq!(json["stockData"]["currency"], "INR");
    }
}
