//! App-level records: profile, statistics, balances, rates and currencies.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{Asset, CurrencyCode, Fiat};

/// Basic information about the app, returned by `getMe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// App ID.
    pub app_id: u64,
    /// App name.
    pub name: String,
    /// Username of the bot that processes payments for the app.
    pub payment_processing_bot_username: String,
}

/// App statistics for a time window, returned by `getStats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppStats {
    /// Total paid volume in USD.
    pub volume: Decimal,
    /// Share of created invoices that were paid.
    pub conversion: Decimal,
    /// Number of distinct payers.
    pub unique_users_count: u64,
    /// Number of invoices created.
    pub created_invoice_count: u64,
    /// Number of invoices paid.
    pub paid_invoice_count: u64,
    /// Start of the window.
    pub start_at: DateTime<Utc>,
    /// End of the window.
    pub end_at: DateTime<Utc>,
}

/// Balance of one asset, returned by `getBalance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// Asset code.
    pub currency_code: Asset,
    /// Amount available for transfers and checks.
    pub available: Decimal,
    /// Amount reserved by pending operations.
    pub onhold: Decimal,
}

/// One exchange rate, returned by `getExchangeRates`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Whether the rate is current.
    pub is_valid: bool,
    /// Whether [`Self::source`] is a cryptocurrency.
    pub is_crypto: bool,
    /// Whether [`Self::source`] is a fiat currency.
    pub is_fiat: bool,
    /// Source currency code.
    pub source: CurrencyCode,
    /// Target fiat currency.
    pub target: Fiat,
    /// Price of one unit of `source` in `target`.
    pub rate: Decimal,
}

/// A currency supported by the gateway, returned by `getCurrencies`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// Whether the currency is a blockchain asset.
    pub is_blockchain: bool,
    /// Whether the currency is a stablecoin.
    pub is_stablecoin: bool,
    /// Whether the currency is fiat.
    pub is_fiat: bool,
    /// Display name.
    pub name: String,
    /// Currency code.
    pub code: CurrencyCode,
    /// Project URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Number of decimal places.
    pub decimals: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_rate_with_crypto_source() {
        let rate: ExchangeRate = serde_json::from_value(json!({
            "is_valid": true,
            "is_crypto": true,
            "is_fiat": false,
            "source": "TON",
            "target": "USD",
            "rate": "5.31"
        }))
        .unwrap();
        assert_eq!(rate.source.asset(), Asset::Ton);
        assert_eq!(rate.target, Fiat::Usd);
    }

    #[test]
    fn parses_balance_with_numeric_amounts() {
        let balance: Balance = serde_json::from_value(json!({
            "currency_code": "USDT",
            "available": 12,
            "onhold": "0"
        }))
        .unwrap();
        assert_eq!(balance.available, Decimal::from(12));
        assert!(balance.onhold.is_zero());
    }
}
