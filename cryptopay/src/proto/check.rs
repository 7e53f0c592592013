//! Checks: redeemable vouchers for a fixed amount.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{Asset, CheckStatus};

/// A check created by the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    /// Unique ID for this check.
    pub check_id: u64,
    /// Hash of the check.
    pub hash: String,
    /// Asset of the check.
    pub asset: Asset,
    /// Amount of the check.
    pub amount: Decimal,
    /// URL a user opens to activate the check.
    pub bot_check_url: String,
    /// Current status.
    pub status: CheckStatus,
    /// When the check was created.
    pub created_at: DateTime<Utc>,
    /// When the check was activated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_active_check() {
        let check: Check = serde_json::from_value(serde_json::json!({
            "check_id": 1,
            "hash": "CQM2SNFzKsqC",
            "asset": "USDT",
            "amount": "5",
            "bot_check_url": "https://t.me/CryptoBot?start=CQM2SNFzKsqC",
            "status": "active",
            "created_at": "2024-03-10T12:00:00.000Z"
        }))
        .unwrap();
        assert_eq!(check.status, CheckStatus::Active);
        assert_eq!(check.amount, Decimal::from(5));
        assert!(check.activated_at.is_none());
    }
}
