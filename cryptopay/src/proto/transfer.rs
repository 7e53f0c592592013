//! Transfers: payouts from the app balance to a user.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{Asset, TransferStatus};

/// A completed transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Unique ID for this transfer.
    pub transfer_id: u64,
    /// Optional idempotency key supplied when the transfer was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend_id: Option<String>,
    /// Telegram user ID the coins were sent to.
    pub user_id: u64,
    /// Asset of the transfer.
    pub asset: Asset,
    /// Amount of the transfer.
    pub amount: Decimal,
    /// Status of the transfer.
    pub status: TransferStatus,
    /// When the transfer was completed.
    pub completed_at: DateTime<Utc>,
    /// Comment shown to the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}
