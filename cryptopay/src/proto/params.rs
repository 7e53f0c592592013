//! Request parameters for the gateway's methods.
//!
//! Every method is called with `GET` and a query string, including the ones
//! that create or delete things. These types serialize straight into that
//! query string:
//!
//! - absent optional fields are dropped, never sent empty;
//! - booleans serialize as the literals `true` / `false`;
//! - list fields (assets, IDs) are joined with commas;
//! - amounts are decimal strings, never floats.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_with::formats::CommaSeparator;
use serde_with::{StringWithSeparator, serde_as};

use super::enums::{Asset, CheckStatus, CurrencyType, Fiat, InvoiceStatus, PaidButton};

/// Parameters for `getStats`. Both bounds are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetStatsParams {
    /// Start of the window. The gateway defaults to 24 hours ago.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,
    /// End of the window. The gateway defaults to now.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
}

/// Parameters for `createInvoice`.
///
/// ```rust
/// use cryptopay::Decimal;
/// use cryptopay::proto::{Asset, CreateInvoiceParams};
///
/// let params = CreateInvoiceParams::new(Decimal::new(1, 1))
///     .with_asset(Asset::Ton)
///     .with_description("Coffee");
/// assert_eq!(params.description.as_deref(), Some("Coffee"));
/// ```
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateInvoiceParams {
    /// `crypto` (default on the gateway) or `fiat`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_type: Option<CurrencyType>,
    /// Asset, required for crypto invoices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<Asset>,
    /// Fiat currency, required for fiat invoices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fiat: Option<Fiat>,
    /// Assets the payer may use, for fiat invoices.
    #[serde_as(as = "Option<StringWithSeparator::<CommaSeparator, Asset>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted_assets: Option<Vec<Asset>>,
    /// Amount in [`Self::asset`] or [`Self::fiat`] units.
    pub amount: Decimal,
    /// Description shown to the payer, up to 1024 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Message shown to the payer after payment, up to 2048 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_message: Option<String>,
    /// Label of the button shown after payment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_btn_name: Option<PaidButton>,
    /// URL opened by the button shown after payment. Required with `paid_btn_name`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_btn_url: Option<String>,
    /// Opaque app data returned in the invoice, up to 4 KB.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Allow the payer to add a comment. Gateway default: `true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_comments: Option<bool>,
    /// Allow anonymous payment. Gateway default: `true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_anonymous: Option<bool>,
    /// Seconds until the invoice expires (1 to 2 678 400).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u32>,
}

impl CreateInvoiceParams {
    /// Creates parameters for an invoice of `amount`, all options unset.
    #[must_use]
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount,
            ..Self::default()
        }
    }

    /// Sets a crypto asset.
    #[must_use]
    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.asset = Some(asset);
        self
    }

    /// Makes this a fiat invoice in `fiat`.
    #[must_use]
    pub fn with_fiat(mut self, fiat: Fiat) -> Self {
        self.currency_type = Some(CurrencyType::Fiat);
        self.fiat = Some(fiat);
        self
    }

    /// Restricts which assets may pay a fiat invoice.
    #[must_use]
    pub fn with_accepted_assets(mut self, assets: impl IntoIterator<Item = Asset>) -> Self {
        self.accepted_assets = Some(assets.into_iter().collect());
        self
    }

    /// Sets the description shown to the payer.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the app payload.
    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Sets the button shown after payment.
    #[must_use]
    pub fn with_paid_button(mut self, name: PaidButton, url: impl Into<String>) -> Self {
        self.paid_btn_name = Some(name);
        self.paid_btn_url = Some(url.into());
        self
    }

    /// Sets the expiry in seconds.
    #[must_use]
    pub const fn with_expires_in(mut self, seconds: u32) -> Self {
        self.expires_in = Some(seconds);
        self
    }
}

/// Filters for `getInvoices`.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetInvoicesParams {
    /// Only invoices in this asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<Asset>,
    /// Only invoices with these IDs.
    #[serde_as(as = "Option<StringWithSeparator::<CommaSeparator, u64>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_ids: Option<Vec<u64>>,
    /// Only invoices in this status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
    /// Number of invoices to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Number of invoices to return (1 to 1000, gateway default 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

/// Parameters for `deleteInvoice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteInvoiceParams {
    /// Invoice to delete.
    pub invoice_id: u64,
}

/// Parameters for `transfer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferParams {
    /// Telegram user ID of the recipient.
    pub user_id: u64,
    /// Asset to send.
    pub asset: Asset,
    /// Amount to send.
    pub amount: Decimal,
    /// Idempotency key, up to 64 characters. Repeating it never pays twice.
    pub spend_id: String,
    /// Comment shown to the recipient, up to 1024 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Suppress the recipient's notification. Gateway default: `false`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_send_notification: Option<bool>,
}

impl TransferParams {
    /// Creates transfer parameters with no comment.
    #[must_use]
    pub fn new(user_id: u64, asset: Asset, amount: Decimal, spend_id: impl Into<String>) -> Self {
        Self {
            user_id,
            asset,
            amount,
            spend_id: spend_id.into(),
            comment: None,
            disable_send_notification: None,
        }
    }

    /// Sets the comment shown to the recipient.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Filters for `getTransfers`.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetTransfersParams {
    /// Only transfers in this asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<Asset>,
    /// Only transfers with these IDs.
    #[serde_as(as = "Option<StringWithSeparator::<CommaSeparator, u64>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_ids: Option<Vec<u64>>,
    /// Number of transfers to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Number of transfers to return (1 to 1000, gateway default 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

/// Parameters for `createCheck`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateCheckParams {
    /// Asset of the check.
    pub asset: Asset,
    /// Amount of the check.
    pub amount: Decimal,
    /// Only this Telegram user may activate the check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_to_user_id: Option<u64>,
    /// Only this Telegram username may activate the check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_to_username: Option<String>,
}

impl CreateCheckParams {
    /// Creates an unpinned check.
    #[must_use]
    pub const fn new(asset: Asset, amount: Decimal) -> Self {
        Self {
            asset,
            amount,
            pin_to_user_id: None,
            pin_to_username: None,
        }
    }
}

/// Filters for `getChecks`.
#[serde_as]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GetChecksParams {
    /// Only checks in this asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset: Option<Asset>,
    /// Only checks with these IDs.
    #[serde_as(as = "Option<StringWithSeparator::<CommaSeparator, u64>>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_ids: Option<Vec<u64>>,
    /// Only checks in this status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CheckStatus>,
    /// Number of checks to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    /// Number of checks to return (1 to 1000, gateway default 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

/// Parameters for `deleteCheck`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteCheckParams {
    /// Check to delete.
    pub check_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn omitted_options_are_not_serialized() {
        let params = CreateInvoiceParams::new(Decimal::new(1, 1)).with_asset(Asset::Ton);
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value, json!({ "asset": "TON", "amount": "0.1" }));
    }

    #[test]
    fn lists_are_comma_joined() {
        let params = CreateInvoiceParams::new(Decimal::from(10))
            .with_fiat(Fiat::Usd)
            .with_accepted_assets([Asset::Usdt, Asset::Ton]);
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["accepted_assets"], "USDT,TON");
        assert_eq!(value["currency_type"], "fiat");

        let filter = GetInvoicesParams {
            invoice_ids: Some(vec![1, 2, 3]),
            ..GetInvoicesParams::default()
        };
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({ "invoice_ids": "1,2,3" })
        );
    }

    #[test]
    fn stats_window_uses_rfc3339() {
        let params = GetStatsParams {
            start_at: Some("2024-01-01T00:00:00Z".parse().unwrap()),
            end_at: None,
        };
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({ "start_at": "2024-01-01T00:00:00Z" })
        );
    }
}
