//! Invoices and the webhook update that reports them paid.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{Asset, CurrencyType, Fiat, InvoiceStatus, PaidButton, UpdateType};

/// A payable request for funds.
///
/// Returned by `createInvoice` and `getInvoices`, and embedded in every
/// [`Update`]. Unknown fields sent by the gateway are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique ID for this invoice.
    pub invoice_id: u64,
    /// Hash of the invoice.
    pub hash: String,
    /// Whether [`Self::amount`] is in crypto or fiat.
    pub currency_type: CurrencyType,
    /// Asset of the invoice, for crypto invoices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Asset>,
    /// Fiat currency of the invoice, for fiat invoices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiat: Option<Fiat>,
    /// Amount of the invoice.
    pub amount: Decimal,
    /// Asset the invoice was paid in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_asset: Option<Asset>,
    /// Amount of [`Self::paid_asset`] that was paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_amount: Option<Decimal>,
    /// Rate of [`Self::paid_asset`] against [`Self::fiat`], for paid fiat invoices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_fiat_rate: Option<Decimal>,
    /// Assets the payer may use, for fiat invoices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_assets: Option<Vec<Asset>>,
    /// Asset of the service fee charged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_asset: Option<Asset>,
    /// Amount of the service fee charged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_amount: Option<Decimal>,
    /// Service fee in USD.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee_in_usd: Option<Decimal>,
    /// URL to pay the invoice in the bot.
    pub bot_invoice_url: String,
    /// URL to pay the invoice in the Telegram mini app.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mini_app_invoice_url: Option<String>,
    /// URL to pay the invoice in the web app.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_app_invoice_url: Option<String>,
    /// Description shown to the payer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Current status.
    pub status: InvoiceStatus,
    /// When the invoice was created.
    pub created_at: DateTime<Utc>,
    /// Price of the paid asset in USD at the time of payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_usd_rate: Option<Decimal>,
    /// Whether the payer may leave a comment.
    pub allow_comments: bool,
    /// Whether the payer may pay anonymously.
    pub allow_anonymous: bool,
    /// When the invoice expires, if an expiry was set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
    /// When the invoice was paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    /// Whether the invoice was paid anonymously.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_anonymously: Option<bool>,
    /// Comment left by the payer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Message shown to the payer after payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_message: Option<String>,
    /// Opaque data attached by the app at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Label of the button shown after payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_btn_name: Option<PaidButton>,
    /// URL opened by the button shown after payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_btn_url: Option<String>,
}

impl Invoice {
    /// Returns `true` once the invoice has been paid.
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }
}

/// An inbound webhook notification.
///
/// One instance per verified delivery. Built only from a body whose
/// signature has already been checked; see [`crate::webhook`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    /// Non-unique delivery ID; retries of the same event reuse it.
    pub update_id: u64,
    /// Kind of event.
    pub update_type: UpdateType,
    /// When the gateway sent the request.
    pub request_date: DateTime<Utc>,
    /// The invoice the event is about.
    pub payload: Invoice,
}
