//! Wire format types for the Crypto Pay API.
//!
//! # Key Types
//!
//! - [`ApiMethod`] - The gateway's endpoints and their paths
//! - [`ApiResponse`] - The `{ ok, result | error }` envelope every method returns
//! - [`Invoice`] / [`Update`] - Invoices and the webhook notification that carries them
//! - [`Check`], [`Transfer`], [`Balance`], [`ExchangeRate`], [`Currency`] - Other records
//! - [`params`] - Query parameters for each method
//!
//! # Wire Format
//!
//! Responses are JSON with `snake_case` field names. Amounts arrive as decimal
//! strings (occasionally bare numbers) and are parsed into [`Decimal`](rust_decimal::Decimal).
//! Timestamps are RFC 3339. Unknown fields are ignored and unknown enum values
//! are preserved as `Other(..)` variants, so new gateway features never break
//! parsing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

mod app;
mod check;
mod enums;
mod invoice;
pub mod params;
mod transfer;

pub use app::{AppStats, Balance, Currency, ExchangeRate, Profile};
pub use check::Check;
pub use enums::{
    Asset, CheckStatus, CurrencyCode, CurrencyType, Fiat, InvoiceStatus, PaidButton,
    TransferStatus, UpdateType,
};
pub use invoice::{Invoice, Update};
pub use params::{
    CreateCheckParams, CreateInvoiceParams, DeleteCheckParams, DeleteInvoiceParams,
    GetChecksParams, GetInvoicesParams, GetStatsParams, GetTransfersParams, TransferParams,
};
pub use transfer::Transfer;

#[cfg(test)]
pub(crate) use invoice::fixtures;

/// One gateway endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiMethod {
    /// `getMe`
    GetMe,
    /// `getStats`
    GetStats,
    /// `getBalance`
    GetBalance,
    /// `getExchangeRates`
    GetExchangeRates,
    /// `getCurrencies`
    GetCurrencies,
    /// `createInvoice`
    CreateInvoice,
    /// `getInvoices`
    GetInvoices,
    /// `deleteInvoice`
    DeleteInvoice,
    /// `transfer`
    Transfer,
    /// `getTransfers`
    GetTransfers,
    /// `createCheck`
    CreateCheck,
    /// `getChecks`
    GetChecks,
    /// `deleteCheck`
    DeleteCheck,
}

impl ApiMethod {
    /// Every endpoint, in documentation order.
    pub const ALL: &'static [Self] = &[
        Self::GetMe,
        Self::GetStats,
        Self::GetBalance,
        Self::GetExchangeRates,
        Self::GetCurrencies,
        Self::CreateInvoice,
        Self::GetInvoices,
        Self::DeleteInvoice,
        Self::Transfer,
        Self::GetTransfers,
        Self::CreateCheck,
        Self::GetChecks,
        Self::DeleteCheck,
    ];

    /// The method name as it appears in the URL.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetMe => "getMe",
            Self::GetStats => "getStats",
            Self::GetBalance => "getBalance",
            Self::GetExchangeRates => "getExchangeRates",
            Self::GetCurrencies => "getCurrencies",
            Self::CreateInvoice => "createInvoice",
            Self::GetInvoices => "getInvoices",
            Self::DeleteInvoice => "deleteInvoice",
            Self::Transfer => "transfer",
            Self::GetTransfers => "getTransfers",
            Self::CreateCheck => "createCheck",
            Self::GetChecks => "getChecks",
            Self::DeleteCheck => "deleteCheck",
        }
    }

    /// The path relative to the network's base URL, e.g. `api/getMe`.
    #[must_use]
    pub fn path(self) -> String {
        format!("api/{}", self.name())
    }
}

impl fmt::Display for ApiMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error payload of a failed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Numeric error code, usually mirroring the HTTP status.
    pub code: i64,
    /// Short machine-readable name, e.g. `INVOICES_NOT_FOUND`.
    pub name: String,
}

/// The envelope around every method's response.
///
/// `ok: true` carries `result`; `ok: false` carries `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded.
    pub ok: bool,
    /// Method result on success.
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    /// Error on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
}

/// Why an [`ApiResponse`] did not yield a result.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The gateway rejected the call.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    /// `ok` disagreed with the fields present.
    #[error("malformed response envelope: {0}")]
    Malformed(&'static str),
}

impl<T> ApiResponse<T> {
    /// Unwraps the envelope into the result or a [`GatewayError`].
    ///
    /// # Errors
    ///
    /// [`EnvelopeError::Gateway`] for `ok: false`, [`EnvelopeError::Malformed`]
    /// when the envelope lacks the field its `ok` flag promises.
    pub fn into_result(self) -> Result<T, EnvelopeError> {
        if self.ok {
            return self
                .result
                .ok_or(EnvelopeError::Malformed("ok response without result"));
        }
        match self.error {
            Some(ApiErrorBody { code, name }) => Err(GatewayError::new(code, name).into()),
            None => Err(EnvelopeError::Malformed("failed response without error")),
        }
    }
}

/// A page of records returned by the list methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Records on this page.
    pub items: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde_json::json;

    #[test]
    fn method_paths() {
        assert_eq!(ApiMethod::GetMe.path(), "api/getMe");
        assert_eq!(ApiMethod::GetExchangeRates.path(), "api/getExchangeRates");
        assert_eq!(ApiMethod::ALL.len(), 13);
    }

    #[test]
    fn ok_envelope_yields_result() {
        let response: ApiResponse<Profile> = serde_json::from_value(json!({
            "ok": true,
            "result": {
                "app_id": 7,
                "name": "Shop",
                "payment_processing_bot_username": "CryptoTestnetBot"
            }
        }))
        .unwrap();
        assert_eq!(response.into_result().unwrap().app_id, 7);
    }

    #[test]
    fn error_envelope_yields_gateway_error() {
        let response: ApiResponse<Profile> = serde_json::from_value(json!({
            "ok": false,
            "error": { "code": 401, "name": "UNAUTHORIZED" }
        }))
        .unwrap();
        match response.into_result() {
            Err(EnvelopeError::Gateway(err)) => {
                assert_eq!(err.code(), 401);
                assert_eq!(err.name(), "UNAUTHORIZED");
                assert!(err.is(ErrorKind::for_code(401)));
            }
            other => panic!("expected gateway error, got {other:?}"),
        }
    }

    #[test]
    fn inconsistent_envelopes_are_malformed() {
        let ok_without_result: ApiResponse<bool> =
            serde_json::from_value(json!({ "ok": true })).unwrap();
        assert!(matches!(
            ok_without_result.into_result(),
            Err(EnvelopeError::Malformed(_))
        ));

        let failed_without_error: ApiResponse<bool> =
            serde_json::from_value(json!({ "ok": false })).unwrap();
        assert!(matches!(
            failed_without_error.into_result(),
            Err(EnvelopeError::Malformed(_))
        ));
    }

    #[test]
    fn page_of_invoices() {
        let page: Page<Invoice> =
            serde_json::from_value(json!({ "items": [fixtures::invoice_json()] })).unwrap();
        assert_eq!(page.items.len(), 1);
    }
}
