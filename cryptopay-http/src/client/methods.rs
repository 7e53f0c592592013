use cryptopay::proto::{
    ApiMethod, AppStats, Balance, Check, CreateCheckParams, CreateInvoiceParams, Currency,
    DeleteCheckParams, DeleteInvoiceParams, ExchangeRate, GetChecksParams, GetInvoicesParams,
    GetStatsParams, GetTransfersParams, Invoice, Page, Profile, Transfer, TransferParams,
};

use super::{ClientError, CryptoPay};

/// Typed gateway endpoints.
///
/// Every method is a `GET` with a query string, mutating ones included.
/// All of them fail with [`ClientError`]; see [`CryptoPay::request`].
#[allow(clippy::missing_errors_doc)]
impl CryptoPay {
    /// Basic information about the app.
    pub async fn get_me(&self) -> Result<Profile, ClientError> {
        self.get_plain(ApiMethod::GetMe).await
    }

    /// App statistics for a time window.
    pub async fn get_stats(&self, params: &GetStatsParams) -> Result<AppStats, ClientError> {
        self.get(ApiMethod::GetStats, params).await
    }

    /// Balances of every asset.
    pub async fn get_balance(&self) -> Result<Vec<Balance>, ClientError> {
        self.get_plain(ApiMethod::GetBalance).await
    }

    /// Current exchange rates for every supported pair.
    pub async fn get_exchange_rates(&self) -> Result<Vec<ExchangeRate>, ClientError> {
        self.get_plain(ApiMethod::GetExchangeRates).await
    }

    /// Every currency the gateway supports.
    pub async fn get_currencies(&self) -> Result<Vec<Currency>, ClientError> {
        self.get_plain(ApiMethod::GetCurrencies).await
    }

    /// Creates an invoice.
    pub async fn create_invoice(&self, params: &CreateInvoiceParams) -> Result<Invoice, ClientError> {
        self.get(ApiMethod::CreateInvoice, params).await
    }

    /// Lists invoices matching `params`.
    pub async fn get_invoices(&self, params: &GetInvoicesParams) -> Result<Vec<Invoice>, ClientError> {
        let page: Page<Invoice> = self.get(ApiMethod::GetInvoices, params).await?;
        Ok(page.items)
    }

    /// Deletes an invoice. Returns the gateway's confirmation flag.
    pub async fn delete_invoice(&self, invoice_id: u64) -> Result<bool, ClientError> {
        self.get(ApiMethod::DeleteInvoice, &DeleteInvoiceParams { invoice_id })
            .await
    }

    /// Sends coins from the app balance to a user.
    ///
    /// Reusing a `spend_id` never sends twice; the gateway rejects the repeat.
    pub async fn transfer(&self, params: &TransferParams) -> Result<Transfer, ClientError> {
        self.get(ApiMethod::Transfer, params).await
    }

    /// Lists transfers matching `params`.
    pub async fn get_transfers(
        &self,
        params: &GetTransfersParams,
    ) -> Result<Vec<Transfer>, ClientError> {
        let page: Page<Transfer> = self.get(ApiMethod::GetTransfers, params).await?;
        Ok(page.items)
    }

    /// Creates a check.
    pub async fn create_check(&self, params: &CreateCheckParams) -> Result<Check, ClientError> {
        self.get(ApiMethod::CreateCheck, params).await
    }

    /// Lists checks matching `params`.
    pub async fn get_checks(&self, params: &GetChecksParams) -> Result<Vec<Check>, ClientError> {
        let page: Page<Check> = self.get(ApiMethod::GetChecks, params).await?;
        Ok(page.items)
    }

    /// Deletes a check. Returns the gateway's confirmation flag.
    pub async fn delete_check(&self, check_id: u64) -> Result<bool, ClientError> {
        self.get(ApiMethod::DeleteCheck, &DeleteCheckParams { check_id })
            .await
    }
}
