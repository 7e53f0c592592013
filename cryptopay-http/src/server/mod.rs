//! axum route receiving Crypto Pay webhook deliveries.
//!
//! The route reads the raw body and the `Crypto-Pay-Api-Signature` header,
//! hands both to [`CryptoPay::process_update`], and always answers
//! `200 {"msg": "Status OK!"}`. Rejected and malformed deliveries are logged
//! (feature: `telemetry`) but never change the response.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use cryptopay::{Network, Update};
//! use cryptopay_http::CryptoPay;
//! use cryptopay_http::server::webhook_router;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = CryptoPay::new("1234:AAA", Network::Testnet)?;
//! client.register_handler(|update: Update| async move {
//!     println!("paid: {}", update.payload.invoice_id);
//! });
//! let app = webhook_router("/cryptopay", Arc::new(client));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use serde_json::{Value, json};

use crate::client::CryptoPay;
use crate::constants::{SIGNATURE_HEADER, WEBHOOK_ACK_MESSAGE};

/// Shared state of the webhook route.
pub type WebhookState = Arc<CryptoPay>;

/// Builds a router serving the webhook at `path` (`POST` only).
///
/// # Panics
///
/// If `path` is not a valid axum route path, i.e. does not start with `/`.
#[must_use]
pub fn webhook_router(path: &str, client: WebhookState) -> Router {
    Router::new()
        .route(path, post(post_webhook))
        .with_state(client)
}

/// `POST {path}` - Verifies and dispatches one delivery.
pub async fn post_webhook(
    State(client): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Value> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    #[cfg_attr(not(feature = "telemetry"), allow(unused_variables))]
    let delivery = client.process_update(&body, signature).await;
    #[cfg(feature = "telemetry")]
    tracing::debug!(?delivery, "cryptopay.webhook_delivery");
    ack()
}

/// The body sent in reply to every delivery.
#[must_use]
pub fn ack() -> Json<Value> {
    Json(json!({ "msg": WEBHOOK_ACK_MESSAGE }))
}
