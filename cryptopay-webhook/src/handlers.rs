//! Axum routes and payment handlers for the receiver.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use cryptopay::Update;
use cryptopay_http::CryptoPay;
use cryptopay_http::server::webhook_router;
use tower_http::trace::TraceLayer;

use crate::config::HEALTH_PATH;

/// Logs every paid invoice.
pub async fn log_payment(update: Update) {
    let invoice = &update.payload;
    tracing::info!(
        update_id = update.update_id,
        update_type = %update.update_type,
        invoice_id = invoice.invoice_id,
        amount = %invoice.amount,
        asset = ?invoice.asset,
        fiat = ?invoice.fiat,
        paid_asset = ?invoice.paid_asset,
        paid_amount = ?invoice.paid_amount,
        payload = ?invoice.payload,
        "Invoice paid"
    );
}

/// `GET /health` - Liveness probe.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Builds the receiver's router: the webhook at `path` plus `/health`.
#[must_use]
pub fn receiver_router(client: Arc<CryptoPay>, path: &str) -> Router {
    Router::new()
        .merge(webhook_router(path, client))
        .route(HEALTH_PATH, get(health))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use cryptopay::Network;
    use tower::ServiceExt;

    fn router() -> Router {
        let mut client = CryptoPay::new("TOKEN", Network::Testnet).unwrap();
        client.register_handler(log_payment);
        receiver_router(Arc::new(client), "/cryptopay")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn webhook_is_mounted_at_configured_path() {
        let response = router()
            .oneshot(
                Request::post("/cryptopay")
                    .body(Body::from(r#"{"update_id":1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router()
            .oneshot(Request::post("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
