//! Crypto Pay webhook receiver.
//!
//! # Usage
//!
//! ```bash
//! # Run with default config (config.toml in current directory)
//! CRYPTO_PAY_TOKEN=1234:AAA cargo run -p cryptopay-webhook --release
//!
//! # Run with custom config path
//! CONFIG=/path/to/config.toml cargo run -p cryptopay-webhook
//!
//! # Configure logging level
//! RUST_LOG=debug cargo run -p cryptopay-webhook
//! ```
//!
//! # Environment Variables
//!
//! - `CONFIG` - Path to TOML configuration file (default: `config.toml`)
//! - `HOST` - Override bind address (default: `0.0.0.0`)
//! - `PORT` - Override port (default: `8080`)
//! - `CRYPTO_PAY_TOKEN` - API token when the file sets none
//! - `RUST_LOG` - Log level filter (default: `info`)
//!
//! Variables may also come from a `.env` file in the working directory.

use std::net::SocketAddr;
use std::sync::Arc;

use cryptopay::Network;
use cryptopay_http::CryptoPay;
use tracing_subscriber::EnvFilter;

use cryptopay_webhook::config::WebhookConfig;
use cryptopay_webhook::handlers::{log_payment, receiver_router};
use cryptopay_webhook::util::SigDown;

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();

    // Initialize tracing with RUST_LOG env filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded .env");
    }

    if let Err(e) = run().await {
        tracing::error!("Webhook receiver failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = WebhookConfig::load()?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        path = %config.path,
        testnet = config.testnet,
        "Loaded configuration"
    );

    let mut client = CryptoPay::new(config.token.as_str(), Network::from_testnet_flag(config.testnet))?;
    if let Some(timeout) = config.timeout() {
        client = client.with_timeout(timeout);
    }
    client.register_handler(log_payment);
    let client = Arc::new(client);

    match client.get_me().await {
        Ok(profile) => tracing::info!(
            app_id = profile.app_id,
            name = %profile.name,
            bot = %profile.payment_processing_bot_username,
            "Authenticated with gateway"
        ),
        Err(e) => tracing::warn!("Could not reach gateway, serving webhooks anyway: {e}"),
    }

    if let Some(startup) = &config.startup_invoice {
        match client.create_invoice(&startup.params()).await {
            Ok(invoice) => tracing::info!(
                invoice_id = invoice.invoice_id,
                url = %invoice.bot_invoice_url,
                "Created startup invoice"
            ),
            Err(e) => tracing::warn!("Failed to create startup invoice: {e}"),
        }
    }

    let app = receiver_router(Arc::clone(&client), &config.path);

    let addr = SocketAddr::new(config.host, config.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Webhook receiver listening on http://{addr}{}", config.path);

    let sig_down = SigDown::try_new()?;
    let token = sig_down.cancellation_token();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { token.cancelled().await })
        .await?;
    sig_down.recv().await;

    client.close().await;
    tracing::info!("Webhook receiver shut down gracefully");
    Ok(())
}
