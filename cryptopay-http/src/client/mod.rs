//! Crypto Pay API client.
//!
//! [`CryptoPay`] owns the API token, the gateway base URL, one lazily opened
//! HTTP session and the webhook handler list. One typed method per gateway
//! endpoint, such as [`CryptoPay::create_invoice`], funnels through
//! [`CryptoPay::request`].
//!
//! ## Session lifecycle
//!
//! - The session is opened on the first outbound call and reused afterwards.
//! - [`CryptoPay::close`] drops it. Closing twice, or closing a client that
//!   never made a call, is a no-op.
//! - A call after `close` opens a fresh session.
//! - Requests already in flight when `close` runs finish on the old session.
//!
//! ## Error Handling
//!
//! See [`ClientError`]. An `"ok": false` envelope becomes
//! [`ClientError::Gateway`], carrying a [`GatewayError`](cryptopay::GatewayError)
//! whose [`kind`](cryptopay::GatewayError::kind) can be matched per code.
//!
//! # Example
//!
//! ```rust,no_run
//! use cryptopay::Network;
//! use cryptopay::proto::{Asset, CreateInvoiceParams};
//! use cryptopay_http::CryptoPay;
//!
//! # async fn run() -> Result<(), cryptopay_http::error::ClientError> {
//! let client = CryptoPay::new("1234:AAA", Network::Testnet)?;
//! let invoice = client
//!     .create_invoice(&CreateInvoiceParams::new("2.5".parse().unwrap()).with_asset(Asset::Usdt))
//!     .await?;
//! println!("pay at {}", invoice.bot_invoice_url);
//! client.close().await;
//! # Ok(())
//! # }
//! ```

mod methods;

use std::fmt::{self, Display};
use std::time::Duration;

use cryptopay::proto::{ApiMethod, ApiResponse, EnvelopeError};
use cryptopay::webhook::{Delivery, PaymentHandler, WebhookDispatcher, WebhookError};
use cryptopay::{Network, Update};
use http::header::{HeaderMap, HeaderValue};
use http::{Method, StatusCode};
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use url::Url;

#[cfg(feature = "telemetry")]
use tracing::{Span, instrument};

use crate::constants::API_TOKEN_HEADER;
pub use crate::error::ClientError;

/// Client for the Crypto Pay API.
///
/// Cheap to share behind an [`Arc`](std::sync::Arc); every method takes
/// `&self` except handler registration, which is done before sharing.
pub struct CryptoPay {
    token: String,
    network: Network,
    base_url: Url,
    headers: HeaderMap,
    timeout: Option<Duration>,
    session: RwLock<Option<Client>>,
    webhook: WebhookDispatcher,
}

impl fmt::Debug for CryptoPay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptoPay")
            .field("token", &"<redacted>")
            .field("network", &self.network)
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("webhook", &self.webhook)
            .finish_non_exhaustive()
    }
}

impl CryptoPay {
    /// Creates a client for `network`. No connection is opened yet.
    ///
    /// # Errors
    ///
    /// [`ClientError::InvalidToken`] if the token cannot be sent as a header.
    pub fn new(token: impl Into<String>, network: Network) -> Result<Self, ClientError> {
        let token = token.into();
        let mut value = HeaderValue::from_str(&token).map_err(|_| ClientError::InvalidToken)?;
        value.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(API_TOKEN_HEADER, value);
        let base_url = network_url(network)?;
        let webhook = WebhookDispatcher::from_token(&token);
        Ok(Self {
            token,
            network,
            base_url,
            headers,
            timeout: None,
            session: RwLock::new(None),
            webhook,
        })
    }

    /// Switches to another network's gateway.
    ///
    /// # Errors
    ///
    /// [`ClientError::UrlParse`] if the network's URL does not parse.
    pub fn with_network(mut self, network: Network) -> Result<Self, ClientError> {
        self.base_url = network_url(network)?;
        self.network = network;
        Ok(self)
    }

    /// Points the client at a different gateway host, e.g. a proxy or a mock.
    #[must_use]
    pub fn with_base_url(mut self, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        self.base_url = base_url;
        self
    }

    /// Sets a timeout for every future request.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The network this client was created for.
    #[must_use]
    pub const fn network(&self) -> Network {
        self.network
    }

    /// The gateway base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The configured timeout, if any.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The API token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Appends a payment handler. See [`WebhookDispatcher::register_handler`].
    pub fn register_handler(&mut self, handler: impl PaymentHandler + 'static) {
        self.webhook.register_handler(handler);
    }

    /// The webhook dispatcher keyed with this client's token.
    #[must_use]
    pub const fn webhook(&self) -> &WebhookDispatcher {
        &self.webhook
    }

    /// Verifies and parses a webhook body without dispatching it.
    ///
    /// # Errors
    ///
    /// See [`WebhookDispatcher::verify_update`].
    pub fn verify_update(&self, body: &[u8], signature: Option<&str>) -> Result<Update, WebhookError> {
        self.webhook.verify_update(body, signature)
    }

    /// Verifies, parses and dispatches one webhook delivery.
    pub async fn process_update(&self, body: &[u8], signature: Option<&str>) -> Delivery {
        self.webhook.process(body, signature).await
    }

    /// Returns `true` while an HTTP session is open.
    pub async fn is_open(&self) -> bool {
        self.session.read().await.is_some()
    }

    /// Releases the HTTP session. Safe to call more than once.
    pub async fn close(&self) {
        let closed = self.session.write().await.take();
        #[cfg(feature = "telemetry")]
        tracing::debug!(was_open = closed.is_some(), "cryptopay.session_closed");
        drop(closed);
    }

    async fn session(&self) -> Result<Client, ClientError> {
        if let Some(client) = self.session.read().await.as_ref() {
            return Ok(client.clone());
        }
        let mut guard = self.session.write().await;
        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .build()
            .map_err(|source| ClientError::Transport {
                context: "Failed to open HTTP session",
                source,
            })?;
        #[cfg(feature = "telemetry")]
        tracing::debug!("cryptopay.session_opened");
        *guard = Some(client.clone());
        Ok(client)
    }

    /// Calls `endpoint` and unwraps the response envelope.
    ///
    /// `query` is serialized into the URL; `body`, if any, is sent as JSON.
    /// The token travels only in the `Crypto-Pay-API-Token` header.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Transport`] on network faults and timeouts
    /// - [`ClientError::Gateway`] when the envelope says `"ok": false`
    /// - [`ClientError::JsonDeserialization`] when a success body does not parse
    /// - [`ClientError::HttpStatus`] when a failure body is not an envelope
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "cryptopay.request",
            skip_all,
            fields(
                method = %endpoint,
                otel.status_code = tracing::field::Empty,
                error.message = tracing::field::Empty
            )
        )
    )]
    pub async fn request<Q, R>(
        &self,
        verb: Method,
        endpoint: ApiMethod,
        query: Option<&Q>,
        body: Option<&serde_json::Value>,
    ) -> Result<R, ClientError>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let result = self.send(verb, endpoint, query, body).await;
        record_result_on_span(&result);
        result
    }

    async fn send<Q, R>(
        &self,
        verb: Method,
        endpoint: ApiMethod,
        query: Option<&Q>,
        body: Option<&serde_json::Value>,
    ) -> Result<R, ClientError>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let context = endpoint.name();
        let url = self
            .base_url
            .join(&endpoint.path())
            .map_err(|source| ClientError::UrlParse { context, source })?;

        let mut req = self.session().await?.request(verb, url);
        for (key, value) in &self.headers {
            req = req.header(key, value);
        }
        if let Some(query) = query {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        let http_response = req
            .send()
            .await
            .map_err(|source| ClientError::Transport { context, source })?;

        let status = http_response.status();
        let bytes = http_response
            .bytes()
            .await
            .map_err(|source| ClientError::ResponseBodyRead { context, source })?;

        let envelope = match serde_json::from_slice::<ApiResponse<R>>(&bytes) {
            Ok(envelope) => envelope,
            Err(source) if status.is_success() => {
                return Err(ClientError::JsonDeserialization { context, source });
            }
            Err(_) => {
                return Err(ClientError::HttpStatus {
                    context,
                    status,
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }
        };

        envelope.into_result().map_err(|err| match err {
            EnvelopeError::Gateway(err) => ClientError::Gateway(err),
            EnvelopeError::Malformed(reason) => ClientError::MalformedEnvelope { context, reason },
        })
    }

    /// `GET` with query parameters.
    pub(crate) async fn get<Q, R>(&self, endpoint: ApiMethod, query: &Q) -> Result<R, ClientError>
    where
        Q: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(Method::GET, endpoint, Some(query), None).await
    }

    /// `GET` without parameters.
    pub(crate) async fn get_plain<R>(&self, endpoint: ApiMethod) -> Result<R, ClientError>
    where
        R: DeserializeOwned,
    {
        self.request::<(), R>(Method::GET, endpoint, None, None).await
    }
}

fn network_url(network: Network) -> Result<Url, ClientError> {
    Url::parse(network.base_url()).map_err(|source| ClientError::UrlParse {
        context: "Failed to parse network base url",
        source,
    })
}

/// Records the outcome of a request on a tracing span, including status and errors.
#[cfg(feature = "telemetry")]
fn record_result_on_span<R, E: Display>(result: &Result<R, E>) {
    let span = Span::current();
    match result {
        Ok(_) => {
            span.record("otel.status_code", "OK");
        }
        Err(err) => {
            span.record("otel.status_code", "ERROR");
            span.record("error.message", tracing::field::display(err));
            tracing::event!(tracing::Level::ERROR, error = %err, "Request to gateway failed");
        }
    }
}

/// Records the outcome of a request on a tracing span, including status and errors.
/// Noop if telemetry feature is off.
#[cfg(not(feature = "telemetry"))]
fn record_result_on_span<R, E: Display>(_result: &Result<R, E>) {}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptopay::ErrorKind;
    use cryptopay::proto::Profile;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> CryptoPay {
        CryptoPay::new("1234:TEST", Network::Testnet)
            .unwrap()
            .with_base_url(server.uri().parse().unwrap())
    }

    fn profile_json() -> serde_json::Value {
        json!({
            "ok": true,
            "result": {
                "app_id": 42,
                "name": "Test shop",
                "payment_processing_bot_username": "CryptoTestnetBot"
            }
        })
    }

    #[test]
    fn network_selects_base_url() {
        let client = CryptoPay::new("t", Network::Mainnet).unwrap();
        assert_eq!(client.base_url().as_str(), "https://pay.crypt.bot/");
        let client = client.with_network(Network::Testnet).unwrap();
        assert_eq!(client.base_url().as_str(), "https://testnet-pay.crypt.bot/");
        assert_eq!(client.network(), Network::Testnet);
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = CryptoPay::new("t", Network::Mainnet)
            .unwrap()
            .with_base_url("http://localhost:8080/proxy".parse().unwrap());
        assert_eq!(client.base_url().as_str(), "http://localhost:8080/proxy/");
    }

    #[test]
    fn token_with_newline_is_rejected() {
        assert!(matches!(
            CryptoPay::new("bad\ntoken", Network::Mainnet),
            Err(ClientError::InvalidToken)
        ));
    }

    #[test]
    fn debug_redacts_token() {
        let client = CryptoPay::new("1234:SECRET", Network::Mainnet).unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("SECRET"));
    }

    #[tokio::test]
    async fn sends_token_header_and_unwraps_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/getMe"))
            .and(header(API_TOKEN_HEADER, "1234:TEST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let profile: Profile = client.get_plain(ApiMethod::GetMe).await.unwrap();
        assert_eq!(profile.app_id, 42);
    }

    #[tokio::test]
    async fn failed_envelope_becomes_gateway_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/getMe"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "ok": false,
                "error": { "code": 401, "name": "UNAUTHORIZED" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.get_plain::<Profile>(ApiMethod::GetMe).await.unwrap_err();
        let gateway = err.as_gateway().unwrap();
        assert_eq!(gateway.name(), "UNAUTHORIZED");
        assert!(gateway.is(ErrorKind::for_code(401)));
        assert!(!gateway.is(ErrorKind::for_code(400)));
    }

    #[tokio::test]
    async fn non_json_failure_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/getMe"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        match client.get_plain::<Profile>(ApiMethod::GetMe).await {
            Err(ClientError::HttpStatus { status, body, .. }) => {
                assert_eq!(status, StatusCode::BAD_GATEWAY);
                assert_eq!(body, "Bad Gateway");
            }
            other => panic!("expected HttpStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unexpected_success_shape_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/getMe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": { "app_id": "not a number" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(matches!(
            client.get_plain::<Profile>(ApiMethod::GetMe).await,
            Err(ClientError::JsonDeserialization { .. })
        ));
    }

    #[tokio::test]
    async fn timeout_is_a_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/getMe"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(profile_json())
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).with_timeout(Duration::from_millis(50));
        let err = client.get_plain::<Profile>(ApiMethod::GetMe).await.unwrap_err();
        assert!(err.is_timeout(), "{err}");
    }

    #[tokio::test]
    async fn session_is_lazy_reused_and_reopened() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/getMe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
            .expect(3)
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(!client.is_open().await);
        client.close().await;

        let _: Profile = client.get_plain(ApiMethod::GetMe).await.unwrap();
        let _: Profile = client.get_plain(ApiMethod::GetMe).await.unwrap();
        assert!(client.is_open().await);

        client.close().await;
        client.close().await;
        assert!(!client.is_open().await);

        let _: Profile = client.get_plain(ApiMethod::GetMe).await.unwrap();
        assert!(client.is_open().await);
    }

    #[tokio::test]
    async fn concurrent_requests_share_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/getMe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json()))
            .expect(4)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let (a, b, c, d) = tokio::join!(
            client.get_plain::<Profile>(ApiMethod::GetMe),
            client.get_plain::<Profile>(ApiMethod::GetMe),
            client.get_plain::<Profile>(ApiMethod::GetMe),
            client.get_plain::<Profile>(ApiMethod::GetMe),
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok() && d.is_ok());
    }
}
