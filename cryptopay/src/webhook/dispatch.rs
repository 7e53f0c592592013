use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;

use futures_util::FutureExt;

use super::signature::WebhookSecret;
use crate::proto::Update;

/// Error a [`PaymentHandler`] may return. Logged and otherwise ignored.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future returned by [`PaymentHandler::handle`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Receives every verified [`Update`].
///
/// Any `Fn(Update) -> impl Future<Output = ()>` closure is a handler too, so
/// most callers never implement this trait by hand.
///
/// ```rust
/// use cryptopay::WebhookDispatcher;
///
/// let mut dispatcher = WebhookDispatcher::from_token("TOKEN");
/// dispatcher.register_handler(|update: cryptopay::Update| async move {
///     println!("invoice {} paid", update.payload.invoice_id);
/// });
/// assert_eq!(dispatcher.handler_count(), 1);
/// ```
pub trait PaymentHandler: Send + Sync {
    /// Handles one update. An error is logged; later handlers still run.
    fn handle<'a>(&'a self, update: &'a Update) -> BoxFuture<'a, Result<(), HandlerError>>;
}

impl<F, Fut> PaymentHandler for F
where
    F: Fn(Update) -> Fut + Send + Sync,
    Fut: Future<Output = ()> + Send + 'static,
{
    fn handle<'a>(&'a self, update: &'a Update) -> BoxFuture<'a, Result<(), HandlerError>> {
        let fut = self(update.clone());
        Box::pin(async move {
            fut.await;
            Ok(())
        })
    }
}

/// A verified body that is not a valid [`Update`].
#[derive(Debug, thiserror::Error)]
#[error("invalid update body: {0}")]
pub struct ValidationError(#[from] serde_json::Error);

/// Why a delivery was not turned into an [`Update`].
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The signature header was absent or did not match the body.
    #[error("webhook signature mismatch")]
    SignatureMismatch,
    /// The signature matched but the body is not a valid update.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// How one handler failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerFailure {
    /// The handler returned an error.
    Error {
        /// Position of the handler in registration order.
        index: usize,
        /// Rendered error.
        message: String,
    },
    /// The handler panicked.
    Panic {
        /// Position of the handler in registration order.
        index: usize,
        /// Panic payload, when it was a string.
        message: String,
    },
}

impl HandlerFailure {
    /// Position of the failing handler in registration order.
    #[must_use]
    pub const fn index(&self) -> usize {
        match self {
            Self::Error { index, .. } | Self::Panic { index, .. } => *index,
        }
    }
}

/// Result of running every handler for one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// ID of the dispatched update.
    pub update_id: u64,
    /// Number of handlers invoked.
    pub handlers: usize,
    /// Handlers that failed, in invocation order.
    pub failures: Vec<HandlerFailure>,
}

impl DispatchReport {
    /// Returns `true` if every handler completed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// What happened to one inbound delivery.
///
/// Whatever the variant, the HTTP response to the gateway is the same
/// acknowledgement.
#[derive(Debug)]
pub enum Delivery {
    /// Signature absent or wrong. Nothing was parsed or dispatched.
    Rejected,
    /// Signature valid but the body is not an update. Nothing was dispatched.
    Invalid(ValidationError),
    /// The update reached every registered handler.
    Dispatched(DispatchReport),
}

/// Verifies inbound deliveries and fans them out to registered handlers.
///
/// Registration takes `&mut self`, so handlers are added during setup,
/// before the dispatcher is shared. After that the handler list is read-only
/// and any number of deliveries may be processed concurrently.
pub struct WebhookDispatcher {
    secret: WebhookSecret,
    handlers: Vec<Box<dyn PaymentHandler>>,
}

impl fmt::Debug for WebhookDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookDispatcher")
            .field("secret", &self.secret)
            .field("handlers", &format!("[{} handlers]", self.handlers.len()))
            .finish()
    }
}

impl WebhookDispatcher {
    /// Creates a dispatcher with no handlers.
    #[must_use]
    pub const fn new(secret: WebhookSecret) -> Self {
        Self {
            secret,
            handlers: Vec::new(),
        }
    }

    /// Creates a dispatcher whose key is derived from `token`.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        Self::new(WebhookSecret::from_token(token))
    }

    /// Appends a handler. Handlers run in registration order; duplicates are kept.
    pub fn register_handler(&mut self, handler: impl PaymentHandler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// The signing key.
    #[must_use]
    pub const fn secret(&self) -> &WebhookSecret {
        &self.secret
    }

    /// Verifies `body` against `signature`, then parses it.
    ///
    /// # Errors
    ///
    /// [`WebhookError::SignatureMismatch`] if the signature does not match;
    /// [`WebhookError::Validation`] if it matches but the body is not an update.
    pub fn verify_update(&self, body: &[u8], signature: Option<&str>) -> Result<Update, WebhookError> {
        if !self.secret.verify(body, signature) {
            return Err(WebhookError::SignatureMismatch);
        }
        let update = serde_json::from_slice(body).map_err(ValidationError::from)?;
        Ok(update)
    }

    /// Runs every handler on `update`, one after the other.
    ///
    /// A handler that errors or panics is recorded in the report and the
    /// next one still runs.
    pub async fn dispatch(&self, update: &Update) -> DispatchReport {
        let mut failures = Vec::new();
        for (index, handler) in self.handlers.iter().enumerate() {
            let outcome = AssertUnwindSafe(async { handler.handle(update).await })
                .catch_unwind()
                .await;
            let failure = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => HandlerFailure::Error {
                    index,
                    message: err.to_string(),
                },
                Err(payload) => HandlerFailure::Panic {
                    index,
                    message: panic_message(payload.as_ref()).to_owned(),
                },
            };
            #[cfg(feature = "telemetry")]
            tracing::error!(update_id = update.update_id, failure = ?failure, "payment handler failed");
            failures.push(failure);
        }
        DispatchReport {
            update_id: update.update_id,
            handlers: self.handlers.len(),
            failures,
        }
    }

    /// Verifies, parses and dispatches one raw delivery.
    pub async fn process(&self, body: &[u8], signature: Option<&str>) -> Delivery {
        match self.verify_update(body, signature) {
            Ok(update) => Delivery::Dispatched(self.dispatch(&update).await),
            Err(WebhookError::SignatureMismatch) => {
                #[cfg(feature = "telemetry")]
                tracing::warn!(
                    body_len = body.len(),
                    has_signature = signature.is_some(),
                    "rejected webhook delivery with bad signature"
                );
                Delivery::Rejected
            }
            Err(WebhookError::Validation(err)) => {
                #[cfg(feature = "telemetry")]
                tracing::warn!(error = %err, "signed webhook body is not a valid update");
                Delivery::Invalid(err)
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::fixtures::update_json;
    use std::sync::{Arc, Mutex};

    fn signed_update(dispatcher: &WebhookDispatcher) -> (Vec<u8>, String) {
        let body = serde_json::to_vec(&update_json()).unwrap();
        let signature = dispatcher.secret().sign(&body);
        (body, signature)
    }

    fn recorder(log: Arc<Mutex<Vec<&'static str>>>, name: &'static str) -> impl PaymentHandler {
        move |_update: Update| {
            let log = Arc::clone(&log);
            async move { log.lock().unwrap().push(name) }
        }
    }

    struct Failing;

    impl PaymentHandler for Failing {
        fn handle<'a>(&'a self, _update: &'a Update) -> BoxFuture<'a, Result<(), HandlerError>> {
            Box::pin(async { Err::<(), HandlerError>("database unavailable".into()) })
        }
    }

    async fn explode(_update: Update) {
        panic!("boom");
    }

    #[tokio::test]
    async fn dispatch_preserves_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = WebhookDispatcher::from_token("TOKEN");
        dispatcher.register_handler(recorder(Arc::clone(&log), "h1"));
        dispatcher.register_handler(recorder(Arc::clone(&log), "h2"));
        dispatcher.register_handler(recorder(Arc::clone(&log), "h3"));

        let (body, signature) = signed_update(&dispatcher);
        let Delivery::Dispatched(report) = dispatcher.process(&body, Some(&signature)).await else {
            panic!("expected dispatch");
        };
        assert_eq!(report.handlers, 3);
        assert!(report.is_clean());
        assert_eq!(*log.lock().unwrap(), ["h1", "h2", "h3"]);
    }

    #[tokio::test]
    async fn duplicate_registration_runs_twice() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = WebhookDispatcher::from_token("TOKEN");
        let handler = recorder(Arc::clone(&log), "same");
        dispatcher.register_handler(recorder(Arc::clone(&log), "same"));
        dispatcher.register_handler(handler);

        let (body, signature) = signed_update(&dispatcher);
        dispatcher.process(&body, Some(&signature)).await;
        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn failing_handlers_do_not_stop_later_ones() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = WebhookDispatcher::from_token("TOKEN");
        dispatcher.register_handler(Failing);
        dispatcher.register_handler(explode);
        dispatcher.register_handler(recorder(Arc::clone(&log), "survivor"));

        let (body, signature) = signed_update(&dispatcher);
        let Delivery::Dispatched(report) = dispatcher.process(&body, Some(&signature)).await else {
            panic!("expected dispatch");
        };
        assert_eq!(*log.lock().unwrap(), ["survivor"]);
        assert_eq!(
            report.failures,
            vec![
                HandlerFailure::Error {
                    index: 0,
                    message: "database unavailable".to_owned(),
                },
                HandlerFailure::Panic {
                    index: 1,
                    message: "boom".to_owned(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn handler_receives_update() {
        let seen = Arc::new(Mutex::new(None));
        let mut dispatcher = WebhookDispatcher::from_token("TOKEN");
        let sink = Arc::clone(&seen);
        dispatcher.register_handler(move |update: Update| {
            let sink = Arc::clone(&sink);
            async move { *sink.lock().unwrap() = Some(update.update_id) }
        });

        let body = br#"{"update_id":1,"update_type":"invoice_paid","request_date":"2024-01-01T00:00:00Z","payload":"#;
        let mut body = body.to_vec();
        body.extend(serde_json::to_vec(&crate::proto::fixtures::invoice_json()).unwrap());
        body.push(b'}');
        let signature = dispatcher.secret().sign(&body);

        dispatcher.process(&body, Some(&signature)).await;
        assert_eq!(*seen.lock().unwrap(), Some(1));
    }

    #[tokio::test]
    async fn bad_signature_is_rejected_before_parsing() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = WebhookDispatcher::from_token("TOKEN");
        dispatcher.register_handler(recorder(Arc::clone(&log), "never"));

        let (body, _) = signed_update(&dispatcher);
        assert!(matches!(dispatcher.process(&body, Some("")).await, Delivery::Rejected));
        assert!(matches!(dispatcher.process(&body, None).await, Delivery::Rejected));
        assert!(matches!(
            dispatcher.process(b"not even json", None).await,
            Delivery::Rejected
        ));
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn signed_garbage_is_invalid() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = WebhookDispatcher::from_token("TOKEN");
        dispatcher.register_handler(recorder(Arc::clone(&log), "never"));

        let bodies: [&[u8]; 3] = [b"", b"{", br#"{"update_id":1}"#];
        for body in bodies {
            let signature = dispatcher.secret().sign(body);
            assert!(matches!(
                dispatcher.process(body, Some(&signature)).await,
                Delivery::Invalid(_)
            ));
        }
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn verify_update_distinguishes_errors() {
        let dispatcher = WebhookDispatcher::from_token("TOKEN");
        let body = br#"{"update_id":1}"#;
        assert!(matches!(
            dispatcher.verify_update(body, None),
            Err(WebhookError::SignatureMismatch)
        ));
        let signature = dispatcher.secret().sign(body);
        assert!(matches!(
            dispatcher.verify_update(body, Some(&signature)),
            Err(WebhookError::Validation(_))
        ));
    }

    #[test]
    fn debug_hides_handlers_and_key() {
        let mut dispatcher = WebhookDispatcher::from_token("TOKEN");
        dispatcher.register_handler(Failing);
        let rendered = format!("{dispatcher:?}");
        assert!(rendered.contains("[1 handlers]"));
        assert!(rendered.contains("<redacted>"));
    }
}
