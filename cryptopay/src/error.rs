//! Gateway error values and their per-code identities.
//!
//! Every failed API call carries a numeric code and a short name, e.g.
//! `400 INVOICES_NOT_FOUND`. Callers often want to react to one particular
//! code and let the rest bubble up, so each distinct code maps to an
//! [`ErrorKind`]. Kinds are minted the first time a code is seen and cached
//! for the lifetime of the process; there is no precompiled table of codes.
//!
//! ```rust
//! use cryptopay::{ErrorKind, GatewayError};
//!
//! let err = GatewayError::new(401, "UNAUTHORIZED");
//! assert_eq!(err.kind(), ErrorKind::for_code(401));
//! assert_ne!(err.kind(), ErrorKind::for_code(400));
//! ```

use std::fmt;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

/// Process-wide `code -> kind` cache.
static KINDS: LazyLock<DashMap<i64, ErrorKind>> = LazyLock::new(DashMap::new);

/// Source of fresh kind tokens. Zero is never handed out.
static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Opaque identity shared by every [`GatewayError`] with the same code.
///
/// Two kinds compare equal if and only if they were obtained for the same
/// code. Tokens are assigned in first-seen order and are not stable across
/// processes; do not persist them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorKind {
    token: u64,
    code: i64,
}

impl ErrorKind {
    /// Returns the kind for `code`, registering it on first use.
    #[must_use]
    pub fn for_code(code: i64) -> Self {
        if let Some(kind) = KINDS.get(&code) {
            return *kind;
        }
        *KINDS.entry(code).or_insert_with(|| Self {
            token: NEXT_TOKEN.fetch_add(1, Ordering::Relaxed),
            code,
        })
    }

    /// Returns `true` if a kind has already been minted for `code`.
    #[must_use]
    pub fn is_registered(code: i64) -> bool {
        KINDS.contains_key(&code)
    }

    /// The gateway error code this kind stands for.
    #[must_use]
    pub const fn code(&self) -> i64 {
        self.code
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CryptoPayError_{}", self.code)
    }
}

/// An authoritative rejection returned by the gateway (`"ok": false`).
///
/// Never retried by this crate; surfaced to the caller verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("[{code}] {name}")]
pub struct GatewayError {
    code: i64,
    name: String,
    kind: ErrorKind,
}

impl GatewayError {
    /// Creates a gateway error, registering its code's [`ErrorKind`] if needed.
    #[must_use]
    pub fn new(code: i64, name: impl Into<String>) -> Self {
        Self {
            code,
            name: name.into(),
            kind: ErrorKind::for_code(code),
        }
    }

    /// The numeric error code reported by the gateway.
    #[must_use]
    pub const fn code(&self) -> i64 {
        self.code
    }

    /// The error name reported by the gateway (e.g. `"UNAUTHORIZED"`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The identity shared by all errors with this code.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns `true` if this error is of the given kind.
    #[must_use]
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}
