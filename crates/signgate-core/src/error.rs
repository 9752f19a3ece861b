//! Error types for SignGate.
//!
//! [`GateError`] is the request-level taxonomy. Its `Display` output is the
//! exact plain-text body sent to the client, so backend detail never appears
//! in it; the wrapped [`StoreError`] is only reachable through
//! [`std::error::Error::source`] for server-side logging.

use http::StatusCode;

/// Broad failure category of a [`GateError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing client input (4xx other than 403/404).
    ClientInput,
    /// The signature is invalid or expired.
    Authentication,
    /// The requested object does not exist.
    NotFound,
    /// The object store failed.
    Backend,
}

/// Every way a request can be rejected.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// The request method is not `GET`.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Neither the `sig` query parameter nor the `X-Signature` header is set.
    #[error("Missing signature")]
    MissingSignature,

    /// The `exp` query parameter is absent or empty.
    #[error("Missing expiration parameter")]
    MissingExpiration,

    /// The `exp` query parameter is not a positive base-10 integer.
    #[error("Invalid expiration parameter")]
    InvalidExpiration,

    /// The signature does not verify, or has expired.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The object key does not have an allowed extension.
    #[error("Only MP3 files are allowed")]
    UnsupportedMediaType,

    /// The object store has no object under the key.
    #[error("File not found")]
    NotFound,

    /// The object store failed.
    #[error("Internal server error")]
    Internal(#[from] StoreError),
}

impl GateError {
    /// The failure category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MethodNotAllowed
            | Self::MissingSignature
            | Self::MissingExpiration
            | Self::InvalidExpiration
            | Self::UnsupportedMediaType => ErrorKind::ClientInput,
            Self::InvalidSignature => ErrorKind::Authentication,
            Self::NotFound => ErrorKind::NotFound,
            Self::Internal(_) => ErrorKind::Backend,
        }
    }

    /// The HTTP status code sent to the client.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::MissingSignature => StatusCode::UNAUTHORIZED,
            Self::MissingExpiration | Self::InvalidExpiration | Self::UnsupportedMediaType => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidSignature => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failures raised by an [`ObjectStore`](crate::store::ObjectStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error other than "not found".
    #[error("object store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other backend fault.
    #[error("object store backend error: {0}")]
    Backend(String),
}

/// Startup configuration problems.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `SIGNATURE_SECRET` is unset or empty.
    #[error("SIGNATURE_SECRET is not set")]
    MissingSecret,

    /// The bind address does not parse as `host:port`.
    #[error("invalid listen address: {0}")]
    InvalidListenAddress(String),

    /// The public origin is not an `http://` or `https://` origin.
    #[error("invalid public origin: {0} (expected http:// or https://)")]
    InvalidOrigin(String),
}
