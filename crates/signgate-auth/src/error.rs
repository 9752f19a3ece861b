//! Error types for signing and verification.
//!
//! [`CryptoError`] is the only error that crosses the crate boundary; it is
//! returned by the signer. The verifier works with [`VerifyError`] internally
//! and reports nothing but a boolean to its callers.

/// Failures raised by an [`HmacProvider`](crate::provider::HmacProvider).
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    /// The key could not be imported by the HMAC backend.
    #[error("invalid HMAC key: {0}")]
    InvalidKey(String),

    /// The HMAC backend failed while computing a tag.
    #[error("HMAC backend failure: {0}")]
    Backend(String),
}

/// Reasons a signature was rejected. Used for server-side logging only.
#[derive(Debug, thiserror::Error)]
pub(crate) enum VerifyError {
    #[error("signature expired at {expiration} (now {now})")]
    Expired { expiration: u64, now: u64 },

    #[error("signature length {provided} does not match expected length {expected}")]
    LengthMismatch { expected: usize, provided: usize },

    #[error("signature does not match")]
    Mismatch,

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
