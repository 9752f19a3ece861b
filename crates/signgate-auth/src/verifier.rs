//! Expiration check and constant-time signature verification.
//!
//! Verification is fail-closed: every internal failure, including a crypto
//! backend error, yields `false`. The reason is logged at `debug` level and
//! never returned, so callers cannot leak which check failed.
//!
//! The steps, in order:
//!
//! 1. Reject if the current time is past `expiration` (no crypto is done).
//! 2. Compute the expected lowercase hex HMAC-SHA256 of the canonical message.
//! 3. Reject if the candidate length differs from the expected length.
//! 4. Compare every byte in constant time.

use std::sync::Arc;

use chrono::Utc;
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::error::VerifyError;
use crate::provider::{HmacProvider, Sha256Hmac};

/// Length of a hex-encoded HMAC-SHA256 signature.
pub const SIGNATURE_HEX_LEN: usize = 64;

/// Verifies signatures against canonical messages.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    provider: Arc<dyn HmacProvider>,
}

impl Default for SignatureVerifier {
    fn default() -> Self {
        Self::with_provider(Arc::new(Sha256Hmac))
    }
}

impl SignatureVerifier {
    /// Create a verifier that uses the given HMAC provider.
    #[must_use]
    pub fn with_provider(provider: Arc<dyn HmacProvider>) -> Self {
        Self { provider }
    }

    /// Verify `candidate` against `message` using the system clock.
    #[must_use]
    pub fn verify(&self, message: &str, candidate: &str, secret: &str, expiration: u64) -> bool {
        self.verify_at(message, candidate, secret, expiration, epoch_seconds())
    }

    /// Verify `candidate` against `message` as of `now` (epoch seconds).
    #[must_use]
    pub fn verify_at(
        &self,
        message: &str,
        candidate: &str,
        secret: &str,
        expiration: u64,
        now: u64,
    ) -> bool {
        match self.check(message, candidate, secret, expiration, now) {
            Ok(()) => true,
            Err(reason) => {
                debug!(%reason, "signature rejected");
                false
            }
        }
    }

    fn check(
        &self,
        message: &str,
        candidate: &str,
        secret: &str,
        expiration: u64,
        now: u64,
    ) -> Result<(), VerifyError> {
        if now > expiration {
            return Err(VerifyError::Expired { expiration, now });
        }

        let tag = self
            .provider
            .hmac_sha256(secret.as_bytes(), message.as_bytes())?;
        let expected = hex::encode(tag);

        if candidate.len() != expected.len() {
            return Err(VerifyError::LengthMismatch {
                expected: expected.len(),
                provided: candidate.len(),
            });
        }

        if constant_time_eq(candidate.as_bytes(), expected.as_bytes()) {
            Ok(())
        } else {
            Err(VerifyError::Mismatch)
        }
    }
}

/// Verify with the default provider and the system clock.
#[must_use]
pub fn verify(message: &str, candidate: &str, secret: &str, expiration: u64) -> bool {
    SignatureVerifier::default().verify(message, candidate, secret, expiration)
}

/// Compare two byte strings without short-circuiting on the first difference.
///
/// Inputs of different lengths compare unequal immediately; length is not
/// secret.
#[must_use]
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

/// Current Unix time in whole seconds. Pre-epoch clocks read as zero.
#[must_use]
pub fn epoch_seconds() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}
