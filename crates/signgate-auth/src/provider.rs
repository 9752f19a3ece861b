//! The HMAC-SHA256 capability used by the signer and verifier.
//!
//! [`Sha256Hmac`] is the default. Tests substitute failing or counting
//! implementations through [`HmacProvider`].

use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CryptoError;

type HmacSha256 = Hmac<Sha256>;

/// Computes raw HMAC-SHA256 tags.
pub trait HmacProvider: Send + Sync + std::fmt::Debug {
    /// Compute `HMAC-SHA256(key, message)` and return the raw 32-byte tag.
    ///
    /// # Errors
    ///
    /// Returns a [`CryptoError`] if the key cannot be imported or the backend
    /// fails.
    fn hmac_sha256(&self, key: &[u8], message: &[u8]) -> Result<Vec<u8>, CryptoError>;
}

/// The default provider, backed by the RustCrypto `hmac` and `sha2` crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hmac;

impl HmacProvider for Sha256Hmac {
    fn hmac_sha256(&self, key: &[u8], message: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut mac = <HmacSha256 as KeyInit>::new_from_slice(key)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}
