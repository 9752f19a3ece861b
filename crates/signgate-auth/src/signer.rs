//! Signature and signed-link generation.
//!
//! [`UrlSigner`] holds the shared secret and an [`HmacProvider`] and produces
//! lowercase hex signatures over [canonical messages](crate::canonical).
//! [`SignedLink`] renders the result as the `?sig=...&exp=...` query string
//! clients append to the object URL.

use std::fmt;
use std::sync::Arc;

use crate::canonical::{EXPIRATION_PARAM, SIGNATURE_PARAM, canonical_message};
use crate::error::CryptoError;
use crate::provider::{HmacProvider, Sha256Hmac};

/// Produces HMAC-SHA256 signatures keyed with a shared secret.
#[derive(Clone)]
pub struct UrlSigner {
    secret: String,
    provider: Arc<dyn HmacProvider>,
}

impl fmt::Debug for UrlSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlSigner")
            .field("secret", &"<redacted>")
            .field("provider", &self.provider)
            .finish()
    }
}

impl UrlSigner {
    /// Create a signer using the default [`Sha256Hmac`] provider.
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self::with_provider(secret, Arc::new(Sha256Hmac))
    }

    /// Create a signer using a custom HMAC provider.
    #[must_use]
    pub fn with_provider(secret: impl Into<String>, provider: Arc<dyn HmacProvider>) -> Self {
        Self {
            secret: secret.into(),
            provider,
        }
    }

    /// Sign an already-built canonical message, returning lowercase hex.
    pub fn sign(&self, message: &str) -> Result<String, CryptoError> {
        let tag = self
            .provider
            .hmac_sha256(self.secret.as_bytes(), message.as_bytes())?;
        Ok(hex::encode(tag))
    }

    /// Sign `path` under `origin` until `expiration` (epoch seconds).
    pub fn sign_link(
        &self,
        origin: &str,
        path: &str,
        expiration: u64,
    ) -> Result<SignedLink, CryptoError> {
        let message = canonical_message(origin, path, expiration);
        let signature = self.sign(&message)?;
        Ok(SignedLink {
            path: path.to_owned(),
            expiration,
            signature,
        })
    }

    /// Shorthand for [`sign_link`](Self::sign_link) followed by [`SignedLink::query`].
    pub fn signed_query(
        &self,
        origin: &str,
        path: &str,
        expiration: u64,
    ) -> Result<String, CryptoError> {
        self.sign_link(origin, path, expiration)
            .map(|link| link.query())
    }
}

/// A signed path together with its expiration and signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedLink {
    /// The request path that was signed, including the leading `/`.
    pub path: String,
    /// Expiration timestamp in Unix epoch seconds.
    pub expiration: u64,
    /// Lowercase hex HMAC-SHA256 signature.
    pub signature: String,
}

impl SignedLink {
    /// Render the query string, `?sig=<hex>&exp=<expiration>`.
    #[must_use]
    pub fn query(&self) -> String {
        format!(
            "?{SIGNATURE_PARAM}={}&{EXPIRATION_PARAM}={}",
            self.signature, self.expiration
        )
    }

    /// Render the full URL under `origin`.
    #[must_use]
    pub fn url(&self, origin: &str) -> String {
        format!("{origin}{}{}", self.path, self.query())
    }
}

/// Sign `message` with `secret` using the default provider.
///
/// # Examples
///
/// ```
/// let signature = signgate_auth::sign("https://example.com/a.mp3?exp=1", "secret").unwrap();
/// assert_eq!(signature.len(), 64);
/// ```
pub fn sign(message: &str, secret: &str) -> Result<String, CryptoError> {
    UrlSigner::new(secret).sign(message)
}
