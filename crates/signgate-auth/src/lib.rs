//! HMAC-SHA256 signed URL construction and verification for SignGate.
//!
//! A signed URL carries two query parameters: `exp`, an absolute expiration in
//! Unix epoch seconds, and `sig`, the lowercase hex HMAC-SHA256 of the
//! canonical message
//!
//! ```text
//! <origin><path>?exp=<expiration>
//! ```
//!
//! keyed with a shared secret. The same [`canonical_message`] function is used
//! by the signer and the verifier, so the two always agree byte for byte. No
//! normalization of percent-encoding, trailing slashes or case is applied.
//!
//! # Usage
//!
//! ```rust
//! use signgate_auth::{SignatureVerifier, UrlSigner, canonical_message};
//!
//! let signer = UrlSigner::new("shared-secret");
//! let link = signer
//!     .sign_link("https://cdn.example.com", "/audio/intro.mp3", 4_102_444_800)
//!     .unwrap();
//! assert!(link.query().starts_with("?sig="));
//!
//! let message = canonical_message("https://cdn.example.com", "/audio/intro.mp3", 4_102_444_800);
//! let verifier = SignatureVerifier::default();
//! assert!(verifier.verify(&message, &link.signature, "shared-secret", 4_102_444_800));
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical message construction
//! - [`error`] - Crypto and verification error types
//! - [`provider`] - The injectable HMAC capability
//! - [`signer`] - Signature and signed-link generation
//! - [`verifier`] - Expiration check and constant-time signature verification

pub mod canonical;
pub mod error;
pub mod provider;
pub mod signer;
pub mod verifier;

pub use canonical::{EXPIRATION_PARAM, SIGNATURE_HEADER, SIGNATURE_PARAM, canonical_message};
pub use error::CryptoError;
pub use provider::{HmacProvider, Sha256Hmac};
pub use signer::{SignedLink, UrlSigner, sign};
pub use verifier::{SIGNATURE_HEX_LEN, SignatureVerifier, constant_time_eq, epoch_seconds, verify};
