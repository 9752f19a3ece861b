//! Canonical message construction.
//!
//! The canonical message is the exact string that gets signed:
//!
//! ```text
//! <origin><path>?exp=<expiration>
//! ```
//!
//! `origin` is `scheme://host[:port]`, `path` is the raw request path
//! (still percent-encoded, leading `/` included) and `expiration` is rendered
//! in plain decimal. Any difference in these bytes produces a different
//! signature.

/// Query parameter carrying the hex signature.
pub const SIGNATURE_PARAM: &str = "sig";

/// Query parameter carrying the expiration timestamp.
pub const EXPIRATION_PARAM: &str = "exp";

/// Header accepted as a fallback carrier for the signature.
pub const SIGNATURE_HEADER: &str = "x-signature";

/// Build the canonical message for `origin`, `path` and `expiration`.
///
/// # Examples
///
/// ```
/// use signgate_auth::canonical_message;
///
/// assert_eq!(
///     canonical_message("https://example.com", "/audio/test.mp3", 1_700_000_000),
///     "https://example.com/audio/test.mp3?exp=1700000000",
/// );
/// ```
#[must_use]
pub fn canonical_message(origin: &str, path: &str, expiration: u64) -> String {
    format!("{origin}{path}?{EXPIRATION_PARAM}={expiration}")
}
