//! Signed-URL request pipeline.
//!
//! [`GateHandler::handle`] runs each request through a fixed sequence of
//! checks, stopping at the first failure:
//!
//! 1. Method must be `GET`
//! 2. Signature from the `sig` query parameter, else the `X-Signature` header
//! 3. Expiration from the `exp` query parameter, a positive integer
//! 4. Canonical message rebuilt from the request origin, path and expiration
//! 5. Signature verification (expired and forged are not distinguished)
//! 6. Object key derived from the path
//! 7. Key must name an MP3 file
//! 8. Object fetched from the store
//! 9. Object streamed back with immutable caching headers

use std::fmt;
use std::sync::Arc;

use http::header::HOST;
use http::request::Parts;
use signgate_auth::{
    EXPIRATION_PARAM, SIGNATURE_HEADER, SIGNATURE_PARAM, SignatureVerifier, canonical_message,
};
use signgate_core::{ErrorKind, GateConfig, GateError, ObjectStore};
use tracing::{debug, error};

use crate::body::GateResponseBody;
use crate::response::{error_to_response, object_response};

/// Suffix every servable key must carry.
pub const ALLOWED_EXTENSION: &str = ".mp3";

/// Settings the handler needs from the gateway configuration.
#[derive(Clone, Default)]
pub struct GateHttpConfig {
    /// Shared HMAC secret.
    pub signature_secret: String,
    /// Fixed origin for canonical messages; derived per request when `None`.
    pub public_origin: Option<String>,
}

impl fmt::Debug for GateHttpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GateHttpConfig")
            .field("signature_secret", &"<redacted>")
            .field("public_origin", &self.public_origin)
            .finish()
    }
}

impl From<&GateConfig> for GateHttpConfig {
    fn from(config: &GateConfig) -> Self {
        Self {
            signature_secret: config.signature_secret.clone(),
            public_origin: config.public_origin.clone(),
        }
    }
}

/// Verifies signed requests and serves objects from an [`ObjectStore`].
#[derive(Debug)]
pub struct GateHandler<S> {
    store: Arc<S>,
    verifier: SignatureVerifier,
    config: GateHttpConfig,
}

impl<S: ObjectStore> GateHandler<S> {
    /// Create a handler with the default verifier.
    #[must_use]
    pub fn new(store: Arc<S>, config: GateHttpConfig) -> Self {
        Self::with_verifier(store, SignatureVerifier::default(), config)
    }

    /// Create a handler with a custom verifier.
    #[must_use]
    pub fn with_verifier(store: Arc<S>, verifier: SignatureVerifier, config: GateHttpConfig) -> Self {
        Self {
            store,
            verifier,
            config,
        }
    }

    /// The backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Handle one request. Every outcome, including store failures, becomes a
    /// response.
    pub async fn handle(&self, parts: &Parts) -> http::Response<GateResponseBody> {
        match self.try_handle(parts).await {
            Ok(response) => response,
            Err(err) => {
                match (err.kind(), &err) {
                    (ErrorKind::Backend, GateError::Internal(source)) => {
                        error!(path = parts.uri.path(), error = %source, "object store failure");
                    }
                    (kind, _) => {
                        debug!(path = parts.uri.path(), ?kind, error = %err, "request rejected");
                    }
                }
                error_to_response(&err)
            }
        }
    }

    async fn try_handle(&self, parts: &Parts) -> Result<http::Response<GateResponseBody>, GateError> {
        if parts.method != http::Method::GET {
            return Err(GateError::MethodNotAllowed);
        }

        let query = parts.uri.query().unwrap_or_default();
        let signature = extract_signature(query, &parts.headers).ok_or(GateError::MissingSignature)?;
        let expiration = parse_expiration(query)?;

        let origin = request_origin(parts, self.config.public_origin.as_deref());
        let path = parts.uri.path();
        let message = canonical_message(&origin, path, expiration);
        if !self.verifier.verify(
            &message,
            &signature,
            &self.config.signature_secret,
            expiration,
        ) {
            return Err(GateError::InvalidSignature);
        }

        let key = object_key(path);
        if !key.ends_with(ALLOWED_EXTENSION) {
            return Err(GateError::UnsupportedMediaType);
        }

        let object = self.store.get(key).await?.ok_or(GateError::NotFound)?;
        debug!(key, etag = %object.http_etag, size = object.metadata.size, "serving object");
        Ok(object_response(object))
    }
}

/// First value of query parameter `name`, form-url-decoded.
fn query_param(query: &str, name: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

/// Signature from the query string, falling back to the `X-Signature` header.
/// Empty values count as absent.
fn extract_signature(query: &str, headers: &http::HeaderMap) -> Option<String> {
    query_param(query, SIGNATURE_PARAM)
        .filter(|sig| !sig.is_empty())
        .or_else(|| {
            headers
                .get(SIGNATURE_HEADER)
                .and_then(|v| v.to_str().ok())
                .filter(|sig| !sig.is_empty())
                .map(ToOwned::to_owned)
        })
}

/// Parse the `exp` query parameter as positive decimal epoch seconds.
fn parse_expiration(query: &str) -> Result<u64, GateError> {
    let raw = query_param(query, EXPIRATION_PARAM)
        .filter(|exp| !exp.is_empty())
        .ok_or(GateError::MissingExpiration)?;
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(GateError::InvalidExpiration);
    }
    match raw.parse::<u64>() {
        Ok(expiration) if expiration > 0 => Ok(expiration),
        _ => Err(GateError::InvalidExpiration),
    }
}

/// Origin the request was addressed to, serialized as `scheme://host[:port]`.
///
/// `public_origin` wins when configured. Otherwise the absolute-form request
/// URI is used, then the `Host` header over plain `http`. Returns an empty
/// string when no host is known.
pub fn request_origin(parts: &Parts, public_origin: Option<&str>) -> String {
    if let Some(origin) = public_origin {
        return origin.trim_end_matches('/').to_owned();
    }

    let scheme = parts.uri.scheme_str().unwrap_or("http").to_ascii_lowercase();
    let authority = parts
        .uri
        .authority()
        .map(|a| a.as_str())
        .or_else(|| parts.headers.get(HOST).and_then(|v| v.to_str().ok()));
    let Some(authority) = authority else {
        return String::new();
    };

    let host = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host)
        .to_ascii_lowercase();
    let default_port = match scheme.as_str() {
        "http" => Some(":80"),
        "https" => Some(":443"),
        _ => None,
    };
    let host = default_port
        .and_then(|port| host.strip_suffix(port))
        .unwrap_or(&host);
    if host.is_empty() {
        return String::new();
    }
    format!("{scheme}://{host}")
}

/// Object key for a request path: the path minus one leading `/`.
fn object_key(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}
