//! Response construction for gate outcomes.
//!
//! Failures become a `text/plain` body carrying the error's display text with
//! the status from [`GateError::status_code`]. Successful lookups stream the
//! object body with the object's transport metadata plus the gateway's fixed
//! content and caching headers.

use http::HeaderValue;
use http::header::{CACHE_CONTROL, CONTENT_TYPE, ETAG};
use signgate_core::{GateError, StoredObject};

use crate::body::GateResponseBody;

/// Content type of every served object.
pub const OBJECT_CONTENT_TYPE: &str = "audio/mp3";

/// Cache policy of every served object.
pub const OBJECT_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Content type of error bodies.
pub const ERROR_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Convert a [`GateError`] into a plain-text HTTP response.
#[must_use]
pub fn error_to_response(err: &GateError) -> http::Response<GateResponseBody> {
    let mut response = http::Response::new(GateResponseBody::from_string(err.to_string()));
    *response.status_mut() = err.status_code();
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(ERROR_CONTENT_TYPE));
    response
}

/// Build the `200 OK` response streaming `object`.
///
/// Stored metadata is written first; `ETag`, `Content-Type` and
/// `Cache-Control` are then set unconditionally.
#[must_use]
pub fn object_response(object: StoredObject) -> http::Response<GateResponseBody> {
    let mut headers = http::HeaderMap::new();
    object.write_http_metadata(&mut headers);
    if let Ok(etag) = HeaderValue::from_str(&object.http_etag) {
        headers.insert(ETAG, etag);
    }
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(OBJECT_CONTENT_TYPE));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(OBJECT_CACHE_CONTROL));

    let mut response = http::Response::new(GateResponseBody::from_stream(object.body));
    *response.headers_mut() = headers;
    response
}
