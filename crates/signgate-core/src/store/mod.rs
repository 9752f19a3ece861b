//! Object store abstraction.
//!
//! The gateway only ever reads: [`ObjectStore::get`] returns the object under
//! a key, `None` when there is none, or a [`StoreError`] when the backend
//! fails. Two backends are provided:
//!
//! - [`InMemoryObjectStore`] keeps objects in a [`DashMap`](dashmap::DashMap).
//! - [`FsObjectStore`] serves files below a root directory.

mod fs;
mod memory;

use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;
use http::HeaderMap;
use http::header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, HeaderValue, LAST_MODIFIED};
use md5::{Digest, Md5};

pub use fs::FsObjectStore;
pub use memory::InMemoryObjectStore;

use crate::error::StoreError;

/// A stream of object body chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Read access to a key-value blob store.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Fetch the object stored under `key`.
    ///
    /// Returns `Ok(None)` if no such object exists.
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StoreError>;
}

/// Transport metadata attached to a stored object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectMetadata {
    /// Body size in bytes.
    pub size: u64,
    /// Last modification time.
    pub last_modified: Option<DateTime<Utc>>,
    /// Content type recorded with the object, if any.
    pub content_type: Option<String>,
    /// Cache-Control recorded with the object, if any.
    pub cache_control: Option<String>,
}

/// An object returned by [`ObjectStore::get`].
pub struct StoredObject {
    /// The key the object was fetched under.
    pub key: String,
    /// The object body.
    pub body: ByteStream,
    /// Quoted, content-derived entity tag (e.g. `"5d41402abc4b2a76b9719d911017c592"`).
    pub http_etag: String,
    /// Transport metadata.
    pub metadata: ObjectMetadata,
}

impl fmt::Debug for StoredObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredObject")
            .field("key", &self.key)
            .field("http_etag", &self.http_etag)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl StoredObject {
    /// Populate `headers` with the object's HTTP metadata.
    ///
    /// Sets `Content-Length` and, when known, `Last-Modified`, `Content-Type`
    /// and `Cache-Control`. Existing values for these headers are replaced.
    pub fn write_http_metadata(&self, headers: &mut HeaderMap) {
        headers.insert(CONTENT_LENGTH, HeaderValue::from(self.metadata.size));

        if let Some(modified) = self.metadata.last_modified {
            if let Ok(hv) = HeaderValue::from_str(&http_date(modified)) {
                headers.insert(LAST_MODIFIED, hv);
            }
        }
        if let Some(ref content_type) = self.metadata.content_type {
            if let Ok(hv) = HeaderValue::from_str(content_type) {
                headers.insert(CONTENT_TYPE, hv);
            }
        }
        if let Some(ref cache_control) = self.metadata.cache_control {
            if let Ok(hv) = HeaderValue::from_str(cache_control) {
                headers.insert(CACHE_CONTROL, hv);
            }
        }
    }
}

/// Format a timestamp as an RFC 7231 HTTP date.
#[must_use]
pub fn http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Quote an MD5 hex digest as an entity tag.
#[must_use]
pub(crate) fn quoted_etag(hasher: Md5) -> String {
    format!("\"{}\"", hex::encode(hasher.finalize()))
}

/// Compute the quoted MD5 entity tag of `data`.
///
/// # Examples
///
/// ```
/// use signgate_core::store::compute_etag;
///
/// assert_eq!(compute_etag(b"hello"), "\"5d41402abc4b2a76b9719d911017c592\"");
/// ```
#[must_use]
pub fn compute_etag(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    quoted_etag(hasher)
}
