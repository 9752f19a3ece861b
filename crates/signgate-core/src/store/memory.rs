//! In-memory object store.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::trace;

use super::{ObjectMetadata, ObjectStore, StoredObject, compute_etag};
use crate::error::StoreError;

#[derive(Debug, Clone)]
struct StoredEntry {
    data: Bytes,
    etag: String,
    last_modified: DateTime<Utc>,
    content_type: Option<String>,
}

/// Object store backed by a concurrent hash map.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use signgate_core::store::{InMemoryObjectStore, ObjectStore};
///
/// # tokio_test::block_on(async {
/// let store = InMemoryObjectStore::new();
/// store.put("audio/hello.mp3", Bytes::from_static(b"ID3"), None);
///
/// let object = store.get("audio/hello.mp3").await.unwrap().unwrap();
/// assert_eq!(object.metadata.size, 3);
/// assert!(store.get("audio/missing.mp3").await.unwrap().is_none());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryObjectStore {
    objects: DashMap<String, StoredEntry>,
}

impl InMemoryObjectStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` under `key`, replacing any previous object. Returns the etag.
    pub fn put(&self, key: impl Into<String>, data: Bytes, content_type: Option<&str>) -> String {
        let key = key.into();
        let etag = compute_etag(&data);
        trace!(key = %key, size = data.len(), etag = %etag, "storing object in memory");
        self.objects.insert(
            key,
            StoredEntry {
                data,
                etag: etag.clone(),
                last_modified: Utc::now(),
                content_type: content_type.map(ToOwned::to_owned),
            },
        );
        etag
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StoreError> {
        let Some(entry) = self.objects.get(key).map(|e| e.value().clone()) else {
            return Ok(None);
        };

        let size = entry.data.len() as u64;
        let data = entry.data;
        Ok(Some(StoredObject {
            key: key.to_owned(),
            body: Box::pin(futures::stream::iter(std::iter::once(Ok(data)))),
            http_etag: entry.etag,
            metadata: ObjectMetadata {
                size,
                last_modified: Some(entry.last_modified),
                content_type: entry.content_type,
                cache_control: None,
            },
        }))
    }
}
