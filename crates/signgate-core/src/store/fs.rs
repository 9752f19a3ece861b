//! Filesystem object store.
//!
//! Keys map to paths below a root directory. A key is only resolved when
//! every `/`-separated segment is a plain file name; `.` and `..` segments,
//! absolute paths and empty segments are treated as missing objects rather
//! than errors.
//!
//! The entity tag is the MD5 of the file content. It is computed in a first
//! streaming pass, after which the file is reopened and streamed in
//! fixed-size chunks, so memory use stays bounded by the chunk size.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::BytesMut;
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::{debug, trace};

use super::{ByteStream, ObjectMetadata, ObjectStore, StoredObject, quoted_etag};
use crate::error::StoreError;

/// Read size for hashing and streaming.
const CHUNK_SIZE: usize = 64 * 1024;

/// Object store serving files below a root directory.
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Create a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map `key` to a path below the root, or `None` if the key could escape it.
    fn resolve(&self, key: &str) -> Option<PathBuf> {
        if key
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..")
        {
            return None;
        }
        let relative = Path::new(key);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn get(&self, key: &str) -> Result<Option<StoredObject>, StoreError> {
        let Some(path) = self.resolve(key) else {
            debug!(key, "rejected key outside of store root");
            return Ok(None);
        };

        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::Io(e)),
        };
        if !meta.is_file() {
            return Ok(None);
        }

        let http_etag = hash_file(&path).await?;
        let file = File::open(&path).await?;
        trace!(key, path = %path.display(), size = meta.len(), "opened object file");

        Ok(Some(StoredObject {
            key: key.to_owned(),
            body: file_stream(file),
            http_etag,
            metadata: ObjectMetadata {
                size: meta.len(),
                last_modified: meta.modified().ok().map(DateTime::<Utc>::from),
                content_type: None,
                cache_control: None,
            },
        }))
    }
}

/// Compute the quoted MD5 etag of a file without loading it whole.
async fn hash_file(path: &Path) -> Result<String, StoreError> {
    let mut file = File::open(path).await?;
    let mut hasher = Md5::new();
    let mut buf = vec![0_u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(quoted_etag(hasher))
}

/// Stream a file in `CHUNK_SIZE` pieces. The stream ends after the first error.
fn file_stream(file: File) -> ByteStream {
    Box::pin(futures::stream::unfold(Some(file), |state| async move {
        let mut file = state?;
        let mut buf = BytesMut::with_capacity(CHUNK_SIZE);
        match file.read_buf(&mut buf).await {
            Ok(0) => None,
            Ok(_) => Some((Ok(buf.freeze()), Some(file))),
            Err(e) => Some((Err(e), None)),
        }
    }))
}
