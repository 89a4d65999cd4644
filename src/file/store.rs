//! Storage interface for stored files.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;

use crate::Result;

/// A stream of payload chunks, as produced by a multipart field.
pub type ChunkStream<'a> = BoxStream<'a, Result<Bytes>>;

/// A stored file as reported by its storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Generated name, also the only address of the file.
    pub name: String,
    /// Size in bytes at the time of the call.
    pub size: u64,
    /// Creation timestamp reported by the backend.
    pub created_at: DateTime<Utc>,
}

/// Backend that owns the stored files.
///
/// Names handed to `delete` are validated by the caller; backends may assume
/// they contain no path separators.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store a complete payload under a newly generated name.
    async fn store(&self, content: Vec<u8>, extension: Option<&str>) -> Result<String>;

    /// Store a payload chunk by chunk under a newly generated name.
    ///
    /// A failed write leaves no file behind.
    async fn store_stream(&self, extension: Option<&str>, chunks: ChunkStream<'_>)
        -> Result<String>;

    /// Remove a stored file. Returns `false` if no such file exists.
    async fn delete(&self, name: &str) -> Result<bool>;

    /// Enumerate stored files in backend order.
    async fn list(&self) -> Result<Vec<StoredFile>>;
}
