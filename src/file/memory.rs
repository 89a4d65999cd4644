//! In-memory file store.
//!
//! Keeps everything in a process-local list. Useful for exercising the
//! service and HTTP layers without touching the filesystem.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures::TryStreamExt;

use super::name::generate_stored_name;
use super::store::{ChunkStream, FileStore, StoredFile};
use crate::{FilehostError, Result};

#[derive(Debug)]
struct Entry {
    name: String,
    content: Vec<u8>,
    created_at: DateTime<Utc>,
}

/// File store holding contents in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<Vec<Entry>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a copy of a stored file's content.
    pub fn contents(&self, name: &str) -> Option<Vec<u8>> {
        self.lock()
            .ok()?
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.content.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Entry>>> {
        self.entries.lock().map_err(|_| {
            FilehostError::Io(std::io::Error::other("memory store lock poisoned"))
        })
    }

    fn insert(&self, content: Vec<u8>, extension: Option<&str>) -> Result<String> {
        let mut entries = self.lock()?;

        let mut name = generate_stored_name(extension);
        while entries.iter().any(|e| e.name == name) {
            name = generate_stored_name(extension);
        }

        // Keep creation times strictly increasing so ordering is deterministic.
        let mut created_at = Utc::now();
        if let Some(last) = entries.iter().map(|e| e.created_at).max() {
            if created_at <= last {
                created_at = last + Duration::microseconds(1);
            }
        }

        entries.push(Entry {
            name: name.clone(),
            content,
            created_at,
        });
        Ok(name)
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn store(&self, content: Vec<u8>, extension: Option<&str>) -> Result<String> {
        self.insert(content, extension)
    }

    async fn store_stream(
        &self,
        extension: Option<&str>,
        chunks: ChunkStream<'_>,
    ) -> Result<String> {
        let content = chunks
            .try_fold(Vec::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await?;

        self.insert(content, extension)
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let mut entries = self.lock()?;
        let before = entries.len();
        entries.retain(|e| e.name != name);
        Ok(entries.len() != before)
    }

    async fn list(&self) -> Result<Vec<StoredFile>> {
        Ok(self
            .lock()?
            .iter()
            .map(|e| StoredFile {
                name: e.name.clone(),
                size: e.content.len() as u64,
                created_at: e.created_at,
            })
            .collect())
    }
}
