//! Local directory storage for filehost.
//!
//! All files live in one flat directory; the directory entry is the record.
//! ```text
//! {base_path}/
//! ├── 3f2c1a9e-0b7d-4e61-9a55-2f4b8c1d7e90.webp
//! ├── 8d41e7b2-5c3a-4f09-b1e6-7a2d9c0f3b58.pdf
//! └── ...
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::name::generate_stored_name;
use super::store::{ChunkStream, FileStore, StoredFile};
use crate::{FilehostError, Result};

/// Attempts at drawing an unused name before giving up.
const MAX_NAME_ATTEMPTS: usize = 3;

/// File store backed by a single local directory.
#[derive(Debug, Clone)]
pub struct LocalStore {
    /// Absolute path of the storage directory.
    base_path: PathBuf,
}

impl LocalStore {
    /// Open a store rooted at `base_path`, creating the directory if needed.
    ///
    /// The path is resolved to an absolute path once, here.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;
        let base_path = std::fs::canonicalize(&base_path)?;

        Ok(Self { base_path })
    }

    /// Get the absolute path of the storage directory.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the full path for a stored name.
    pub fn get_file_path(&self, stored_name: &str) -> PathBuf {
        self.base_path.join(stored_name)
    }

    /// Create a new empty file under a fresh name.
    ///
    /// Uses `create_new`, so an existing file is never overwritten; a
    /// colliding name is replaced by a freshly generated one.
    async fn create_unique(&self, extension: Option<&str>) -> Result<(String, File)> {
        for _ in 0..MAX_NAME_ATTEMPTS {
            let stored_name = generate_stored_name(extension);
            let path = self.get_file_path(&stored_name);

            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((stored_name, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::warn!(stored_name = %stored_name, "Stored name collision, regenerating");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(FilehostError::Io(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "could not generate an unused stored name",
        )))
    }

    /// Remove a partially written file, logging instead of failing.
    async fn discard(&self, stored_name: &str) {
        if let Err(e) = fs::remove_file(self.get_file_path(stored_name)).await {
            tracing::warn!(stored_name = %stored_name, error = %e, "Failed to remove partial file");
        }
    }
}

fn created_at(metadata: &std::fs::Metadata) -> DateTime<Utc> {
    // Birth time is not available on every filesystem.
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
        .into()
}

#[async_trait]
impl FileStore for LocalStore {
    async fn store(&self, content: Vec<u8>, extension: Option<&str>) -> Result<String> {
        let (stored_name, mut file) = self.create_unique(extension).await?;

        let written = async {
            file.write_all(&content).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            self.discard(&stored_name).await;
            return Err(e.into());
        }

        Ok(stored_name)
    }

    async fn store_stream(
        &self,
        extension: Option<&str>,
        mut chunks: ChunkStream<'_>,
    ) -> Result<String> {
        let (stored_name, mut file) = self.create_unique(extension).await?;

        let written: Result<()> = async {
            while let Some(chunk) = chunks.next().await {
                file.write_all(&chunk?).await?;
            }
            file.flush().await?;
            Ok(())
        }
        .await;

        if let Err(e) = written {
            drop(file);
            self.discard(&stored_name).await;
            return Err(e);
        }

        Ok(stored_name)
    }

    async fn delete(&self, stored_name: &str) -> Result<bool> {
        let path = self.get_file_path(stored_name);

        match fs::symlink_metadata(&path).await {
            Ok(m) if m.is_file() => {}
            Ok(_) => return Ok(false),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        }

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<StoredFile>> {
        let mut entries = fs::read_dir(&self.base_path).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let metadata = match entry.metadata().await {
                Ok(m) => m,
                // Removed between enumeration and stat.
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            if !metadata.is_file() {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 filename");
                continue;
            };

            files.push(StoredFile {
                name,
                size: metadata.len(),
                created_at: created_at(&metadata),
            });
        }

        Ok(files)
    }
}
