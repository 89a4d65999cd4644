//! File service for filehost.
//!
//! This module provides the three public operations:
//! - Upload, re-encoding images to WebP
//! - Delete by stored name
//! - Listing, newest first

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::TryStreamExt;

use crate::config::FilesConfig;
use crate::{FilehostError, Result};

use super::name::{
    extract_extension, is_image_extension, validate_stored_name, IMAGE_OUTPUT_EXTENSION,
};
use super::store::{ChunkStream, FileStore};
use super::transcode::transcode_to_webp;
use super::DEFAULT_IMAGE_QUALITY;

/// Builds public URLs for stored files.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    base_url: String,
    public_path: String,
}

impl UrlBuilder {
    /// Create a builder from a base address and a path segment.
    pub fn new(base_url: impl Into<String>, public_path: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let public_path = public_path.into().trim_matches('/').to_string();
        Self {
            base_url,
            public_path,
        }
    }

    /// Create a builder from the files configuration.
    pub fn from_config(config: &FilesConfig) -> Self {
        Self::new(&config.public_base_url, &config.public_path)
    }

    /// Public URL of a stored file.
    pub fn url_for(&self, stored_name: &str) -> String {
        if self.public_path.is_empty() {
            format!("{}/{}", self.base_url, stored_name)
        } else {
            format!("{}/{}/{}", self.base_url, self.public_path, stored_name)
        }
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename declared by the client, if any.
    pub original_name: Option<String>,
    /// Generated name the file is stored under.
    pub stored_name: String,
    /// Public URL of the stored file.
    pub url: String,
    /// Whether the payload was re-encoded as WebP.
    pub transcoded: bool,
}

/// A stored file as presented by the listing.
#[derive(Debug, Clone)]
pub struct ListedFile {
    pub stored_name: String,
    pub url: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

/// File service wrapping a storage backend.
#[derive(Clone)]
pub struct FileService {
    store: Arc<dyn FileStore>,
    urls: UrlBuilder,
    image_quality: f32,
}

impl FileService {
    /// Create a new FileService.
    pub fn new(store: Arc<dyn FileStore>, urls: UrlBuilder) -> Self {
        Self {
            store,
            urls,
            image_quality: DEFAULT_IMAGE_QUALITY,
        }
    }

    /// Set the WebP quality used for re-encoded images.
    pub fn with_image_quality(mut self, quality: f32) -> Self {
        self.image_quality = quality;
        self
    }

    /// Upload a file.
    ///
    /// Payloads whose filename carries a recognised image extension are
    /// decoded in full and stored as `.webp`. Everything else is written
    /// through chunk by chunk under its original, lowercased extension.
    pub async fn upload(
        &self,
        original_name: Option<&str>,
        chunks: ChunkStream<'_>,
    ) -> Result<UploadedFile> {
        let extension = original_name.and_then(extract_extension);
        let is_image = extension.as_deref().is_some_and(is_image_extension);

        let stored_name = if is_image {
            let content = chunks
                .try_fold(Vec::new(), |mut acc, chunk| async move {
                    acc.extend_from_slice(&chunk);
                    Ok(acc)
                })
                .await?;

            let quality = self.image_quality;
            let encoded = tokio::task::spawn_blocking(move || transcode_to_webp(&content, quality))
                .await
                .map_err(|e| FilehostError::ImageEncode(format!("transcode task failed: {e}")))??;

            self.store
                .store(encoded, Some(IMAGE_OUTPUT_EXTENSION))
                .await?
        } else {
            self.store
                .store_stream(extension.as_deref(), chunks)
                .await?
        };

        tracing::info!(
            original_name = original_name.unwrap_or(""),
            stored_name = %stored_name,
            transcoded = is_image,
            "File uploaded"
        );

        Ok(UploadedFile {
            original_name: original_name.map(str::to_string),
            url: self.urls.url_for(&stored_name),
            stored_name,
            transcoded: is_image,
        })
    }

    /// Delete a stored file.
    ///
    /// Fails with `NotFound` when no regular file has that name, so a second
    /// delete of the same name is reported as not found.
    pub async fn delete(&self, stored_name: &str) -> Result<()> {
        validate_stored_name(stored_name)?;

        if !self.store.delete(stored_name).await? {
            return Err(FilehostError::NotFound(format!("File: {stored_name}")));
        }

        tracing::info!(stored_name = %stored_name, "File deleted");
        Ok(())
    }

    /// List stored files, most recently created first.
    ///
    /// Sizes and timestamps are read from the backend on every call.
    pub async fn list(&self) -> Result<Vec<ListedFile>> {
        let mut files = self.store.list().await?;
        files.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(files
            .into_iter()
            .map(|f| ListedFile {
                url: self.urls.url_for(&f.name),
                stored_name: f.name,
                size: f.size,
                created_at: f.created_at,
            })
            .collect())
    }
}
