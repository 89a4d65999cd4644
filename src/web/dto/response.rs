//! Response DTOs for Web API.

use serde::Serialize;
use utoipa::ToSchema;

use crate::file::{ListedFile, UploadedFile};

/// Upload response.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Filename declared by the client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Public URL of the stored file.
    pub url: String,
}

impl From<UploadedFile> for UploadResponse {
    fn from(uploaded: UploadedFile) -> Self {
        Self {
            filename: uploaded.original_name,
            url: uploaded.url,
        }
    }
}

/// Plain message response.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

impl MessageResponse {
    /// Create a new message response.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A stored file in the listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileEntry {
    /// Stored filename.
    pub filename: String,
    /// Public URL.
    pub url: String,
    /// Size in bytes.
    pub size: u64,
    /// Creation time as Unix seconds.
    pub created_at: f64,
}

impl From<ListedFile> for FileEntry {
    fn from(file: ListedFile) -> Self {
        Self {
            filename: file.stored_name,
            url: file.url,
            size: file.size,
            created_at: file.created_at.timestamp_micros() as f64 / 1_000_000.0,
        }
    }
}

/// File listing response.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileListResponse {
    /// Files, most recently created first.
    pub files: Vec<FileEntry>,
    /// Number of files.
    pub count: usize,
}

impl FileListResponse {
    /// Build a listing from service records.
    pub fn new(files: Vec<ListedFile>) -> Self {
        let files: Vec<FileEntry> = files.into_iter().map(FileEntry::from).collect();
        Self {
            count: files.len(),
            files,
        }
    }
}
