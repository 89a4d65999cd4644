//! File hosting module for filehost.
//!
//! This module provides:
//! - Stored name generation and validation
//! - Image re-encoding to WebP
//! - The storage interface with local directory and in-memory backends
//! - The upload, delete and list operations

mod memory;
mod name;
mod service;
mod storage;
mod store;
mod transcode;

pub use memory::MemoryStore;
pub use name::{
    extract_extension, generate_stored_name, is_image_extension, validate_stored_name,
    IMAGE_EXTENSIONS, IMAGE_OUTPUT_EXTENSION,
};
pub use service::{FileService, ListedFile, UploadedFile, UrlBuilder};
pub use storage::LocalStore;
pub use store::{ChunkStream, FileStore, StoredFile};
pub use transcode::transcode_to_webp;

/// Default WebP quality for re-encoded images.
pub const DEFAULT_IMAGE_QUALITY: f32 = 85.0;
