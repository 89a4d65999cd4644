//! Stored filename handling.
//!
//! Stored names are `{uuid}` or `{uuid}.{ext}`. Any name that arrives from a
//! client is checked with [`validate_stored_name`] before it is joined onto
//! the storage directory.

use std::path::Path;

use uuid::Uuid;

use crate::{FilehostError, Result};

/// Extensions that are re-encoded to WebP on upload.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "webp"];

/// Extension of re-encoded images.
pub const IMAGE_OUTPUT_EXTENSION: &str = "webp";

/// Extract the lowercased extension of an uploaded filename.
///
/// Only the final path component is inspected. Dotfiles such as `.hidden`
/// have no extension, and extensions containing anything other than ASCII
/// letters and digits are dropped.
pub fn extract_extension(original_name: &str) -> Option<String> {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);

    Path::new(base)
        .extension()
        .and_then(|s| s.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_ascii_lowercase())
}

/// Whether an extension names a format that gets re-encoded.
pub fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(ext))
}

/// Generate a fresh stored name, appending `.ext` when one is given.
pub fn generate_stored_name(ext: Option<&str>) -> String {
    let uuid = Uuid::new_v4();
    match ext {
        Some(ext) if !ext.is_empty() => format!("{uuid}.{ext}"),
        _ => uuid.to_string(),
    }
}

/// Reject names that could address anything outside the storage directory.
pub fn validate_stored_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name.starts_with('.')
        || name.contains("..")
        || name.contains(['/', '\\', '\0'])
        || name.chars().any(|c| c.is_control());

    if invalid {
        return Err(FilehostError::InvalidFilename(name.to_string()));
    }
    Ok(())
}
