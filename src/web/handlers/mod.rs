//! API handlers for Web API.

pub mod file;

pub use file::*;

use crate::file::FileService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// File operations on the configured storage backend.
    pub files: FileService,
}

impl AppState {
    /// Create a new application state.
    pub fn new(files: FileService) -> Self {
        Self { files }
    }
}
