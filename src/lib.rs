//! filehost - minimal file hosting service
//!
//! Clients upload files over HTTP, the service stores them under generated
//! names in a local directory and hands back public URLs. Images are
//! re-encoded to lossy WebP on the way in.

pub mod config;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use error::{FilehostError, Result};
pub use file::{FileService, FileStore, LocalStore, MemoryStore, UrlBuilder};
pub use web::WebServer;
