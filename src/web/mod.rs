//! Web API module for filehost.
//!
//! This module provides the HTTP surface: upload, delete and list of stored
//! files, plus health and OpenAPI endpoints.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
