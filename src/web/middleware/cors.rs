//! CORS middleware configuration.

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

/// Create a CORS layer from configuration.
///
/// With no configured origins, every origin, method and header is allowed.
/// Configured origins restrict only the origin; methods and headers stay open.
pub fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let permissive = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any);

    let parsed_origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();

    if parsed_origins.is_empty() {
        if !origins.is_empty() {
            tracing::warn!("No valid CORS origins configured, allowing any origin");
        }
        permissive.allow_origin(Any)
    } else {
        permissive.allow_origin(parsed_origins)
    }
}
