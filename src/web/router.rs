//! Router configuration for Web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::dto::{FileEntry, FileListResponse, MessageResponse, UploadResponse};
use super::handlers::{self, delete_file, list_files, upload_file, AppState};
use super::middleware::create_cors_layer;

/// OpenAPI document for the file API.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::file::upload_file,
        handlers::file::delete_file,
        handlers::file::list_files
    ),
    components(schemas(UploadResponse, MessageResponse, FileEntry, FileListResponse)),
    tags((name = "files", description = "Upload, delete and list stored files"))
)]
pub struct ApiDoc;

/// Create the main API router.
///
/// `max_upload_size_mb` of 0 lifts the request body limit entirely.
pub fn create_router(
    app_state: Arc<AppState>,
    cors_origins: &[String],
    max_upload_size_mb: u64,
) -> Router {
    let body_limit = if max_upload_size_mb == 0 {
        DefaultBodyLimit::disable()
    } else {
        let bytes = max_upload_size_mb.saturating_mul(1024 * 1024);
        DefaultBodyLimit::max(usize::try_from(bytes).unwrap_or(usize::MAX))
    };

    let file_routes = Router::new()
        .route("/files", get(list_files))
        .route("/files/upload", post(upload_file))
        .route("/files/:filename", delete(delete_file));

    Router::new()
        .merge(file_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(body_limit),
        )
        .with_state(app_state)
}

/// Create a router serving stored files under `/{public_path}`.
pub fn create_uploads_router(public_path: &str, storage_path: &Path) -> Router {
    let public_path = public_path.trim_matches('/');
    if public_path.is_empty() {
        return Router::new().fallback_service(ServeDir::new(storage_path));
    }
    Router::new().nest_service(&format!("/{public_path}"), ServeDir::new(storage_path))
}

/// Create the Swagger UI router.
pub fn create_swagger_router() -> Router {
    Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
