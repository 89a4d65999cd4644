//! File handlers for Web API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use futures::{StreamExt, TryStreamExt};
use std::sync::Arc;

use crate::web::dto::{FileListResponse, MessageResponse, UploadResponse};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::FilehostError;

/// Multipart field that carries the uploaded file.
const FILE_FIELD: &str = "file";

fn multipart_error(e: MultipartError) -> FilehostError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        FilehostError::PayloadTooLarge(e.to_string())
    } else {
        FilehostError::Upload(e.to_string())
    }
}

/// POST /files/upload - Upload a file.
///
/// Request body: multipart/form-data with a "file" field.
#[utoipa::path(
    post,
    path = "/files/upload",
    tag = "files",
    responses(
        (status = 200, description = "File stored", body = UploadResponse),
        (status = 400, description = "No file provided or invalid multipart data"),
        (status = 413, description = "File too large"),
        (status = 422, description = "Image could not be decoded")
    )
)]
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::from(multipart_error(e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field.file_name().map(|s| s.to_string());
        let chunks = field.map_err(multipart_error).boxed();

        let uploaded = state
            .files
            .upload(original_name.as_deref(), chunks)
            .await?;

        return Ok(Json(uploaded.into()));
    }

    Err(ApiError::bad_request("No file provided"))
}

/// DELETE /files/:filename - Delete a stored file.
#[utoipa::path(
    delete,
    path = "/files/{filename}",
    tag = "files",
    params(
        ("filename" = String, Path, description = "Stored filename")
    ),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 400, description = "Invalid filename"),
        (status = 404, description = "File not found")
    )
)]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.files.delete(&filename).await?;

    Ok(Json(MessageResponse::new("File deleted")))
}

/// GET /files - List stored files, newest first.
#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    responses(
        (status = 200, description = "Stored files", body = FileListResponse),
        (status = 500, description = "Storage directory could not be read")
    )
)]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FileListResponse>, ApiError> {
    let files = state.files.list().await.map_err(|e| {
        tracing::error!("Failed to list files: {}", e);
        ApiError::internal("Failed to list files")
    })?;

    Ok(Json(FileListResponse::new(files)))
}
