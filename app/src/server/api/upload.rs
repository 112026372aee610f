//! PDF upload API.

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, header};
use serde_json::json;

use crate::app::SharedState;
use crate::services::storage::{StorageError, is_pdf};

use super::{ApiResult, err_json};

/// POST /api/upload – Store a PDF and return its public URL
pub async fn upload_file(
    State(state): State<SharedState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResult {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or("").to_string();
        if name != "file" {
            continue;
        }

        let filename = field.file_name().unwrap_or("document.pdf").to_string();
        if !is_pdf(&filename, field.content_type()) {
            return Err(err_json(400, "Only PDF files are allowed"));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| err_json(e.status().as_u16(), &e.body_text()))?;

        let stored = state
            .uploads()
            .save(&filename, &data)
            .await
            .map_err(|e| match &e {
                StorageError::FileTooLarge(_) => err_json(413, &e.to_string()),
                StorageError::Empty => err_json(400, &e.to_string()),
                StorageError::Io(io) => {
                    tracing::error!("Upload error: {io}");
                    err_json(500, "Failed to upload file")
                }
            })?;

        let url = format!(
            "{}/uploads/{}",
            public_base(&state.config().public_base_url, &headers),
            stored.filename
        );
        return Ok(Json(json!({
            "success": true,
            "url": url,
            "filename": stored.filename,
        })));
    }

    Err(err_json(400, "No file uploaded"))
}

/// Base URL for links to stored files.
///
/// A configured base wins; otherwise it is rebuilt from the request's host.
fn public_base(configured: &str, headers: &HeaderMap) -> String {
    if !configured.is_empty() {
        return configured.to_string();
    }
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get("x-forwarded-host")
        .or_else(|| headers.get(header::HOST))
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("{proto}://{host}")
}
