//! Signed blob upload URL API.

use axum::Json;
use axum::extract::State;
use serde_json::json;

use crate::app::SharedState;
use crate::services::blob::{BlobError, BlobUploadTicket};

use super::{ApiResult, err_json_details};

/// POST /api/blob-upload-url
pub async fn blob_upload_url(State(state): State<SharedState>) -> ApiResult {
    match state.blob().request_upload_url().await {
        Ok(BlobUploadTicket::Disabled) => Ok(Json(json!({
            "uploadUrl": null,
            "note": "No blob token configured",
        }))),
        Ok(BlobUploadTicket::Signed(url)) => Ok(Json(json!({ "uploadUrl": url }))),
        Err(BlobError::Rejected { status, body }) => {
            tracing::error!(status, "Blob upload URL request rejected");
            Err(err_json_details(500, "Failed to prepare blob upload", &body))
        }
        Err(e) => {
            tracing::error!("Blob upload URL error: {e}");
            Err(err_json_details(500, "Blob upload URL error", &e.to_string()))
        }
    }
}
