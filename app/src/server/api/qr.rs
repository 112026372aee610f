//! QR code generation API.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use qr_composer::ComposeError;
use serde::Deserialize;
use serde_json::json;

use crate::app::SharedState;

use super::{ApiResult, err_json, err_json_details};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQrRequest {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

/// POST /api/generate-qr
pub async fn generate_qr(
    State(state): State<SharedState>,
    payload: Result<Json<GenerateQrRequest>, JsonRejection>,
) -> ApiResult {
    let Json(req) = payload.map_err(|e| err_json(400, &e.body_text()))?;

    let url = req.url.unwrap_or_default();
    if url.is_empty() {
        return Err(err_json(400, "URL is required"));
    }

    let compositing = state.config().compositing_enabled;
    let composition = state
        .composer()
        .compose(&url, req.logo_url.as_deref(), compositing)
        .await
        .map_err(|e| match e {
            ComposeError::InvalidInput(msg) => err_json(400, msg),
            other => {
                tracing::error!("QR generation error: {other}");
                err_json_details(500, "Failed to generate QR code", &other.to_string())
            }
        })?;

    let mut body = json!({
        "success": true,
        "qrCode": composition.image().to_data_uri(),
    });
    if let Some(note) = composition.note() {
        body["note"] = json!(note);
    }
    Ok(Json(body))
}
