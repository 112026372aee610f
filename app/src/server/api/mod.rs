//! REST API handlers grouped by domain.

pub mod blob;
pub mod health;
pub mod qr;
pub mod upload;

use axum::Json;
use axum::http::StatusCode;
use serde_json::{Value, json};

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

/// Standard error response.
pub fn err_json(status: u16, message: &str) -> (StatusCode, Json<Value>) {
    (
        status_code(status),
        Json(json!({ "success": false, "error": message })),
    )
}

/// Error response carrying the underlying cause.
pub fn err_json_details(status: u16, message: &str, details: &str) -> (StatusCode, Json<Value>) {
    (
        status_code(status),
        Json(json!({ "success": false, "error": message, "details": details })),
    )
}

fn status_code(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
