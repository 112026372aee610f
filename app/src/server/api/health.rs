//! Health check API.

use axum::Json;
use serde_json::{Value, json};

/// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "Server is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
