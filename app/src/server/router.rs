use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::api;
use crate::app::SharedState;

/// Room for multipart boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    let upload_limit = state.config().max_upload_bytes + MULTIPART_OVERHEAD;
    let uploads_dir = ServeDir::new(&state.config().uploads_dir);

    Router::new()
        // --- Core ---
        .route("/status", get(status_handler))
        .route("/api/health", get(api::health::health))
        // --- QR ---
        .route("/api/generate-qr", post(api::qr::generate_qr))
        // --- Storage ---
        .route("/api/blob-upload-url", post(api::blob::blob_upload_url))
        .merge(build_upload_routes(upload_limit))
        // --- Uploaded files ---
        .nest_service("/uploads", uploads_dir)
        // --- Middleware ---
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn build_upload_routes(limit: usize) -> Router<SharedState> {
    Router::new()
        .route("/api/upload", post(api::upload::upload_file))
        .layer(DefaultBodyLimit::max(limit))
}

async fn status_handler() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
