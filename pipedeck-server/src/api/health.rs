//! Health Check API Handler
//!
//! Liveness endpoint for monitoring.

use axum::{Json, http::StatusCode};
use serde_json::{Value, json};

/// GET /health
/// Reports that the process is up, with the running version
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}
