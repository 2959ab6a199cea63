// Health check endpoint handler implementation

use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Handler for GET / - liveness probe
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok"
    }))
}
