//! # Health Probes
//!
//! Unauthenticated liveness endpoint for orchestration probes.

use axum::Json;

/// `GET /health/live`
pub async fn live() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
