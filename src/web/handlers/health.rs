//! # Health Check

use axum::Json;
use serde_json::{json, Value};

/// Unauthenticated liveness probe.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "API is running smoothly! 🚀",
    }))
}
