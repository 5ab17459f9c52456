use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::engine::ModelRegistry;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(registry): State<Arc<ModelRegistry>>) -> impl IntoResponse {
    if registry.is_empty() {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "not_ready",
                "engine": "unavailable",
                "languages": []
            })),
        )
    } else {
        (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "engine": "available",
                "languages": registry.languages()
            })),
        )
    }
}
