//! Health and service descriptor endpoints

use axum::{response::IntoResponse, Json};
use serde_json::json;
use tracing::info;

/// Readiness probe polled by the load tests before they start
pub async fn health_check() -> impl IntoResponse {
    info!("Health check requested");

    Json(json!({ "status": "healthy" }))
}

/// Root handler
pub async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "service": "Volley stub values API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "values": "/api/values",
            "slow": "/api/values/slow",
            "health": "/health"
        }
    }))
}
