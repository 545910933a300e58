//! Canned values endpoints
//!
//! Nothing is stored: writes are accepted and discarded.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{Local, SecondsFormat};
use tracing::debug;

use crate::app::AppState;

/// GET /api/values
pub async fn list_values() -> Json<Vec<String>> {
    Json(vec!["value1".to_string(), "value2".to_string()])
}

/// GET /api/values/slow
///
/// Waits for the configured delay without blocking a worker thread, then
/// returns both values stamped with the same local time.
pub async fn slow_values(State(state): State<AppState>) -> Json<Vec<String>> {
    tokio::time::sleep(state.slow_delay).await;

    let timestamp = Local::now().to_rfc3339_opts(SecondsFormat::Micros, false);
    debug!("Slow values served at {}", timestamp);

    Json(vec![
        format!("value1-{}", timestamp),
        format!("value2-{}", timestamp),
    ])
}

/// GET /api/values/{id}
pub async fn get_value(Path(id): Path<i32>) -> Json<&'static str> {
    debug!("Value {} requested", id);
    Json("value")
}

/// POST /api/values
pub async fn create_value(body: String) -> StatusCode {
    debug!("Discarding posted value ({} bytes)", body.len());
    StatusCode::OK
}

/// PUT /api/values/{id}
pub async fn update_value(Path(id): Path<i32>, body: String) -> StatusCode {
    debug!("Discarding update of value {} ({} bytes)", id, body.len());
    StatusCode::OK
}

/// DELETE /api/values/{id}
pub async fn delete_value(Path(id): Path<i32>) -> StatusCode {
    debug!("Ignoring delete of value {}", id);
    StatusCode::OK
}
