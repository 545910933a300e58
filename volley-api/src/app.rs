//! Application configuration and router setup

use axum::{routing::get, Router};
use std::time::Duration;
use tower_http::trace::TraceLayer;
use volley_config::ServerConfig;

use crate::handlers;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Enable request tracing
    pub enable_tracing: bool,
    /// How long the slow endpoint waits before answering
    pub slow_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            enable_tracing: true,
            slow_delay: Duration::from_millis(1000),
        }
    }
}

impl From<&ServerConfig> for AppConfig {
    fn from(config: &ServerConfig) -> Self {
        Self {
            enable_tracing: config.enable_tracing,
            slow_delay: config.slow_delay,
        }
    }
}

/// State shared with the handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub slow_delay: Duration,
}

/// Create the stub values application
pub fn create_app(config: &AppConfig) -> Router {
    let state = AppState {
        slow_delay: config.slow_delay,
    };

    let app = Router::new()
        .route("/", get(handlers::root_handler))
        .route("/health", get(handlers::health_check))
        .merge(values_router())
        .with_state(state);

    if config.enable_tracing {
        app.layer(TraceLayer::new_for_http())
    } else {
        app
    }
}

/// Routes under /api/values. The static `slow` segment wins over `{id}`.
fn values_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/values",
            get(handlers::list_values).post(handlers::create_value),
        )
        .route("/api/values/slow", get(handlers::slow_values))
        .route(
            "/api/values/{id}",
            get(handlers::get_value)
                .put(handlers::update_value)
                .delete(handlers::delete_value),
        )
}
