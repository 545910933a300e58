//! Stub values API
//!
//! Serves canned values over plaintext HTTP and, when a certificate is
//! configured, over TLS. One endpoint waits before answering so callers can
//! measure concurrency.

pub mod app;
pub mod errors;
pub mod handlers;
pub mod startup;

pub use app::{create_app, AppConfig, AppState};
pub use errors::{ServerError, ServerResult};
pub use startup::{shutdown_signal, RunningServer, Server};
