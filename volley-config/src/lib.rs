//! Domain-driven configuration management for Volley
//!
//! Configuration is split by functional domain (stub server, load harness,
//! HTTP client, logging), each with defaults, validation and `VOLLEY_*`
//! environment variable overrides.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    harness::HarnessConfig,
    http::{ConnectionPoolConfig, HttpConfig},
    logging::{LogFormat, LogLevel, LoggingConfig},
    server::{ServerConfig, TlsConfig},
    VolleyConfig,
};

// Re-export utilities
pub use domains::utils::{serde_duration, serde_duration_millis, serde_duration_option};
