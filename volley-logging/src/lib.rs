//! Logging initialisation for Volley
//!
//! Everything in the workspace logs through `tracing`; this crate installs the
//! global `tracing-subscriber` described by a [`LoggingConfig`].

pub mod init;

pub use init::{init_logging_from_config, init_simple_tracing, init_test_logging};
pub use volley_config::{LogFormat, LogLevel, LoggingConfig};
