//! Load harness for the Volley values API
//!
//! Calls the stub service through a TLS or plaintext reqwest client, times
//! each call and aggregates sequential or parallel batches into a
//! [`CallResultSet`]. Failed calls are counted, never propagated; only the
//! first few errors of a batch are logged.

pub mod batch;
pub mod client;
pub mod config;
pub mod errors;
pub mod harness;
pub mod measure;
pub mod types;

// Re-export main types for convenience
pub use batch::{run_batch, run_parallel, run_sequential};
pub use client::{ValuesApi, ValuesClient};
pub use config::HttpConfig;
pub use errors::{CallError, HarnessError};
pub use harness::{Endpoint, LoadHarness};
pub use measure::{measure, ErrorReporter};
pub use types::{BatchMode, BatchModeError, BatchReport, CallResult, CallResultSet, Transport};
