//! Harness error types

use std::time::Duration;

/// Why a single call against the values API failed.
///
/// Every variant is collapsed into `success = false` by a measured call.
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP client has been closed")]
    Closed,
}

/// Errors raised while setting the harness up or checking a batch
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Invalid CA certificate: {0}")]
    Certificate(#[source] reqwest::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid base URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("{failed} of {calls} calls failed in {wall_clock:?} (indices: {indices:?})")]
    FailedCalls {
        calls: usize,
        failed: usize,
        wall_clock: Duration,
        indices: Vec<usize>,
    },
}
