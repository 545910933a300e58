//! Timed calls and capped error logging

use crate::errors::CallError;
use crate::types::CallResult;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::warn;

/// Logs the first `max_errors` call errors of a batch and counts the rest.
///
/// The count is only approximate once concurrent calls pass the cap.
#[derive(Debug)]
pub struct ErrorReporter {
    max_errors: usize,
    seen: AtomicUsize,
}

impl ErrorReporter {
    pub fn new(max_errors: usize) -> Self {
        Self {
            max_errors,
            seen: AtomicUsize::new(0),
        }
    }

    /// Record an error, logging it if the cap has not been reached yet.
    /// Returns whether the error was logged.
    pub fn report(&self, error: &CallError) -> bool {
        let seen = self.seen.fetch_add(1, Ordering::Relaxed);
        if seen < self.max_errors {
            warn!(error = %error, "Call failed");
            true
        } else {
            false
        }
    }

    pub fn errors_seen(&self) -> usize {
        self.seen.load(Ordering::Relaxed)
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Time one call. An error is handed to `reporter` and recorded as a failure.
pub async fn measure<F, T>(reporter: &ErrorReporter, call: F) -> CallResult
where
    F: Future<Output = Result<T, CallError>>,
{
    let start = Instant::now();
    let outcome = call.await;
    let elapsed = start.elapsed();

    match outcome {
        Ok(_) => CallResult::succeeded(elapsed),
        Err(error) => {
            reporter.report(&error);
            CallResult::failed(elapsed)
        }
    }
}
