//! Sequential and parallel batches of measured calls

use crate::client::ValuesApi;
use crate::measure::{measure, ErrorReporter};
use crate::types::{BatchMode, CallResult, CallResultSet};
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Issue `count` calls one after another
pub async fn run_sequential<A>(
    api: &A,
    relative_path: &str,
    count: usize,
    reporter: &ErrorReporter,
) -> CallResultSet
where
    A: ValuesApi + ?Sized,
{
    debug!("Running {} sequential calls to {}", count, relative_path);
    let start = Instant::now();

    let mut results = Vec::with_capacity(count);
    for _ in 0..count {
        results.push(measure(reporter, api.call_values(relative_path)).await);
    }

    CallResultSet::new(start.elapsed(), results)
}

/// Spawn `count` calls as independent tasks and wait for all of them.
///
/// `results[i]` belongs to the i-th spawned call whatever order they finish in.
/// A task that panics is recorded as a failed call with zero elapsed time.
pub async fn run_parallel<A>(
    api: Arc<A>,
    relative_path: &str,
    count: usize,
    reporter: Arc<ErrorReporter>,
) -> CallResultSet
where
    A: ValuesApi + ?Sized + 'static,
{
    debug!("Running {} parallel calls to {}", count, relative_path);
    let path: Arc<str> = Arc::from(relative_path);
    let start = Instant::now();

    let handles: Vec<_> = (0..count)
        .map(|_| {
            let api = Arc::clone(&api);
            let path = Arc::clone(&path);
            let reporter = Arc::clone(&reporter);
            tokio::spawn(async move { measure(&reporter, api.call_values(&path)).await })
        })
        .collect();

    let results = join_all(handles)
        .await
        .into_iter()
        .enumerate()
        .map(|(index, joined)| {
            joined.unwrap_or_else(|e| {
                warn!(index, error = %e, "Call task did not complete");
                CallResult::failed(Duration::ZERO)
            })
        })
        .collect();

    CallResultSet::new(start.elapsed(), results)
}

/// Run a batch in the given mode
pub async fn run_batch<A>(
    api: Arc<A>,
    relative_path: &str,
    count: usize,
    mode: BatchMode,
    reporter: Arc<ErrorReporter>,
) -> CallResultSet
where
    A: ValuesApi + ?Sized + 'static,
{
    match mode {
        BatchMode::Sequential => run_sequential(&*api, relative_path, count, &reporter).await,
        BatchMode::Parallel => run_parallel(api, relative_path, count, reporter).await,
    }
}
