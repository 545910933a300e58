//! Load tests for the values API
//!
//! Every test boots its own stub service on ephemeral ports (plaintext and
//! TLS) and drives it through the load harness.

mod common;

use anyhow::Result;
use common::TestServer;
use std::time::{Duration, Instant};
use volley_http::{BatchMode, CallResultSet, Endpoint, HarnessError, LoadHarness, Transport};

/// Slow endpoint delay for batch tests; single-call tests use the real default
const TEST_SLOW_DELAY: Duration = Duration::from_millis(200);

async fn run_batch(
    endpoint: Endpoint,
    transport: Transport,
    mode: BatchMode,
    count: usize,
) -> Result<CallResultSet> {
    let server = TestServer::start(TEST_SLOW_DELAY).await?;
    let harness = server.harness()?;

    let results = harness.run(transport, endpoint, count, mode).await;
    println!(
        "{} {} x{} over {}: {}",
        mode,
        harness.path(endpoint),
        count,
        transport,
        results.summary()
    );

    assert_eq!(results.len(), count);
    results.assert_no_failed_calls()?;

    harness.close();
    server.stop().await?;
    Ok(results)
}

// =============================================================================
// SINGLE CALLS
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_fast_once() -> Result<()> {
    let server = TestServer::start(TEST_SLOW_DELAY).await?;
    let harness = server.harness()?;

    for transport in [Transport::Secure, Transport::Plain] {
        let values = harness.call_once(transport, Endpoint::Fast).await?;
        assert_eq!(values, vec!["value1", "value2"], "{} transport", transport);
    }

    server.stop().await
}

#[tokio::test(flavor = "multi_thread")]
async fn test_slow_once() -> Result<()> {
    let server = TestServer::start(Duration::from_millis(1000)).await?;
    let harness = server.harness()?;

    let start = Instant::now();
    let values = harness.call_once(Transport::Secure, Endpoint::Slow).await?;
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_millis(1000), "slow call took {:?}", elapsed);
    assert_eq!(values.len(), 2);
    let first = values[0].strip_prefix("value1-").expect("value1 prefix");
    let second = values[1].strip_prefix("value2-").expect("value2 prefix");
    assert_eq!(first, second);
    chrono::DateTime::parse_from_rfc3339(first)?;

    server.stop().await
}

#[tokio::test(flavor = "multi_thread")]
async fn test_slow_timestamps_change_between_calls() -> Result<()> {
    let server = TestServer::start(Duration::from_millis(20)).await?;
    let harness = server.harness()?;

    let first = harness.call_once(Transport::Plain, Endpoint::Slow).await?;
    let second = harness.call_once(Transport::Plain, Endpoint::Slow).await?;
    assert_ne!(first[0], second[0]);

    server.stop().await
}

#[tokio::test(flavor = "multi_thread")]
async fn test_measured_single_call() -> Result<()> {
    let results = run_batch(Endpoint::Fast, Transport::Secure, BatchMode::Sequential, 1).await?;
    assert!(results.results()[0].success());
    assert!(results.wall_clock() >= results.results()[0].elapsed());
    Ok(())
}

// =============================================================================
// SEQUENTIAL BATCHES
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_sequential_fast_1() -> Result<()> {
    run_batch(Endpoint::Fast, Transport::Secure, BatchMode::Sequential, 1).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sequential_fast_10() -> Result<()> {
    run_batch(Endpoint::Fast, Transport::Secure, BatchMode::Sequential, 10).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sequential_fast_100() -> Result<()> {
    run_batch(Endpoint::Fast, Transport::Secure, BatchMode::Sequential, 100).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sequential_fast_1000() -> Result<()> {
    run_batch(Endpoint::Fast, Transport::Secure, BatchMode::Sequential, 1000).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sequential_fast_10000() -> Result<()> {
    run_batch(Endpoint::Fast, Transport::Secure, BatchMode::Sequential, 10000).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sequential_fast_plain_100() -> Result<()> {
    run_batch(Endpoint::Fast, Transport::Plain, BatchMode::Sequential, 100).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sequential_slow_10() -> Result<()> {
    let results = run_batch(Endpoint::Slow, Transport::Secure, BatchMode::Sequential, 10).await?;
    assert!(results.wall_clock() >= TEST_SLOW_DELAY * 10);
    Ok(())
}

// =============================================================================
// PARALLEL BATCHES
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_parallel_fast_1() -> Result<()> {
    run_batch(Endpoint::Fast, Transport::Secure, BatchMode::Parallel, 1).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parallel_fast_10() -> Result<()> {
    run_batch(Endpoint::Fast, Transport::Secure, BatchMode::Parallel, 10).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parallel_fast_100() -> Result<()> {
    run_batch(Endpoint::Fast, Transport::Secure, BatchMode::Parallel, 100).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parallel_fast_1000() -> Result<()> {
    run_batch(Endpoint::Fast, Transport::Secure, BatchMode::Parallel, 1000).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parallel_fast_1500() -> Result<()> {
    run_batch(Endpoint::Fast, Transport::Secure, BatchMode::Parallel, 1500).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parallel_fast_2000() -> Result<()> {
    run_batch(Endpoint::Fast, Transport::Secure, BatchMode::Parallel, 2000).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parallel_fast_10000() -> Result<()> {
    run_batch(Endpoint::Fast, Transport::Secure, BatchMode::Parallel, 10000).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parallel_fast_plain_1000() -> Result<()> {
    run_batch(Endpoint::Fast, Transport::Plain, BatchMode::Parallel, 1000).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parallel_fast_plain_10000() -> Result<()> {
    run_batch(Endpoint::Fast, Transport::Plain, BatchMode::Parallel, 10000).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parallel_slow_100() -> Result<()> {
    run_batch(Endpoint::Slow, Transport::Secure, BatchMode::Parallel, 100).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parallel_slow_200() -> Result<()> {
    run_batch(Endpoint::Slow, Transport::Secure, BatchMode::Parallel, 200).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parallel_slow_400() -> Result<()> {
    run_batch(Endpoint::Slow, Transport::Secure, BatchMode::Parallel, 400).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parallel_slow_1000() -> Result<()> {
    run_batch(Endpoint::Slow, Transport::Secure, BatchMode::Parallel, 1000).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parallel_slow_1500() -> Result<()> {
    run_batch(Endpoint::Slow, Transport::Secure, BatchMode::Parallel, 1500).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parallel_slow_10000() -> Result<()> {
    run_batch(Endpoint::Slow, Transport::Secure, BatchMode::Parallel, 10000).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parallel_slow_is_faster_than_sequential() -> Result<()> {
    const CALLS: usize = 10;
    let server = TestServer::start(TEST_SLOW_DELAY).await?;
    let harness = server.harness()?;

    let parallel = harness
        .run(Transport::Plain, Endpoint::Slow, CALLS, BatchMode::Parallel)
        .await;
    parallel.assert_no_failed_calls()?;

    // Serially this would take CALLS x TEST_SLOW_DELAY
    assert!(
        parallel.wall_clock() < TEST_SLOW_DELAY * (CALLS as u32) / 2,
        "parallel slow batch took {:?}",
        parallel.wall_clock()
    );
    for result in parallel.results() {
        assert!(result.elapsed() >= TEST_SLOW_DELAY);
    }

    server.stop().await
}

// =============================================================================
// FAILURES AND LIFECYCLE
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_service_records_failures() -> Result<()> {
    // Start then stop a server so its ports are known to be closed
    let server = TestServer::start(TEST_SLOW_DELAY).await?;
    let harness_config = server.harness_config();
    let http_config = server.http_config();
    server.stop().await?;

    let harness = LoadHarness::new(&harness_config, http_config.into())?;
    for mode in [BatchMode::Sequential, BatchMode::Parallel] {
        let results = harness.run(Transport::Plain, Endpoint::Fast, 5, mode).await;
        assert_eq!(results.len(), 5);
        assert_eq!(results.failed_indices(), vec![0, 1, 2, 3, 4]);

        match results.assert_no_failed_calls() {
            Err(HarnessError::FailedCalls { failed, .. }) => assert_eq!(failed, 5),
            other => panic!("expected FailedCalls, got {:?}", other),
        }
    }

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_path_counts_as_failure() -> Result<()> {
    let server = TestServer::start(TEST_SLOW_DELAY).await?;
    let harness = server.harness()?;

    let results = harness
        .run_path(Transport::Secure, "api/missing", 3, BatchMode::Parallel)
        .await;
    assert_eq!(results.failed_indices(), vec![0, 1, 2]);

    server.stop().await
}

#[tokio::test(flavor = "multi_thread")]
async fn test_close_is_repeatable() -> Result<()> {
    let server = TestServer::start(TEST_SLOW_DELAY).await?;
    let harness = server.harness()?;

    harness.run(Transport::Secure, Endpoint::Fast, 3, BatchMode::Parallel).await.assert_no_failed_calls()?;

    harness.close();
    harness.close();
    assert!(harness.is_closed());

    let after_close = harness.run(Transport::Secure, Endpoint::Fast, 2, BatchMode::Sequential).await;
    assert_eq!(after_close.failed_indices(), vec![0, 1]);

    drop(harness);
    server.stop().await
}

#[tokio::test(flavor = "multi_thread")]
async fn test_untrusted_certificate_fails_calls() -> Result<()> {
    let server = TestServer::start(TEST_SLOW_DELAY).await?;
    // No fixture CA: the self-signed chain is rejected
    let harness = LoadHarness::new(&server.harness_config(), Default::default())?;

    assert!(harness.call_once(Transport::Secure, Endpoint::Fast).await.is_err());
    assert_eq!(harness.call_once(Transport::Plain, Endpoint::Fast).await?, vec!["value1", "value2"]);

    server.stop().await
}
