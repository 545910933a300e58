//! Harness types: transports, batch modes and call results

use crate::errors::HarnessError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Which of the two configured clients a call goes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// TLS client against the secure base URL
    Secure,
    /// Plaintext client against the plain base URL
    Plain,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Secure => "secure",
            Transport::Plain => "plain",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How the calls of a batch are issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BatchMode {
    /// One call at a time, each completing before the next is issued
    #[default]
    Sequential,
    /// Every call spawned as its own task, awaited together
    Parallel,
}

impl BatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchMode::Sequential => "sequential",
            BatchMode::Parallel => "parallel",
        }
    }
}

impl fmt::Display for BatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BatchMode {
    type Err = BatchModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" | "seq" => Ok(BatchMode::Sequential),
            "parallel" | "par" => Ok(BatchMode::Parallel),
            _ => Err(BatchModeError::InvalidMode(s.to_string())),
        }
    }
}

/// Errors that can occur when parsing batch modes
#[derive(Error, Debug, Clone)]
pub enum BatchModeError {
    #[error("Invalid batch mode: '{0}'. Supported modes are: sequential, parallel")]
    InvalidMode(String),
}

/// Outcome of one call attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallResult {
    elapsed: Duration,
    success: bool,
}

impl CallResult {
    pub fn new(elapsed: Duration, success: bool) -> Self {
        Self { elapsed, success }
    }

    pub fn succeeded(elapsed: Duration) -> Self {
        Self::new(elapsed, true)
    }

    pub fn failed(elapsed: Duration) -> Self {
        Self::new(elapsed, false)
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn success(&self) -> bool {
        self.success
    }
}

/// Outcomes of one batch, indexed by issuance order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallResultSet {
    wall_clock: Duration,
    results: Vec<CallResult>,
}

impl CallResultSet {
    pub fn new(wall_clock: Duration, results: Vec<CallResult>) -> Self {
        Self { wall_clock, results }
    }

    /// Time from the start of the first call to the end of the last one
    pub fn wall_clock(&self) -> Duration {
        self.wall_clock
    }

    pub fn results(&self) -> &[CallResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Indices of the calls that failed, ascending
    pub fn failed_indices(&self) -> Vec<usize> {
        self.results
            .iter()
            .enumerate()
            .filter(|(_, result)| !result.success)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn summary(&self) -> BatchReport {
        BatchReport::from(self)
    }

    /// Summarise the batch and log the summary at info level
    pub fn report(&self) -> BatchReport {
        let report = self.summary();
        info!("{}", report);
        report
    }

    /// Report the batch, then fail if any call in it failed.
    pub fn assert_no_failed_calls(&self) -> Result<BatchReport, HarnessError> {
        let report = self.report();
        let indices = self.failed_indices();
        if indices.is_empty() {
            return Ok(report);
        }

        Err(HarnessError::FailedCalls {
            calls: report.calls,
            failed: indices.len(),
            wall_clock: report.wall_clock,
            indices,
        })
    }
}

/// Aggregate view of a [`CallResultSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub wall_clock: Duration,
    pub calls: usize,
    pub failed: usize,
    pub total_elapsed: Duration,
    /// Zero for an empty batch
    pub average: Duration,
}

impl From<&CallResultSet> for BatchReport {
    fn from(set: &CallResultSet) -> Self {
        let calls = set.len();
        let failed = set.results.iter().filter(|r| !r.success).count();
        let total_elapsed: Duration = set.results.iter().map(|r| r.elapsed).sum();
        let average = if calls == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos((total_elapsed.as_nanos() / calls as u128) as u64)
        };

        Self {
            wall_clock: set.wall_clock,
            calls,
            failed,
            total_elapsed,
            average,
        }
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Time elapsed: {:.3}ms. Called {}, failed {}. Avg call time: {:.3}ms",
            millis(self.wall_clock),
            self.calls,
            self.failed,
            millis(self.average)
        )
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
