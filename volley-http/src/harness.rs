//! The load harness: both clients plus batch settings

use crate::batch;
use crate::client::{ValuesApi, ValuesClient};
use crate::config::HttpConfig;
use crate::errors::{CallError, HarnessError};
use crate::measure::ErrorReporter;
use crate::types::{BatchMode, CallResultSet, Transport};
use std::sync::Arc;
use tracing::{debug, info};
use volley_config::{HarnessConfig, VolleyConfig};

/// Named endpoints of the values API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `api/values`, answers immediately
    Fast,
    /// `api/values/slow`, answers after the server's slow delay
    Slow,
}

/// Owns the secure and plaintext clients and runs batches through them.
///
/// Dropping the harness closes both clients.
#[derive(Debug)]
pub struct LoadHarness {
    secure: Arc<ValuesClient>,
    plain: Arc<ValuesClient>,
    fast_path: String,
    slow_path: String,
    max_errors_to_report: usize,
}

impl LoadHarness {
    pub fn new(harness: &HarnessConfig, http: HttpConfig) -> Result<Self, HarnessError> {
        let secure = ValuesClient::new(Transport::Secure, &harness.secure_base_url, &http)?;
        let plain = ValuesClient::new(Transport::Plain, &harness.plain_base_url, &http)?;

        info!(
            "Load harness ready (secure: {}, plain: {})",
            secure.base_url(),
            plain.base_url()
        );

        Ok(Self {
            secure: Arc::new(secure),
            plain: Arc::new(plain),
            fast_path: harness.fast_path.clone(),
            slow_path: harness.slow_path.clone(),
            max_errors_to_report: harness.max_errors_to_report,
        })
    }

    pub fn from_config(config: &VolleyConfig) -> Result<Self, HarnessError> {
        Self::new(&config.harness, config.http.clone().into())
    }

    pub fn client(&self, transport: Transport) -> &Arc<ValuesClient> {
        match transport {
            Transport::Secure => &self.secure,
            Transport::Plain => &self.plain,
        }
    }

    pub fn path(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Fast => &self.fast_path,
            Endpoint::Slow => &self.slow_path,
        }
    }

    /// One unmeasured call, errors propagated
    pub async fn call_once(
        &self,
        transport: Transport,
        endpoint: Endpoint,
    ) -> Result<Vec<String>, CallError> {
        self.client(transport).call_values(self.path(endpoint)).await
    }

    /// Run `count` measured calls; failures are recorded, never returned.
    pub async fn run(
        &self,
        transport: Transport,
        endpoint: Endpoint,
        count: usize,
        mode: BatchMode,
    ) -> CallResultSet {
        self.run_path(transport, self.path(endpoint), count, mode).await
    }

    /// Like [`LoadHarness::run`] with an arbitrary relative path
    pub async fn run_path(
        &self,
        transport: Transport,
        relative_path: &str,
        count: usize,
        mode: BatchMode,
    ) -> CallResultSet {
        debug!("Starting {} {} batch of {} against {}", transport, mode, count, relative_path);
        let reporter = Arc::new(ErrorReporter::new(self.max_errors_to_report));
        let client = Arc::clone(self.client(transport));
        batch::run_batch(client, relative_path, count, mode, reporter).await
    }

    /// Release both clients. Safe to call more than once.
    pub fn close(&self) {
        self.secure.close();
        self.plain.close();
    }

    pub fn is_closed(&self) -> bool {
        self.secure.is_closed() && self.plain.is_closed()
    }
}

impl Drop for LoadHarness {
    fn drop(&mut self) {
        self.close();
    }
}
