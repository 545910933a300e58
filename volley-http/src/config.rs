//! HTTP client configuration

use crate::errors::HarnessError;
use crate::types::Transport;
use reqwest::{Certificate, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use volley_config::HttpConfig as ConfigHttpConfig;

/// Settings used to build the harness's reqwest clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout; `None` leaves the transport default in place
    pub timeout: Option<Duration>,

    /// User agent string
    pub user_agent: String,

    /// Whether to verify SSL certificates
    pub verify_ssl: bool,

    /// Extra PEM root certificate trusted by the secure client
    pub ca_cert: Option<String>,

    pub max_idle_per_host: usize,

    pub idle_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        ConfigHttpConfig::default().into()
    }
}

impl From<ConfigHttpConfig> for HttpConfig {
    fn from(config: ConfigHttpConfig) -> Self {
        Self {
            timeout: config.timeout,
            user_agent: config.user_agent,
            verify_ssl: config.verify_ssl,
            ca_cert: config.ca_cert,
            max_idle_per_host: config.connection_pool.max_idle_per_host,
            idle_timeout: config.connection_pool.idle_timeout,
        }
    }
}

impl HttpConfig {
    /// Build a client for the given transport.
    ///
    /// Certificate settings only apply to [`Transport::Secure`].
    pub fn build_client(&self, transport: Transport) -> Result<Client, HarnessError> {
        debug!(
            "Building {} client (timeout: {:?}, verify_ssl: {})",
            transport, self.timeout, self.verify_ssl
        );

        let mut builder = Client::builder()
            .user_agent(&self.user_agent)
            .pool_max_idle_per_host(self.max_idle_per_host)
            .pool_idle_timeout(self.idle_timeout);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if transport == Transport::Secure {
            builder = builder.danger_accept_invalid_certs(!self.verify_ssl);

            if let Some(path) = &self.ca_cert {
                let pem = std::fs::read(path).map_err(|source| HarnessError::Io {
                    path: path.clone(),
                    source,
                })?;
                let cert = Certificate::from_pem(&pem).map_err(HarnessError::Certificate)?;
                builder = builder.add_root_certificate(cert);
            }
        }

        builder.build().map_err(HarnessError::Build)
    }
}
