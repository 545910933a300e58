//! In-process stub service shared by the integration tests

// Each test binary uses a different subset of these helpers
#![allow(dead_code)]

use anyhow::{Context, Result};
use std::time::Duration;
use volley_api::{RunningServer, Server};
use volley_config::{HarnessConfig, HttpConfig, ServerConfig, TlsConfig};
use volley_http::LoadHarness;

pub fn fixture(name: &str) -> String {
    format!("{}/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

/// Stub service bound to ephemeral plaintext and TLS ports
pub struct TestServer {
    running: RunningServer,
    pub plain_url: String,
    pub secure_url: String,
}

impl TestServer {
    /// Start the service and wait until /health answers
    pub async fn start(slow_delay: Duration) -> Result<Self> {
        volley_logging::init_test_logging();

        let config = ServerConfig {
            bind_address: "127.0.0.1:0".to_string(),
            tls: Some(
                TlsConfig::new(fixture("localhost.pem"), fixture("localhost.key"))
                    .with_bind_address("127.0.0.1:0"),
            ),
            slow_delay,
            enable_tracing: false,
        };

        let running = Server::new(config).spawn().await?;
        let tls_addr = running.tls_addr().context("TLS listener not started")?;

        let server = Self {
            plain_url: format!("http://127.0.0.1:{}", running.plain_addr().port()),
            // The fixture certificate carries an IP SAN for 127.0.0.1
            secure_url: format!("https://127.0.0.1:{}", tls_addr.port()),
            running,
        };
        server.wait_until_healthy().await?;
        Ok(server)
    }

    async fn wait_until_healthy(&self) -> Result<()> {
        let client = reqwest::Client::new();
        for _ in 0..50 {
            if let Ok(response) = client.get(format!("{}/health", self.plain_url)).send().await {
                if response.status().is_success() {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        anyhow::bail!("stub service at {} never became healthy", self.plain_url)
    }

    pub fn harness_config(&self) -> HarnessConfig {
        HarnessConfig {
            secure_base_url: self.secure_url.clone(),
            plain_base_url: self.plain_url.clone(),
            ..HarnessConfig::default()
        }
    }

    /// HTTP settings that trust the fixture CA
    pub fn http_config(&self) -> HttpConfig {
        HttpConfig {
            ca_cert: Some(fixture("ca.pem")),
            ..HttpConfig::default()
        }
    }

    pub fn harness(&self) -> Result<LoadHarness> {
        Ok(LoadHarness::new(&self.harness_config(), self.http_config().into())?)
    }

    pub async fn stop(self) -> Result<()> {
        self.running.stop().await?;
        Ok(())
    }
}
