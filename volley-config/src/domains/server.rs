//! Stub service configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, validate_socket_addr, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Stub service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Plaintext listener address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// TLS listener; absent means plaintext only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,

    /// Artificial delay applied by the slow endpoint
    #[serde(
        with = "crate::domains::utils::serde_duration_millis",
        default = "default_slow_delay"
    )]
    pub slow_delay: Duration,

    /// Whether to trace every HTTP request
    #[serde(default = "crate::domains::utils::default_true")]
    pub enable_tracing: bool,
}

/// TLS listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    /// TLS listener address
    #[serde(default = "default_tls_bind_address")]
    pub bind_address: String,

    /// Path to the PEM certificate (chain)
    pub cert_file: String,

    /// Path to the PEM private key
    pub key_file: String,
}

impl TlsConfig {
    /// TLS config on the default TLS address
    pub fn new(cert_file: impl Into<String>, key_file: impl Into<String>) -> Self {
        Self {
            bind_address: default_tls_bind_address(),
            cert_file: cert_file.into(),
            key_file: key_file.into(),
        }
    }

    pub fn with_bind_address(mut self, bind_address: impl Into<String>) -> Self {
        self.bind_address = bind_address.into();
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            tls: None,
            slow_delay: default_slow_delay(),
            enable_tracing: true,
        }
    }
}

impl Validatable for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_socket_addr(&self.bind_address, "bind_address", self.domain_name())?;
        validate_positive(self.slow_delay.as_millis(), "slow_delay", self.domain_name())?;

        if let Some(ref tls) = self.tls {
            tls.validate()?;
            if tls.bind_address == self.bind_address && !self.bind_address.ends_with(":0") {
                return Err(self.validation_error(
                    "TLS and plaintext listeners cannot share the same address",
                ));
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "server"
    }
}

impl Validatable for TlsConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_socket_addr(&self.bind_address, "bind_address", self.domain_name())?;
        validate_required_string(&self.cert_file, "cert_file", self.domain_name())?;
        validate_required_string(&self.key_file, "key_file", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "server.tls"
    }
}

// Default value functions
fn default_bind_address() -> String {
    "127.0.0.1:58526".to_string()
}

fn default_tls_bind_address() -> String {
    "127.0.0.1:44398".to_string()
}

fn default_slow_delay() -> Duration {
    Duration::from_millis(1000)
}
