//! Configuration loading and environment variable handling

use crate::domains::VolleyConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "VOLLEY".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a file with environment overrides.
    ///
    /// Files with a `.json` extension are parsed as JSON, anything else as YAML.
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<VolleyConfig> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config: VolleyConfig = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<VolleyConfig> {
        let mut config = VolleyConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<VolleyConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut VolleyConfig) -> ConfigResult<()> {
        self.apply_server_overrides(&mut config.server)?;
        self.apply_harness_overrides(&mut config.harness)?;
        self.apply_http_overrides(&mut config.http)?;
        self.apply_logging_overrides(&mut config.logging)?;
        Ok(())
    }

    /// Apply stub service overrides
    fn apply_server_overrides(
        &self,
        config: &mut crate::domains::server::ServerConfig,
    ) -> ConfigResult<()> {
        if let Ok(bind) = self.get_env_var("SERVER_BIND_ADDRESS") {
            config.bind_address = bind;
        }

        if let Ok(millis) = self.get_env_var("SLOW_DELAY_MS") {
            let millis: u64 = parse_env("SLOW_DELAY_MS", &millis)?;
            config.slow_delay = Duration::from_millis(millis);
        }

        let cert = self.get_env_var("TLS_CERT_FILE").ok();
        let key = self.get_env_var("TLS_KEY_FILE").ok();
        if let Some(tls) = config.tls.as_mut() {
            if let Some(cert) = cert {
                tls.cert_file = cert;
            }
            if let Some(key) = key {
                tls.key_file = key;
            }
        } else {
            match (cert, key) {
                (Some(cert), Some(key)) => {
                    config.tls = Some(crate::domains::server::TlsConfig::new(cert, key));
                }
                (None, None) => {}
                _ => {
                    return Err(ConfigError::EnvError(format!(
                        "{0}_TLS_CERT_FILE and {0}_TLS_KEY_FILE must be set together",
                        self.prefix
                    )));
                }
            }
        }

        if let Ok(bind) = self.get_env_var("TLS_BIND_ADDRESS") {
            match config.tls.as_mut() {
                Some(tls) => tls.bind_address = bind,
                None => {
                    return Err(ConfigError::EnvError(format!(
                        "{}_TLS_BIND_ADDRESS requires a TLS certificate and key",
                        self.prefix
                    )))
                }
            }
        }

        Ok(())
    }

    /// Apply load harness overrides
    fn apply_harness_overrides(
        &self,
        config: &mut crate::domains::harness::HarnessConfig,
    ) -> ConfigResult<()> {
        if let Ok(url) = self.get_env_var("SECURE_BASE_URL") {
            config.secure_base_url = url;
        }

        if let Ok(url) = self.get_env_var("PLAIN_BASE_URL") {
            config.plain_base_url = url;
        }

        if let Ok(max) = self.get_env_var("MAX_ERRORS_TO_REPORT") {
            config.max_errors_to_report = parse_env("MAX_ERRORS_TO_REPORT", &max)?;
        }

        Ok(())
    }

    /// Apply HTTP config overrides
    fn apply_http_overrides(
        &self,
        config: &mut crate::domains::http::HttpConfig,
    ) -> ConfigResult<()> {
        if let Ok(timeout) = self.get_env_var("HTTP_TIMEOUT") {
            let seconds: u64 = parse_env("HTTP_TIMEOUT", &timeout)?;
            config.timeout = Some(Duration::from_secs(seconds));
        }

        if let Ok(user_agent) = self.get_env_var("HTTP_USER_AGENT") {
            config.user_agent = user_agent;
        }

        if let Ok(verify_ssl) = self.get_env_var("HTTP_VERIFY_SSL") {
            config.verify_ssl = parse_env("HTTP_VERIFY_SSL", &verify_ssl)?;
        }

        if let Ok(ca_cert) = self.get_env_var("HTTP_CA_CERT") {
            config.ca_cert = Some(ca_cert);
        }

        Ok(())
    }

    /// Apply logging config overrides
    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_env<T>(name: &str, value: &str) -> ConfigResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| ConfigError::EnvError(format!("Invalid {}: {}", name, e)))
}
