//! Load harness configuration

use crate::error::ConfigResult;
use crate::validation::{validate_http_url, validate_relative_path, Validatable};
use serde::{Deserialize, Serialize};

/// Where the harness sends load and how loudly it reports failures
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Base URL of the TLS listener
    #[serde(default = "default_secure_base_url")]
    pub secure_base_url: String,

    /// Base URL of the plaintext listener
    #[serde(default = "default_plain_base_url")]
    pub plain_base_url: String,

    /// Relative path of the fast endpoint
    #[serde(default = "default_fast_path")]
    pub fast_path: String,

    /// Relative path of the slow endpoint
    #[serde(default = "default_slow_path")]
    pub slow_path: String,

    /// How many call errors are logged per batch
    #[serde(default = "default_max_errors_to_report")]
    pub max_errors_to_report: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            secure_base_url: default_secure_base_url(),
            plain_base_url: default_plain_base_url(),
            fast_path: default_fast_path(),
            slow_path: default_slow_path(),
            max_errors_to_report: default_max_errors_to_report(),
        }
    }
}

impl Validatable for HarnessConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_http_url(&self.secure_base_url, "secure_base_url", self.domain_name())?;
        validate_http_url(&self.plain_base_url, "plain_base_url", self.domain_name())?;
        validate_relative_path(&self.fast_path, "fast_path", self.domain_name())?;
        validate_relative_path(&self.slow_path, "slow_path", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "harness"
    }
}

// Default value functions
fn default_secure_base_url() -> String {
    "https://localhost:44398".to_string()
}

fn default_plain_base_url() -> String {
    "http://localhost:58526".to_string()
}

fn default_fast_path() -> String {
    "api/values".to_string()
}

fn default_slow_path() -> String {
    "api/values/slow".to_string()
}

fn default_max_errors_to_report() -> usize {
    1
}
