//! Configuration validation traits and utilities

use crate::error::{ConfigError, ConfigResult};
use std::net::SocketAddr;

/// Trait for validatable configuration
pub trait Validatable {
    /// Validate the configuration
    fn validate(&self) -> ConfigResult<()>;

    /// Get the domain name for error reporting
    fn domain_name(&self) -> &'static str;

    /// Helper to create a domain-specific validation error
    fn validation_error(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::DomainError {
            domain: self.domain_name().to_string(),
            message: message.into(),
        }
    }
}

/// Validate a required string field
pub fn validate_required_string(value: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if value.is_empty() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} cannot be empty", field_name),
        });
    }
    Ok(())
}

/// Validate a positive number
pub fn validate_positive<T>(value: T, field_name: &str, domain: &str) -> ConfigResult<()>
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value <= T::default() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must be greater than 0, got {}", field_name, value),
        });
    }
    Ok(())
}

/// Validate a URL
pub fn validate_url(url: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if url.is_empty() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} cannot be empty", field_name),
        });
    }

    url::Url::parse(url).map_err(|e| ConfigError::DomainError {
        domain: domain.to_string(),
        message: format!("{} has invalid URL format: {}", field_name, e),
    })?;

    Ok(())
}

/// Validate a base URL the harness can send requests to.
///
/// Only `http` and `https` schemes are accepted and the URL must carry a host.
pub fn validate_http_url(url: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    validate_url(url, field_name, domain)?;

    let parsed = url::Url::parse(url)?;
    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ConfigError::DomainError {
                domain: domain.to_string(),
                message: format!(
                    "{} scheme '{}' not supported (only http/https)",
                    field_name, scheme
                ),
            })
        }
    }

    if parsed.host_str().is_none() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must have a valid host", field_name),
        });
    }

    Ok(())
}

/// Validate a `host:port` listen address
pub fn validate_socket_addr(value: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    validate_required_string(value, field_name, domain)?;

    let addr: SocketAddr = value.parse().map_err(|e| ConfigError::DomainError {
        domain: domain.to_string(),
        message: format!("{} '{}' is not a valid socket address: {}", field_name, value, e),
    })?;

    // Port 1-1023 are typically reserved for system services
    if (1..=1023).contains(&addr.port()) {
        tracing::warn!("{} port {} is in the reserved range (1-1023)", field_name, addr.port());
    }

    Ok(())
}

/// Validate a relative request path (no scheme, no leading slash)
pub fn validate_relative_path(value: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    validate_required_string(value, field_name, domain)?;

    if value.starts_with('/') || value.contains("://") {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must be relative to the base URL, got '{}'", field_name, value),
        });
    }

    Ok(())
}
